pub mod double_click;
pub mod events;
pub mod mouse;
pub mod timer;
pub mod touch;
pub mod trackpad;

pub use double_click::{ClickKind, DoubleClickDetector};
pub use events::{
    DeltaMode, PointerButton, PointerInput, PointerKind, TouchInput, TouchPoint, TrackpadGesture,
    TrackpadGestureInput, WheelInput,
};
pub use mouse::{
    CameraMotion, ModifierKey, MouseAction, MouseBinding, MouseBindings, MouseControlHandler,
};
pub use timer::Deadline;
pub use touch::{TouchGesture, TouchGestureHandler};
pub use trackpad::{TrackpadAction, TrackpadGestureHandler};
