pub mod callbacks;
pub mod camera;
pub mod commands;
pub mod config;
pub mod handler;
pub mod input;
pub mod scene;
pub mod state;
mod types;

pub use callbacks::{ContextTarget, EventLog, InputCallbacks, InputEvent};
pub use camera::{CameraController, OrbitCamera, Spherical};
pub use commands::{CommandStore, InputEventHandlers};
pub use config::{
    CameraConfig, ClickConfig, ConfigError, HoverConfig, InputConfig, TouchConfig, TrackpadConfig,
};
pub use handler::{GestureMode, InputHandler, SceneView, SelectionRect};
pub use input::{
    ClickKind, DeltaMode, DoubleClickDetector, MouseAction, MouseBinding, MouseBindings,
    PointerButton, PointerInput, PointerKind, TouchInput, TouchPoint, TrackpadGesture,
    TrackpadGestureInput, WheelInput,
};
pub use scene::{
    Collider, HandleCorner, LayoutScene, NodeId, NodeTag, Ray, ResizeHandleHit, SceneGraph,
    SceneLayout, SceneRaycaster, SceneReferences,
};
pub use state::{StateAccessor, StaticState};
pub use types::{AgentId, AreaId, BuildingId, CanvasRect, Modifiers};
