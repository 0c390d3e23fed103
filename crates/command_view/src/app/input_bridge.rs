use std::collections::BTreeMap;
use std::time::Duration;

use command_input::{
    DeltaMode, InputHandler, Modifiers, PointerButton, PointerInput, SceneView, TouchInput,
    TouchPoint, TrackpadGesture, TrackpadGestureInput, WheelInput,
};
use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::ModifiersState;

/// Platform-free input value ready for the gesture core.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SyntheticInput {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    ContextMenu(PointerInput),
    Wheel(WheelInput),
    Trackpad(TrackpadGestureInput),
    TouchStart(TouchInput),
    TouchMove(TouchInput),
    TouchEnd(TouchInput),
    TouchCancel(Duration),
    Leave(Duration),
    Blur(Duration),
    Visibility { hidden: bool, at: Duration },
}

impl SyntheticInput {
    pub(crate) fn dispatch(self, handler: &mut InputHandler, view: &mut SceneView<'_>) {
        match self {
            SyntheticInput::PointerDown(input) => handler.pointer_down(view, &input),
            SyntheticInput::PointerMove(input) => handler.pointer_move(view, &input),
            SyntheticInput::PointerUp(input) => handler.pointer_up(view, &input),
            SyntheticInput::ContextMenu(input) => handler.context_menu(view, &input),
            SyntheticInput::Wheel(input) => handler.wheel(view, &input),
            SyntheticInput::Trackpad(input) => handler.trackpad_gesture(view, &input),
            SyntheticInput::TouchStart(input) => handler.touch_start(view, &input),
            SyntheticInput::TouchMove(input) => handler.touch_move(view, &input),
            SyntheticInput::TouchEnd(input) => handler.touch_end(view, &input),
            SyntheticInput::TouchCancel(at) => handler.touch_cancel(view, at),
            SyntheticInput::Leave(at) => handler.pointer_leave(view, at),
            SyntheticInput::Blur(at) => handler.window_blur(view, at),
            SyntheticInput::Visibility { hidden, at } => {
                handler.visibility_changed(view, hidden, at)
            }
        }
    }
}

/// Tracks the window-side pointer state winit reports piecemeal and turns
/// window events into synthetic inputs.
#[derive(Debug, Default)]
pub(crate) struct InputBridge {
    cursor: Vec2,
    modifiers: Modifiers,
    buttons: u8,
    touches: BTreeMap<u64, Vec2>,
}

impl InputBridge {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn translate(&mut self, event: &WindowEvent, now: Duration) -> Vec<SyntheticInput> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32), now)
            }
            WindowEvent::CursorLeft { .. } => self.cursor_left(now),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*button, *state, now),
            WindowEvent::MouseWheel { delta, .. } => self.mouse_wheel(*delta, now),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers_changed(modifiers.state());
                Vec::new()
            }
            WindowEvent::Touch(touch) => self.touch(
                touch.phase,
                touch.id,
                Vec2::new(touch.location.x as f32, touch.location.y as f32),
                now,
            ),
            WindowEvent::Focused(focused) => self.focused(*focused, now),
            WindowEvent::Occluded(occluded) => self.occluded(*occluded, now),
            WindowEvent::TouchpadMagnify { delta, .. } => self.magnify(*delta, now),
            WindowEvent::TouchpadRotate { delta, .. } => self.rotate(*delta, now),
            _ => Vec::new(),
        }
    }

    pub(crate) fn cursor_moved(&mut self, position: Vec2, now: Duration) -> Vec<SyntheticInput> {
        self.cursor = position;
        vec![SyntheticInput::PointerMove(self.pointer(None, now))]
    }

    pub(crate) fn cursor_left(&mut self, now: Duration) -> Vec<SyntheticInput> {
        vec![SyntheticInput::Leave(now)]
    }

    pub(crate) fn mouse_input(
        &mut self,
        button: MouseButton,
        state: ElementState,
        now: Duration,
    ) -> Vec<SyntheticInput> {
        let Some(button) = pointer_button(button) else {
            return Vec::new();
        };
        match state {
            ElementState::Pressed => {
                self.buttons |= button.mask();
                vec![SyntheticInput::PointerDown(self.pointer(Some(button), now))]
            }
            ElementState::Released => {
                self.buttons &= !button.mask();
                let up = self.pointer(Some(button), now);
                if button == PointerButton::Secondary {
                    vec![
                        SyntheticInput::PointerUp(up),
                        SyntheticInput::ContextMenu(self.pointer(None, now)),
                    ]
                } else {
                    vec![SyntheticInput::PointerUp(up)]
                }
            }
        }
    }

    /// Wheel deltas follow the DOM sign: positive `delta_y` scrolls down.
    pub(crate) fn mouse_wheel(&mut self, delta: MouseScrollDelta, now: Duration) -> Vec<SyntheticInput> {
        let (delta_x, delta_y, delta_mode) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (-x, -y, DeltaMode::Line),
            MouseScrollDelta::PixelDelta(position) => {
                (-position.x as f32, -position.y as f32, DeltaMode::Pixel)
            }
        };
        if delta_x == 0.0 && delta_y == 0.0 {
            return Vec::new();
        }
        vec![SyntheticInput::Wheel(WheelInput {
            position: self.cursor,
            delta_x,
            delta_y,
            delta_mode,
            modifiers: self.modifiers,
            time: now,
        })]
    }

    pub(crate) fn modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        };
    }

    pub(crate) fn touch(
        &mut self,
        phase: TouchPhase,
        id: u64,
        position: Vec2,
        now: Duration,
    ) -> Vec<SyntheticInput> {
        let changed = vec![TouchPoint { id, position }];
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, position);
                vec![SyntheticInput::TouchStart(self.touch_input(changed, now))]
            }
            TouchPhase::Moved => {
                if !self.touches.contains_key(&id) {
                    return Vec::new();
                }
                self.touches.insert(id, position);
                vec![SyntheticInput::TouchMove(self.touch_input(changed, now))]
            }
            TouchPhase::Ended => {
                if self.touches.remove(&id).is_none() {
                    return Vec::new();
                }
                vec![SyntheticInput::TouchEnd(self.touch_input(changed, now))]
            }
            TouchPhase::Cancelled => {
                self.touches.clear();
                vec![SyntheticInput::TouchCancel(now)]
            }
        }
    }

    /// Losing focus drops held buttons; the window never sees their release.
    pub(crate) fn focused(&mut self, focused: bool, now: Duration) -> Vec<SyntheticInput> {
        if focused {
            return Vec::new();
        }
        self.buttons = 0;
        self.modifiers = Modifiers::NONE;
        vec![SyntheticInput::Blur(now)]
    }

    pub(crate) fn occluded(&mut self, occluded: bool, now: Duration) -> Vec<SyntheticInput> {
        vec![SyntheticInput::Visibility {
            hidden: occluded,
            at: now,
        }]
    }

    pub(crate) fn magnify(&mut self, delta: f64, now: Duration) -> Vec<SyntheticInput> {
        self.trackpad(
            TrackpadGesture::Magnify {
                delta: delta as f32,
            },
            now,
        )
    }

    /// winit reports rotation in degrees, counterclockwise positive.
    pub(crate) fn rotate(&mut self, delta_degrees: f32, now: Duration) -> Vec<SyntheticInput> {
        self.trackpad(
            TrackpadGesture::Rotate {
                delta: delta_degrees.to_radians(),
            },
            now,
        )
    }

    fn trackpad(&self, gesture: TrackpadGesture, now: Duration) -> Vec<SyntheticInput> {
        vec![SyntheticInput::Trackpad(TrackpadGestureInput {
            gesture,
            position: self.cursor,
            time: now,
        })]
    }

    fn pointer(&self, button: Option<PointerButton>, now: Duration) -> PointerInput {
        let input = PointerInput::new(self.cursor, now)
            .with_buttons(self.buttons)
            .with_modifiers(self.modifiers);
        match button {
            Some(button) => input.with_button(button),
            None => input,
        }
    }

    fn touch_input(&self, changed: Vec<TouchPoint>, now: Duration) -> TouchInput {
        TouchInput {
            touches: self
                .touches
                .iter()
                .map(|(&id, &position)| TouchPoint { id, position })
                .collect(),
            changed,
            time: now,
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}
