use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::PointerButton;
use crate::types::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseAction {
    Select,
    Pan,
    Orbit,
    Rotate,
    None,
}

impl MouseAction {
    pub fn is_camera(self) -> bool {
        matches!(self, MouseAction::Pan | MouseAction::Orbit | MouseAction::Rotate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl ModifierKey {
    fn is_held(self, modifiers: Modifiers) -> bool {
        match self {
            ModifierKey::Shift => modifiers.shift,
            ModifierKey::Ctrl => modifiers.ctrl,
            ModifierKey::Alt => modifiers.alt,
            ModifierKey::Meta => modifiers.meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseBinding {
    pub button: PointerButton,
    #[serde(default)]
    pub modifier: Option<ModifierKey>,
    pub action: MouseAction,
}

impl MouseBinding {
    const fn plain(button: PointerButton, action: MouseAction) -> Self {
        Self {
            button,
            modifier: None,
            action,
        }
    }

    const fn with(button: PointerButton, modifier: ModifierKey, action: MouseAction) -> Self {
        Self {
            button,
            modifier: Some(modifier),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MouseBindings(pub Vec<MouseBinding>);

impl Default for MouseBindings {
    fn default() -> Self {
        Self(vec![
            MouseBinding::plain(PointerButton::Primary, MouseAction::Select),
            MouseBinding::plain(PointerButton::Middle, MouseAction::Pan),
            MouseBinding::plain(PointerButton::Secondary, MouseAction::Orbit),
            MouseBinding::with(PointerButton::Primary, ModifierKey::Alt, MouseAction::Orbit),
            MouseBinding::with(PointerButton::Middle, ModifierKey::Shift, MouseAction::Rotate),
        ])
    }
}

impl MouseBindings {
    /// A binding naming a held modifier wins over the plain binding.
    pub fn resolve(&self, button: PointerButton, modifiers: Modifiers) -> MouseAction {
        let mut plain = None;
        for binding in self.0.iter().filter(|binding| binding.button == button) {
            match binding.modifier {
                Some(modifier) if modifier.is_held(modifiers) => return binding.action,
                Some(_) => {}
                None => {
                    plain.get_or_insert(binding.action);
                }
            }
        }
        plain.unwrap_or(MouseAction::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMotion {
    pub action: MouseAction,
    pub delta: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraDrag {
    button: PointerButton,
    action: MouseAction,
    start: Vec2,
    last: Vec2,
    dragging: bool,
}

/// Turns camera-bound mouse drags into pan, orbit and twist motions.
#[derive(Debug, Clone)]
pub struct MouseControlHandler {
    bindings: MouseBindings,
    drag_threshold_px: f32,
    active: Option<CameraDrag>,
    context_menu_suppressed: bool,
}

impl MouseControlHandler {
    pub fn new(bindings: MouseBindings, drag_threshold_px: f32) -> Self {
        Self {
            bindings,
            drag_threshold_px,
            active: None,
            context_menu_suppressed: false,
        }
    }

    pub fn resolve(&self, button: PointerButton, modifiers: Modifiers) -> MouseAction {
        self.bindings.resolve(button, modifiers)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a camera drag when the button is bound to a camera action.
    pub fn begin(
        &mut self,
        button: PointerButton,
        modifiers: Modifiers,
        position: Vec2,
    ) -> MouseAction {
        let action = self.resolve(button, modifiers);
        if action.is_camera() {
            self.active = Some(CameraDrag {
                button,
                action,
                start: position,
                last: position,
                dragging: false,
            });
            if button == PointerButton::Secondary {
                self.context_menu_suppressed = false;
            }
        }
        action
    }

    pub fn drag(&mut self, position: Vec2) -> Option<CameraMotion> {
        let drag = self.active.as_mut()?;
        if !drag.dragging {
            if position.distance(drag.start) <= self.drag_threshold_px {
                return None;
            }
            drag.dragging = true;
            debug!(action = ?drag.action, "camera_drag_started");
            if drag.button == PointerButton::Secondary {
                self.context_menu_suppressed = true;
            }
        }

        let delta = position - drag.last;
        drag.last = position;
        (delta != Vec2::ZERO).then_some(CameraMotion {
            action: drag.action,
            delta,
        })
    }

    /// Ends the drag for `button`; returns whether it moved past the threshold.
    pub fn end(&mut self, button: PointerButton) -> bool {
        match self.active {
            Some(drag) if drag.button == button => {
                self.active = None;
                drag.dragging
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn take_context_menu_suppressed(&mut self) -> bool {
        std::mem::take(&mut self.context_menu_suppressed)
    }
}
