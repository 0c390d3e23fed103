//! Synthetic input port. Hosts translate their native window or DOM events
//! into these values; gesture logic never sees a platform type.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Bit in the `buttons` mask of a pointer event, DOM order.
    pub const fn mask(self) -> u8 {
        match self {
            PointerButton::Primary => 1,
            PointerButton::Secondary => 2,
            PointerButton::Middle => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    #[serde(default)]
    pub pointer_id: u64,
    #[serde(default)]
    pub kind: PointerKind,
    pub position: Vec2,
    /// Button that changed for down/up; `None` for moves.
    #[serde(default)]
    pub button: Option<PointerButton>,
    /// Buttons held after this event.
    #[serde(default)]
    pub buttons: u8,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(skip)]
    pub time: Duration,
}

impl PointerInput {
    pub fn new(position: Vec2, time: Duration) -> Self {
        Self {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            position,
            button: None,
            buttons: 0,
            modifiers: Modifiers::NONE,
            time,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_buttons(mut self, buttons: u8) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_buttonless(&self) -> bool {
        self.buttons == 0
    }

    pub fn holds(&self, button: PointerButton) -> bool {
        self.buttons & button.mask() != 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    pub position: Vec2,
    #[serde(default)]
    pub delta_x: f32,
    pub delta_y: f32,
    #[serde(default)]
    pub delta_mode: DeltaMode,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(skip)]
    pub time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Vec2,
}

/// One touch event. `touches` are the fingers still on the surface after the
/// event; `changed` are the fingers this event is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchInput {
    pub touches: Vec<TouchPoint>,
    #[serde(default)]
    pub changed: Vec<TouchPoint>,
    #[serde(skip)]
    pub time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackpadGesture {
    /// Native magnification delta; positive spreads the fingers.
    Magnify { delta: f32 },
    /// Native rotation delta in radians.
    Rotate { delta: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackpadGestureInput {
    pub gesture: TrackpadGesture,
    pub position: Vec2,
    #[serde(skip)]
    pub time: Duration,
}
