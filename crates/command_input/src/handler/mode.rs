use glam::{Vec2, Vec3};

use crate::input::MouseAction;
use crate::scene::ResizeHandleHit;
use crate::types::BuildingId;

/// The one interaction currently in flight. Entering a mode replaces the
/// previous value, so two modes can never be active together.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureMode {
    #[default]
    Idle,
    BoxSelect(BoxSelect),
    Resize {
        handle: ResizeHandleHit,
    },
    Draw,
    DragBuilding(BuildingDrag),
    Pinch,
    ThreeFingerOrbit,
    CameraDrag {
        action: MouseAction,
    },
}

impl GestureMode {
    pub fn name(&self) -> &'static str {
        match self {
            GestureMode::Idle => "idle",
            GestureMode::BoxSelect(_) => "box_select",
            GestureMode::Resize { .. } => "resize",
            GestureMode::Draw => "draw",
            GestureMode::DragBuilding(_) => "drag_building",
            GestureMode::Pinch => "pinch",
            GestureMode::ThreeFingerOrbit => "three_finger_orbit",
            GestureMode::CameraDrag { .. } => "camera_drag",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GestureMode::Idle)
    }

    pub fn is_touch(&self) -> bool {
        matches!(self, GestureMode::Pinch | GestureMode::ThreeFingerOrbit)
    }
}

/// Pointer pressed on empty space. Becomes a box selection once it moves
/// past the drag threshold, otherwise resolves as a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSelect {
    pub start: Vec2,
    pub current: Vec2,
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingDrag {
    pub building: BuildingId,
    pub start: Vec2,
    pub dragging: bool,
    pub last: Vec3,
}

/// Screen-space rectangle of an active box selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl SelectionRect {
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}
