use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::scene::ResizeHandleHit;
use crate::types::{AgentId, AreaId, BuildingId};

/// What a context-menu request landed on, classified like a click.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ContextTarget {
    FolderIcon(AreaId),
    Agent(AgentId),
    Building(BuildingId),
    Area(AreaId),
    Ground,
}

/// Semantic events the input core emits. One variant per callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    AgentClick {
        agent: AgentId,
        shift: bool,
    },
    AgentDoubleClick {
        agent: AgentId,
    },
    AgentHover {
        agent: Option<AgentId>,
        screen: Option<Vec2>,
    },
    GroundClick,
    GroundClickOutsideArea,
    MoveCommand {
        position: Vec3,
        agents: Vec<AgentId>,
    },
    SelectionBox {
        agents: Vec<AgentId>,
        buildings: Vec<BuildingId>,
    },
    DrawStart {
        position: Vec3,
    },
    DrawMove {
        position: Vec3,
    },
    /// `None` when the pointer was released off the ground.
    DrawEnd {
        position: Option<Vec3>,
    },
    AreaRightClick {
        position: Vec3,
    },
    AreaClick {
        area: AreaId,
    },
    AreaDoubleClick {
        area: AreaId,
    },
    ResizeStart {
        handle: ResizeHandleHit,
        position: Option<Vec3>,
    },
    ResizeMove {
        position: Vec3,
    },
    ResizeEnd,
    FolderIconClick {
        area: AreaId,
    },
    BuildingClick {
        building: BuildingId,
    },
    BuildingDoubleClick {
        building: BuildingId,
    },
    BuildingHover {
        building: Option<BuildingId>,
        screen: Option<Vec2>,
    },
    BuildingDragStart {
        building: BuildingId,
        position: Vec3,
    },
    BuildingDragMove {
        building: BuildingId,
        position: Vec3,
    },
    BuildingDragEnd {
        building: BuildingId,
        position: Vec3,
    },
    ContextMenu {
        screen: Vec2,
        world: Option<Vec3>,
        target: ContextTarget,
    },
    Activity,
    Haptic {
        duration_ms: u64,
    },
}

impl InputEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::AgentClick { .. } => "agent_click",
            InputEvent::AgentDoubleClick { .. } => "agent_double_click",
            InputEvent::AgentHover { .. } => "agent_hover",
            InputEvent::GroundClick => "ground_click",
            InputEvent::GroundClickOutsideArea => "ground_click_outside_area",
            InputEvent::MoveCommand { .. } => "move_command",
            InputEvent::SelectionBox { .. } => "selection_box",
            InputEvent::DrawStart { .. } => "draw_start",
            InputEvent::DrawMove { .. } => "draw_move",
            InputEvent::DrawEnd { .. } => "draw_end",
            InputEvent::AreaRightClick { .. } => "area_right_click",
            InputEvent::AreaClick { .. } => "area_click",
            InputEvent::AreaDoubleClick { .. } => "area_double_click",
            InputEvent::ResizeStart { .. } => "resize_start",
            InputEvent::ResizeMove { .. } => "resize_move",
            InputEvent::ResizeEnd => "resize_end",
            InputEvent::FolderIconClick { .. } => "folder_icon_click",
            InputEvent::BuildingClick { .. } => "building_click",
            InputEvent::BuildingDoubleClick { .. } => "building_double_click",
            InputEvent::BuildingHover { .. } => "building_hover",
            InputEvent::BuildingDragStart { .. } => "building_drag_start",
            InputEvent::BuildingDragMove { .. } => "building_drag_move",
            InputEvent::BuildingDragEnd { .. } => "building_drag_end",
            InputEvent::ContextMenu { .. } => "context_menu",
            InputEvent::Activity => "activity",
            InputEvent::Haptic { .. } => "haptic",
        }
    }
}

/// Outbound contract of the input core.
pub trait InputCallbacks {
    fn on_event(&mut self, event: InputEvent);
}

impl<F: FnMut(InputEvent)> InputCallbacks for F {
    fn on_event(&mut self, event: InputEvent) {
        self(event)
    }
}

/// Shared recorder for emitted events. Clones share one buffer, so a test
/// can keep a handle while the handler owns another.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<InputEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<InputEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn snapshot(&self) -> Vec<InputEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl InputCallbacks for EventLog {
    fn on_event(&mut self, event: InputEvent) {
        self.events.borrow_mut().push(event);
    }
}
