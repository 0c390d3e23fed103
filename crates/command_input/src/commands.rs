use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use tracing::{debug, trace};

use crate::callbacks::{ContextTarget, InputCallbacks, InputEvent};
use crate::scene::ResizeHandleHit;
use crate::types::{AgentId, AreaId, BuildingId};

/// Distance between agents sent to one point.
pub const FORMATION_SPACING: f32 = 1.5;

/// Application store operations the semantic input events map onto.
pub trait CommandStore {
    /// Selects one agent. `additive` toggles it within the current selection.
    fn select_agent(&mut self, agent: &AgentId, additive: bool);
    fn set_selection(&mut self, agents: Vec<AgentId>, buildings: Vec<BuildingId>);
    fn clear_selection(&mut self);
    fn focus_agent(&mut self, agent: &AgentId);
    fn move_agent(&mut self, agent: &AgentId, destination: Vec3);

    fn area_at(&self, position: Vec3) -> Option<AreaId>;
    fn assign_agents(&mut self, agents: &[AgentId], area: &AreaId);
    fn select_area(&mut self, area: Option<&AreaId>);
    fn open_area(&mut self, area: &AreaId);
    fn open_folder(&mut self, area: &AreaId);

    fn select_building(&mut self, building: &BuildingId);
    fn open_building(&mut self, building: &BuildingId);
    fn move_building(&mut self, building: &BuildingId, position: Vec3);

    fn begin_draft_area(&mut self, corner: Vec3);
    fn update_draft_area(&mut self, corner: Vec3);
    /// `None` abandons the draft.
    fn finish_draft_area(&mut self, corner: Option<Vec3>);

    fn resize_area(&mut self, handle: &ResizeHandleHit, position: Vec3);

    fn open_context_menu(&mut self, _screen: Vec2, _world: Option<Vec3>, _target: &ContextTarget) {}

    fn show_agent_tooltip(&mut self, _agent: Option<&AgentId>, _screen: Option<Vec2>) {}

    fn show_building_tooltip(&mut self, _building: Option<&BuildingId>, _screen: Option<Vec2>) {}

    fn record_activity(&mut self) {}
}

/// Grid offsets centred on the target, row-major, one per agent.
pub fn formation_offsets(count: usize) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let columns = (count as f32).sqrt().ceil() as usize;
    let rows = count.div_ceil(columns);
    let origin = Vec3::new(
        (columns - 1) as f32 * 0.5,
        0.0,
        (rows - 1) as f32 * 0.5,
    ) * FORMATION_SPACING;

    (0..count)
        .map(|index| {
            let cell = Vec3::new((index % columns) as f32, 0.0, (index / columns) as f32);
            cell * FORMATION_SPACING - origin
        })
        .collect()
}

/// Callback sink that turns input events into store commands.
#[derive(Debug)]
pub struct InputEventHandlers<S> {
    store: S,
    resizing: Option<ResizeHandleHit>,
    last_moved: Vec<AgentId>,
}

impl<S: CommandStore> InputEventHandlers<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            resizing: None,
            last_moved: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn handle(&mut self, event: InputEvent) {
        trace!(event = event.name(), "input_event_dispatched");
        match event {
            InputEvent::AgentClick { agent, shift } => self.store.select_agent(&agent, shift),
            InputEvent::AgentDoubleClick { agent } => {
                self.store.select_agent(&agent, false);
                self.store.focus_agent(&agent);
            }
            InputEvent::AgentHover { agent, screen } => {
                self.store.show_agent_tooltip(agent.as_ref(), screen);
            }
            InputEvent::GroundClick => self.store.clear_selection(),
            InputEvent::GroundClickOutsideArea => self.store.select_area(None),
            InputEvent::MoveCommand { position, agents } => {
                for (agent, offset) in agents.iter().zip(formation_offsets(agents.len())) {
                    self.store.move_agent(agent, position + offset);
                }
                debug!(agents = agents.len(), "agents_moved");
                self.last_moved = agents;
            }
            InputEvent::SelectionBox { agents, buildings } => {
                self.store.set_selection(agents, buildings);
            }
            InputEvent::DrawStart { position } => self.store.begin_draft_area(position),
            InputEvent::DrawMove { position } => self.store.update_draft_area(position),
            InputEvent::DrawEnd { position } => self.store.finish_draft_area(position),
            InputEvent::AreaRightClick { position } => {
                if let Some(area) = self.store.area_at(position) {
                    let agents = std::mem::take(&mut self.last_moved);
                    debug!(area = %area, agents = agents.len(), "agents_assigned");
                    self.store.assign_agents(&agents, &area);
                }
            }
            InputEvent::AreaClick { area } => self.store.select_area(Some(&area)),
            InputEvent::AreaDoubleClick { area } => self.store.open_area(&area),
            InputEvent::ResizeStart { handle, .. } => self.resizing = Some(handle),
            InputEvent::ResizeMove { position } => {
                if let Some(handle) = &self.resizing {
                    self.store.resize_area(handle, position);
                }
            }
            InputEvent::ResizeEnd => self.resizing = None,
            InputEvent::FolderIconClick { area } => self.store.open_folder(&area),
            InputEvent::BuildingClick { building } => self.store.select_building(&building),
            InputEvent::BuildingDoubleClick { building } => self.store.open_building(&building),
            InputEvent::BuildingHover { building, screen } => {
                self.store.show_building_tooltip(building.as_ref(), screen);
            }
            InputEvent::BuildingDragStart { .. } => {}
            InputEvent::BuildingDragMove { building, position }
            | InputEvent::BuildingDragEnd { building, position } => {
                self.store.move_building(&building, position);
            }
            InputEvent::ContextMenu {
                screen,
                world,
                target,
            } => self.store.open_context_menu(screen, world, &target),
            InputEvent::Activity => self.store.record_activity(),
            InputEvent::Haptic { duration_ms } => debug!(duration_ms, "haptic_requested"),
        }
    }
}

impl<S: CommandStore> InputCallbacks for InputEventHandlers<S> {
    fn on_event(&mut self, event: InputEvent) {
        self.handle(event);
    }
}

impl<T: CommandStore> CommandStore for Rc<RefCell<T>> {
    fn select_agent(&mut self, agent: &AgentId, additive: bool) {
        self.borrow_mut().select_agent(agent, additive);
    }

    fn set_selection(&mut self, agents: Vec<AgentId>, buildings: Vec<BuildingId>) {
        self.borrow_mut().set_selection(agents, buildings);
    }

    fn clear_selection(&mut self) {
        self.borrow_mut().clear_selection();
    }

    fn focus_agent(&mut self, agent: &AgentId) {
        self.borrow_mut().focus_agent(agent);
    }

    fn move_agent(&mut self, agent: &AgentId, destination: Vec3) {
        self.borrow_mut().move_agent(agent, destination);
    }

    fn area_at(&self, position: Vec3) -> Option<AreaId> {
        self.borrow().area_at(position)
    }

    fn assign_agents(&mut self, agents: &[AgentId], area: &AreaId) {
        self.borrow_mut().assign_agents(agents, area);
    }

    fn select_area(&mut self, area: Option<&AreaId>) {
        self.borrow_mut().select_area(area);
    }

    fn open_area(&mut self, area: &AreaId) {
        self.borrow_mut().open_area(area);
    }

    fn open_folder(&mut self, area: &AreaId) {
        self.borrow_mut().open_folder(area);
    }

    fn select_building(&mut self, building: &BuildingId) {
        self.borrow_mut().select_building(building);
    }

    fn open_building(&mut self, building: &BuildingId) {
        self.borrow_mut().open_building(building);
    }

    fn move_building(&mut self, building: &BuildingId, position: Vec3) {
        self.borrow_mut().move_building(building, position);
    }

    fn begin_draft_area(&mut self, corner: Vec3) {
        self.borrow_mut().begin_draft_area(corner);
    }

    fn update_draft_area(&mut self, corner: Vec3) {
        self.borrow_mut().update_draft_area(corner);
    }

    fn finish_draft_area(&mut self, corner: Option<Vec3>) {
        self.borrow_mut().finish_draft_area(corner);
    }

    fn resize_area(&mut self, handle: &ResizeHandleHit, position: Vec3) {
        self.borrow_mut().resize_area(handle, position);
    }

    fn open_context_menu(&mut self, screen: Vec2, world: Option<Vec3>, target: &ContextTarget) {
        self.borrow_mut().open_context_menu(screen, world, target);
    }

    fn show_agent_tooltip(&mut self, agent: Option<&AgentId>, screen: Option<Vec2>) {
        self.borrow_mut().show_agent_tooltip(agent, screen);
    }

    fn show_building_tooltip(&mut self, building: Option<&BuildingId>, screen: Option<Vec2>) {
        self.borrow_mut().show_building_tooltip(building, screen);
    }

    fn record_activity(&mut self) {
        self.borrow_mut().record_activity();
    }
}
