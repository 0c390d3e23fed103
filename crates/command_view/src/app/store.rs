use std::collections::BTreeMap;

use command_input::scene::AreaSpec;
use command_input::{
    AgentId, AreaId, BuildingId, CommandStore, ContextTarget, LayoutScene, ResizeHandleHit,
    SceneLayout, StateAccessor,
};
use glam::{Vec2, Vec3};
use tracing::{debug, info};

const AGENT_SPEED_UNITS_PER_SECOND: f32 = 6.0;
const MOVE_ARRIVAL_THRESHOLD: f32 = 0.1;
const MIN_DRAFT_EXTENT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DraftArea {
    start: Vec3,
    current: Vec3,
}

/// In-memory application state the viewer's input commands mutate.
#[derive(Debug, Default)]
pub(crate) struct ViewStore {
    layout: SceneLayout,
    scene_dirty: bool,
    selected: Vec<AgentId>,
    selected_buildings: Vec<BuildingId>,
    selected_area: Option<AreaId>,
    focus_request: Option<Vec3>,
    destinations: BTreeMap<AgentId, Vec3>,
    assignments: BTreeMap<AgentId, AreaId>,
    draft: Option<DraftArea>,
    drawing: bool,
    building_drag_disabled: bool,
    hovered_agent: Option<AgentId>,
    hovered_building: Option<BuildingId>,
    next_area_number: usize,
    activity_count: u64,
}

impl ViewStore {
    pub(crate) fn new(layout: SceneLayout) -> Self {
        Self {
            next_area_number: layout.areas.len() + 1,
            layout,
            ..Self::default()
        }
    }

    pub(crate) fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Fresh hit-test scene when the layout changed since the last call.
    pub(crate) fn take_scene_update(&mut self) -> Option<LayoutScene> {
        if !self.scene_dirty {
            return None;
        }
        self.scene_dirty = false;
        Some(self.layout.build())
    }

    /// Walks agents toward their move targets.
    pub(crate) fn step(&mut self, dt_seconds: f32) {
        let max_step = AGENT_SPEED_UNITS_PER_SECOND * dt_seconds;
        let mut arrived = Vec::new();
        for (id, destination) in &self.destinations {
            let Some(agent) = self.layout.agent_mut(id) else {
                arrived.push(id.clone());
                continue;
            };
            let to_target = *destination - agent.position;
            let distance = to_target.length();
            if distance <= MOVE_ARRIVAL_THRESHOLD || distance <= max_step {
                agent.position = *destination;
                arrived.push(id.clone());
            } else {
                agent.position += to_target / distance * max_step;
            }
            self.scene_dirty = true;
        }
        for id in arrived {
            self.destinations.remove(&id);
            debug!(agent = %id, "agent_arrived");
        }
    }

    pub(crate) fn toggle_drawing(&mut self) {
        self.drawing = !self.drawing;
        if !self.drawing {
            self.draft = None;
        }
        info!(drawing = self.drawing, "drawing_mode_toggled");
    }

    pub(crate) fn toggle_building_drag(&mut self) {
        self.building_drag_disabled = !self.building_drag_disabled;
        info!(
            enabled = !self.building_drag_disabled,
            "building_drag_toggled"
        );
    }

    pub(crate) fn take_focus_request(&mut self) -> Option<Vec3> {
        self.focus_request.take()
    }

    pub(crate) fn is_selected(&self, agent: &AgentId) -> bool {
        self.selected.contains(agent)
    }

    pub(crate) fn is_building_selected(&self, building: &BuildingId) -> bool {
        self.selected_buildings.contains(building)
    }

    pub(crate) fn selected_area(&self) -> Option<&AreaId> {
        self.selected_area.as_ref()
    }

    pub(crate) fn hovered_agent(&self) -> Option<&AgentId> {
        self.hovered_agent.as_ref()
    }

    pub(crate) fn hovered_building(&self) -> Option<&BuildingId> {
        self.hovered_building.as_ref()
    }

    pub(crate) fn destinations(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.destinations.values().copied()
    }

    pub(crate) fn assigned_area(&self, agent: &AgentId) -> Option<&AreaId> {
        self.assignments.get(agent)
    }

    pub(crate) fn draft_area(&self) -> Option<AreaSpec> {
        self.draft.map(|draft| draft_spec(AreaId::new("draft"), draft))
    }

    pub(crate) fn activity_count(&self) -> u64 {
        self.activity_count
    }
}

fn draft_spec(id: AreaId, draft: DraftArea) -> AreaSpec {
    AreaSpec::from_corners(
        id,
        Vec2::new(draft.start.x, draft.start.z),
        Vec2::new(draft.current.x, draft.current.z),
    )
}

impl CommandStore for ViewStore {
    fn select_agent(&mut self, agent: &AgentId, additive: bool) {
        if !additive {
            self.selected = vec![agent.clone()];
        } else if let Some(index) = self.selected.iter().position(|id| id == agent) {
            self.selected.remove(index);
        } else {
            self.selected.push(agent.clone());
        }
        debug!(selected = self.selected.len(), "selection_changed");
    }

    fn set_selection(&mut self, agents: Vec<AgentId>, buildings: Vec<BuildingId>) {
        self.selected = agents;
        self.selected_buildings = buildings;
        debug!(
            selected = self.selected.len(),
            buildings = self.selected_buildings.len(),
            "selection_changed"
        );
    }

    fn clear_selection(&mut self) {
        self.selected.clear();
        self.selected_buildings.clear();
    }

    fn focus_agent(&mut self, agent: &AgentId) {
        self.focus_request = self.layout.agent(agent).map(|spec| spec.position);
    }

    fn move_agent(&mut self, agent: &AgentId, destination: Vec3) {
        self.destinations.insert(agent.clone(), destination);
    }

    fn area_at(&self, position: Vec3) -> Option<AreaId> {
        self.layout
            .areas
            .iter()
            .rev()
            .find(|area| area.contains(position))
            .map(|area| area.id.clone())
    }

    fn assign_agents(&mut self, agents: &[AgentId], area: &AreaId) {
        for agent in agents {
            self.assignments.insert(agent.clone(), area.clone());
        }
        info!(area = %area, agents = agents.len(), "agents_assigned");
    }

    fn select_area(&mut self, area: Option<&AreaId>) {
        self.selected_area = area.cloned();
    }

    fn open_area(&mut self, area: &AreaId) {
        self.selected_area = Some(area.clone());
        info!(area = %area, "area_opened");
    }

    fn open_folder(&mut self, area: &AreaId) {
        info!(area = %area, "area_folder_opened");
    }

    fn select_building(&mut self, building: &BuildingId) {
        self.selected_buildings = vec![building.clone()];
    }

    fn open_building(&mut self, building: &BuildingId) {
        info!(building = %building, "building_opened");
    }

    fn move_building(&mut self, building: &BuildingId, position: Vec3) {
        if let Some(spec) = self.layout.building_mut(building) {
            spec.position = Vec3::new(position.x, spec.position.y, position.z);
            self.scene_dirty = true;
        }
    }

    fn begin_draft_area(&mut self, corner: Vec3) {
        self.draft = Some(DraftArea {
            start: corner,
            current: corner,
        });
    }

    fn update_draft_area(&mut self, corner: Vec3) {
        if let Some(draft) = &mut self.draft {
            draft.current = corner;
        }
    }

    fn finish_draft_area(&mut self, corner: Option<Vec3>) {
        let Some(mut draft) = self.draft.take() else {
            return;
        };
        let Some(corner) = corner else {
            debug!("draft_area_abandoned");
            return;
        };
        draft.current = corner;

        let id = AreaId::new(format!("area-{}", self.next_area_number));
        let area = draft_spec(id, draft);
        if area.half_extents.min_element() * 2.0 < MIN_DRAFT_EXTENT {
            debug!("draft_area_too_small");
            return;
        }
        self.next_area_number += 1;
        info!(area = %area.id, "area_created");
        self.selected_area = Some(area.id.clone());
        self.layout.areas.push(area);
        self.drawing = false;
        self.scene_dirty = true;
    }

    fn resize_area(&mut self, handle: &ResizeHandleHit, position: Vec3) {
        if let Some(area) = self.layout.area_mut(&handle.area) {
            area.drag_corner(handle.corner, position);
            self.scene_dirty = true;
        }
    }

    fn open_context_menu(&mut self, screen: Vec2, world: Option<Vec3>, target: &ContextTarget) {
        info!(
            x = screen.x,
            y = screen.y,
            world = ?world,
            target = ?target,
            "context_menu_opened"
        );
    }

    fn show_agent_tooltip(&mut self, agent: Option<&AgentId>, _screen: Option<Vec2>) {
        self.hovered_agent = agent.cloned();
    }

    fn show_building_tooltip(&mut self, building: Option<&BuildingId>, _screen: Option<Vec2>) {
        self.hovered_building = building.cloned();
    }

    fn record_activity(&mut self) {
        self.activity_count = self.activity_count.saturating_add(1);
    }
}

impl StateAccessor for ViewStore {
    fn selected_agents(&self) -> Vec<AgentId> {
        self.selected.clone()
    }

    fn drawing_mode_active(&self) -> bool {
        self.drawing
    }

    fn building_drag_enabled(&self) -> bool {
        !self.building_drag_disabled
    }
}
