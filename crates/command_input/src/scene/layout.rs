use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::geometry::Collider;
use super::graph::{HandleCorner, NodeId, NodeTag, ResizeHandleHit, SceneGraph};
use super::references::SceneReferences;
use crate::types::{AgentId, AreaId, BuildingId};

const HANDLE_RADIUS: f32 = 0.6;
const HANDLE_HEIGHT: f32 = 0.3;
const FOLDER_ICON_RADIUS: f32 = 0.7;
const FOLDER_ICON_INSET: f32 = 1.2;
const FOLDER_ICON_HEIGHT: f32 = 0.8;
const HEAD_SCALE: f32 = 0.6;

fn default_agent_radius() -> f32 {
    0.5
}

fn default_ground_half_extents() -> Option<Vec2> {
    Some(Vec2::splat(60.0))
}

/// Plain-data scene description: ground, agents, buildings and areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneLayout {
    pub ground_half_extents: Option<Vec2>,
    pub agents: Vec<AgentSpec>,
    pub buildings: Vec<BuildingSpec>,
    pub areas: Vec<AreaSpec>,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            ground_half_extents: default_ground_half_extents(),
            agents: Vec::new(),
            buildings: Vec::new(),
            areas: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSpec {
    pub id: AgentId,
    pub position: Vec3,
    #[serde(default = "default_agent_radius")]
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildingSpec {
    pub id: BuildingId,
    pub position: Vec3,
    pub half_size: Vec3,
}

impl BuildingSpec {
    pub fn footprint_contains(&self, world: Vec3) -> bool {
        (world.x - self.position.x).abs() <= self.half_size.x
            && (world.z - self.position.z).abs() <= self.half_size.z
    }
}

/// Ground rectangle; `center` and `half_extents` are on the XZ plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaSpec {
    pub id: AreaId,
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl AreaSpec {
    pub fn from_corners(id: AreaId, a: Vec2, b: Vec2) -> Self {
        Self {
            id,
            center: (a + b) * 0.5,
            half_extents: ((a - b) * 0.5).abs(),
        }
    }

    pub fn contains(&self, world: Vec3) -> bool {
        (world.x - self.center.x).abs() <= self.half_extents.x
            && (world.z - self.center.y).abs() <= self.half_extents.y
    }

    pub fn corner(&self, corner: HandleCorner) -> Vec2 {
        let (sx, sz) = corner.signs();
        self.center + Vec2::new(sx * self.half_extents.x, sz * self.half_extents.y)
    }

    /// Moves one corner to `world`, keeping the opposite corner fixed.
    pub fn drag_corner(&mut self, corner: HandleCorner, world: Vec3) {
        let (sx, sz) = corner.signs();
        let opposite = self.center - Vec2::new(sx * self.half_extents.x, sz * self.half_extents.y);
        let moved = Vec2::new(world.x, world.z);
        self.center = (opposite + moved) * 0.5;
        self.half_extents = ((moved - opposite) * 0.5).abs();
    }
}

impl SceneLayout {
    pub fn agent(&self, id: &AgentId) -> Option<&AgentSpec> {
        self.agents.iter().find(|agent| &agent.id == id)
    }

    pub fn agent_mut(&mut self, id: &AgentId) -> Option<&mut AgentSpec> {
        self.agents.iter_mut().find(|agent| &agent.id == id)
    }

    pub fn building_mut(&mut self, id: &BuildingId) -> Option<&mut BuildingSpec> {
        self.buildings.iter_mut().find(|building| &building.id == id)
    }

    pub fn area(&self, id: &AreaId) -> Option<&AreaSpec> {
        self.areas.iter().find(|area| &area.id == id)
    }

    pub fn area_mut(&mut self, id: &AreaId) -> Option<&mut AreaSpec> {
        self.areas.iter_mut().find(|area| &area.id == id)
    }

    pub fn build(&self) -> LayoutScene {
        let mut graph = SceneGraph::new();
        let ground = self.ground_half_extents.map(|half_extents| Collider::GroundRect {
            center: Vec3::ZERO,
            half_extents,
        });
        if ground.is_some() {
            graph.add_root(NodeTag::Ground, Vec3::ZERO, ground);
        }

        let mut agent_meshes = BTreeMap::new();
        for agent in &self.agents {
            let group = graph.add_root(NodeTag::Agent(agent.id.clone()), agent.position, None);
            let body_center = agent.position + Vec3::Y * agent.radius;
            let body = graph.add_child(
                group,
                NodeTag::None,
                body_center,
                Some(Collider::Sphere {
                    center: body_center,
                    radius: agent.radius,
                }),
            );
            let head_radius = agent.radius * HEAD_SCALE;
            let head_center = body_center + Vec3::Y * (agent.radius + head_radius);
            graph.add_child(
                body,
                NodeTag::None,
                head_center,
                Some(Collider::Sphere {
                    center: head_center,
                    radius: head_radius,
                }),
            );
            agent_meshes.insert(agent.id.clone(), group);
        }

        let mut resize_handles = Vec::new();
        let mut folder_icons = Vec::new();
        for area in &self.areas {
            for corner in HandleCorner::ALL {
                let at = area.corner(corner);
                let center = Vec3::new(at.x, HANDLE_HEIGHT, at.y);
                resize_handles.push(graph.add_root(
                    NodeTag::ResizeHandle(ResizeHandleHit {
                        area: area.id.clone(),
                        corner,
                    }),
                    center,
                    Some(Collider::Sphere {
                        center,
                        radius: HANDLE_RADIUS,
                    }),
                ));
            }

            let north_west = area.corner(HandleCorner::NorthWest);
            let icon = Vec3::new(
                north_west.x + FOLDER_ICON_INSET,
                FOLDER_ICON_HEIGHT,
                north_west.y + FOLDER_ICON_INSET,
            );
            folder_icons.push(graph.add_root(
                NodeTag::FolderIcon(area.id.clone()),
                icon,
                Some(Collider::Sphere {
                    center: icon,
                    radius: FOLDER_ICON_RADIUS,
                }),
            ));
        }

        let building_positions = self
            .buildings
            .iter()
            .map(|building| (building.id.clone(), building.position))
            .collect();

        LayoutScene {
            ground,
            graph,
            agent_meshes,
            resize_handles,
            folder_icons,
            building_positions,
            buildings: self.buildings.clone(),
            areas: self.areas.clone(),
        }
    }
}

/// A built [`SceneLayout`], ready for raycasting.
#[derive(Debug, Clone, Default)]
pub struct LayoutScene {
    ground: Option<Collider>,
    graph: SceneGraph,
    agent_meshes: BTreeMap<AgentId, NodeId>,
    resize_handles: Vec<NodeId>,
    folder_icons: Vec<NodeId>,
    building_positions: BTreeMap<BuildingId, Vec3>,
    buildings: Vec<BuildingSpec>,
    areas: Vec<AreaSpec>,
}

impl SceneReferences for LayoutScene {
    fn ground(&self) -> Option<Collider> {
        self.ground
    }

    fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    fn agent_meshes(&self) -> &BTreeMap<AgentId, NodeId> {
        &self.agent_meshes
    }

    fn resize_handles(&self) -> &[NodeId] {
        &self.resize_handles
    }

    fn folder_icons(&self) -> &[NodeId] {
        &self.folder_icons
    }

    fn building_positions(&self) -> &BTreeMap<BuildingId, Vec3> {
        &self.building_positions
    }

    fn area_at(&self, world: Vec3) -> Option<AreaId> {
        // Later areas draw on top.
        self.areas
            .iter()
            .rev()
            .find(|area| area.contains(world))
            .map(|area| area.id.clone())
    }

    fn building_at(&self, world: Vec3) -> Option<BuildingId> {
        self.buildings
            .iter()
            .rev()
            .find(|building| building.footprint_contains(world))
            .map(|building| building.id.clone())
    }
}
