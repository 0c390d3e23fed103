use std::collections::BTreeMap;

use glam::Vec3;

use super::geometry::Collider;
use super::graph::{NodeId, SceneGraph};
use crate::types::{AgentId, AreaId, BuildingId};

/// Read-only view of the rendered scene.
///
/// Every getter is re-queried for each operation, so meshes added or removed
/// between frames are always seen. Nothing here is cached by the input core.
pub trait SceneReferences {
    /// `None` while the ground has not been built yet.
    fn ground(&self) -> Option<Collider>;

    fn graph(&self) -> &SceneGraph;

    /// Root node of each agent's mesh group.
    fn agent_meshes(&self) -> &BTreeMap<AgentId, NodeId>;

    fn resize_handles(&self) -> &[NodeId];

    fn folder_icons(&self) -> &[NodeId];

    /// Anchor positions used by box selection.
    fn building_positions(&self) -> &BTreeMap<BuildingId, Vec3>;

    /// Area containing a ground point.
    fn area_at(&self, world: Vec3) -> Option<AreaId>;

    /// Building whose footprint contains a ground point.
    fn building_at(&self, world: Vec3) -> Option<BuildingId>;
}
