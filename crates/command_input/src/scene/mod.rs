pub mod geometry;
pub mod graph;
pub mod layout;
pub mod raycaster;
pub mod references;

pub use geometry::{Collider, Ray};
pub use graph::{HandleCorner, NodeId, NodeTag, ResizeHandleHit, SceneGraph, SceneNode};
pub use layout::{AgentSpec, AreaSpec, BuildingSpec, LayoutScene, SceneLayout};
pub use raycaster::SceneRaycaster;
pub use references::SceneReferences;
