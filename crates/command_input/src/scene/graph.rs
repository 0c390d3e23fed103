use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::Collider;
use crate::types::{AgentId, AreaId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleCorner {
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl HandleCorner {
    pub const ALL: [HandleCorner; 4] = [
        HandleCorner::NorthWest,
        HandleCorner::NorthEast,
        HandleCorner::SouthEast,
        HandleCorner::SouthWest,
    ];

    /// Sign of the corner along X and Z (north is -Z).
    pub fn signs(self) -> (f32, f32) {
        match self {
            HandleCorner::NorthWest => (-1.0, -1.0),
            HandleCorner::NorthEast => (1.0, -1.0),
            HandleCorner::SouthEast => (1.0, 1.0),
            HandleCorner::SouthWest => (-1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeHandleHit {
    pub area: AreaId,
    pub corner: HandleCorner,
}

/// Metadata the raycaster looks for while walking up from a hit node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeTag {
    #[default]
    None,
    Agent(AgentId),
    ResizeHandle(ResizeHandleHit),
    FolderIcon(AreaId),
    Ground,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub tag: NodeTag,
    pub collider: Option<Collider>,
    pub position: Vec3,
}

/// Arena of scene nodes. Parents own children by index only.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add_root(&mut self, tag: NodeTag, position: Vec3, collider: Option<Collider>) -> NodeId {
        self.push(None, tag, position, collider)
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        tag: NodeTag,
        position: Vec3,
        collider: Option<Collider>,
    ) -> NodeId {
        let id = self.push(Some(parent), tag, position, collider);
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// `root` followed by every node below it, depth first.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// `start` followed by each parent up to the root.
    pub fn ancestors(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.node(start).map(|_| start);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.node(current).and_then(|node| node.parent);
            Some(current)
        })
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        tag: NodeTag,
        position: Vec3,
        collider: Option<Collider>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            parent,
            children: Vec::new(),
            tag,
            collider,
            position,
        });
        id
    }
}
