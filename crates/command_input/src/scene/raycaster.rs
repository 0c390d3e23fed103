use glam::{Vec2, Vec3, Vec4};

use super::geometry::Ray;
use super::graph::{NodeId, NodeTag, ResizeHandleHit};
use super::references::SceneReferences;
use crate::camera::OrbitCamera;
use crate::types::{AgentId, AreaId, CanvasRect};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hit {
    node: NodeId,
    distance: f32,
}

/// Hit testing and screen/world conversion against the current scene.
///
/// Holds the canvas bounds and a reusable hit buffer; no gesture state.
#[derive(Debug, Clone, Default)]
pub struct SceneRaycaster {
    canvas: CanvasRect,
    hits: Vec<Hit>,
}

impl SceneRaycaster {
    pub fn new(canvas: CanvasRect) -> Self {
        Self {
            canvas,
            hits: Vec::new(),
        }
    }

    pub fn canvas(&self) -> CanvasRect {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: CanvasRect) {
        self.canvas = canvas;
    }

    pub fn screen_to_ndc(&self, screen: Vec2) -> Vec2 {
        self.canvas.to_ndc(screen)
    }

    pub fn ray_from_ndc(&self, camera: &OrbitCamera, ndc: Vec2) -> Ray {
        let inverse = camera.view_projection(self.canvas.aspect()).inverse();
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(near, far - near)
    }

    pub fn ray_from_screen(&self, camera: &OrbitCamera, screen: Vec2) -> Ray {
        self.ray_from_ndc(camera, self.screen_to_ndc(screen))
    }

    pub fn raycast_ground(
        &self,
        camera: &OrbitCamera,
        scene: &dyn SceneReferences,
        screen: Vec2,
    ) -> Option<Vec3> {
        self.raycast_ground_from_ndc(camera, scene, self.screen_to_ndc(screen))
    }

    pub fn raycast_ground_from_ndc(
        &self,
        camera: &OrbitCamera,
        scene: &dyn SceneReferences,
        ndc: Vec2,
    ) -> Option<Vec3> {
        let ground = scene.ground()?;
        let ray = self.ray_from_ndc(camera, ndc);
        ground.intersect(&ray).map(|distance| ray.at(distance))
    }

    /// Ground hit, else the infinite `y = 0` plane. Used where the cursor may
    /// be past the rendered ground, e.g. while zooming.
    pub fn raycast_to_plane(
        &self,
        camera: &OrbitCamera,
        scene: &dyn SceneReferences,
        ndc: Vec2,
    ) -> Option<Vec3> {
        if let Some(point) = self.raycast_ground_from_ndc(camera, scene, ndc) {
            return Some(point);
        }
        let ray = self.ray_from_ndc(camera, ndc);
        ray.intersect_horizontal_plane(0.0)
            .map(|distance| ray.at(distance))
    }

    pub fn find_agent_at(
        &mut self,
        camera: &OrbitCamera,
        scene: &dyn SceneReferences,
        screen: Vec2,
    ) -> Option<AgentId> {
        self.find_agent_from_ndc(camera, scene, self.screen_to_ndc(screen))
    }

    /// Nearest agent mesh under `ndc`, resolved by walking up from the hit
    /// node to the node carrying the agent tag.
    pub fn find_agent_from_ndc(
        &mut self,
        camera: &OrbitCamera,
        scene: &dyn SceneReferences,
        ndc: Vec2,
    ) -> Option<AgentId> {
        let ray = self.ray_from_ndc(camera, ndc);
        let graph = scene.graph();
        self.hits.clear();
        for root in scene.agent_meshes().values() {
            for node in graph.descendants(*root) {
                collect_hit(scene, node, &ray, &mut self.hits);
            }
        }

        let nearest = nearest_hit(&self.hits)?;
        graph.ancestors(nearest.node).find_map(|id| match graph.node(id) {
            Some(node) => match &node.tag {
                NodeTag::Agent(agent) => Some(agent.clone()),
                _ => None,
            },
            None => None,
        })
    }

    pub fn check_resize_handle(
        &mut self,
        camera: &OrbitCamera,
        scene: &dyn SceneReferences,
        screen: Vec2,
    ) -> Option<ResizeHandleHit> {
        let node = self.nearest_in(camera, scene, scene.resize_handles(), screen)?;
        match &scene.graph().node(node)?.tag {
            NodeTag::ResizeHandle(hit) => Some(hit.clone()),
            _ => None,
        }
    }

    pub fn check_folder_icon(
        &mut self,
        camera: &OrbitCamera,
        scene: &dyn SceneReferences,
        screen: Vec2,
    ) -> Option<AreaId> {
        let node = self.nearest_in(camera, scene, scene.folder_icons(), screen)?;
        match &scene.graph().node(node)?.tag {
            NodeTag::FolderIcon(area) => Some(area.clone()),
            _ => None,
        }
    }

    /// Page-pixel position of a world point; `None` behind the camera.
    pub fn project_to_screen(&self, camera: &OrbitCamera, world: Vec3) -> Option<Vec2> {
        let clip = camera.view_projection(self.canvas.aspect()) * Vec4::from((world, 1.0));
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
        Some(self.canvas.from_ndc(ndc))
    }

    fn nearest_in(
        &mut self,
        camera: &OrbitCamera,
        scene: &dyn SceneReferences,
        nodes: &[NodeId],
        screen: Vec2,
    ) -> Option<NodeId> {
        if nodes.is_empty() {
            return None;
        }
        let ray = self.ray_from_screen(camera, screen);
        self.hits.clear();
        for node in nodes {
            collect_hit(scene, *node, &ray, &mut self.hits);
        }
        nearest_hit(&self.hits).map(|hit| hit.node)
    }
}

fn collect_hit(scene: &dyn SceneReferences, node: NodeId, ray: &Ray, hits: &mut Vec<Hit>) {
    let Some(collider) = scene.graph().node(node).and_then(|node| node.collider) else {
        return;
    };
    if let Some(distance) = collider.intersect(ray) {
        hits.push(Hit { node, distance });
    }
}

fn nearest_hit(hits: &[Hit]) -> Option<Hit> {
    hits.iter()
        .copied()
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::graph::HandleCorner;
    use crate::scene::layout::{AgentSpec, AreaSpec, SceneLayout};

    fn top_down_camera() -> OrbitCamera {
        OrbitCamera::new(Vec3::new(0.0, 40.0, 0.001), Vec3::ZERO)
    }

    fn layout() -> SceneLayout {
        SceneLayout {
            agents: vec![
                AgentSpec {
                    id: AgentId::new("near"),
                    position: Vec3::new(0.0, 0.0, 0.0),
                    radius: 0.5,
                },
                AgentSpec {
                    id: AgentId::new("east"),
                    position: Vec3::new(10.0, 0.0, 0.0),
                    radius: 0.5,
                },
            ],
            areas: vec![AreaSpec {
                id: AreaId::new("yard"),
                center: Vec2::new(-10.0, 10.0),
                half_extents: Vec2::new(4.0, 4.0),
            }],
            ..SceneLayout::default()
        }
    }

    #[test]
    fn projected_world_point_raycasts_back_to_itself() {
        let raycaster = SceneRaycaster::new(CanvasRect::new(10.0, 20.0, 800.0, 600.0));
        let camera = OrbitCamera::default();
        let scene = layout().build();
        let world = Vec3::new(6.0, 0.0, -4.0);

        let screen = raycaster.project_to_screen(&camera, world).expect("visible");
        let back = raycaster.raycast_ground(&camera, &scene, screen).expect("ground");

        assert!((back - world).length() < 1e-2, "{back:?}");
    }

    #[test]
    fn agent_hit_walks_up_to_tagged_group() {
        let mut raycaster = SceneRaycaster::new(CanvasRect::from_size(800.0, 800.0));
        let camera = top_down_camera();
        let scene = layout().build();

        let screen = raycaster
            .project_to_screen(&camera, Vec3::new(10.0, 1.0, 0.0))
            .expect("visible");
        assert_eq!(
            raycaster.find_agent_at(&camera, &scene, screen),
            Some(AgentId::new("east"))
        );
    }

    #[test]
    fn empty_ground_point_has_no_agent() {
        let mut raycaster = SceneRaycaster::new(CanvasRect::from_size(800.0, 800.0));
        let camera = top_down_camera();
        let scene = layout().build();

        let screen = raycaster
            .project_to_screen(&camera, Vec3::new(5.0, 0.0, 5.0))
            .expect("visible");
        assert_eq!(raycaster.find_agent_at(&camera, &scene, screen), None);
    }

    #[test]
    fn resize_handle_and_folder_icon_resolve_their_area() {
        let mut raycaster = SceneRaycaster::new(CanvasRect::from_size(800.0, 800.0));
        let camera = top_down_camera();
        let built = layout();
        let scene = built.build();
        let area = &built.areas[0];

        let corner = area.corner(HandleCorner::SouthEast);
        let handle_screen = raycaster
            .project_to_screen(&camera, Vec3::new(corner.x, 0.3, corner.y))
            .expect("visible");
        assert_eq!(
            raycaster.check_resize_handle(&camera, &scene, handle_screen),
            Some(ResizeHandleHit {
                area: AreaId::new("yard"),
                corner: HandleCorner::SouthEast
            })
        );

        let icon_screen = raycaster
            .project_to_screen(&camera, Vec3::new(-12.8, 0.8, 7.2))
            .expect("visible");
        assert_eq!(
            raycaster.check_folder_icon(&camera, &scene, icon_screen),
            Some(AreaId::new("yard"))
        );
    }

    #[test]
    fn plane_fallback_covers_points_past_the_ground() {
        let raycaster = SceneRaycaster::new(CanvasRect::from_size(800.0, 600.0));
        let camera = OrbitCamera::default();
        let scene = SceneLayout {
            ground_half_extents: Some(Vec2::splat(2.0)),
            ..SceneLayout::default()
        }
        .build();
        let far_ndc = raycaster.screen_to_ndc(
            raycaster
                .project_to_screen(&camera, Vec3::new(20.0, 0.0, -10.0))
                .expect("visible"),
        );

        assert!(raycaster
            .raycast_ground_from_ndc(&camera, &scene, far_ndc)
            .is_none());
        let point = raycaster
            .raycast_to_plane(&camera, &scene, far_ndc)
            .expect("plane");
        assert!((point - Vec3::new(20.0, 0.0, -10.0)).length() < 1e-2);
    }

    #[test]
    fn point_behind_camera_does_not_project() {
        let raycaster = SceneRaycaster::default();
        let camera = OrbitCamera::default();
        assert_eq!(
            raycaster.project_to_screen(&camera, Vec3::new(0.0, 60.0, 90.0)),
            None
        );
    }
}
