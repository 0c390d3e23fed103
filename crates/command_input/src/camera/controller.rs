use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use tracing::trace;

use super::orbit::{OrbitCamera, Spherical};
use crate::config::CameraConfig;

/// Camera math for zoom, pan, orbit and twist. Holds no camera state.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: CameraConfig,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// One wheel notch: positive `delta_y` backs away, negative moves in.
    /// `anchor` is the world point under the cursor; it keeps its screen
    /// position through the zoom.
    pub fn handle_wheel_zoom(&self, camera: &mut OrbitCamera, delta_y: f32, anchor: Option<Vec3>) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let factor = if delta_y > 0.0 {
            1.0 + self.config.zoom_step
        } else {
            1.0 - self.config.zoom_step
        };
        self.zoom_to(camera, camera.distance() * factor, anchor);
    }

    /// Pinch ratio above 1 moves in.
    pub fn handle_pinch_zoom(&self, camera: &mut OrbitCamera, scale: f32, anchor: Option<Vec3>) {
        if scale <= 0.0 || !scale.is_finite() {
            return;
        }
        self.zoom_to(camera, camera.distance() / scale, anchor);
    }

    fn zoom_to(&self, camera: &mut OrbitCamera, desired: f32, anchor: Option<Vec3>) {
        let distance = camera.distance();
        if distance <= f32::EPSILON {
            return;
        }
        let next = desired.clamp(self.config.min_distance, self.config.max_distance);
        let back = camera.offset() / distance;

        if let Some(anchor) = anchor {
            let fraction = 1.0 - next / distance;
            camera.target += (anchor - camera.target) * fraction;
            camera.target.y = camera.target.y.max(0.0);
        }
        camera.position = camera.target + back * next;
        trace!(distance = next, anchored = anchor.is_some(), "camera_zoomed");
    }

    /// Drag-style pan: the ground follows the pointer. Speed scales with
    /// distance so the apparent speed is the same at any zoom.
    pub fn handle_pan(&self, camera: &mut OrbitCamera, delta: Vec2) {
        let speed = camera.distance() * self.config.pan_speed;
        let direction = camera.direction();
        let forward = Vec3::new(direction.x, 0.0, direction.z).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y);

        let shift = right * (-delta.x * speed) + forward * (delta.y * speed);
        camera.position += shift;
        camera.target += shift;
    }

    pub fn handle_orbit(&self, camera: &mut OrbitCamera, delta: Vec2) {
        let mut spherical = Spherical::from_offset(camera.offset());
        spherical.theta -= delta.x * self.config.orbit_speed;
        spherical.phi -= delta.y * self.config.orbit_speed;
        self.apply(camera, spherical);
    }

    pub fn handle_twist_rotation(&self, camera: &mut OrbitCamera, angle: f32) {
        if !angle.is_finite() {
            return;
        }
        let mut spherical = Spherical::from_offset(camera.offset());
        spherical.theta += angle;
        self.apply(camera, spherical);
    }

    fn apply(&self, camera: &mut OrbitCamera, mut spherical: Spherical) {
        let margin = self.config.polar_margin;
        spherical.phi = spherical.phi.clamp(margin, PI - margin);
        camera.position = camera.target + spherical.to_offset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(CameraConfig::default())
    }

    fn screen_of(camera: &OrbitCamera, world: Vec3) -> Vec3 {
        camera.view_projection(16.0 / 9.0).project_point3(world)
    }

    #[test]
    fn wheel_zoom_keeps_anchor_on_screen() {
        let controller = controller();
        let mut camera = OrbitCamera::default();
        let anchor = Vec3::new(12.0, 0.0, -6.0);

        for delta in [-120.0, -120.0, 120.0, -120.0] {
            let before = screen_of(&camera, anchor);
            controller.handle_wheel_zoom(&mut camera, delta, Some(anchor));
            let after = screen_of(&camera, anchor);
            assert!((before.x - after.x).abs() < 1e-4, "{before:?} vs {after:?}");
            assert!((before.y - after.y).abs() < 1e-4, "{before:?} vs {after:?}");
        }
    }

    #[test]
    fn wheel_zoom_steps_distance_by_ten_percent() {
        let controller = controller();
        let mut camera = OrbitCamera::default();
        let start = camera.distance();

        controller.handle_wheel_zoom(&mut camera, -1.0, None);
        assert!((camera.distance() - start * 0.9).abs() < 1e-3);
        controller.handle_wheel_zoom(&mut camera, 1.0, None);
        assert!((camera.distance() - start * 0.9 * 1.1).abs() < 1e-3);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn zoom_without_anchor_keeps_view_direction() {
        let controller = controller();
        let mut camera = OrbitCamera::new(Vec3::new(5.0, 20.0, 15.0), Vec3::new(5.0, 0.0, 0.0));
        let direction = camera.direction();

        controller.handle_pinch_zoom(&mut camera, 2.0, None);

        assert!((camera.direction() - direction).length() < 1e-5);
        assert!((camera.distance() - 12.5).abs() < 1e-4);
    }

    #[test]
    fn zoom_respects_distance_bounds() {
        let controller = controller();
        let mut camera = OrbitCamera::default();

        for _ in 0..100 {
            controller.handle_wheel_zoom(&mut camera, -1.0, Some(Vec3::new(3.0, 0.0, 3.0)));
        }
        assert!((camera.distance() - 5.0).abs() < 1e-3);
        for _ in 0..100 {
            controller.handle_wheel_zoom(&mut camera, 1.0, None);
        }
        assert!((camera.distance() - 200.0).abs() < 1e-2);
    }

    #[test]
    fn zoom_never_pushes_target_below_ground() {
        let controller = controller();
        let mut camera = OrbitCamera::default();

        controller.handle_pinch_zoom(&mut camera, 1.5, Some(Vec3::new(0.0, -40.0, 0.0)));

        assert!(camera.target.y >= 0.0);
    }

    #[test]
    fn orbit_polar_angle_stays_clamped() {
        let controller = controller();
        let mut camera = OrbitCamera::default();

        for _ in 0..50 {
            controller.handle_orbit(&mut camera, Vec2::new(13.0, 900.0));
            let phi = Spherical::from_offset(camera.offset()).phi;
            assert!(phi >= 0.1 - 1e-4 && phi <= PI - 0.1 + 1e-4, "phi {phi}");
        }
        for _ in 0..50 {
            controller.handle_orbit(&mut camera, Vec2::new(-7.0, -900.0));
            let phi = Spherical::from_offset(camera.offset()).phi;
            assert!(phi >= 0.1 - 1e-4 && phi <= PI - 0.1 + 1e-4, "phi {phi}");
        }
    }

    #[test]
    fn orbit_preserves_distance_and_target() {
        let controller = controller();
        let mut camera = OrbitCamera::default();
        let distance = camera.distance();

        controller.handle_orbit(&mut camera, Vec2::new(40.0, -20.0));

        assert!((camera.distance() - distance).abs() < 1e-3);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn twist_changes_only_azimuth() {
        let controller = controller();
        let mut camera = OrbitCamera::default();
        let before = Spherical::from_offset(camera.offset());

        controller.handle_twist_rotation(&mut camera, 0.5);
        let after = Spherical::from_offset(camera.offset());

        assert!((after.theta - before.theta - 0.5).abs() < 1e-4);
        assert!((after.phi - before.phi).abs() < 1e-4);
        assert!((after.radius - before.radius).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_target_and_camera_together_on_ground_plane() {
        let controller = controller();
        let mut camera = OrbitCamera::default();
        let offset = camera.offset();

        controller.handle_pan(&mut camera, Vec2::new(100.0, 0.0));

        assert!((camera.offset() - offset).length() < 1e-4);
        assert_eq!(camera.target.y, 0.0);
        // Camera looks down -Z, so dragging right slides the view toward -X.
        let expected = -(100.0 * offset.length() * 0.005);
        assert!((camera.target.x - expected).abs() < 1e-3);
        assert!(camera.target.z.abs() < 1e-5);
    }

    #[test]
    fn pan_speed_scales_with_distance() {
        let controller = controller();
        let mut near = OrbitCamera::new(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO);
        let mut far = OrbitCamera::new(Vec3::new(0.0, 40.0, 40.0), Vec3::ZERO);

        controller.handle_pan(&mut near, Vec2::new(0.0, 50.0));
        controller.handle_pan(&mut far, Vec2::new(0.0, 50.0));

        assert!((far.target.length() / near.target.length() - 4.0).abs() < 1e-3);
    }
}
