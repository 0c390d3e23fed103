use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or(Vec3::NEG_Z),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Distance to the plane `y = height`, if the ray hits it going forward.
    pub fn intersect_horizontal_plane(&self, height: f32) -> Option<f32> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let distance = (height - self.origin.y) / self.direction.y;
        (distance >= 0.0).then_some(distance)
    }

    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let to_origin = self.origin - center;
        let b = to_origin.dot(self.direction);
        let c = to_origin.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }

    /// Slab test against an axis-aligned box.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let inverse = self.direction.recip();
        let t1 = (min - self.origin) * inverse;
        let t2 = (max - self.origin) * inverse;
        let t_min = t1.min(t2).max_element();
        let t_max = t1.max(t2).min_element();
        if t_max < 0.0 || t_min > t_max || t_min.is_nan() || t_max.is_nan() {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Collider {
    Sphere { center: Vec3, radius: f32 },
    Aabb { min: Vec3, max: Vec3 },
    /// Flat rectangle at `center.y`, extents on X and Z.
    GroundRect { center: Vec3, half_extents: Vec2 },
}

impl Collider {
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Collider::Sphere { center, radius } => ray.intersect_sphere(center, radius),
            Collider::Aabb { min, max } => ray.intersect_aabb(min, max),
            Collider::GroundRect {
                center,
                half_extents,
            } => {
                let distance = ray.intersect_horizontal_plane(center.y)?;
                let point = ray.at(distance);
                let inside = (point.x - center.x).abs() <= half_extents.x
                    && (point.z - center.z).abs() <= half_extents.y;
                inside.then_some(distance)
            }
        }
    }
}
