mod controller;
mod orbit;

pub use controller::CameraController;
pub use orbit::{OrbitCamera, Spherical};
