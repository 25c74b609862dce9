// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod camera;
mod color;
mod sampling;

pub use camera::Camera;
pub use color::{hsv_to_rgb, random_hsv, HsvRange};
pub use sampling::{random_in_disk, random_range};
