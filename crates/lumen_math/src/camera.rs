use glam::{Mat4, Vec3};

/// Maximum pitch magnitude, keeps the view basis away from the poles.
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Free-fly perspective camera.
///
/// Orientation is stored as yaw/pitch (radians). Yaw 0 looks down -Z,
/// positive pitch looks up. View space is right-handed with -Z forward,
/// which is what the trace kernel expects when it unprojects pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera looking from `position` towards `target`
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 60.0_f32.to_radians(),
            aspect,
            near: 0.3,
            far: 1000.0,
        };
        camera.look_at(target);
        camera
    }

    /// Point the camera at `target`, keeping its position.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = (-dir.x).atan2(-dir.z);
    }

    /// Unit forward vector
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    /// Unit right vector (always horizontal)
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Unit up vector
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// Camera → world transform. This is also the camera's world transform.
    pub fn camera_to_world(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    /// Get the projection matrix (camera → clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Clip → camera space, used by the kernel to build primary rays.
    pub fn inverse_projection(&self) -> Mat4 {
        self.projection_matrix().inverse()
    }

    /// Update aspect ratio (e.g., on window resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Move along the camera basis. Components are in camera-local
    /// right/up/forward units and get scaled by `distance`.
    pub fn translate_local(&mut self, right: f32, up: f32, forward: f32, distance: f32) {
        let delta = self.right() * right + self.up() * up + self.forward() * forward;
        self.position += delta * distance;
    }

    /// Mouse-look rotation in radians. Pitch is clamped short of straight up/down.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}
