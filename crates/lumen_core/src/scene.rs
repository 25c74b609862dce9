//! Scene-level types shared by the host and the render pipeline.

use lumen_math::{Mat4, Quat, Vec3, Vec4};

/// Transform components that can be composed into a matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Builder-style rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder-style uniform scale.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// The single directional (sun) light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels in, normalized
    pub direction: Vec3,

    /// Light intensity
    pub intensity: f32,
}

impl DirectionalLight {
    /// Create a light; `direction` is normalized.
    pub fn new(direction: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            intensity,
        }
    }

    /// Direction in xyz, intensity in w, as the kernel consumes it.
    pub fn as_vec4(&self) -> Vec4 {
        self.direction.extend(self.intensity)
    }

    /// World transform of the light: a rotation taking -Z onto the light direction.
    ///
    /// Only the orientation matters for a directional light, so this is what
    /// gets watched for accumulation resets.
    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_rotation_arc(Vec3::NEG_Z, self.direction))
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::new(-0.3, -0.8, -0.5), 1.0)
    }
}
