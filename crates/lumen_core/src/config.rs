//! Scene configuration.
//!
//! `SceneConfig` is the external parameter surface of the renderer: sphere
//! generation inputs, lighting and kernel settings. It is loaded from JSON
//! and validated up front. Invalid values are rejected with a descriptive
//! error, never clamped.

use std::path::{Path, PathBuf};

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::DirectionalLight;
use crate::spheres::SphereSettings;

/// Largest accepted `spheres_max`.
pub const MAX_SPHERES: u32 = 200;

/// Accepted reflection-bounce limits.
pub const REFLECTIONS_RANGE: std::ops::RangeInclusive<u32> = 1..=9;

/// Accepted global illumination multipliers.
pub const GLOBAL_ILLUMINATION_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.9;

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid sphere radius range: [{min}, {max}]")]
    InvalidRadiusRange { min: f32, max: f32 },

    #[error("Sphere radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("Placement radius must be finite and non-negative, got {0}")]
    InvalidPlacementRadius(f32),

    #[error("Too many spheres: {count} (maximum {max})")]
    TooManySpheres { count: u32, max: u32 },

    #[error("Global illumination {0} outside [0, 1.9]")]
    GlobalIlluminationOutOfRange(f32),

    #[error("Reflection count {0} outside 1..=9")]
    ReflectionsOutOfRange(u32),

    #[error("Material thresholds must satisfy 0 <= metallic ({metallic}) <= diffuse ({diffuse}) <= 1")]
    InvalidMaterialThresholds { metallic: f32, diffuse: f32 },

    #[error("Invalid emission range [{min}, {max}]")]
    InvalidEmissionRange { min: f32, max: f32 },

    #[error("Dielectric specular {0} outside [0, 1]")]
    InvalidDielectricSpecular(f32),

    #[error("Light direction {0:?} must be finite and non-zero")]
    InvalidLightDirection([f32; 3]),

    #[error("Light intensity must be finite and non-negative, got {0}")]
    InvalidLightIntensity(f32),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Probabilities and constants for sphere material sampling.
///
/// A uniform `chance` below `metallic_threshold` makes a metallic sphere,
/// below `diffuse_threshold` a diffuse one, anything else is emissive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDistribution {
    pub metallic_threshold: f32,
    pub diffuse_threshold: f32,
    /// Specular reflectance of diffuse (dielectric) spheres
    pub dielectric_specular: f32,
    /// HSV value range of emissive colors
    pub emission_range: [f32; 2],
}

impl Default for MaterialDistribution {
    fn default() -> Self {
        Self {
            metallic_threshold: 0.70,
            diffuse_threshold: 0.85,
            dielectric_specular: 0.04,
            emission_range: [1.0, 3.0],
        }
    }
}

/// Directional light as written in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub direction: [f32; 3],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = DirectionalLight::default();
        Self {
            direction: light.direction.to_array(),
            intensity: light.intensity,
        }
    }
}

impl LightConfig {
    pub fn to_light(&self) -> DirectionalLight {
        DirectionalLight::new(Vec3::from_array(self.direction), self.intensity)
    }
}

/// Scene parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed of the sphere generator
    pub sphere_seed: u64,

    /// (min, max) sphere radius
    pub sphere_radius: [f32; 2],

    /// Upper bound on the number of spheres (rejections may yield fewer)
    pub spheres_max: u32,

    /// Radius of the disk sphere centers are scattered in
    pub sphere_placement_radius: f32,

    pub materials: MaterialDistribution,

    /// Global illumination multiplier passed to the kernel
    pub global_illumination: f32,

    /// Reflection bounce limit passed to the kernel
    pub reflections: u32,

    pub light: LightConfig,

    /// Environment map; a procedural sky is used when absent
    pub skybox: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sphere_seed: 111,
            sphere_radius: [3.0, 8.0],
            spheres_max: 146,
            sphere_placement_radius: 100.0,
            materials: MaterialDistribution::default(),
            global_illumination: 1.0,
            reflections: 8,
            light: LightConfig::default(),
            skybox: None,
        }
    }
}

impl SceneConfig {
    /// Load and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded scene config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a JSON configuration string.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter against its accepted range.
    pub fn validate(&self) -> ConfigResult<()> {
        let [min, max] = self.sphere_radius;
        if !(min > 0.0) {
            return Err(ConfigError::NonPositiveRadius(min));
        }
        if !(min <= max && max.is_finite()) {
            return Err(ConfigError::InvalidRadiusRange { min, max });
        }
        if !(self.sphere_placement_radius >= 0.0 && self.sphere_placement_radius.is_finite()) {
            return Err(ConfigError::InvalidPlacementRadius(self.sphere_placement_radius));
        }
        if self.spheres_max > MAX_SPHERES {
            return Err(ConfigError::TooManySpheres {
                count: self.spheres_max,
                max: MAX_SPHERES,
            });
        }
        if !GLOBAL_ILLUMINATION_RANGE.contains(&self.global_illumination) {
            return Err(ConfigError::GlobalIlluminationOutOfRange(self.global_illumination));
        }
        if !REFLECTIONS_RANGE.contains(&self.reflections) {
            return Err(ConfigError::ReflectionsOutOfRange(self.reflections));
        }

        let m = &self.materials;
        if !(0.0 <= m.metallic_threshold
            && m.metallic_threshold <= m.diffuse_threshold
            && m.diffuse_threshold <= 1.0)
        {
            return Err(ConfigError::InvalidMaterialThresholds {
                metallic: m.metallic_threshold,
                diffuse: m.diffuse_threshold,
            });
        }
        if !(0.0..=1.0).contains(&m.dielectric_specular) {
            return Err(ConfigError::InvalidDielectricSpecular(m.dielectric_specular));
        }
        let [emin, emax] = m.emission_range;
        if !(0.0 <= emin && emin <= emax && emax.is_finite()) {
            return Err(ConfigError::InvalidEmissionRange { min: emin, max: emax });
        }

        let direction = Vec3::from_array(self.light.direction);
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            return Err(ConfigError::InvalidLightDirection(self.light.direction));
        }
        let intensity = self.light.intensity;
        if !(intensity >= 0.0 && intensity.is_finite()) {
            return Err(ConfigError::InvalidLightIntensity(intensity));
        }

        Ok(())
    }

    /// Inputs for `generate_spheres`.
    pub fn sphere_settings(&self) -> SphereSettings {
        SphereSettings {
            seed: self.sphere_seed,
            count_max: self.spheres_max,
            radius_range: (self.sphere_radius[0], self.sphere_radius[1]),
            placement_radius: self.sphere_placement_radius,
            materials: self.materials.clone(),
        }
    }

    /// True if switching from `self` to `other` needs the spheres regenerated.
    pub fn spheres_differ(&self, other: &SceneConfig) -> bool {
        self.sphere_settings() != other.sphere_settings()
    }
}
