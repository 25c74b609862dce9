//! Lumen Core - scene description and CPU-side state for the progressive
//! GPU ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Mesh`, `Transform`, `DirectionalLight`, `SceneConfig`
//! - **Sphere generation**: seeded, non-overlapping procedural spheres
//! - **Geometry registry**: flattening of registered mesh objects into
//!   shared vertex/index arrays
//! - **Invalidation tracking**: detecting changes that restart accumulation
//!
//! Nothing here touches the GPU; `lumen_render` uploads what these types produce.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{generate_spheres, SceneConfig};
//!
//! let config = SceneConfig::load("scene.json")?;
//! let spheres = generate_spheres(&config.sphere_settings());
//! println!("Placed {} of {} spheres", spheres.len(), config.spheres_max);
//! ```

pub mod config;
pub mod environment;
pub mod invalidation;
pub mod mesh;
pub mod registry;
pub mod scene;
pub mod spheres;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, LightConfig, MaterialDistribution, SceneConfig};
pub use environment::{EnvironmentError, EnvironmentMap, EnvironmentResult};
pub use invalidation::{AccumulationPhase, InvalidationTracker, TransformSource, WatchKey};
pub use mesh::Mesh;
pub use registry::{FlattenedGeometry, GeometryRegistry, MeshObject, ObjectId, RenderObject};
pub use scene::{DirectionalLight, Transform};
pub use spheres::{generate_spheres, GpuSphere, Sphere, SphereMaterial, SphereSettings};
