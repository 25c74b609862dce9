//! Procedural sphere scene generation.
//!
//! Spheres are scattered over a disk on the ground plane (y = 0), each resting
//! on the plane. Candidates that intersect an already placed sphere are
//! dropped rather than retried, so fewer than `count_max` spheres may come out.
//! All randomness comes from a PRNG seeded by the settings, which keeps the
//! result independent of anything else using random numbers during a frame.

use bytemuck::{Pod, Zeroable};
use lumen_math::{random_hsv, random_in_disk, random_range, HsvRange, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MaterialDistribution;

/// Surface description of a sphere. Exactly one material class applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SphereMaterial {
    /// Colored specular reflection, no diffuse term
    Metallic { specular: Vec3, smoothness: f32 },
    /// Colored diffuse with a fixed dielectric specular reflectance
    Diffuse {
        albedo: Vec3,
        specular: Vec3,
        smoothness: f32,
    },
    /// Light emitter (HDR color)
    Emissive { emission: Vec3 },
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f32,
    pub material: SphereMaterial,
}

impl Sphere {
    /// True if the two spheres intersect (touching is allowed).
    pub fn overlaps(&self, other: &Sphere) -> bool {
        let min_dist = self.radius + other.radius;
        self.position.distance_squared(other.position) < min_dist * min_dist
    }

    /// Pack into the layout the trace kernel reads.
    pub fn to_gpu(&self) -> GpuSphere {
        let (albedo, specular, smoothness, emission) = match self.material {
            SphereMaterial::Metallic {
                specular,
                smoothness,
            } => (Vec3::ZERO, specular, smoothness, Vec3::ZERO),
            SphereMaterial::Diffuse {
                albedo,
                specular,
                smoothness,
            } => (albedo, specular, smoothness, Vec3::ZERO),
            SphereMaterial::Emissive { emission } => (Vec3::ZERO, Vec3::ZERO, 0.0, emission),
        };

        GpuSphere {
            position: self.position.to_array(),
            radius: self.radius,
            albedo: albedo.to_array(),
            smoothness,
            specular: specular.to_array(),
            _pad0: 0.0,
            emission: emission.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Sphere record as stored in the GPU storage buffer.
///
/// Matches the WGSL `Sphere` struct: every vec3 is followed by a scalar so
/// the struct is 64 bytes with 16-byte alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuSphere {
    pub position: [f32; 3],
    pub radius: f32,
    pub albedo: [f32; 3],
    pub smoothness: f32,
    pub specular: [f32; 3],
    pub _pad0: f32,
    pub emission: [f32; 3],
    pub _pad1: f32,
}

/// Inputs of the sphere generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereSettings {
    pub seed: u64,
    /// Number of placement attempts (upper bound on the result size)
    pub count_max: u32,
    /// Inclusive (min, max) radius
    pub radius_range: (f32, f32),
    /// Radius of the disk sphere centers are drawn from
    pub placement_radius: f32,
    pub materials: MaterialDistribution,
}

/// Generate the procedural sphere set.
///
/// Deterministic: the same settings always give the same spheres.
pub fn generate_spheres(settings: &SphereSettings) -> Vec<Sphere> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let (min_radius, max_radius) = settings.radius_range;
    let mut spheres: Vec<Sphere> = Vec::with_capacity(settings.count_max as usize);

    for _ in 0..settings.count_max {
        let radius = random_range(&mut rng, min_radius, max_radius);
        let disk = random_in_disk(&mut rng, settings.placement_radius);
        let position = Vec3::new(disk.x, radius, disk.y);

        let candidate = Sphere {
            position,
            radius,
            // Placeholder until the candidate is accepted
            material: SphereMaterial::Emissive {
                emission: Vec3::ZERO,
            },
        };
        if spheres.iter().any(|other| candidate.overlaps(other)) {
            continue;
        }

        spheres.push(Sphere {
            material: sample_material(&mut rng, &settings.materials),
            ..candidate
        });
    }

    log::info!(
        "Generated {} spheres from {} attempts (seed {})",
        spheres.len(),
        settings.count_max,
        settings.seed
    );

    spheres
}

/// Pick a material class and its parameters.
fn sample_material<R: Rng>(rng: &mut R, dist: &MaterialDistribution) -> SphereMaterial {
    let color = random_hsv(rng, HsvRange::default());
    let chance: f32 = rng.gen();

    if chance < dist.metallic_threshold {
        SphereMaterial::Metallic {
            specular: color,
            smoothness: rng.gen(),
        }
    } else if chance < dist.diffuse_threshold {
        SphereMaterial::Diffuse {
            albedo: color,
            specular: Vec3::splat(dist.dielectric_specular),
            smoothness: rng.gen(),
        }
    } else {
        let (min, max) = (dist.emission_range[0], dist.emission_range[1]);
        SphereMaterial::Emissive {
            emission: random_hsv(rng, HsvRange::with_value(min, max)),
        }
    }
}
