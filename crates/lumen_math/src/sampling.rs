//! Random sampling helpers.

use glam::Vec2;
use rand::Rng;

/// Uniform sample in `[min, max]`. A degenerate range returns `min`
/// but still consumes one random value so sequences stay aligned.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let t: f32 = rng.gen();
    min + t * (max - min)
}

/// Uniform point inside a disk of the given radius centered at the origin.
///
/// Uses the square-root radial mapping, so no samples are rejected.
pub fn random_in_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    let u: f32 = rng.gen();
    let v: f32 = rng.gen();
    let r = radius * u.sqrt();
    let (sin_t, cos_t) = (v * std::f32::consts::TAU).sin_cos();
    Vec2::new(r * cos_t, r * sin_t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_in_disk_stays_inside() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let p = random_in_disk(&mut rng, 100.0);
            assert!(p.length() <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn test_random_in_disk_covers_outer_ring() {
        // Area-uniform sampling puts ~36% of points beyond 0.8R
        let mut rng = StdRng::seed_from_u64(1);
        let outer = (0..1000)
            .filter(|_| random_in_disk(&mut rng, 1.0).length() > 0.8)
            .count();
        assert!(outer > 250, "only {} samples in the outer ring", outer);
    }

    #[test]
    fn test_random_range_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let x = random_range(&mut rng, 3.0, 8.0);
            assert!((3.0..=8.0).contains(&x));
        }
    }
}
