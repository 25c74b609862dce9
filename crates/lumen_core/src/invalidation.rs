//! Detecting changes that invalidate accumulated samples.
//!
//! The tracker keeps the last observed value of everything it watches:
//! output resolution, camera field of view, and a set of world transforms
//! (camera, light, and any object the host asks to watch). Each frame the
//! host calls `check` with current values; any difference puts the frame in
//! the `Reset` phase and the snapshot is replaced in the same call, so one
//! movement resets exactly one frame.

use lumen_math::Mat4;

use crate::registry::ObjectId;

/// Something whose world transform can be watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchKey {
    Camera,
    DirectionalLight,
    Object(ObjectId),
}

/// Provides current world transforms for watched keys.
pub trait TransformSource {
    /// Current world transform, or None if the key no longer exists.
    fn world_transform(&self, key: WatchKey) -> Option<Mat4>;
}

/// Accumulation state of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulationPhase {
    /// Something changed: the sample counter restarts at 0
    Reset,
    /// Nothing changed: keep accumulating
    Converging,
}

#[derive(Debug, Clone)]
struct Watched {
    key: WatchKey,
    last: Option<Mat4>,
}

/// Snapshot-based change detector.
#[derive(Debug, Clone)]
pub struct InvalidationTracker {
    resolution: Option<(u32, u32)>,
    fov: Option<f32>,
    watched: Vec<Watched>,
    forced: bool,
    phase: AccumulationPhase,
}

impl Default for InvalidationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationTracker {
    /// New tracker watching the camera and the directional light.
    pub fn new() -> Self {
        Self {
            resolution: None,
            fov: None,
            watched: vec![
                Watched {
                    key: WatchKey::Camera,
                    last: None,
                },
                Watched {
                    key: WatchKey::DirectionalLight,
                    last: None,
                },
            ],
            forced: false,
            phase: AccumulationPhase::Reset,
        }
    }

    /// Start watching a transform. Returns false if it is already watched.
    ///
    /// The first observation after this call counts as a change.
    pub fn watch(&mut self, key: WatchKey) -> bool {
        if self.is_watching(key) {
            return false;
        }
        self.watched.push(Watched { key, last: None });
        true
    }

    /// Stop watching a transform. Unknown keys are ignored.
    pub fn unwatch(&mut self, key: WatchKey) -> bool {
        let before = self.watched.len();
        self.watched.retain(|w| w.key != key);
        self.watched.len() != before
    }

    pub fn is_watching(&self, key: WatchKey) -> bool {
        self.watched.iter().any(|w| w.key == key)
    }

    /// Force the next `check` to report `Reset`.
    pub fn invalidate(&mut self) {
        self.forced = true;
    }

    /// Phase decided by the most recent `check`.
    pub fn phase(&self) -> AccumulationPhase {
        self.phase
    }

    /// Compare current values against the snapshots and update them.
    ///
    /// Keys the source cannot resolve are skipped and keep their snapshot.
    pub fn check<S: TransformSource + ?Sized>(
        &mut self,
        resolution: (u32, u32),
        fov: f32,
        source: &S,
    ) -> AccumulationPhase {
        let mut changed = std::mem::take(&mut self.forced);
        if changed {
            log::debug!("Accumulation reset: forced");
        }

        if self.resolution != Some(resolution) {
            log::debug!("Accumulation reset: resolution {:?}", resolution);
            self.resolution = Some(resolution);
            changed = true;
        }

        if self.fov != Some(fov) {
            log::debug!("Accumulation reset: field of view {}", fov);
            self.fov = Some(fov);
            changed = true;
        }

        for watched in &mut self.watched {
            let Some(current) = source.world_transform(watched.key) else {
                continue;
            };
            if watched.last != Some(current) {
                log::debug!("Accumulation reset: {:?} moved", watched.key);
                watched.last = Some(current);
                changed = true;
            }
        }

        self.phase = if changed {
            AccumulationPhase::Reset
        } else {
            AccumulationPhase::Converging
        };
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Transforms(HashMap<WatchKey, Mat4>);

    impl TransformSource for Transforms {
        fn world_transform(&self, key: WatchKey) -> Option<Mat4> {
            self.0.get(&key).copied()
        }
    }

    fn scene() -> Transforms {
        let mut t = Transforms::default();
        t.0.insert(WatchKey::Camera, Mat4::IDENTITY);
        t.0.insert(WatchKey::DirectionalLight, Mat4::from_rotation_x(-0.8));
        t
    }

    #[test]
    fn test_first_frame_resets_then_converges() {
        let mut tracker = InvalidationTracker::new();
        let source = scene();

        assert_eq!(tracker.check((640, 480), 60.0, &source), AccumulationPhase::Reset);
        assert_eq!(tracker.check((640, 480), 60.0, &source), AccumulationPhase::Converging);
        assert_eq!(tracker.check((640, 480), 60.0, &source), AccumulationPhase::Converging);
    }

    #[test]
    fn test_camera_move_detected_once() {
        let mut tracker = InvalidationTracker::new();
        let mut source = scene();
        tracker.check((640, 480), 60.0, &source);

        source
            .0
            .insert(WatchKey::Camera, Mat4::from_translation(Vec3::X));

        assert_eq!(tracker.check((640, 480), 60.0, &source), AccumulationPhase::Reset);
        assert_eq!(tracker.check((640, 480), 60.0, &source), AccumulationPhase::Converging);
    }

    #[test]
    fn test_fov_and_resolution_changes_reset() {
        let mut tracker = InvalidationTracker::new();
        let source = scene();
        tracker.check((640, 480), 60.0, &source);

        assert_eq!(tracker.check((640, 480), 45.0, &source), AccumulationPhase::Reset);
        assert_eq!(tracker.check((800, 600), 45.0, &source), AccumulationPhase::Reset);
        assert_eq!(tracker.check((800, 600), 45.0, &source), AccumulationPhase::Converging);
    }

    #[test]
    fn test_watched_object_movement() {
        let mut tracker = InvalidationTracker::new();
        let mut source = scene();
        let id = ObjectId::next();
        source.0.insert(WatchKey::Object(id), Mat4::IDENTITY);

        assert!(tracker.watch(WatchKey::Object(id)));
        assert!(!tracker.watch(WatchKey::Object(id)));
        tracker.check((64, 64), 60.0, &source);

        source
            .0
            .insert(WatchKey::Object(id), Mat4::from_translation(Vec3::Y));
        assert_eq!(tracker.check((64, 64), 60.0, &source), AccumulationPhase::Reset);

        // Unwatched objects no longer reset
        assert!(tracker.unwatch(WatchKey::Object(id)));
        source.0.insert(WatchKey::Object(id), Mat4::IDENTITY);
        assert_eq!(tracker.check((64, 64), 60.0, &source), AccumulationPhase::Converging);
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let mut tracker = InvalidationTracker::new();
        let source = Transforms::default();
        tracker.check((64, 64), 60.0, &source);

        assert_eq!(tracker.check((64, 64), 60.0, &source), AccumulationPhase::Converging);
    }

    #[test]
    fn test_forced_invalidation() {
        let mut tracker = InvalidationTracker::new();
        let source = scene();
        tracker.check((64, 64), 60.0, &source);

        tracker.invalidate();
        assert_eq!(tracker.check((64, 64), 60.0, &source), AccumulationPhase::Reset);
        assert_eq!(tracker.phase(), AccumulationPhase::Reset);
        assert_eq!(tracker.check((64, 64), 60.0, &source), AccumulationPhase::Converging);
    }
}
