//! Progressive accumulation state.
//!
//! Holds the raw per-frame image, the converged running average and the
//! sample counter. The counter is the number of samples already folded
//! into the converged image; the next blend weighs the new sample by
//! `1 / (counter + 1)`, which keeps the converged image an exact mean.

use crate::backend::{ImageRole, RenderBackend};

/// Edge length of the square thread group the trace kernel runs in.
pub const THREAD_GROUP_SIZE: u32 = 8;

/// Thread groups needed to cover a `width` x `height` image.
pub fn dispatch_size(width: u32, height: u32) -> [u32; 3] {
    [
        width.div_ceil(THREAD_GROUP_SIZE),
        height.div_ceil(THREAD_GROUP_SIZE),
        1,
    ]
}

/// Weight of the newest sample when `sample` samples are already averaged.
pub fn blend_weight(sample: u32) -> f32 {
    1.0 / (sample as f32 + 1.0)
}

#[derive(Debug)]
struct Images<I> {
    raw: I,
    converged: I,
    size: (u32, u32),
}

/// Raw and converged images plus the sample counter.
#[derive(Debug)]
pub struct Accumulator<I> {
    images: Option<Images<I>>,
    sample: u32,
}

impl<I> Default for Accumulator<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Accumulator<I> {
    pub fn new() -> Self {
        Self {
            images: None,
            sample: 0,
        }
    }

    /// Make sure both images exist at `size`.
    ///
    /// On a mismatch the old images are released before the new ones are
    /// created and the counter restarts. Returns true if images were
    /// (re)created.
    pub fn ensure_images<R>(&mut self, backend: &mut R, size: (u32, u32)) -> bool
    where
        R: RenderBackend<Image = I> + ?Sized,
    {
        if self.images.as_ref().is_some_and(|i| i.size == size) {
            return false;
        }

        self.release();
        let (width, height) = size;
        log::info!("Creating accumulation images {}x{}", width, height);
        self.images = Some(Images {
            raw: backend.create_image(ImageRole::Raw, width, height),
            converged: backend.create_image(ImageRole::Converged, width, height),
            size,
        });
        true
    }

    /// (raw, converged), if created.
    pub fn images(&self) -> Option<(&I, &I)> {
        self.images.as_ref().map(|i| (&i.raw, &i.converged))
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.images.as_ref().map(|i| i.size)
    }

    /// Samples already averaged into the converged image.
    pub fn sample(&self) -> u32 {
        self.sample
    }

    /// Restart accumulation; the next blend replaces the converged image.
    pub fn reset(&mut self) {
        self.sample = 0;
    }

    /// Count the sample blended this frame.
    pub fn advance(&mut self) {
        self.sample = self.sample.saturating_add(1);
    }

    /// Drop both images and restart accumulation. Releasing nothing is fine.
    pub fn release(&mut self) {
        if self.images.take().is_some() {
            log::debug!("Released accumulation images");
        }
        self.sample = 0;
    }
}
