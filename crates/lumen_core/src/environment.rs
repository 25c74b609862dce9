//! Environment (skybox) map loading.
//!
//! The trace kernel looks up rays that leave the scene in an equirectangular
//! environment image. Pixels are stored as linear float RGBA, row-major,
//! ready for upload to an `Rgba32Float` texture.

use std::path::Path;

use lumen_math::Vec3;
use thiserror::Error;

/// Errors that can occur during environment map loading.
#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error("Failed to load environment map {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Environment map {0} has zero size")]
    Empty(String),
}

pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// An equirectangular environment image in linear RGBA.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Pixel data, [R, G, B, A] per pixel, row-major, top row first
    pub pixels: Vec<[f32; 4]>,

    /// Where the map came from (for logging)
    pub source: String,
}

impl EnvironmentMap {
    /// Load an environment map from an image file.
    ///
    /// HDR formats keep their float values; 8-bit formats are converted
    /// from sRGB to linear.
    pub fn load<P: AsRef<Path>>(path: P) -> EnvironmentResult<Self> {
        let path = path.as_ref();
        let source = path.to_string_lossy().to_string();

        let img = image::open(path).map_err(|e| EnvironmentError::Load {
            path: source.clone(),
            source: e,
        })?;

        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(EnvironmentError::Empty(source));
        }

        let pixels: Vec<[f32; 4]> = match img {
            image::DynamicImage::ImageRgb32F(_) | image::DynamicImage::ImageRgba32F(_) => {
                img.to_rgba32f().pixels().map(|p| p.0).collect()
            }
            _ => img
                .to_rgba8()
                .pixels()
                .map(|p| {
                    [
                        srgb_to_linear(p[0]),
                        srgb_to_linear(p[1]),
                        srgb_to_linear(p[2]),
                        p[3] as f32 / 255.0, // Alpha is linear
                    ]
                })
                .collect(),
        };

        log::info!(
            "Loaded environment map {} ({}x{}, {:.1} KB)",
            source,
            width,
            height,
            (pixels.len() * std::mem::size_of::<[f32; 4]>()) as f32 / 1024.0
        );

        Ok(Self {
            width,
            height,
            pixels,
            source,
        })
    }

    /// Procedural sky: horizon white blending to blue at the zenith,
    /// dark grey below the horizon.
    pub fn gradient_sky(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let horizon = Vec3::new(1.0, 1.0, 1.0);
        let zenith = Vec3::new(0.5, 0.7, 1.0);
        let ground = Vec3::splat(0.2);

        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            // Latitude: +1 at the top row, -1 at the bottom row
            let lat = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;
            let color = if lat >= 0.0 {
                horizon.lerp(zenith, lat)
            } else {
                ground
            };
            for _ in 0..width {
                pixels.push([color.x, color.y, color.z, 1.0]);
            }
        }

        Self {
            width,
            height,
            pixels,
            source: "<gradient sky>".to_string(),
        }
    }

    /// Raw bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
