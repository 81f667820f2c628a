// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhancement pipeline: brightness, contrast, sharpness, then non-local-means
// denoising, always in that order.

use image::RgbImage;
use retouch_core::error::Result;
use retouch_core::EnhancementParameters;
use tracing::{debug, info, instrument};

use crate::adjust;
use crate::codec;
use crate::denoise::{self, BgrImage};

/// Run the full enhancement pipeline on `image`.
///
/// 1. Brightness (`params.brightness`)
/// 2. Contrast (`params.contrast`)
/// 3. Sharpness (`params.sharpness`)
/// 4. RGB to BGR
/// 5. Non-local-means colour denoising (`params.denoise_strength`)
/// 6. BGR to RGB
///
/// The output always has the input's dimensions, and the same input and
/// parameters always produce the same pixels. Empty images and out-of-range
/// parameters are rejected before any work is done.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn enhance_image(image: &RgbImage, params: &EnhancementParameters) -> Result<RgbImage> {
    codec::ensure_not_empty(image)?;
    params.validate()?;
    info!("Running enhancement pipeline");

    let enhanced = Enhancer::new(image.clone())
        .brightness(params.brightness)
        .contrast(params.contrast)
        .sharpness(params.sharpness)
        .denoise(params.denoise_strength)
        .into_rgb();

    debug!("Enhancement pipeline complete");
    Ok(enhanced)
}

/// Chainable wrapper around a single in-memory RGB image.
///
/// Each stage consumes `self` and returns a new `Enhancer` holding the
/// transformed image, so stages can be composed in any order:
///
/// ```ignore
/// let jpeg = Enhancer::new(photo)
///     .brightness(1.1)
///     .denoise(5)
///     .to_jpeg_bytes(90)?;
/// ```
pub struct Enhancer {
    image: RgbImage,
}

impl Enhancer {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_rgb(self) -> RgbImage {
        self.image
    }

    // -- Stages ---------------------------------------------------------------

    pub fn brightness(self, factor: f32) -> Self {
        Self {
            image: adjust::adjust_brightness(&self.image, factor),
        }
    }

    pub fn contrast(self, factor: f32) -> Self {
        Self {
            image: adjust::adjust_contrast(&self.image, factor),
        }
    }

    pub fn sharpness(self, factor: f32) -> Self {
        Self {
            image: adjust::adjust_sharpness(&self.image, factor),
        }
    }

    /// Denoise with filter strength `h`; the image passes through BGR order
    /// for the duration of the filter.
    pub fn denoise(self, h: u8) -> Self {
        let bgr = BgrImage::from_rgb(&self.image);
        let denoised = denoise::denoise_colored(&bgr, h);
        Self {
            image: denoised.into_rgb(),
        }
    }

    // -- Output ---------------------------------------------------------------

    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        codec::encode_jpeg(&self.image, quality)
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        codec::encode_png(&self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use retouch_core::RetouchError;

    #[test]
    fn empty_image_is_rejected() {
        let err = enhance_image(&RgbImage::new(0, 0), &EnhancementParameters::default())
            .unwrap_err();
        assert!(matches!(err, RetouchError::EmptyImage { .. }));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let params = EnhancementParameters {
            contrast: 0.0,
            ..EnhancementParameters::default()
        };
        let err = enhance_image(&img, &params).unwrap_err();
        assert!(matches!(err, RetouchError::InvalidParameter { name: "contrast", .. }));
    }

    #[test]
    fn single_pixel_image_survives_every_stage() {
        let img = RgbImage::from_pixel(1, 1, Rgb([60, 120, 180]));
        let out = enhance_image(&img, &EnhancementParameters::default()).unwrap();
        assert_eq!(out.dimensions(), (1, 1));
    }

    #[test]
    fn chained_stages_match_pipeline() {
        let img = RgbImage::from_fn(12, 12, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 99]));
        let params = EnhancementParameters {
            brightness: 1.5,
            contrast: 0.8,
            sharpness: 2.5,
            denoise_strength: 4,
        };
        let manual = Enhancer::new(img.clone())
            .brightness(1.5)
            .contrast(0.8)
            .sharpness(2.5)
            .denoise(4)
            .into_rgb();
        assert_eq!(enhance_image(&img, &params).unwrap(), manual);
    }

    #[test]
    fn enhancer_encodes_output() {
        let enhancer = Enhancer::new(RgbImage::from_pixel(8, 8, Rgb([5, 6, 7]))).brightness(2.0);
        assert_eq!((enhancer.width(), enhancer.height()), (8, 8));
        assert_eq!(*enhancer.as_rgb().get_pixel(0, 0), Rgb([10, 12, 14]));
        assert!(!enhancer.to_png_bytes().unwrap().is_empty());
        assert!(!enhancer.to_jpeg_bytes(80).unwrap().is_empty());
    }
}
