// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Brightness, contrast and sharpness adjustment.
//
// All three are the classic "enhance" blends: build a degenerate version of the
// image (black, flat mean gray, or smoothed) and extrapolate from it towards
// the original by a factor. A factor of 1.0 always returns the input unchanged.

use image::{Rgb, RgbImage};
use tracing::{debug, instrument};

/// Weight of the centre pixel in the 3x3 smoothing kernel
/// `[[1,1,1],[1,5,1],[1,1,1]] / 13`; the eight neighbours weigh 1.
const SMOOTH_CENTER_WEIGHT: u32 = 5;
const SMOOTH_SCALE: u32 = 13;

/// Multiply every channel by `factor`.
///
/// Equivalent to blending from an all-black image, so 0.0 is black, 1.0 is a
/// no-op and larger values brighten until channels saturate at 255.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn adjust_brightness(image: &RgbImage, factor: f32) -> RgbImage {
    map_channels(image, |channel| blend_channel(0, channel, factor))
}

/// Scale every channel away from (factor > 1) or towards (factor < 1) the
/// image's mean gray level.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn adjust_contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let mean = mean_luma(image);
    debug!(mean, "Contrast pivot computed");
    map_channels(image, |channel| blend_channel(mean, channel, factor))
}

/// Blend the image with a smoothed copy of itself.
///
/// 0.0 yields the smoothed copy, 1.0 the original, and values above 1.0
/// push edges further apart than the original (oversharpening). The outermost
/// row and column of pixels are never smoothed.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn adjust_sharpness(image: &RgbImage, factor: f32) -> RgbImage {
    let smoothed = smooth(image);
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let Rgb(base) = *smoothed.get_pixel(x, y);
        let Rgb(orig) = *image.get_pixel(x, y);
        Rgb([
            blend_channel(base[0], orig[0], factor),
            blend_channel(base[1], orig[1], factor),
            blend_channel(base[2], orig[2], factor),
        ])
    })
}

/// Mean ITU-R 601-2 luma of the image, rounded to the nearest integer.
pub fn mean_luma(image: &RgbImage) -> u8 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0;
    }
    let sum: u64 = image.pixels().map(|px| u64::from(luma(px))).sum();
    ((sum as f64 / count as f64) + 0.5) as u8
}

/// Integer ITU-R 601-2 luma transform (`L = R*299/1000 + G*587/1000 + B*114/1000`),
/// computed in 16.16 fixed point.
pub fn luma(pixel: &Rgb<u8>) -> u8 {
    let Rgb([r, g, b]) = *pixel;
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

/// `from + factor * (to - from)`, clipped to 0..=255 and truncated.
///
/// Computed in f32 so that `factor == 1.0` reproduces `to` exactly.
fn blend_channel(from: u8, to: u8, factor: f32) -> u8 {
    let from = f32::from(from);
    let value = from + factor * (f32::from(to) - from);
    value.clamp(0.0, 255.0) as u8
}

fn map_channels(image: &RgbImage, f: impl Fn(u8) -> u8) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        Rgb([f(r), f(g), f(b)])
    })
}

/// Apply the 3x3 smoothing kernel to interior pixels, rounding to nearest.
/// Pixels on the outermost row/column are copied as-is.
fn smooth(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            return *image.get_pixel(x, y);
        }
        let mut sums = [0u32; 3];
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                let weight = if nx == x && ny == y { SMOOTH_CENTER_WEIGHT } else { 1 };
                let Rgb(px) = *image.get_pixel(nx, ny);
                for (sum, channel) in sums.iter_mut().zip(px) {
                    *sum += weight * u32::from(channel);
                }
            }
        }
        Rgb(sums.map(|sum| ((sum + SMOOTH_SCALE / 2) / SMOOTH_SCALE) as u8))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 20) as u8, (y * 20) as u8, ((x + y) * 10) as u8])
        })
    }

    #[test]
    fn factor_one_is_identity_for_every_stage() {
        let img = gradient(9, 7);
        assert_eq!(adjust_brightness(&img, 1.0), img);
        assert_eq!(adjust_contrast(&img, 1.0), img);
        assert_eq!(adjust_sharpness(&img, 1.0), img);
    }

    #[test]
    fn brightness_scales_and_saturates() {
        let img = RgbImage::from_pixel(2, 2, Rgb([100, 50, 200]));
        let out = adjust_brightness(&img, 2.0);
        assert_eq!(*out.get_pixel(0, 0), Rgb([200, 100, 255]));

        let dark = adjust_brightness(&img, 0.5);
        assert_eq!(*dark.get_pixel(1, 1), Rgb([50, 25, 100]));
    }

    #[test]
    fn contrast_pivots_on_mean_gray() {
        // Half black, half white: mean luma is 128 (127.5 rounded up).
        let img = RgbImage::from_fn(4, 1, |x, _| {
            if x < 2 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        assert_eq!(mean_luma(&img), 128);

        let flat = adjust_contrast(&img, 0.0);
        assert!(flat.pixels().all(|px| *px == Rgb([128, 128, 128])));

        let half = adjust_contrast(&img, 0.5);
        assert_eq!(*half.get_pixel(0, 0), Rgb([64, 64, 64]));
        assert_eq!(*half.get_pixel(3, 0), Rgb([191, 191, 191]));
    }

    #[test]
    fn solid_image_is_unaffected_by_contrast_and_sharpness() {
        let img = RgbImage::from_pixel(10, 10, Rgb([128, 128, 128]));
        assert_eq!(adjust_contrast(&img, 3.0), img);
        assert_eq!(adjust_sharpness(&img, 5.0), img);
        assert_eq!(adjust_sharpness(&img, 0.0), img);
    }

    #[test]
    fn sharpness_zero_smooths_interior_only() {
        let mut img = RgbImage::from_pixel(5, 5, Rgb([0, 0, 0]));
        img.put_pixel(2, 2, Rgb([130, 130, 130]));
        let out = adjust_sharpness(&img, 0.0);

        // Centre: 5*130/13 = 50. Neighbours: 130/13 = 10.
        assert_eq!(*out.get_pixel(2, 2), Rgb([50, 50, 50]));
        assert_eq!(*out.get_pixel(1, 2), Rgb([10, 10, 10]));
        // Border untouched.
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn oversharpening_increases_local_difference() {
        let mut img = RgbImage::from_pixel(5, 5, Rgb([100, 100, 100]));
        img.put_pixel(2, 2, Rgb([150, 150, 150]));
        let out = adjust_sharpness(&img, 3.0);
        assert!(out.get_pixel(2, 2).0[0] > 150);
        assert!(out.get_pixel(1, 2).0[0] < 100);
    }

    #[test]
    fn luma_of_primaries() {
        assert_eq!(luma(&Rgb([255, 255, 255])), 255);
        assert_eq!(luma(&Rgb([0, 0, 0])), 0);
        assert_eq!(luma(&Rgb([255, 0, 0])), 76);
    }
}
