// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Denoise module: BGR raster, 8-bit L*a*b* conversion, and non-local-means
// colour denoising.

pub mod lab;
pub mod nlmeans;

use image::{Rgb, RgbImage};
use tracing::{debug, info, instrument};

/// Side of the square patch compared between two pixels.
pub const TEMPLATE_WINDOW: usize = 7;

/// Side of the square neighbourhood searched for similar patches.
pub const SEARCH_WINDOW: usize = 21;

/// An 8-bit, 3-channel raster stored in blue-green-red order.
///
/// The denoiser's colour conversion reads channels in this order, so RGB input
/// has to go through [`BgrImage::from_rgb`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgrImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BgrImage {
    /// Reorder an RGB raster into BGR.
    pub fn from_rgb(image: &RgbImage) -> Self {
        let data = image
            .pixels()
            .flat_map(|&Rgb([r, g, b])| [b, g, r])
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            data,
        }
    }

    /// Reorder back into an RGB raster.
    pub fn into_rgb(self) -> RgbImage {
        let width = self.width;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let i = (y as usize * width as usize + x as usize) * 3;
            Rgb([self.data[i + 2], self.data[i + 1], self.data[i]])
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved `[b, g, r, b, g, r, ...]` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Non-local-means denoising of a colour image.
///
/// The image is converted to 8-bit L*a*b*; the lightness plane and the two
/// chroma planes are filtered separately, both with filter strength `h`,
/// using a [`TEMPLATE_WINDOW`] patch and a [`SEARCH_WINDOW`] neighbourhood.
/// `h == 0` returns the input untouched.
#[instrument(skip(image), fields(width = image.width, height = image.height))]
pub fn denoise_colored(image: &BgrImage, h: u8) -> BgrImage {
    if h == 0 || image.data.is_empty() {
        debug!("Denoise strength is zero; skipping");
        return image.clone();
    }
    info!(h, "Applying non-local-means denoising");

    let (width, height) = (image.width as usize, image.height as usize);
    let strength = f32::from(h);

    let lab: Vec<[u8; 3]> = image
        .data
        .chunks_exact(3)
        .map(|px| lab::bgr_to_lab([px[0], px[1], px[2]]))
        .collect();
    let lightness: Vec<u8> = lab.iter().map(|px| px[0]).collect();
    let chroma: Vec<u8> = lab.iter().flat_map(|px| [px[1], px[2]]).collect();

    let lightness = nlmeans::nl_means(
        &lightness,
        width,
        height,
        1,
        strength,
        TEMPLATE_WINDOW,
        SEARCH_WINDOW,
    );
    let chroma = nlmeans::nl_means(
        &chroma,
        width,
        height,
        2,
        strength,
        TEMPLATE_WINDOW,
        SEARCH_WINDOW,
    );

    let data = lightness
        .iter()
        .zip(chroma.chunks_exact(2))
        .flat_map(|(&l, ab)| lab::lab_to_bgr([l, ab[0], ab[1]]))
        .collect();

    debug!("Denoising complete");
    BgrImage {
        width: image.width,
        height: image.height,
        data,
    }
}
