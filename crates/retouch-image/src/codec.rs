// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload decoding and JPEG/PNG encoding.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};
use retouch_core::error::{Result, RetouchError};
use retouch_core::ImageFormatKind;
use tracing::{debug, info, instrument};

/// Decode uploaded bytes of a known format into an RGB raster.
///
/// Alpha and grayscale inputs are converted to 3-channel RGB. A raster with no
/// pixels is rejected.
#[instrument(skip(data), fields(data_len = data.len(), format = ?format))]
pub fn decode_upload(data: &[u8], format: ImageFormatKind) -> Result<RgbImage> {
    let img = image::load_from_memory_with_format(data, image_format(format))
        .map_err(|err| RetouchError::Decode(err.to_string()))?;
    let rgb = img.to_rgb8();
    ensure_not_empty(&rgb)?;
    debug!(
        width = rgb.width(),
        height = rgb.height(),
        "Image decoded from bytes"
    );
    Ok(rgb)
}

/// Read and decode an upload from disk, inferring the format from the
/// extension.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_upload(path: impl AsRef<Path>) -> Result<(RgbImage, ImageFormatKind)> {
    let path = path.as_ref();
    let format = ImageFormatKind::from_path(path)?;
    let data = std::fs::read(path)?;
    let rgb = decode_upload(&data, format)?;
    info!(width = rgb.width(), height = rgb.height(), "Image loaded");
    Ok((rgb, format))
}

/// Fail with `EmptyImage` when the raster has zero width or height.
pub fn ensure_not_empty(image: &RgbImage) -> Result<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RetouchError::EmptyImage { width, height });
    }
    Ok(())
}

/// Encode as baseline JPEG with the given quality (1-100).
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    image
        .write_with_encoder(encoder)
        .map_err(|err| RetouchError::Encode(format!("JPEG encoding failed: {err}")))?;
    Ok(buffer)
}

/// Encode as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|err| RetouchError::Encode(format!("PNG encoding failed: {err}")))?;
    Ok(buffer)
}

/// PNG bytes of the image scaled to fit within `max_dimension` on its longest
/// edge, for on-screen display. Images already small enough are not resized.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn preview_png(image: &RgbImage, max_dimension: u32) -> Result<Vec<u8>> {
    if image.width() <= max_dimension && image.height() <= max_dimension {
        return encode_png(image);
    }
    let resized = DynamicImage::ImageRgb8(image.clone())
        .resize(max_dimension, max_dimension, FilterType::Lanczos3)
        .to_rgb8();
    debug!(
        new_w = resized.width(),
        new_h = resized.height(),
        "Preview resized"
    );
    encode_png(&resized)
}

fn image_format(format: ImageFormatKind) -> ImageFormat {
    match format {
        ImageFormatKind::Jpeg => ImageFormat::Jpeg,
        ImageFormatKind::Png => ImageFormat::Png,
    }
}
