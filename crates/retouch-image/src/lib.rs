// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// retouch-image — The image side of Retouch.
//
// Provides the enhancement pipeline (brightness, contrast, sharpness,
// non-local-means colour denoising), upload decoding, and JPEG export for
// download.

pub mod adjust;
pub mod codec;
pub mod denoise;
pub mod export;
pub mod pipeline;

// Re-export the primary entry points so callers can use `retouch_image::enhance_image` etc.
pub use codec::{decode_upload, load_upload, preview_png};
pub use denoise::BgrImage;
pub use export::{DOWNLOAD_FILE_NAME, DOWNLOAD_MIME, Download, export_jpeg};
pub use pipeline::{Enhancer, enhance_image};
