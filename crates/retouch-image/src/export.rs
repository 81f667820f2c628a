// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Download export. JPEG-encode the enhanced image through a scoped temporary
// file and hand back the bytes.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use image::RgbImage;
use retouch_core::error::{Result, RetouchError};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::codec::encode_jpeg;

/// File name offered for the download.
pub const DOWNLOAD_FILE_NAME: &str = "enhanced_image.jpg";

/// MIME type of the download.
pub const DOWNLOAD_MIME: &str = "image/jpeg";

/// A ready-to-save download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Write the bytes to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        info!(path = %path.as_ref().display(), bytes = self.bytes.len(), "Download saved");
        Ok(())
    }
}

/// JPEG-encode `image` for download.
///
/// The encoded bytes are written to a `.jpg` temporary file and read back
/// from it; the file is removed when this function returns, on success or
/// error.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn export_jpeg(image: &RgbImage, quality: u8) -> Result<Download> {
    export_jpeg_in(image, quality, std::env::temp_dir())
}

/// Same as [`export_jpeg`], with the temporary file created inside `dir`.
pub fn export_jpeg_in(image: &RgbImage, quality: u8, dir: impl AsRef<Path>) -> Result<Download> {
    let encoded = encode_jpeg(image, quality)?;

    let mut file = tempfile::Builder::new()
        .prefix("retouch-")
        .suffix(".jpg")
        .tempfile_in(dir.as_ref())
        .map_err(|err| RetouchError::TempFile(format!("create: {err}")))?;
    debug!(path = %file.path().display(), "Temporary export file created");

    let bytes = write_and_read_back(&mut file, &encoded)
        .map_err(|err| RetouchError::TempFile(format!("{}: {err}", file.path().display())))?;

    info!(bytes = bytes.len(), "Enhanced image exported as JPEG");
    Ok(Download {
        file_name: DOWNLOAD_FILE_NAME,
        mime: DOWNLOAD_MIME,
        bytes,
    })
}

fn write_and_read_back(file: &mut NamedTempFile, data: &[u8]) -> std::io::Result<Vec<u8>> {
    file.write_all(data)?;
    file.flush()?;
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::with_capacity(data.len());
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn export_produces_named_jpeg() {
        let img = RgbImage::from_pixel(10, 10, Rgb([200, 100, 50]));
        let download = export_jpeg(&img, 90).unwrap();
        assert_eq!(download.file_name, "enhanced_image.jpg");
        assert_eq!(download.mime, "image/jpeg");
        assert_eq!(&download.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn export_cleans_up_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        export_jpeg_in(&img, 80, dir.path()).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_temp_dir_is_a_temp_file_error() {
        let img = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let err = export_jpeg_in(&img, 80, "/nonexistent/retouch/tmp").unwrap_err();
        assert!(matches!(err, RetouchError::TempFile(_)));
    }

    #[test]
    fn save_to_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]));
        let download = export_jpeg(&img, 90).unwrap();
        let target = dir.path().join(download.file_name);
        download.save_to(&target).unwrap();
        assert_eq!(std::fs::read(target).unwrap(), download.bytes);
    }
}
