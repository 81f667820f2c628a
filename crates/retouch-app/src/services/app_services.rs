// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: loads the config and wraps the retouch-image
// operations in calls the Dioxus UI can use directly.
//
// Decoding, the enhancement pipeline and the JPEG write are CPU- or disk-bound,
// so they run on tokio's blocking pool and the UI task only awaits the result.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbImage;
use retouch_core::error::{Result, RetouchError};
use retouch_core::{AppConfig, EnhancementParameters};
use retouch_image::{Download, enhance_image, export_jpeg, load_upload, preview_png};
use tracing::{info, instrument, warn};

use super::data_dir;
use crate::state::{Enhancement, Upload};

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise services against the platform data directory. Call once at
    /// app startup.
    pub fn init() -> Self {
        Self::with_data_dir(data_dir::data_dir())
    }

    /// Initialise services with the config stored in `dir`.
    ///
    /// A missing config file yields the defaults; an unreadable one is logged
    /// and also yields the defaults.
    pub fn with_data_dir(dir: PathBuf) -> Self {
        info!(path = %dir.display(), "initialising app services");
        let config = match load_config(&dir) {
            Ok(Some(config)) => config.sanitized(),
            Ok(None) => AppConfig::default(),
            Err(e) => {
                warn!(error = %e, "config unreadable, using defaults");
                AppConfig::default()
            }
        };
        Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update and persist the config. Out-of-range values are fixed first.
    pub fn save_config(&self, config: &AppConfig) -> Result<AppConfig> {
        let config = config.sanitized();
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        persist_config(&self.data_dir, &config)?;
        info!("config saved");
        Ok(config)
    }

    // -- Image operations ----------------------------------------------------

    /// Decode the file at `path` and build its preview on the blocking pool.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn open_upload(&self, path: PathBuf) -> Result<Upload> {
        let max_dimension = self.config().preview_max_dimension;
        run_blocking(move || {
            let (image, format) = load_upload(&path)?;
            let preview_url = preview_data_url(&image, max_dimension)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "image".into());
            info!(file = %file_name, "upload ready");
            Ok(Upload {
                file_name,
                format,
                image: Arc::new(image),
                preview_url,
            })
        })
        .await
    }

    /// Run the pipeline on the blocking pool and build the result preview.
    pub async fn enhance(
        &self,
        image: Arc<RgbImage>,
        params: EnhancementParameters,
    ) -> Result<Enhancement> {
        let max_dimension = self.config().preview_max_dimension;
        run_blocking(move || {
            let enhanced = enhance_image(&image, &params)?;
            let preview_url = preview_data_url(&enhanced, max_dimension)?;
            Ok(Enhancement {
                params,
                image: Arc::new(enhanced),
                preview_url,
            })
        })
        .await
    }

    /// JPEG-encode `image` at the configured quality and write it to `path`,
    /// on the blocking pool.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn save_download(&self, image: Arc<RgbImage>, path: PathBuf) -> Result<Download> {
        let quality = self.config().jpeg_quality;
        run_blocking(move || {
            let download = export_jpeg(&image, quality)?;
            download.save_to(&path)?;
            Ok(download)
        })
        .await
    }
}

/// Run CPU- or disk-bound work off the UI task.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RetouchError::Worker(e.to_string()))?
}

/// PNG data URL of `image` scaled to fit `max_dimension`, for an `img` tag.
pub fn preview_data_url(image: &RgbImage, max_dimension: u32) -> Result<String> {
    let png = preview_png(image, max_dimension)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(data_dir: &Path) -> Result<Option<AppConfig>> {
    let path = data_dir.join(CONFIG_FILE);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&data)?))
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use retouch_core::ImageFormatKind;

    fn write_png(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
        let path = dir.join(name);
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn missing_config_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(svc.config(), AppConfig::default());
    }

    #[test]
    fn corrupt_config_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(svc.config(), AppConfig::default());
    }

    #[test]
    fn saved_defaults_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        let mut config = svc.config();
        config.default_parameters.sharpness = 3.5;
        config.jpeg_quality = 250;
        let saved = svc.save_config(&config).unwrap();
        assert_eq!(saved.jpeg_quality, 100);

        let reopened = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(reopened.config().default_parameters.sharpness, 3.5);
        assert_eq!(reopened.config().jpeg_quality, 100);
    }

    #[tokio::test]
    async fn open_upload_builds_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "photo.png", &RgbImage::from_pixel(8, 6, Rgb([1, 2, 3])));
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());

        let upload = svc.open_upload(path).await.unwrap();
        assert_eq!(upload.file_name, "photo.png");
        assert_eq!(upload.format, ImageFormatKind::Png);
        assert_eq!(upload.image.dimensions(), (8, 6));
        assert!(upload.preview_url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn open_upload_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        let err = svc.open_upload(dir.path().join("anim.gif")).await.unwrap_err();
        assert!(matches!(err, RetouchError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn enhance_runs_pipeline_off_thread() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        let image = Arc::new(RgbImage::from_pixel(10, 10, Rgb([100, 100, 100])));

        let result = svc
            .enhance(Arc::clone(&image), EnhancementParameters::default())
            .await
            .unwrap();
        assert_eq!(result.image.dimensions(), (10, 10));
        assert_eq!(result.params, EnhancementParameters::default());
        assert!(result.preview_url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn enhance_reports_invalid_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        let image = Arc::new(RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])));
        let params = EnhancementParameters {
            brightness: 7.0,
            ..EnhancementParameters::default()
        };
        let err = svc.enhance(image, params).await.unwrap_err();
        assert!(matches!(err, RetouchError::InvalidParameter { name: "brightness", .. }));
    }

    #[tokio::test]
    async fn save_download_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        let target = dir.path().join("out.jpg");
        let image = Arc::new(RgbImage::from_pixel(5, 5, Rgb([40, 80, 120])));

        let download = svc.save_download(image, target.clone()).await.unwrap();
        assert_eq!(download.file_name, "enhanced_image.jpg");
        assert_eq!(&download.bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(std::fs::read(target).unwrap(), download.bytes);
    }

    #[tokio::test]
    async fn save_download_into_missing_folder_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf());
        let image = Arc::new(RgbImage::from_pixel(3, 3, Rgb([1, 2, 3])));
        let err = svc
            .save_download(image, dir.path().join("missing").join("out.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, RetouchError::Io(_)));
    }

    #[tokio::test]
    async fn worker_panic_becomes_worker_error() {
        let err = run_blocking::<(), _>(|| panic!("boom")).await.unwrap_err();
        assert!(matches!(err, RetouchError::Worker(_)));
    }
}
