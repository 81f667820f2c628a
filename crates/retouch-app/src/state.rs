// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application state: the upload/enhance session plus the reactive values the
// Dioxus UI reads.

use std::sync::Arc;

use image::RgbImage;
use retouch_core::human_errors::HumanError;
use retouch_core::{AppConfig, EnhancementParameters, ImageFormatKind};

/// Where the session is in the upload → enhance flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    /// Nothing uploaded yet; only the file picker is shown.
    NoImage,
    /// An image is loaded and previewed, no result yet.
    ImageLoaded,
    /// An enhanced result exists for the current upload.
    Enhanced,
}

/// A decoded upload and its on-screen preview.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub format: ImageFormatKind,
    pub image: Arc<RgbImage>,
    /// PNG data URL.
    pub preview_url: String,
}

/// The result of one enhancement run.
#[derive(Debug, Clone)]
pub struct Enhancement {
    pub params: EnhancementParameters,
    pub image: Arc<RgbImage>,
    /// PNG data URL.
    pub preview_url: String,
}

/// Handed out when an enhancement starts; the result is only accepted while
/// the upload it was started for is still current.
#[derive(Debug, Clone)]
pub struct EnhanceTicket {
    pub generation: u64,
    pub image: Arc<RgbImage>,
}

/// Upload/enhance state for one window.
#[derive(Debug, Clone, Default)]
pub struct Session {
    upload: Option<Upload>,
    enhancement: Option<Enhancement>,
    generation: u64,
    in_flight: bool,
}

impl Session {
    pub fn stage(&self) -> SessionStage {
        match (&self.upload, &self.enhancement) {
            (None, _) => SessionStage::NoImage,
            (Some(_), None) => SessionStage::ImageLoaded,
            (Some(_), Some(_)) => SessionStage::Enhanced,
        }
    }

    pub fn original(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    pub fn enhancement(&self) -> Option<&Enhancement> {
        self.enhancement.as_ref()
    }

    pub fn is_enhancing(&self) -> bool {
        self.in_flight
    }

    /// Replace the current image. Valid from any stage; any previous result
    /// is dropped and a running enhancement is orphaned.
    pub fn upload(&mut self, upload: Upload) {
        self.upload = Some(upload);
        self.enhancement = None;
        self.generation += 1;
        self.in_flight = false;
    }

    /// Start an enhancement. `None` when there is no image or one is already
    /// running.
    pub fn start_enhance(&mut self) -> Option<EnhanceTicket> {
        if self.in_flight {
            return None;
        }
        let upload = self.upload.as_ref()?;
        self.in_flight = true;
        Some(EnhanceTicket {
            generation: self.generation,
            image: Arc::clone(&upload.image),
        })
    }

    /// Store a finished result. Returns `false` (and changes nothing) when the
    /// ticket belongs to an upload that has since been replaced.
    pub fn complete_enhance(&mut self, generation: u64, enhancement: Enhancement) -> bool {
        if generation != self.generation {
            return false;
        }
        self.in_flight = false;
        self.enhancement = Some(enhancement);
        true
    }

    /// Release the in-flight flag after a failed run. Any earlier result stays.
    pub fn fail_enhance(&mut self, generation: u64) {
        if generation == self.generation {
            self.in_flight = false;
        }
    }
}

/// Status line under the controls.
#[derive(Debug, Clone)]
pub enum Status {
    Idle,
    Working(&'static str),
    Success(String),
    Failed(HumanError),
}

impl Status {
    /// A background load, enhance or save is in flight.
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working(_))
    }
}

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub session: Session,
    /// Current slider positions.
    pub params: EnhancementParameters,
    /// Application settings.
    pub config: AppConfig,
    pub status: Status,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: Session::default(),
            params: config.default_parameters,
            config,
            status: Status::Idle,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn upload(name: &str, shade: u8) -> Upload {
        Upload {
            file_name: name.into(),
            format: ImageFormatKind::Png,
            image: Arc::new(RgbImage::from_pixel(2, 2, Rgb([shade; 3]))),
            preview_url: format!("data:image/png;base64,{name}"),
        }
    }

    fn enhancement(shade: u8) -> Enhancement {
        Enhancement {
            params: EnhancementParameters::default(),
            image: Arc::new(RgbImage::from_pixel(2, 2, Rgb([shade; 3]))),
            preview_url: "data:image/png;base64,out".into(),
        }
    }

    #[test]
    fn starts_with_no_image() {
        let session = Session::default();
        assert_eq!(session.stage(), SessionStage::NoImage);
        assert!(session.original().is_none());
    }

    #[test]
    fn trigger_without_image_is_a_no_op() {
        let mut session = Session::default();
        assert!(session.start_enhance().is_none());
        assert!(!session.is_enhancing());
        assert_eq!(session.stage(), SessionStage::NoImage);
    }

    #[test]
    fn upload_then_enhance_reaches_enhanced() {
        let mut session = Session::default();
        session.upload(upload("a.png", 10));
        assert_eq!(session.stage(), SessionStage::ImageLoaded);

        let ticket = session.start_enhance().unwrap();
        assert!(session.is_enhancing());
        assert_eq!(*ticket.image.get_pixel(0, 0), Rgb([10, 10, 10]));

        assert!(session.complete_enhance(ticket.generation, enhancement(20)));
        assert_eq!(session.stage(), SessionStage::Enhanced);
        assert!(!session.is_enhancing());
    }

    #[test]
    fn only_one_enhancement_in_flight() {
        let mut session = Session::default();
        session.upload(upload("a.png", 10));
        let _first = session.start_enhance().unwrap();
        assert!(session.start_enhance().is_none());
    }

    #[test]
    fn retrigger_replaces_previous_result() {
        let mut session = Session::default();
        session.upload(upload("a.png", 10));
        let t1 = session.start_enhance().unwrap();
        session.complete_enhance(t1.generation, enhancement(20));
        let t2 = session.start_enhance().unwrap();
        session.complete_enhance(t2.generation, enhancement(30));

        let result = session.enhancement().unwrap();
        assert_eq!(*result.image.get_pixel(0, 0), Rgb([30, 30, 30]));
    }

    #[test]
    fn reupload_clears_result_and_restarts() {
        let mut session = Session::default();
        session.upload(upload("a.png", 10));
        let ticket = session.start_enhance().unwrap();
        session.complete_enhance(ticket.generation, enhancement(20));

        session.upload(upload("b.png", 50));
        assert_eq!(session.stage(), SessionStage::ImageLoaded);
        assert_eq!(session.original().unwrap().file_name, "b.png");
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut session = Session::default();
        session.upload(upload("a.png", 10));
        let ticket = session.start_enhance().unwrap();

        session.upload(upload("b.png", 50));
        assert!(!session.complete_enhance(ticket.generation, enhancement(20)));
        assert_eq!(session.stage(), SessionStage::ImageLoaded);
    }

    #[test]
    fn failure_keeps_earlier_result_and_allows_retry() {
        let mut session = Session::default();
        session.upload(upload("a.png", 10));
        let t1 = session.start_enhance().unwrap();
        session.complete_enhance(t1.generation, enhancement(20));

        let t2 = session.start_enhance().unwrap();
        session.fail_enhance(t2.generation);
        assert_eq!(session.stage(), SessionStage::Enhanced);
        assert!(session.start_enhance().is_some());
    }

    #[test]
    fn app_state_sliders_start_at_configured_defaults() {
        let mut config = AppConfig::default();
        config.default_parameters.brightness = 2.5;
        let state = AppState::new(config);
        assert_eq!(state.params.brightness, 2.5);
        assert!(matches!(state.status, Status::Idle));
    }

    #[test]
    fn only_working_status_blocks_the_buttons() {
        assert!(Status::Working("Saving...").is_working());
        assert!(!Status::Idle.is_working());
        assert!(!Status::Success("done".into()).is_working());
    }
}
