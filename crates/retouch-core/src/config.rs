// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::EnhancementParameters;

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Slider positions shown when an image is first uploaded.
    pub default_parameters: EnhancementParameters,
    /// JPEG quality (1-100) used for the downloadable result.
    pub jpeg_quality: u8,
    /// Longest edge, in pixels, of the on-screen previews.
    pub preview_max_dimension: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_parameters: EnhancementParameters::default(),
            jpeg_quality: 90,
            preview_max_dimension: 1024,
        }
    }
}

impl AppConfig {
    /// Copy with out-of-range values replaced by something usable.
    ///
    /// Config files are hand-editable, so nothing read from disk is trusted.
    pub fn sanitized(&self) -> Self {
        Self {
            default_parameters: self.default_parameters.clamped(),
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
            preview_max_dimension: self.preview_max_dimension.max(64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "jpeg_quality": 75 }"#).unwrap();
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.default_parameters, EnhancementParameters::default());
        assert_eq!(config.preview_max_dimension, 1024);
    }

    #[test]
    fn sanitized_fixes_bad_values() {
        let config = AppConfig {
            default_parameters: EnhancementParameters {
                brightness: 9.0,
                contrast: 0.1,
                sharpness: -1.0,
                denoise_strength: 200,
            },
            jpeg_quality: 0,
            preview_max_dimension: 1,
        }
        .sanitized();

        assert!(config.default_parameters.validate().is_ok());
        assert_eq!(config.jpeg_quality, 1);
        assert_eq!(config.preview_max_dimension, 64);
    }
}
