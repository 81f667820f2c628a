// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Retouch enhancement tool.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, RetouchError};

/// Slider bounds for one enhancement parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl ParamRange {
    /// Whether `value` is finite and lies within `[min, max]`.
    pub fn contains(&self, value: f32) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Snap `value` into `[min, max]`. Non-finite input falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }
}

pub const BRIGHTNESS: ParamRange = ParamRange {
    label: "Brightness",
    min: 0.5,
    max: 3.0,
    step: 0.1,
    default: 1.2,
};

pub const CONTRAST: ParamRange = ParamRange {
    label: "Contrast",
    min: 0.5,
    max: 3.0,
    step: 0.1,
    default: 1.3,
};

pub const SHARPNESS: ParamRange = ParamRange {
    label: "Sharpness",
    min: 0.0,
    max: 5.0,
    step: 0.1,
    default: 2.0,
};

pub const DENOISE: ParamRange = ParamRange {
    label: "Denoise Strength",
    min: 0.0,
    max: 30.0,
    step: 1.0,
    default: 10.0,
};

/// The four user-tunable inputs of the enhancement pipeline.
///
/// Built fresh from the slider positions every time the user triggers an
/// enhancement, then passed by reference to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementParameters {
    /// Brightness multiplier; 1.0 leaves the image unchanged.
    pub brightness: f32,
    /// Contrast multiplier around the mean gray level; 1.0 is a no-op.
    pub contrast: f32,
    /// Blend factor against a smoothed copy; 0.0 = smoothed, 1.0 = original.
    pub sharpness: f32,
    /// Non-local-means filter strength `h`; 0 disables denoising.
    pub denoise_strength: u8,
}

impl Default for EnhancementParameters {
    fn default() -> Self {
        Self {
            brightness: BRIGHTNESS.default,
            contrast: CONTRAST.default,
            sharpness: SHARPNESS.default,
            denoise_strength: DENOISE.default as u8,
        }
    }
}

impl EnhancementParameters {
    /// Parameters under which every pipeline stage is a no-op.
    pub fn identity() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            sharpness: 1.0,
            denoise_strength: 0,
        }
    }

    /// Check every field against its slider range.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (BRIGHTNESS, "brightness", self.brightness),
            (CONTRAST, "contrast", self.contrast),
            (SHARPNESS, "sharpness", self.sharpness),
            (DENOISE, "denoise_strength", f32::from(self.denoise_strength)),
        ];
        for (range, name, value) in checks {
            if !range.contains(value) {
                return Err(RetouchError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Copy with every field forced into its range.
    pub fn clamped(&self) -> Self {
        Self {
            brightness: BRIGHTNESS.clamp(self.brightness),
            contrast: CONTRAST.clamp(self.contrast),
            sharpness: SHARPNESS.clamp(self.sharpness),
            denoise_strength: DENOISE.clamp(f32::from(self.denoise_strength)).round() as u8,
        }
    }
}

/// Image formats accepted as uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormatKind {
    Jpeg,
    Png,
}

impl ImageFormatKind {
    /// Extensions offered by the upload dialog.
    pub const EXTENSIONS: [&'static str; 3] = ["jpg", "jpeg", "png"];

    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Infer the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| RetouchError::UnsupportedFormat(path.display().to_string()))
    }
}
