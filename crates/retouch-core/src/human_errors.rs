// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the status line.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives the colour of the status banner.

use crate::error::RetouchError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something on the machine hiccupped; trying again may work.
    Transient,
    /// User must do something (pick another file, move a slider).
    ActionRequired,
    /// Cannot be fixed by retrying; the input itself is unusable.
    Permanent,
}

impl Severity {
    /// Banner colour for this severity.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Transient => "#ff9500",
            Self::ActionRequired => "#007aff",
            Self::Permanent => "#ff3b30",
        }
    }
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether pressing the same button again could succeed.
    pub retriable: bool,
    /// Severity level (drives colour in UI).
    pub severity: Severity,
}

impl HumanError {
    /// Extra line for the status banner when repeating the action may help.
    pub fn retry_hint(&self) -> Option<&'static str> {
        self.retriable.then_some("This may work if you try again.")
    }
}

/// Convert a `RetouchError` into a `HumanError`.
pub fn humanize_error(err: &RetouchError) -> HumanError {
    match err {
        RetouchError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!("Please choose a JPEG or PNG image. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RetouchError::Decode(_) => HumanError {
            message: "We couldn't read this image.".into(),
            suggestion: "The file may be damaged or not really a JPEG/PNG. Try re-saving it in another program, or pick a different file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RetouchError::Encode(_) => HumanError {
            message: "We couldn't produce the enhanced image.".into(),
            suggestion: "Try enhancing again. If this keeps happening, try a smaller image.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RetouchError::EmptyImage { width, height } => HumanError {
            message: "This image has no pixels.".into(),
            suggestion: format!("The file decodes to a {width}x{height} picture. Please choose a different image."),
            retriable: false,
            severity: Severity::Permanent,
        },

        RetouchError::InvalidParameter { name, value } => HumanError {
            message: "One of the settings is out of range.".into(),
            suggestion: format!("Move the {name} slider back into its range and try again. (Value: {value})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RetouchError::TempFile(detail) => HumanError {
            message: "We couldn't prepare the download.".into(),
            suggestion: format!("Check that your temporary folder has free space, then try again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        RetouchError::Io(e) => {
            let kind = e.kind();
            if kind == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied.".into(),
                    suggestion: "Retouch doesn't have permission to use that file or folder. Try a different location.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if kind == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing it again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "A file error occurred.".into(),
                    suggestion: "Try again. If the problem continues, restart the app.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        RetouchError::Serialization(_) => HumanError {
            message: "Settings couldn't be saved.".into(),
            suggestion: "Try again. If this keeps happening, delete the Retouch config file to reset it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RetouchError::Worker(_) => HumanError {
            message: "The operation stopped unexpectedly.".into(),
            suggestion: "Try again. If it keeps failing, restart the app.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
