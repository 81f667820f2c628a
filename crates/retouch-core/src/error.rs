// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Retouch.

use thiserror::Error;

/// Top-level error type for all Retouch operations.
#[derive(Debug, Error)]
pub enum RetouchError {
    // -- Input errors --
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    // -- Pipeline preconditions --
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("parameter {name} out of range: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    // -- Storage --
    #[error("temporary file error: {0}")]
    TempFile(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Background work --
    #[error("background task failed: {0}")]
    Worker(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RetouchError>;
