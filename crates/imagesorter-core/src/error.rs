// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the image sorter bridge.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all native operations.
#[derive(Debug, Error)]
pub enum SorterError {
    // -- File access --
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("permission denied for {}: {detail}", .path.display())]
    PermissionDenied { path: PathBuf, detail: String },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Metadata --
    #[error("EXIF operation failed: {0}")]
    Exif(String),

    // -- Configuration / serialization --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl SorterError {
    /// Build the error for an I/O failure on `path`, keeping permission
    /// failures distinguishable from everything else.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => SorterError::FileNotFound(path),
            std::io::ErrorKind::PermissionDenied => SorterError::PermissionDenied {
                path,
                detail: err.to_string(),
            },
            _ => SorterError::Io(err),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SorterError>;
