// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds.
//
// File metadata goes straight to the Rust-native implementations. There is no
// media index to notify, so `scan_file` returns `PlatformUnavailable`.

use std::path::Path;

use imagesorter_core::error::{Result, SorterError};
use imagesorter_core::types::{ExifTimestamps, FileSystemTimestamps};

use crate::traits::*;

/// Bridge returned on non-mobile platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NativeExif for StubBridge {
    fn write_exif_date_time(&self, path: &Path, value: &str) -> Result<()> {
        imagesorter_metadata::write_exif_date_time(path, value)
    }

    fn read_exif_timestamps(&self, path: &Path) -> Result<ExifTimestamps> {
        imagesorter_metadata::read_exif_timestamps(path)
    }
}

impl NativeFileTimes for StubBridge {
    fn file_exists(&self, path: &Path) -> bool {
        imagesorter_metadata::file_exists(path)
    }

    fn set_modified_millis(&self, path: &Path, millis: i64) -> Result<()> {
        imagesorter_metadata::set_modified_millis(path, millis)
    }

    fn read_file_timestamps(&self, path: &Path) -> Result<FileSystemTimestamps> {
        imagesorter_metadata::read_file_timestamps(path)
    }
}

impl NativeMediaScanner for StubBridge {
    fn scan_file(&self, path: &Path) -> Result<()> {
        tracing::warn!(path = %path.display(), "NativeMediaScanner::scan_file called on stub bridge");
        Err(SorterError::PlatformUnavailable)
    }
}
