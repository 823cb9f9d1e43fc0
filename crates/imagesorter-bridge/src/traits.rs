// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native file capabilities.
//
// The dispatcher only ever talks to these traits, so tests can swap in a spy
// and count exactly which file operations a request performed.

use std::path::Path;

use imagesorter_core::error::Result;
use imagesorter_core::types::{ExifTimestamps, FileSystemTimestamps};

/// Unified bridge that groups all native capabilities.
///
/// Bridges are shared by every in-flight request, hence `Send + Sync`.
/// Implementations hold no per-request state.
pub trait PlatformBridge: NativeExif + NativeFileTimes + NativeMediaScanner + Send + Sync {
    /// Human-readable platform name (e.g. "Android", "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// EXIF date/time tags embedded in image files.
pub trait NativeExif {
    /// Set `DateTime`, `DateTimeOriginal` and `DateTimeDigitized` to `value`
    /// and persist the change to the file.
    fn write_exif_date_time(&self, path: &Path, value: &str) -> Result<()>;

    /// Read the three date/time tags. Missing tags are `None`, not errors.
    fn read_exif_timestamps(&self, path: &Path) -> Result<ExifTimestamps>;
}

/// Filesystem timestamps.
pub trait NativeFileTimes {
    /// Whether anything exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// Set the modification time to `millis` since the epoch.
    fn set_modified_millis(&self, path: &Path, millis: i64) -> Result<()>;

    /// Read modification, access and creation times.
    fn read_file_timestamps(&self, path: &Path) -> Result<FileSystemTimestamps>;
}

/// OS media index notification.
pub trait NativeMediaScanner {
    /// Announce that the file at `path` changed. Fire-and-forget: `Ok(())`
    /// means the notification was handed to the OS, not that indexing ran.
    fn scan_file(&self, path: &Path) -> Result<()>;
}
