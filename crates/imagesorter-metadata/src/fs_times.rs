// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem timestamps — stat a file into epoch milliseconds and move its
// modification time.

use std::path::Path;

use filetime::FileTime;
use tracing::{debug, info, instrument};

use imagesorter_core::error::{Result, SorterError};
use imagesorter_core::types::{FileSystemTimestamps, display_millis};

/// Whether anything exists at `path`. Directories count, like `File.exists()`.
pub fn file_exists(path: &Path) -> bool {
    path.exists()
}

/// Read modification, access and creation times of `path`.
///
/// Non-positive readings come back as `None`. Filesystems that do not record a
/// birth time report `created: None` instead of failing the whole stat.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_file_timestamps(path: &Path) -> Result<FileSystemTimestamps> {
    let meta = std::fs::metadata(path).map_err(|e| SorterError::from_io(path, e))?;

    let modified = FileTime::from_last_modification_time(&meta);
    let accessed = FileTime::from_last_access_time(&meta);
    let created = FileTime::from_creation_time(&meta);

    let timestamps = FileSystemTimestamps::from_millis(
        to_millis(modified),
        to_millis(accessed),
        created.and_then(to_millis),
    );
    debug!(?timestamps, "file timestamps read");
    Ok(timestamps)
}

/// Set the modification time of an existing file, leaving the access time
/// untouched.
#[instrument(skip_all, fields(path = %path.display(), millis = millis))]
pub fn set_modified_millis(path: &Path, millis: i64) -> Result<()> {
    std::fs::metadata(path).map_err(|e| SorterError::from_io(path, e))?;

    filetime::set_file_mtime(path, from_millis(millis))
        .map_err(|e| SorterError::from_io(path, e))?;

    info!(modified = %display_millis(millis), "modification time set");
    Ok(())
}

/// Epoch milliseconds of a `FileTime`, truncating sub-millisecond precision.
/// `None` when the value does not fit in an `i64`.
pub fn to_millis(time: FileTime) -> Option<i64> {
    time.unix_seconds()
        .checked_mul(1000)?
        .checked_add(i64::from(time.nanoseconds() / 1_000_000))
}

/// `FileTime` for an epoch-millisecond value; negative values are pre-epoch.
pub fn from_millis(millis: i64) -> FileTime {
    let seconds = millis.div_euclid(1000);
    let nanos = (millis.rem_euclid(1000) * 1_000_000) as u32;
    FileTime::from_unix_time(seconds, nanos)
}
