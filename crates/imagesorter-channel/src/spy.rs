// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test bridge that performs real file work but counts every call, so tests
// can assert that a request touched the filesystem (or did not).

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::ThreadId;

use imagesorter_bridge::traits::*;
use imagesorter_core::error::{Result, SorterError};
use imagesorter_core::types::{ExifTimestamps, FileSystemTimestamps};

#[derive(Default)]
pub struct SpyBridge {
    file_ops: AtomicUsize,
    scans: AtomicUsize,
    fail_scans: bool,
    panic_on_stat: bool,
    deny_set_modified: bool,
    worker_threads: Mutex<Vec<ThreadId>>,
}

impl SpyBridge {
    pub fn failing_scans() -> Self {
        Self {
            fail_scans: true,
            ..Self::default()
        }
    }

    pub fn panicking_stat() -> Self {
        Self {
            panic_on_stat: true,
            ..Self::default()
        }
    }

    /// A bridge whose mtime updates fail as a read-only file would.
    pub fn read_only() -> Self {
        Self {
            deny_set_modified: true,
            ..Self::default()
        }
    }

    /// EXIF and timestamp calls, including existence checks.
    pub fn file_ops(&self) -> usize {
        self.file_ops.load(Ordering::SeqCst)
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Threads that ran file operations.
    pub fn worker_threads(&self) -> Vec<ThreadId> {
        self.worker_threads.lock().expect("spy lock poisoned").clone()
    }

    fn touch(&self) {
        self.file_ops.fetch_add(1, Ordering::SeqCst);
        self.worker_threads
            .lock()
            .expect("spy lock poisoned")
            .push(std::thread::current().id());
    }
}

impl PlatformBridge for SpyBridge {
    fn platform_name(&self) -> &str {
        "Spy"
    }
}

impl NativeExif for SpyBridge {
    fn write_exif_date_time(&self, path: &Path, value: &str) -> Result<()> {
        self.touch();
        imagesorter_metadata::write_exif_date_time(path, value)
    }

    fn read_exif_timestamps(&self, path: &Path) -> Result<ExifTimestamps> {
        self.touch();
        imagesorter_metadata::read_exif_timestamps(path)
    }
}

impl NativeFileTimes for SpyBridge {
    fn file_exists(&self, path: &Path) -> bool {
        self.touch();
        imagesorter_metadata::file_exists(path)
    }

    fn set_modified_millis(&self, path: &Path, millis: i64) -> Result<()> {
        self.touch();
        if self.deny_set_modified {
            return Err(SorterError::PermissionDenied {
                path: path.to_path_buf(),
                detail: "Operation not permitted".into(),
            });
        }
        imagesorter_metadata::set_modified_millis(path, millis)
    }

    fn read_file_timestamps(&self, path: &Path) -> Result<FileSystemTimestamps> {
        self.touch();
        if self.panic_on_stat {
            panic!("stat exploded for {}", path.display());
        }
        imagesorter_metadata::read_file_timestamps(path)
    }
}

impl NativeMediaScanner for SpyBridge {
    fn scan_file(&self, _path: &Path) -> Result<()> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if self.fail_scans {
            Err(SorterError::Bridge("broadcast refused".into()))
        } else {
            Ok(())
        }
    }
}
