// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operation handlers. Each one runs synchronously on a worker thread, makes
// one or two bridge calls, and turns the outcome into exactly one Response.
//
// Two reporting styles coexist and callers depend on which is which:
//   - setExifDateTime, triggerMediaScan: failures collapse to `false`
//   - everything else: failures carry an error code and a message

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use imagesorter_bridge::traits::PlatformBridge;
use imagesorter_core::error::SorterError;
use imagesorter_core::types::{ErrorCode, Response, display_millis};

use crate::request::Request;

/// What a handler produced: the response, plus a file to announce to the media
/// index once that response has been posted.
#[derive(Debug)]
pub struct Outcome {
    pub response: Response,
    pub notify: Option<PathBuf>,
}

impl Outcome {
    fn respond(response: Response) -> Self {
        Self {
            response,
            notify: None,
        }
    }
}

/// Run `request` against `bridge`.
pub fn execute(bridge: &dyn PlatformBridge, request: &Request, scan_after_exif_write: bool) -> Outcome {
    match request {
        Request::SetExifDateTime { path, date_time } => {
            let written = set_exif_date_time(bridge, path, date_time);
            Outcome {
                response: Response::success(written),
                notify: (written && scan_after_exif_write).then(|| path.clone()),
            }
        }
        Request::SetLastModifiedTime { path, time_millis } => {
            Outcome::respond(set_last_modified_time(bridge, request, path, *time_millis))
        }
        Request::GetFileSystemTimestamps { path } => Outcome::respond(serialized(
            request,
            bridge.read_file_timestamps(path),
        )),
        Request::GetExifTimestamps { path } => Outcome::respond(serialized(
            request,
            bridge.read_exif_timestamps(path),
        )),
        Request::TriggerMediaScan { path } => {
            Outcome::respond(Response::success(trigger_media_scan(bridge, path)))
        }
    }
}

fn set_exif_date_time(bridge: &dyn PlatformBridge, path: &Path, date_time: &str) -> bool {
    match bridge.write_exif_date_time(path, date_time) {
        Ok(()) => true,
        Err(e) => {
            error!(path = %path.display(), error = %e, "error writing EXIF data");
            false
        }
    }
}

fn set_last_modified_time(
    bridge: &dyn PlatformBridge,
    request: &Request,
    path: &Path,
    time_millis: i64,
) -> Response {
    match bridge.set_modified_millis(path, time_millis) {
        Ok(()) => {
            info!(path = %path.display(), modified = %display_millis(time_millis), "last modified time set");
            Response::success(true)
        }
        Err(SorterError::FileNotFound(_)) => {
            let message = format!("File not found: {}", path.display());
            warn!(path = %path.display(), "{message}");
            Response::error(ErrorCode::NativeSetModifiedError, message)
        }
        Err(SorterError::PermissionDenied { detail, .. }) => {
            let message = format!(
                "Permission denied setting last modified time for {}: {detail}",
                path.display()
            );
            error!(path = %path.display(), "{message}");
            Response::error(ErrorCode::NativeSetModifiedError, message)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "error setting last modified time");
            request.failure(&e.to_string())
        }
    }
}

/// Success with the serialized record, or the request's own failure response.
fn serialized<T: Serialize>(request: &Request, read: imagesorter_core::error::Result<T>) -> Response {
    let path = request.path().display();
    match read.and_then(|record| serde_json::to_value(record).map_err(SorterError::from)) {
        Ok(value) => Response::success(value),
        Err(e) => {
            error!(path = %path, method = %request.method(), error = %e, "timestamp read failed");
            request.failure(&e.to_string())
        }
    }
}

fn trigger_media_scan(bridge: &dyn PlatformBridge, path: &Path) -> bool {
    if !bridge.file_exists(path) {
        warn!(path = %path.display(), "file not found for media scanner");
        return false;
    }
    match bridge.scan_file(path) {
        Ok(()) => true,
        Err(e) => {
            error!(path = %path.display(), error = %e, "error triggering media scanner");
            false
        }
    }
}

/// Fire-and-forget media index notification after an EXIF write. The
/// response has already been posted, so a failure is only logged.
pub fn notify_media_index(bridge: &dyn PlatformBridge, path: &Path) {
    if let Err(e) = bridge.scan_file(path) {
        warn!(path = %path.display(), error = %e, "media scan after EXIF write failed");
    }
}
