// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typed requests and the argument validation that produces them.

use std::path::{Path, PathBuf};

use imagesorter_core::types::{Arguments, ErrorCode, Method, Response};

/// A validated method call. Every variant targets exactly one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    SetExifDateTime { path: PathBuf, date_time: String },
    SetLastModifiedTime { path: PathBuf, time_millis: i64 },
    GetFileSystemTimestamps { path: PathBuf },
    GetExifTimestamps { path: PathBuf },
    TriggerMediaScan { path: PathBuf },
}

/// Validates raw arguments for one method. The error is the
/// `INVALID_ARGUMENTS` message.
pub type Parser = fn(&Arguments) -> Result<Request, &'static str>;

const FILE_PATH: &str = "filePath";
const DATE_TIME_STRING: &str = "dateTimeString";
const TIME_MILLIS: &str = "timeMillis";

impl Request {
    pub fn method(&self) -> Method {
        match self {
            Request::SetExifDateTime { .. } => Method::SetExifDateTime,
            Request::SetLastModifiedTime { .. } => Method::SetLastModifiedTime,
            Request::GetFileSystemTimestamps { .. } => Method::GetFileSystemTimestamps,
            Request::GetExifTimestamps { .. } => Method::GetExifTimestamps,
            Request::TriggerMediaScan { .. } => Method::TriggerMediaScan,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Request::SetExifDateTime { path, .. }
            | Request::SetLastModifiedTime { path, .. }
            | Request::GetFileSystemTimestamps { path }
            | Request::GetExifTimestamps { path }
            | Request::TriggerMediaScan { path } => path,
        }
    }

    /// The response for a failed attempt, in this operation's reporting style.
    ///
    /// EXIF writes and media scans answer `false`; the rest carry their error
    /// code with `detail` folded into a message naming the file.
    pub fn failure(&self, detail: &str) -> Response {
        let path = self.path().display();
        match self {
            Request::SetExifDateTime { .. } | Request::TriggerMediaScan { .. } => {
                Response::success(false)
            }
            Request::SetLastModifiedTime { .. } => Response::error(
                ErrorCode::NativeSetModifiedError,
                format!("Error setting last modified time for {path}: {detail}"),
            ),
            Request::GetFileSystemTimestamps { .. } => Response::error(
                ErrorCode::NativeStatError,
                format!("Error getting file attributes for {path}: {detail}"),
            ),
            Request::GetExifTimestamps { .. } => Response::error(
                ErrorCode::NativeExifReadError,
                format!("Error reading EXIF data for {path}: {detail}"),
            ),
        }
    }
}

/// The validator for `method`.
pub fn parser_for(method: Method) -> Parser {
    match method {
        Method::SetExifDateTime => parse_set_exif_date_time,
        Method::SetLastModifiedTime => parse_set_last_modified_time,
        Method::GetFileSystemTimestamps => parse_get_file_system_timestamps,
        Method::GetExifTimestamps => parse_get_exif_timestamps,
        Method::TriggerMediaScan => parse_trigger_media_scan,
    }
}

fn file_path(args: &Arguments) -> Option<PathBuf> {
    args.string(FILE_PATH).map(PathBuf::from)
}

fn parse_set_exif_date_time(args: &Arguments) -> Result<Request, &'static str> {
    match (file_path(args), args.string(DATE_TIME_STRING)) {
        (Some(path), Some(date_time)) => Ok(Request::SetExifDateTime {
            path,
            date_time: date_time.to_owned(),
        }),
        _ => Err("File path or date time string is null."),
    }
}

fn parse_set_last_modified_time(args: &Arguments) -> Result<Request, &'static str> {
    match (file_path(args), args.integer(TIME_MILLIS)) {
        (Some(path), Some(time_millis)) => Ok(Request::SetLastModifiedTime { path, time_millis }),
        _ => Err("File path or timeMillis is null for setLastModifiedTime."),
    }
}

fn parse_get_file_system_timestamps(args: &Arguments) -> Result<Request, &'static str> {
    file_path(args)
        .map(|path| Request::GetFileSystemTimestamps { path })
        .ok_or("File path is null for getting timestamps.")
}

fn parse_get_exif_timestamps(args: &Arguments) -> Result<Request, &'static str> {
    file_path(args)
        .map(|path| Request::GetExifTimestamps { path })
        .ok_or("File path is null for getting EXIF timestamps.")
}

fn parse_trigger_media_scan(args: &Arguments) -> Result<Request, &'static str> {
    file_path(args)
        .map(|path| Request::TriggerMediaScan { path })
        .ok_or("File path is null for media scan.")
}
