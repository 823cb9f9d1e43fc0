// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the native operation channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed set of operations the channel answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    SetExifDateTime,
    SetLastModifiedTime,
    GetFileSystemTimestamps,
    GetExifTimestamps,
    TriggerMediaScan,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::SetExifDateTime,
        Method::SetLastModifiedTime,
        Method::GetFileSystemTimestamps,
        Method::GetExifTimestamps,
        Method::TriggerMediaScan,
    ];

    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::SetExifDateTime => "setExifDateTime",
            Method::SetLastModifiedTime => "setLastModifiedTime",
            Method::GetFileSystemTimestamps => "getFileSystemTimestamps",
            Method::GetExifTimestamps => "getExifTimestamps",
            Method::TriggerMediaScan => "triggerMediaScan",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named arguments attached to a method call.
///
/// Values arrive untyped; the accessors return `None` both for a missing key
/// and for a value of the wrong type, so callers treat the two identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Map<String, Value>>")]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for callers assembling calls in code.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    /// A string argument, if present and actually a string.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// An integer argument, if present and representable as `i64`.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Option<Map<String, Value>>> for Arguments {
    fn from(map: Option<Map<String, Value>>) -> Self {
        Self(map.unwrap_or_default())
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One invocation arriving on the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Arguments,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Machine-readable error codes surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArguments,
    NativeSetModifiedError,
    NativeStatError,
    NativeExifReadError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidArguments => "INVALID_ARGUMENTS",
            ErrorCode::NativeSetModifiedError => "NATIVE_SET_MODIFIED_ERROR",
            ErrorCode::NativeStatError => "NATIVE_STAT_ERROR",
            ErrorCode::NativeExifReadError => "NATIVE_EXIF_READ_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single answer produced for every method call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Success { value: Value },
    Error { code: ErrorCode, message: String },
    NotImplemented,
}

impl Response {
    pub fn success(value: impl Into<Value>) -> Self {
        Response::Success {
            value: value.into(),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Response::Error {
            code,
            message: message.into(),
        }
    }

    /// The error code, if this is an error response.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Response::Error { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Response::Success { value } => Some(value),
            _ => None,
        }
    }
}

/// Filesystem timestamps in epoch milliseconds.
///
/// `changed` carries the modification time: there is no portable change-time
/// source, so the two fields always agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemTimestamps {
    pub modified: Option<i64>,
    pub accessed: Option<i64>,
    pub created: Option<i64>,
    pub changed: Option<i64>,
}

impl FileSystemTimestamps {
    /// Build a record from raw epoch-millisecond readings, dropping
    /// non-positive values.
    pub fn from_millis(modified: Option<i64>, accessed: Option<i64>, created: Option<i64>) -> Self {
        let modified = modified.and_then(positive_millis);
        Self {
            modified,
            accessed: accessed.and_then(positive_millis),
            created: created.and_then(positive_millis),
            changed: modified,
        }
    }
}

/// The three EXIF date/time tags, verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExifTimestamps {
    pub date_time: Option<String>,
    pub date_time_original: Option<String>,
    pub date_time_digitized: Option<String>,
}

impl ExifTimestamps {
    /// A record with every tag set to the same value.
    pub fn uniform(value: &str) -> Self {
        Self {
            date_time: Some(value.to_owned()),
            date_time_original: Some(value.to_owned()),
            date_time_digitized: Some(value.to_owned()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date_time.is_none()
            && self.date_time_original.is_none()
            && self.date_time_digitized.is_none()
    }
}

/// Epoch milliseconds are only meaningful when strictly positive.
pub fn positive_millis(millis: i64) -> Option<i64> {
    (millis > 0).then_some(millis)
}

/// Render epoch milliseconds as RFC 3339 for log fields.
pub fn display_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("{millis}ms"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_names_round_trip_through_serde() {
        for method in Method::ALL {
            let encoded = serde_json::to_value(method).unwrap();
            assert_eq!(encoded, json!(method.as_str()));
        }
    }

    #[test]
    fn wrong_typed_arguments_read_as_missing() {
        let args = Arguments::new()
            .with("filePath", 42)
            .with("timeMillis", "1700000000000");
        assert_eq!(args.string("filePath"), None);
        assert_eq!(args.integer("timeMillis"), None);
        assert_eq!(args.string("absent"), None);
    }

    #[test]
    fn null_arguments_deserialize_as_empty() {
        let call: MethodCall =
            serde_json::from_value(json!({"method": "getExifTimestamps", "arguments": null}))
                .unwrap();
        assert!(call.arguments.is_empty());

        let call: MethodCall =
            serde_json::from_value(json!({"method": "getExifTimestamps"})).unwrap();
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn response_wire_shapes() {
        assert_eq!(
            serde_json::to_value(Response::success(true)).unwrap(),
            json!({"status": "success", "value": true})
        );
        assert_eq!(
            serde_json::to_value(Response::error(ErrorCode::NativeStatError, "boom")).unwrap(),
            json!({"status": "error", "code": "NATIVE_STAT_ERROR", "message": "boom"})
        );
        assert_eq!(
            serde_json::to_value(Response::NotImplemented).unwrap(),
            json!({"status": "notImplemented"})
        );
    }

    #[test]
    fn non_positive_millis_become_absent() {
        let ts = FileSystemTimestamps::from_millis(Some(1_700_000_000_000), Some(0), Some(-5));
        assert_eq!(ts.modified, Some(1_700_000_000_000));
        assert_eq!(ts.accessed, None);
        assert_eq!(ts.created, None);
        assert_eq!(ts.changed, ts.modified);
    }

    #[test]
    fn absent_timestamps_serialize_as_null() {
        let value = serde_json::to_value(ExifTimestamps::default()).unwrap();
        assert_eq!(
            value,
            json!({"dateTime": null, "dateTimeOriginal": null, "dateTimeDigitized": null})
        );

        let value = serde_json::to_value(FileSystemTimestamps::from_millis(Some(5), None, None))
            .unwrap();
        assert_eq!(
            value,
            json!({"modified": 5, "accessed": null, "created": null, "changed": 5})
        );
    }

    #[test]
    fn display_millis_is_rfc3339() {
        assert_eq!(display_millis(0), "1970-01-01T00:00:00+00:00");
    }
}
