// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`.
//
// ## Architecture notes
//
// EXIF tags and file timestamps are handled by `imagesorter-metadata`, which
// works on Android's filesystem exactly as on desktop. Only the media scanner
// notification needs the SDK: it is a broadcast Intent sent through the
// hosting Activity. Dispatcher workers are pool threads, so every JNI call
// attaches the calling thread for the duration of the call.

#![cfg(target_os = "android")]

use std::path::Path;

use jni::objects::{JObject, JString, JValue};
use jni::JNIEnv;

use imagesorter_core::error::{Result, SorterError};
use imagesorter_core::types::{ExifTimestamps, FileSystemTimestamps};

use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// `Intent.ACTION_MEDIA_SCANNER_SCAN_FILE`.
const ACTION_MEDIA_SCANNER_SCAN_FILE: &str = "android.intent.action.MEDIA_SCANNER_SCAN_FILE";

/// Run `f` with a [`JNIEnv`] attached to the current thread and the hosting
/// Activity.
///
/// Calls `ndk_context::android_context()` to retrieve the `JavaVM*` pointer
/// set by `android_main` or `ANativeActivity_onCreate`. The attach guard
/// detaches the thread again when `f` returns.
fn with_activity<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { jni::JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| SorterError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| SorterError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(SorterError::Bridge(
            "Android context is null: native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    let activity = unsafe { JObject::from_raw(ptr.cast()) };

    let result = f(&mut env, &activity);
    if result.is_err() {
        // A thrown Java exception stays pending on the thread otherwise.
        let _ = env.exception_clear();
    }
    result
}

/// Convenience: map any `jni::errors::Error` into `SorterError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> SorterError {
    SorterError::Bridge(format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the image sorter platform bridge.
///
/// The struct is zero-sized; all state lives on the Java side.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge.
    ///
    /// This does **not** touch JNI; the first JNI call happens lazily when
    /// a media scan is requested.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

impl NativeExif for AndroidBridge {
    fn write_exif_date_time(&self, path: &Path, value: &str) -> Result<()> {
        imagesorter_metadata::write_exif_date_time(path, value)
    }

    fn read_exif_timestamps(&self, path: &Path) -> Result<ExifTimestamps> {
        imagesorter_metadata::read_exif_timestamps(path)
    }
}

impl NativeFileTimes for AndroidBridge {
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

// ---------------------------------------------------------------------------
// NativeMediaScanner — Intent.ACTION_MEDIA_SCANNER_SCAN_FILE
// ---------------------------------------------------------------------------

impl NativeMediaScanner for AndroidBridge {
    /// Broadcast `ACTION_MEDIA_SCANNER_SCAN_FILE` with a `file://` URI for
    /// `path` so MediaStore re-reads the file's metadata.
    fn scan_file(&self, path: &Path) -> Result<()> {
        let path_str = path
            .to_str()
            .ok_or_else(|| SorterError::Bridge(format!("path is not UTF-8: {}", path.display())))?;

        with_activity(|env, activity| {
            tracing::debug!(path = path_str, "Android: broadcasting media scan");

            // -- Build file:// URI ------------------------------------------------
            let j_path: JString = env
                .new_string(path_str)
                .map_err(|e| jni_err("new_string(path)", e))?;

            let file_obj: JObject = env
                .new_object(
                    "java/io/File",
                    "(Ljava/lang/String;)V",
                    &[JValue::Object(&j_path)],
                )
                .map_err(|e| jni_err("new File(path)", e))?;

            let uri: JObject = env
                .call_static_method(
                    "android/net/Uri",
                    "fromFile",
                    "(Ljava/io/File;)Landroid/net/Uri;",
                    &[JValue::Object(&file_obj)],
                )
                .map_err(|e| jni_err("Uri.fromFile", e))?
                .l()
                .map_err(|e| jni_err("Uri.fromFile->l", e))?;

            // -- Build the scan intent --------------------------------------------
            let j_action: JString = env
                .new_string(ACTION_MEDIA_SCANNER_SCAN_FILE)
                .map_err(|e| jni_err("new_string(ACTION_MEDIA_SCANNER_SCAN_FILE)", e))?;

            let intent: JObject = env
                .new_object(
                    "android/content/Intent",
                    "(Ljava/lang/String;)V",
                    &[JValue::Object(&j_action)],
                )
                .map_err(|e| jni_err("new Intent(scan)", e))?;

            // intent.setData(uri)
            env.call_method(
                &intent,
                "setData",
                "(Landroid/net/Uri;)Landroid/content/Intent;",
                &[JValue::Object(&uri)],
            )
            .map_err(|e| jni_err("setData", e))?;

            // activity.sendBroadcast(intent)
            env.call_method(
                activity,
                "sendBroadcast",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&intent)],
            )
            .map_err(|e| jni_err("sendBroadcast", e))?;

            tracing::info!(path = path_str, "Android: media scan broadcast sent");
            Ok(())
        })
    }
}
