// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! imagesorter — Native platform bridge abstractions.
//!
//! This crate defines the traits the operation dispatcher calls for file
//! metadata and media index work, plus one implementation per target OS.
//! EXIF and timestamp work is Rust-native everywhere; only the media index
//! notification needs the platform SDK (Android broadcasts via JNI).

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

use std::sync::Arc;

/// Retrieves the bridge implementation for the target operating system.
///
/// RETURNS: a shared trait object (`dyn PlatformBridge`) that every worker
/// task can call into concurrently.
pub fn platform_bridge() -> Arc<dyn traits::PlatformBridge> {
    #[cfg(target_os = "android")]
    {
        // Android: uses `jni-rs` to broadcast through the hosting Activity.
        Arc::new(android::AndroidBridge::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: no media index to notify.
        Arc::new(stub::StubBridge)
    }
}
