// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution and config loading.

use std::path::{Path, PathBuf};

use imagesorter_core::BridgeConfig;
use tracing::{info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "IMAGESORTER_CONFIG";

const CONFIG_FILE: &str = "config.json";

/// Return the application data directory, creating it if needed.
///
/// On desktop this uses a conventional location. On mobile the embedding
/// app owns its storage and passes config in through `IMAGESORTER_CONFIG`.
pub fn data_dir() -> PathBuf {
    let dir = dirs_fallback().join("imagesorter");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Where the config is read from: `IMAGESORTER_CONFIG`, else
/// `<data dir>/config.json`.
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => data_dir().join(CONFIG_FILE),
    }
}

/// Load the config at `path`, falling back to defaults when it is absent or
/// unreadable.
pub fn load_config(path: &Path) -> BridgeConfig {
    if !path.exists() {
        info!(path = %path.display(), "no config file, using defaults");
        return BridgeConfig::default();
    }
    match BridgeConfig::load(path) {
        Ok(config) => {
            info!(path = %path.display(), "config loaded");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
            BridgeConfig::default()
        }
    }
}

fn dirs_fallback() -> PathBuf {
    // Try XDG data dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    PathBuf::from("/tmp")
}
