// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SorterError};

/// Channel name the UI layer binds to.
pub const DEFAULT_CHANNEL: &str = "com.moazsalem/native_channel";

/// Settings for the native operation dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name of the method channel answered by the dispatcher.
    pub channel_name: String,
    /// Upper bound on handlers running at the same time.
    pub max_workers: usize,
    /// Notify the media index after a successful EXIF write.
    pub scan_after_exif_write: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL.to_owned(),
            max_workers: 4,
            scan_after_exif_write: true,
        }
    }
}

impl BridgeConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        if config.channel_name.trim().is_empty() {
            return Err(SorterError::Config("channel_name must not be empty".into()));
        }
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Worker bound actually applied; zero would stall every request.
    pub fn worker_limit(&self) -> usize {
        self.max_workers.max(1)
    }
}
