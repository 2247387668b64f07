// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CLI configuration stored as JSON under the platform config directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.json";

/// Persisted CLI preferences. Every field is optional; flags win over file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory holding record files.
    pub store_dir: Option<PathBuf>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl CliConfig {
    /// Default config location (e.g. `~/.config/importer-ledger/config.json`).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "flyingrobots", "importer-ledger")
            .map(|proj| proj.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields `None`; an unreadable or
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read config {}", path.display()))
            }
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        let config = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(Some(config))
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data).with_context(|| format!("write config {}", path.display()))
    }
}
