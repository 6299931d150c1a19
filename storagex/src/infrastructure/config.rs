// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Configuration
//!
//! Loads the JSON config file named on the command line into a typed
//! `AppConfig` tree. Loading happens once per process invocation, at the
//! composition root in `main`; the loaded value is threaded explicitly into
//! the chunker and orchestrator rather than latched behind a singleton.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storagex_domain::StorageXError;
use tracing::warn;

const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;
const DEFAULT_DB_PATH: &str = "metadata.db";
const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub parallel: ParallelConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudConfig {
    #[serde(default)]
    pub dropbox_access_tokens: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    #[serde(default = "default_workers")]
    pub upload_workers: usize,

    #[serde(default = "default_workers")]
    pub download_workers: usize,
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            upload_workers: default_workers(),
            download_workers: default_workers(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            cloud: CloudConfig::default(),
            log: LogConfig::default(),
            metadata: MetadataConfig::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads and parses the config file at `path`, then runs secret
    /// expansion over the cloud token list.
    pub fn load(path: &Path) -> Result<Self, StorageXError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StorageXError::config_load_failed(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Deserializes from an in-memory JSON string, bypassing file I/O.
    /// Used by tests and by `load`.
    pub fn from_json(raw: &str) -> Result<Self, StorageXError> {
        let mut config: AppConfig =
            serde_json::from_str(raw).map_err(|e| StorageXError::config_load_failed(e.to_string()))?;
        config.expand_secrets();
        Ok(config)
    }

    /// Like `from_json`, but also reports which top-level keys were absent
    /// from `raw` and therefore fell back to their default value.
    pub fn from_json_with_report(raw: &str) -> Result<(Self, Vec<String>), StorageXError> {
        let config = Self::from_json(raw)?;

        let present: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| StorageXError::config_load_failed(e.to_string()))?;
        let present = present.as_object().cloned().unwrap_or_default();

        let mut defaults_applied = Vec::new();
        for key in ["chunk_size", "cloud", "log", "metadata", "parallel"] {
            if !present.contains_key(key) {
                defaults_applied.push(key.to_string());
            }
        }

        Ok((config, defaults_applied))
    }

    /// Resolves each `dropbox_access_tokens` entry that names an existing
    /// environment variable to that variable's value. Entries that are
    /// empty, or whose named variable is unset, are left unchanged with a
    /// warning — the entry may still be a literal token.
    fn expand_secrets(&mut self) {
        for token in &mut self.cloud.dropbox_access_tokens {
            if token.is_empty() {
                warn!("empty dropbox access token entry in config");
                continue;
            }
            match std::env::var(&*token) {
                Ok(value) => *token = value,
                Err(_) => {
                    // Not an env var name (or unset) — treat as a literal token.
                }
            }
        }
    }

    /// The absolute, `~`-expanded path to the metadata database file.
    pub fn db_path(&self) -> PathBuf {
        expand_tilde(&self.metadata.db_path)
    }

    pub fn has_cloud_storage_configured(&self) -> bool {
        self.cloud.dropbox_access_tokens.iter().any(|t| !t.is_empty())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    let p = PathBuf::from(path);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir().map(|cwd| cwd.join(&p)).unwrap_or(p)
    }
}
