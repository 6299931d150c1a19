// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Configfile Use Case
//!
//! Prints the active config file path and reports which keys fell back to
//! their defaults.

use std::path::Path;

use crate::infrastructure::config::AppConfig;

pub struct ConfigfileUseCase;

impl ConfigfileUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Returns the lines to print: the config path, one line per
    /// top-level key that fell back to its default, and a warning if no
    /// cloud backend ended up configured.
    pub fn execute(&self, config_path: &Path, config: &AppConfig, defaults_applied: &[String]) -> Vec<String> {
        let mut lines = vec![config_path.display().to_string()];

        for key in defaults_applied {
            lines.push(format!("default applied: {key}"));
        }

        if !config.has_cloud_storage_configured() {
            lines.push("warning: no cloud storage configured".to_string());
        }

        lines
    }
}

impl Default for ConfigfileUseCase {
    fn default() -> Self {
        Self::new()
    }
}
