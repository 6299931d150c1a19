// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Download File Use Case

use std::path::Path;
use std::sync::Arc;

use storagex_domain::StorageXError;

use crate::infrastructure::runtime::StorageOrchestrator;

/// Reassembles a previously uploaded file from its catalog entry and
/// writes it to a local path.
pub struct DownloadFileUseCase {
    orchestrator: Arc<StorageOrchestrator>,
}

impl DownloadFileUseCase {
    pub fn new(orchestrator: Arc<StorageOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn execute(&self, name: &str, out_path: &Path) -> Result<(), StorageXError> {
        let mut sink = tokio::fs::File::create(out_path)
            .await
            .map_err(|e| StorageXError::FileInfoFetchFailed {
                path: out_path.display().to_string(),
                source: e,
            })?;

        self.orchestrator.get_file(name, &mut sink).await
    }
}
