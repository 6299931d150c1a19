// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Upload File Use Case

use std::path::Path;
use std::sync::Arc;

use storagex_domain::StorageXError;

use crate::infrastructure::runtime::StorageOrchestrator;

/// Chunks a local file and disperses it across the configured backend.
pub struct UploadFileUseCase {
    orchestrator: Arc<StorageOrchestrator>,
}

impl UploadFileUseCase {
    pub fn new(orchestrator: Arc<StorageOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn execute(&self, path: &Path) -> Result<(), StorageXError> {
        self.orchestrator.upload_file(path).await
    }
}
