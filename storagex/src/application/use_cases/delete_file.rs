// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Delete File Use Case

use std::sync::Arc;

use storagex_domain::StorageXError;

use crate::infrastructure::runtime::StorageOrchestrator;

/// Deletes every chunk of a file from its backend(s) and removes its
/// catalog entry. Best-effort across chunks: one failing chunk does not
/// abort the others.
pub struct DeleteFileUseCase {
    orchestrator: Arc<StorageOrchestrator>,
}

impl DeleteFileUseCase {
    pub fn new(orchestrator: Arc<StorageOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn execute(&self, name: &str) -> Result<(), StorageXError> {
        self.orchestrator.delete_file(name).await
    }
}
