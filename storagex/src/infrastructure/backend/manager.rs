// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Backend Registry / Manager
//!
//! Holds the active set of backend adapters and routes per-chunk
//! operations. Immutable after construction; selection policy is
//! intentionally simple (first-registered wins for writes).

use std::sync::Arc;

use storagex_domain::{BackendAdapter, StorageXError};

pub struct BackendManager {
    adapters: Vec<Arc<dyn BackendAdapter>>,
}

impl BackendManager {
    pub fn new() -> Self {
        Self { adapters: Vec::new() }
    }

    pub fn add(&mut self, adapter: Arc<dyn BackendAdapter>) {
        self.adapters.push(adapter);
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// The default write target: the first-registered adapter. A live
    /// manager with no adapters is a configuration error.
    pub fn pick_for_write(&self) -> Result<&Arc<dyn BackendAdapter>, StorageXError> {
        self.adapters
            .first()
            .ok_or_else(|| StorageXError::NoCloudStorageConfigured)
    }

    fn find(&self, system_id: &str) -> Result<&Arc<dyn BackendAdapter>, StorageXError> {
        self.adapters
            .iter()
            .find(|a| a.system_id() == system_id)
            .ok_or_else(|| StorageXError::StorageNotFound(system_id.to_string()))
    }

    /// Uploads `data` to the default write target, returning the chosen
    /// adapter's `system_id` for the caller to record in metadata.
    pub async fn upload(&self, name: &str, data: &[u8]) -> Result<String, StorageXError> {
        let adapter = self.pick_for_write()?;
        adapter.upload(name, data).await?;
        Ok(adapter.system_id().to_string())
    }

    pub async fn fetch(&self, system_id: &str, name: &str) -> Result<Vec<u8>, StorageXError> {
        self.find(system_id)?.fetch(name).await
    }

    pub async fn delete(&self, system_id: &str, name: &str) -> Result<(), StorageXError> {
        self.find(system_id)?.delete(name).await
    }
}

impl Default for BackendManager {
    fn default() -> Self {
        Self::new()
    }
}
