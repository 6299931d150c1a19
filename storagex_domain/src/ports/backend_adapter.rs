// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Backend Adapter Port
//!
//! Object-store semantics for a single remote endpoint. Concrete adapters
//! (Dropbox, S3, GCS, or an in-process mock for tests) are external
//! collaborators that implement this trait; the core only depends on the
//! capability below.

use crate::StorageXError;
use async_trait::async_trait;

#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Stores `data` under `name`, overwriting any existing object.
    async fn upload(&self, name: &str, data: &[u8]) -> Result<(), StorageXError>;

    /// Returns the full object stored under `name`.
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, StorageXError>;

    /// Removes the object stored under `name`.
    async fn delete(&self, name: &str) -> Result<(), StorageXError>;

    /// A stable, backend-unique identifier, e.g. `"dropbox:<account_id>"`.
    /// Used as the foreign key recorded in chunk metadata.
    fn system_id(&self) -> &str;
}
