// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metadata Catalog Port
//!
//! Durable store of file/chunk relationships. The concrete implementation
//! (infrastructure layer) is a SQLite-backed catalog with a process-local
//! read/write lock around the compound `add_chunk` sequence; this trait
//! only describes the operations the orchestrator needs.

use crate::value_objects::{ChunkMetadata, FileMetadata};
use crate::StorageXError;
use async_trait::async_trait;

#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// Insert-if-absent of a `files` row. Idempotent for `file_name`.
    async fn add_file(&self, file_name: &str, size: i64) -> Result<(), StorageXError>;

    /// Exclusive: fails with `ChunkAlreadyExists` if `chunk_meta.chunk_name`
    /// is already present. Otherwise inserts the chunk row, ensures a
    /// `files` row exists, and adds the chunk's size to the file's
    /// `total_size`.
    async fn add_chunk(&self, chunk_meta: ChunkMetadata) -> Result<(), StorageXError>;

    async fn get_chunk(&self, name: &str) -> Result<Option<ChunkMetadata>, StorageXError>;

    async fn get_file(&self, name: &str) -> Result<Option<FileMetadata>, StorageXError>;

    /// Chunks for `file_name`, ordered by `idx` ascending. A missing file
    /// returns an empty list, not an error.
    async fn list_chunks(&self, file_name: &str) -> Result<Vec<ChunkMetadata>, StorageXError>;

    async fn list_files(&self) -> Result<Vec<FileMetadata>, StorageXError>;

    async fn chunk_exists(&self, name: &str) -> Result<bool, StorageXError>;

    async fn file_exists(&self, name: &str) -> Result<bool, StorageXError>;

    async fn delete_chunk(&self, name: &str) -> Result<(), StorageXError>;

    /// Removes every chunk row for `file_name`, then the `files` row
    /// itself, under the exclusive lock.
    async fn delete_file(&self, file_name: &str) -> Result<(), StorageXError>;
}
