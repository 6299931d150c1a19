// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # StorageX Error Taxonomy
//!
//! A single hierarchical error type covering configuration, I/O, catalog,
//! business-rule, and backend-adapter failures. Every operation in the
//! chunker, catalog, and orchestrator returns `Result<T, StorageXError>`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageXError>;

#[derive(Error, Debug)]
pub enum StorageXError {
    // --- Configuration ---
    #[error("failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("app config not loaded")]
    ConfigNotLoaded,

    #[error("no cloud storage configured")]
    NoCloudStorageConfigured,

    // --- I/O ---
    #[error("failed to get file info for {path}: {source}")]
    FileInfoFetchFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read chunk from file: {0}")]
    ChunkReadFailed(String),

    // --- Catalog ---
    #[error("failed to open metadata database at {path}: {source}")]
    DbOpenFailed {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to initialize metadata schema: {0}")]
    SchemaInitFailed(String),

    #[error("metadata database query failed: {0}")]
    DbQueryFailed(String),

    #[error("failed to scan metadata database rows: {0}")]
    DbScanFailed(String),

    #[error("failed to insert chunk {chunk_name}: {reason}")]
    ChunkInsertFailed { chunk_name: String, reason: String },

    #[error("failed to insert file {file_name}: {reason}")]
    FileInsertFailed { file_name: String, reason: String },

    #[error("failed to update file {file_name}: {reason}")]
    FileUpdateFailed { file_name: String, reason: String },

    #[error("failed to delete chunk {chunk_name}: {reason}")]
    ChunkDeleteFailed { chunk_name: String, reason: String },

    #[error("failed to delete file {file_name}: {reason}")]
    FileDeleteFailed { file_name: String, reason: String },

    // --- Business ---
    #[error("file already exists in metadata: {0}")]
    FileAlreadyExists(String),

    #[error("chunk already exists in metadata: {0}")]
    ChunkAlreadyExists(String),

    #[error("file not found in metadata: {0}")]
    FileNotFound(String),

    #[error("chunk not found in metadata: {0}")]
    ChunkNotFound(String),

    // --- Backend ---
    #[error("upload failed on backend {backend}: {reason}")]
    Upload { backend: String, reason: String },

    #[error("download failed on backend {backend}: {reason}")]
    Download { backend: String, reason: String },

    #[error("delete failed on backend {backend}: {reason}")]
    Delete { backend: String, reason: String },

    #[error("storage system not found: {0}")]
    StorageNotFound(String),

    // --- Composite ---
    #[error("{count} chunk(s) failed to delete: {names}")]
    PartialDeleteFailure { count: usize, names: String },
}

impl StorageXError {
    pub fn config_load_failed(msg: impl Into<String>) -> Self {
        Self::ConfigLoadFailed(msg.into())
    }

    pub fn db_query_failed(msg: impl Into<String>) -> Self {
        Self::DbQueryFailed(msg.into())
    }

    pub fn db_scan_failed(msg: impl Into<String>) -> Self {
        Self::DbScanFailed(msg.into())
    }

    pub fn upload(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upload {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    pub fn download(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Download {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    pub fn delete(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Delete {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Matches the not-found family (catalog lookups and backend routing).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageXError::FileNotFound(_) | StorageXError::ChunkNotFound(_) | StorageXError::StorageNotFound(_)
        )
    }

    /// Delete is the only operation that recovers locally from partial
    /// failure (it collects per-chunk errors instead of aborting); every
    /// other error is terminal for the invoking command.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StorageXError::PartialDeleteFailure { .. })
    }
}

impl From<sqlx::Error> for StorageXError {
    fn from(err: sqlx::Error) -> Self {
        StorageXError::DbQueryFailed(err.to_string())
    }
}

impl From<std::io::Error> for StorageXError {
    fn from(err: std::io::Error) -> Self {
        StorageXError::ChunkReadFailed(err.to_string())
    }
}
