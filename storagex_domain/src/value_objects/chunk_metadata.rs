// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Durable Metadata Records
//!
//! `ChunkMetadata` and `FileMetadata` mirror the `chunks` and `files` tables
//! in the metadata catalog. Unlike `Chunk`, these carry no payload bytes —
//! they are the catalog's row shape.

use serde::{Deserialize, Serialize};

/// A row in the `chunks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub chunk_name: String,
    pub file_name: String,
    pub size: i64,
    pub checksum: String,
    pub idx: i64,
    pub storage: String,
}

impl ChunkMetadata {
    pub fn new(
        chunk_name: impl Into<String>,
        file_name: impl Into<String>,
        size: i64,
        checksum: impl Into<String>,
        idx: i64,
        storage: impl Into<String>,
    ) -> Self {
        ChunkMetadata {
            chunk_name: chunk_name.into(),
            file_name: file_name.into(),
            size,
            checksum: checksum.into(),
            idx,
            storage: storage.into(),
        }
    }
}

/// A row in the `files` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_name: String,
    pub total_size: i64,
}

impl FileMetadata {
    pub fn new(file_name: impl Into<String>, total_size: i64) -> Self {
        FileMetadata {
            file_name: file_name.into(),
            total_size,
        }
    }
}
