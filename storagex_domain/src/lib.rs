// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # StorageX Domain
//!
//! Pure business logic for the file-chunking storage gateway: the `Chunk`
//! value object and its 48-byte wire format, the durable `ChunkMetadata` /
//! `FileMetadata` records, the error taxonomy, and the two infrastructure
//! ports (`BackendAdapter`, `MetadataCatalog`) the orchestrator depends on.
//! No tokio runtime, no concrete I/O — those live in the `storagex`
//! infrastructure crate.

pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Result, StorageXError};
pub use ports::{BackendAdapter, MetadataCatalog};
pub use value_objects::{Chunk, ChunkMetadata, FileMetadata, CHUNK_HEADER_SIZE};
