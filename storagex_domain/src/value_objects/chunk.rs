// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Value Object
//!
//! Represents an immutable, self-describing fragment of a file produced by
//! the chunker and consumed by the storage orchestrator. Like other value
//! objects in this codebase, a `Chunk` is never mutated in place — builder
//! methods return new instances.
//!
//! ## Wire format
//!
//! A chunk's on-wire representation is a fixed 48-byte header followed by
//! its payload:
//!
//! ```text
//! [ 32 bytes checksum ][ 8 bytes size_n (BE) ][ 8 bytes index (BE) ][ data ]
//! ```

use crate::StorageXError;
use sha2::{Digest, Sha256};

/// Total header size in bytes: 32-byte checksum + 8-byte size_n + 8-byte
/// index.
pub const CHUNK_HEADER_SIZE: usize = 48;

/// An in-flight chunk produced by the chunker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    index: u64,
    checksum: [u8; 32],
    data: Vec<u8>,
    name: String,
}

impl Chunk {
    /// Builds a chunk from a file basename, index, and payload, computing
    /// the SHA-256 checksum over the payload.
    pub fn new(basename: &str, index: u64, data: Vec<u8>) -> Self {
        let checksum = Self::checksum_of(&data);
        Chunk {
            index,
            checksum,
            data,
            name: Self::derive_name(basename, index),
        }
    }

    /// Reconstructs a chunk from already-known parts, e.g. when decoding
    /// from the wire or rebuilding a chunk name for a metadata lookup.
    pub fn from_parts(basename: &str, index: u64, checksum: [u8; 32], data: Vec<u8>) -> Self {
        Chunk {
            index,
            checksum,
            data,
            name: Self::derive_name(basename, index),
        }
    }

    fn derive_name(basename: &str, index: u64) -> String {
        format!("{basename}-chunk-{index}")
    }

    fn checksum_of(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn size_n(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn checksum(&self) -> &[u8; 32] {
        &self.checksum
    }

    pub fn checksum_hex(&self) -> String {
        hex::encode(self.checksum)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recomputes the checksum over the current payload and compares it
    /// against the stored one (invariant I5).
    pub fn verify_integrity(&self) -> bool {
        Self::checksum_of(&self.data) == self.checksum
    }

    /// Serialises this chunk to its 48-byte-header wire representation.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CHUNK_HEADER_SIZE + self.data.len());
        out.extend_from_slice(&self.checksum);
        out.extend_from_slice(&self.size_n().to_be_bytes());
        out.extend_from_slice(&self.index.to_be_bytes());
        out.extend_from_slice(&self.data);
        out
    }

    /// Parses a chunk's wire representation back into checksum, size_n,
    /// index, and payload. `basename` re-derives the chunk name the same
    /// way `new` does, since the name itself is not carried on the wire.
    pub fn decode(basename: &str, bytes: &[u8]) -> Result<Self, StorageXError> {
        if bytes.len() < CHUNK_HEADER_SIZE {
            return Err(StorageXError::ChunkReadFailed(format!(
                "chunk shorter than header size: {} bytes",
                bytes.len()
            )));
        }

        let mut checksum = [0u8; 32];
        checksum.copy_from_slice(&bytes[0..32]);

        let size_n = u64::from_be_bytes(bytes[32..40].try_into().unwrap());
        let index = u64::from_be_bytes(bytes[40..48].try_into().unwrap());
        let data = bytes[CHUNK_HEADER_SIZE..].to_vec();

        if data.len() as u64 != size_n {
            return Err(StorageXError::ChunkReadFailed(format!(
                "chunk size_n {} does not match payload length {}",
                size_n,
                data.len()
            )));
        }

        Ok(Chunk::from_parts(basename, index, checksum, data))
    }
}
