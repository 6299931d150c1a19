// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

pub mod chunk;
pub mod chunk_metadata;

pub use chunk::{Chunk, CHUNK_HEADER_SIZE};
pub use chunk_metadata::{ChunkMetadata, FileMetadata};
