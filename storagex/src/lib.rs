// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # StorageX
//!
//! A file-chunking storage gateway: splits local files into fixed-size,
//! integrity-protected chunks, disperses them across pluggable remote
//! object-store backends, and maintains a local SQLite metadata catalog
//! for reconstruction, verification, and deletion.

pub mod application;
pub mod infrastructure;
