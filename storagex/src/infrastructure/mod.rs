// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Concrete adapters for the ports declared in `storagex_domain`: config
//! loading, logging setup, the SQLite-backed metadata catalog, the
//! streaming chunker, backend adapters, and the storage orchestrator that
//! wires them together.

pub mod backend;
pub mod chunker;
pub mod config;
pub mod logging;
pub mod repositories;
pub mod runtime;
