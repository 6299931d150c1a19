// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Error Reporting
//!
//! CLI argument parsing can fail before `tracing_subscriber` is
//! initialized (subscriber setup itself depends on a successfully parsed
//! `--config` value), so parse/validation failures are reported directly
//! to stderr rather than through `tracing`.

use std::fmt::Display;

/// Prints an error chain to stderr, matching the CLI's "print the error
/// chain to stderr" requirement.
pub fn report_error(prefix: &str, error: impl Display) {
    eprintln!("{prefix}: {error}");
}
