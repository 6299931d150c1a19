// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging Initialization
//!
//! Initializes the process-wide `tracing` subscriber exactly once, before
//! any command runs. Library code (`storagex_domain`, and this crate's
//! infrastructure modules) emits `tracing` events but never configures a
//! subscriber itself — only this binary's composition root does.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing_subscriber::fmt` subscriber. `debug` selects the
/// `debug` filter level (with file/line info) over the default `info`
/// level compact formatter.
pub fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    if debug {
        subscriber.with_file(true).with_line_number(true).init();
    } else {
        subscriber.init();
    }
}
