// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standard Unix exit codes following BSD `sysexits.h` conventions, trimmed
//! to the subset this CLI's error taxonomy actually reaches.

use std::fmt;
use storagex_domain::StorageXError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    #[default]
    Success = 0,

    /// General error (1) — catalog, backend, and composite failures.
    Error = 1,

    /// Command line usage error (64) — invalid or missing arguments.
    UsageError = 64,

    /// Data format error (65) — invalid or unparseable config file.
    DataError = 65,

    /// Cannot open input (66) — source file or catalog entry missing.
    NoInput = 66,

    /// Configuration error (78) — no backend configured, config not loaded.
    Config = 78,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

/// Maps a `StorageXError` to the exit code the CLI reports to the shell.
pub fn map_error_to_exit_code(error: &StorageXError) -> ExitCode {
    match error {
        StorageXError::ConfigLoadFailed(_) => ExitCode::DataError,
        StorageXError::ConfigNotLoaded | StorageXError::NoCloudStorageConfigured => ExitCode::Config,
        StorageXError::FileInfoFetchFailed { .. } | StorageXError::FileNotFound(_) => ExitCode::NoInput,
        StorageXError::FileAlreadyExists(_) | StorageXError::ChunkAlreadyExists(_) => ExitCode::UsageError,
        _ => ExitCode::Error,
    }
}
