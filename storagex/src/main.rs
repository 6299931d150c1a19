// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # StorageX CLI
//!
//! Composition root: parses and validates the CLI, loads config, wires the
//! metadata catalog / backend manager / orchestrator, and dispatches to a
//! use case. Errors are reported to stderr and translated to a process
//! exit code; success exits 0.

use std::process::ExitCode as ProcessExitCode;
use std::sync::Arc;

use storagex::application::use_cases::{ConfigfileUseCase, DownloadFileUseCase, UploadFileUseCase};
use storagex::infrastructure::backend::{BackendManager, DropboxAdapter};
use storagex::infrastructure::config::AppConfig;
use storagex::infrastructure::logging::init_tracing;
use storagex::infrastructure::repositories::{schema::initialize_database, SqliteCatalog};
use storagex::infrastructure::runtime::StorageOrchestrator;
use storagex_bootstrap::{map_error_to_exit_code, parse_and_validate, report_error, ExitCode, ValidatedCommand};
use storagex_domain::{MetadataCatalog, StorageXError};

#[tokio::main]
async fn main() -> ProcessExitCode {
    let cli = match parse_and_validate() {
        Ok(cli) => cli,
        Err(e) => {
            report_error("storagex", &e);
            return to_process_exit_code(ExitCode::UsageError);
        }
    };

    match run(cli).await {
        Ok(()) => to_process_exit_code(ExitCode::Success),
        Err(e) => {
            report_error("storagex", &e);
            to_process_exit_code(map_error_to_exit_code(&e))
        }
    }
}

async fn run(cli: storagex_bootstrap::ValidatedCli) -> Result<(), StorageXError> {
    match cli.command {
        ValidatedCommand::Version => {
            println!("storagex {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        ValidatedCommand::Configfile => run_configfile(&cli.config),
        ValidatedCommand::Upload { path } => {
            let orchestrator = build_orchestrator(&cli.config).await?;
            UploadFileUseCase::new(orchestrator).execute(&path).await
        }
        ValidatedCommand::Download { name, out_path } => {
            let orchestrator = build_orchestrator(&cli.config).await?;
            DownloadFileUseCase::new(orchestrator).execute(&name, &out_path).await
        }
    }
}

fn run_configfile(config_path: &std::path::Path) -> Result<(), StorageXError> {
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| StorageXError::config_load_failed(format!("{}: {e}", config_path.display())))?;
    let (config, defaults_applied) = AppConfig::from_json_with_report(&raw)?;

    for line in ConfigfileUseCase::new().execute(config_path, &config, &defaults_applied) {
        println!("{line}");
    }
    Ok(())
}

async fn build_orchestrator(config_path: &std::path::Path) -> Result<Arc<StorageOrchestrator>, StorageXError> {
    let config = AppConfig::load(config_path)?;
    init_tracing(config.log.debug);

    let pool = initialize_database(&config.db_path()).await?;
    let catalog: Arc<dyn MetadataCatalog> = Arc::new(SqliteCatalog::new(pool));

    let mut manager = BackendManager::new();
    for token in &config.cloud.dropbox_access_tokens {
        if !token.is_empty() {
            manager.add(Arc::new(DropboxAdapter::new(token.clone())));
        }
    }

    if manager.is_empty() {
        return Err(StorageXError::NoCloudStorageConfigured);
    }

    Ok(Arc::new(StorageOrchestrator::new(
        catalog,
        Arc::new(manager),
        config.chunk_size as usize,
        config.parallel.upload_workers,
        config.parallel.download_workers,
    )))
}

fn to_process_exit_code(code: ExitCode) -> ProcessExitCode {
    ProcessExitCode::from(code.as_i32() as u8)
}
