// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metadata Schema Bootstrap
//!
//! Creates the `files` and `chunks` tables idempotently. Forward-compatible
//! by construction: `CREATE TABLE IF NOT EXISTS` never errors against an
//! already-initialized database.

use sqlx::SqlitePool;
use storagex_domain::StorageXError;

const FILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS files (
    file_name  TEXT PRIMARY KEY,
    total_size INTEGER NOT NULL
)
"#;

const CHUNKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    chunk_name TEXT PRIMARY KEY,
    file_name  TEXT NOT NULL,
    size       INTEGER NOT NULL,
    checksum   TEXT NOT NULL,
    idx        INTEGER NOT NULL,
    storage    TEXT NOT NULL
)
"#;

const CHUNKS_FILE_NAME_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_chunks_file_name ON chunks(file_name)
"#;

/// Creates both tables (and the `file_name` lookup index on `chunks`) if
/// they do not already exist.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StorageXError> {
    sqlx::query(FILES_TABLE)
        .execute(pool)
        .await
        .map_err(|e| StorageXError::SchemaInitFailed(e.to_string()))?;

    sqlx::query(CHUNKS_TABLE)
        .execute(pool)
        .await
        .map_err(|e| StorageXError::SchemaInitFailed(e.to_string()))?;

    sqlx::query(CHUNKS_FILE_NAME_INDEX)
        .execute(pool)
        .await
        .map_err(|e| StorageXError::SchemaInitFailed(e.to_string()))?;

    Ok(())
}

/// Opens (creating if necessary) the SQLite database at `path` and
/// initializes its schema.
pub async fn initialize_database(path: &std::path::Path) -> Result<SqlitePool, StorageXError> {
    use sqlx::sqlite::SqliteConnectOptions;
    use std::str::FromStr;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StorageXError::DbOpenFailed {
                path: path.display().to_string(),
                source: sqlx::Error::Io(e),
            })?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))
        .map_err(|e| StorageXError::DbOpenFailed {
            path: path.display().to_string(),
            source: e,
        })?
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| StorageXError::DbOpenFailed {
            path: path.display().to_string(),
            source: e,
        })?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM files")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.0, 0);
    }

    #[tokio::test]
    async fn opening_same_file_twice_does_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("metadata.db");

        let pool1 = initialize_database(&db_path).await.unwrap();
        pool1.close().await;

        let pool2 = initialize_database(&db_path).await.unwrap();
        pool2.close().await;
    }
}
