// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite Metadata Catalog
//!
//! `MetadataCatalog` implementation backed by a `SqlitePool`. Statement-level
//! safety comes from the pool; a `tokio::sync::RwLock` on top serialises the
//! *compound* operations (`add_chunk`, `delete_file`) that issue more than
//! one statement, per the catalog's documented locking discipline — writes
//! take the exclusive lock, reads take the shared lock.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;

use storagex_domain::{ChunkMetadata, FileMetadata, MetadataCatalog, StorageXError};

pub struct SqliteCatalog {
    pool: SqlitePool,
    lock: RwLock<()>,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            lock: RwLock::new(()),
        }
    }
}

#[async_trait]
impl MetadataCatalog for SqliteCatalog {
    async fn add_file(&self, file_name: &str, size: i64) -> Result<(), StorageXError> {
        let _guard = self.lock.write().await;
        insert_file_if_absent(&self.pool, file_name, size).await
    }

    async fn add_chunk(&self, chunk_meta: ChunkMetadata) -> Result<(), StorageXError> {
        let _guard = self.lock.write().await;

        let exists: Option<(String,)> = sqlx::query_as("SELECT chunk_name FROM chunks WHERE chunk_name = ?")
            .bind(chunk_meta.chunk_name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageXError::db_query_failed(e.to_string()))?;

        if exists.is_some() {
            return Err(StorageXError::ChunkAlreadyExists(chunk_meta.chunk_name.as_str().to_string()));
        }

        sqlx::query("INSERT INTO chunks (chunk_name, file_name, size, checksum, idx, storage) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(chunk_meta.chunk_name.as_str())
            .bind(chunk_meta.file_name.as_str())
            .bind(chunk_meta.size)
            .bind(chunk_meta.checksum.as_str())
            .bind(chunk_meta.idx)
            .bind(chunk_meta.storage.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageXError::ChunkInsertFailed {
                chunk_name: chunk_meta.chunk_name.as_str().to_string(),
                reason: e.to_string(),
            })?;

        insert_file_if_absent(&self.pool, chunk_meta.file_name.as_str(), 0).await?;

        sqlx::query("UPDATE files SET total_size = total_size + ? WHERE file_name = ?")
            .bind(chunk_meta.size)
            .bind(chunk_meta.file_name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageXError::FileUpdateFailed {
                file_name: chunk_meta.file_name.as_str().to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    async fn get_chunk(&self, name: &str) -> Result<Option<ChunkMetadata>, StorageXError> {
        let _guard = self.lock.read().await;

        let row = sqlx::query("SELECT chunk_name, file_name, size, checksum, idx, storage FROM chunks WHERE chunk_name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageXError::db_query_failed(e.to_string()))?;

        Ok(row.map(chunk_meta_from_row))
    }

    async fn get_file(&self, name: &str) -> Result<Option<FileMetadata>, StorageXError> {
        let _guard = self.lock.read().await;

        let row = sqlx::query("SELECT file_name, total_size FROM files WHERE file_name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageXError::db_query_failed(e.to_string()))?;

        Ok(row.map(|r| FileMetadata::new(r.get::<String, _>("file_name"), r.get::<i64, _>("total_size"))))
    }

    async fn list_chunks(&self, file_name: &str) -> Result<Vec<ChunkMetadata>, StorageXError> {
        let _guard = self.lock.read().await;

        let rows = sqlx::query(
            "SELECT chunk_name, file_name, size, checksum, idx, storage FROM chunks WHERE file_name = ? ORDER BY idx ASC",
        )
        .bind(file_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageXError::db_scan_failed(e.to_string()))?;

        Ok(rows.into_iter().map(chunk_meta_from_row).collect())
    }

    async fn list_files(&self) -> Result<Vec<FileMetadata>, StorageXError> {
        let _guard = self.lock.read().await;

        let rows = sqlx::query("SELECT file_name, total_size FROM files")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageXError::db_scan_failed(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| FileMetadata::new(r.get::<String, _>("file_name"), r.get::<i64, _>("total_size")))
            .collect())
    }

    async fn chunk_exists(&self, name: &str) -> Result<bool, StorageXError> {
        Ok(self.get_chunk(name).await?.is_some())
    }

    async fn file_exists(&self, name: &str) -> Result<bool, StorageXError> {
        Ok(self.get_file(name).await?.is_some())
    }

    async fn delete_chunk(&self, name: &str) -> Result<(), StorageXError> {
        let _guard = self.lock.write().await;

        sqlx::query("DELETE FROM chunks WHERE chunk_name = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageXError::ChunkDeleteFailed {
                chunk_name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    async fn delete_file(&self, file_name: &str) -> Result<(), StorageXError> {
        let _guard = self.lock.write().await;

        sqlx::query("DELETE FROM chunks WHERE file_name = ?")
            .bind(file_name)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageXError::FileDeleteFailed {
                file_name: file_name.to_string(),
                reason: e.to_string(),
            })?;

        sqlx::query("DELETE FROM files WHERE file_name = ?")
            .bind(file_name)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageXError::FileDeleteFailed {
                file_name: file_name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

async fn insert_file_if_absent(pool: &SqlitePool, file_name: &str, size: i64) -> Result<(), StorageXError> {
    sqlx::query("INSERT OR IGNORE INTO files (file_name, total_size) VALUES (?, ?)")
        .bind(file_name)
        .bind(size)
        .execute(pool)
        .await
        .map_err(|e| StorageXError::FileInsertFailed {
            file_name: file_name.to_string(),
            reason: e.to_string(),
        })?;

    Ok(())
}

fn chunk_meta_from_row(row: sqlx::sqlite::SqliteRow) -> ChunkMetadata {
    ChunkMetadata::new(
        row.get::<String, _>("chunk_name"),
        row.get::<String, _>("file_name"),
        row.get::<i64, _>("size"),
        row.get::<String, _>("checksum"),
        row.get::<i64, _>("idx"),
        row.get::<String, _>("storage"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::schema::ensure_schema;

    async fn catalog() -> SqliteCatalog {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        SqliteCatalog::new(pool)
    }

    #[tokio::test]
    async fn add_file_is_idempotent_for_the_name() {
        let cat = catalog().await;
        cat.add_file("a.txt", 100).await.unwrap();
        cat.add_file("a.txt", 999).await.unwrap();

        let file = cat.get_file("a.txt").await.unwrap().unwrap();
        assert_eq!(file.total_size, 100);
    }

    #[tokio::test]
    async fn add_chunk_rejects_duplicate_name() {
        let cat = catalog().await;
        let meta = ChunkMetadata::new("a.txt-chunk-0", "a.txt", 5, "deadbeef", 0, "mock:1");
        cat.add_chunk(meta.clone()).await.unwrap();

        let err = cat.add_chunk(meta).await.unwrap_err();
        assert!(matches!(err, StorageXError::ChunkAlreadyExists(_)));
    }

    #[tokio::test]
    async fn add_chunk_accumulates_file_total_size() {
        let cat = catalog().await;
        cat.add_chunk(ChunkMetadata::new("a.txt-chunk-0", "a.txt", 5, "c0", 0, "mock:1"))
            .await
            .unwrap();
        cat.add_chunk(ChunkMetadata::new("a.txt-chunk-1", "a.txt", 3, "c1", 1, "mock:1"))
            .await
            .unwrap();

        let file = cat.get_file("a.txt").await.unwrap().unwrap();
        assert_eq!(file.total_size, 8);
    }

    #[tokio::test]
    async fn list_chunks_orders_by_index() {
        let cat = catalog().await;
        cat.add_chunk(ChunkMetadata::new("a.txt-chunk-1", "a.txt", 3, "c1", 1, "mock:1"))
            .await
            .unwrap();
        cat.add_chunk(ChunkMetadata::new("a.txt-chunk-0", "a.txt", 5, "c0", 0, "mock:1"))
            .await
            .unwrap();

        let chunks = cat.list_chunks("a.txt").await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].idx, 0);
        assert_eq!(chunks[1].idx, 1);
    }

    #[tokio::test]
    async fn list_chunks_for_missing_file_is_empty() {
        let cat = catalog().await;
        assert!(cat.list_chunks("nope.txt").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_file_cascades_to_chunks() {
        let cat = catalog().await;
        cat.add_chunk(ChunkMetadata::new("a.txt-chunk-0", "a.txt", 5, "c0", 0, "mock:1"))
            .await
            .unwrap();

        cat.delete_file("a.txt").await.unwrap();

        assert!(!cat.file_exists("a.txt").await.unwrap());
        assert!(cat.list_chunks("a.txt").await.unwrap().is_empty());
    }
}
