// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Integration tests for the storage orchestrator's upload/download/delete
//! scenarios, run against an in-memory SQLite catalog and an in-process mock
//! backend adapter (no network).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::Mutex as AsyncMutex;

use storagex::infrastructure::backend::BackendManager;
use storagex::infrastructure::repositories::{schema::ensure_schema, SqliteCatalog};
use storagex::infrastructure::runtime::StorageOrchestrator;
use storagex_domain::{BackendAdapter, MetadataCatalog, StorageXError};

struct MockAdapter {
    id: String,
    store: AsyncMutex<HashMap<String, Vec<u8>>>,
    fail_all_uploads: bool,
}

impl MockAdapter {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            store: AsyncMutex::new(HashMap::new()),
            fail_all_uploads: false,
        }
    }

    fn failing(id: &str) -> Self {
        Self {
            id: id.to_string(),
            store: AsyncMutex::new(HashMap::new()),
            fail_all_uploads: true,
        }
    }

    async fn object_count(&self) -> usize {
        self.store.lock().await.len()
    }
}

#[async_trait]
impl BackendAdapter for MockAdapter {
    async fn upload(&self, name: &str, data: &[u8]) -> Result<(), StorageXError> {
        if self.fail_all_uploads {
            return Err(StorageXError::upload(&self.id, "mock upload failure"));
        }
        self.store.lock().await.insert(name.to_string(), data.to_vec());
        Ok(())
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>, StorageXError> {
        self.store
            .lock()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StorageXError::StorageNotFound(name.to_string()))
    }

    async fn delete(&self, name: &str) -> Result<(), StorageXError> {
        self.store.lock().await.remove(name);
        Ok(())
    }

    fn system_id(&self) -> &str {
        &self.id
    }
}

async fn catalog() -> Arc<dyn MetadataCatalog> {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    ensure_schema(&pool).await.unwrap();
    Arc::new(SqliteCatalog::new(pool))
}

fn write_temp_file(data: &[u8]) -> tempfile::NamedTempFile {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut tmp, data).unwrap();
    tmp
}

/// Scenario 1: round trip of a 12-byte file with payload capacity 5.
#[tokio::test]
async fn scenario_round_trip() {
    let adapter = Arc::new(MockAdapter::new("mock:1"));
    let mut manager = BackendManager::new();
    manager.add(adapter.clone());

    let cat = catalog().await;
    let orchestrator = StorageOrchestrator::new(cat.clone(), Arc::new(manager), 48 + 5, 4, 4);

    let tmp = write_temp_file(b"hello, world");
    orchestrator.upload_file(tmp.path()).await.unwrap();

    let file_name = tmp.path().file_name().unwrap().to_str().unwrap().to_string();
    let file = cat.get_file(&file_name).await.unwrap().unwrap();
    assert_eq!(file.total_size, 12);

    let mut out = Vec::new();
    orchestrator.get_file(&file_name, &mut out).await.unwrap();
    assert_eq!(out, b"hello, world");
    assert_eq!(adapter.object_count().await, 3);
}

/// Scenario 2: a 0-byte file produces a file row with total_size 0 and no
/// chunk rows; download writes zero bytes.
#[tokio::test]
async fn scenario_empty_file() {
    let mut manager = BackendManager::new();
    manager.add(Arc::new(MockAdapter::new("mock:1")));

    let cat = catalog().await;
    let orchestrator = StorageOrchestrator::new(cat.clone(), Arc::new(manager), 48 + 5, 4, 4);

    let tmp = tempfile::NamedTempFile::new().unwrap();
    orchestrator.upload_file(tmp.path()).await.unwrap();

    let file_name = tmp.path().file_name().unwrap().to_str().unwrap().to_string();
    let file = cat.get_file(&file_name).await.unwrap().unwrap();
    assert_eq!(file.total_size, 0);
    assert!(cat.list_chunks(&file_name).await.unwrap().is_empty());

    let mut out = Vec::new();
    orchestrator.get_file(&file_name, &mut out).await.unwrap();
    assert!(out.is_empty());
}

/// Scenario 3: uploading a second temp file that shares a basename with an
/// already-uploaded file fails with FileAlreadyExists; the catalog is
/// unchanged by the second attempt.
#[tokio::test]
async fn scenario_duplicate_upload_same_basename_different_path() {
    let mut manager = BackendManager::new();
    manager.add(Arc::new(MockAdapter::new("mock:1")));

    let cat = catalog().await;
    let orchestrator = StorageOrchestrator::new(cat.clone(), Arc::new(manager), 48 + 5, 4, 4);

    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let path_a = dir_a.path().join("a.txt");
    let path_b = dir_b.path().join("a.txt");
    std::fs::write(&path_a, b"first upload").unwrap();
    std::fs::write(&path_b, b"second upload, different bytes").unwrap();

    orchestrator.upload_file(&path_a).await.unwrap();
    let total_before = cat.get_file("a.txt").await.unwrap().unwrap().total_size;

    let err = orchestrator.upload_file(&path_b).await.unwrap_err();
    assert!(matches!(err, StorageXError::FileAlreadyExists(_)));

    let total_after = cat.get_file("a.txt").await.unwrap().unwrap().total_size;
    assert_eq!(total_before, total_after);
}

/// Scenario 4: a backend that fails every upload causes the whole upload to
/// roll back — no file row, no chunk rows, no remote objects for that file.
#[tokio::test]
async fn scenario_backend_failure_rollback() {
    let adapter = Arc::new(MockAdapter::failing("mock:1"));
    let mut manager = BackendManager::new();
    manager.add(adapter.clone());

    let cat = catalog().await;
    let orchestrator = StorageOrchestrator::new(cat.clone(), Arc::new(manager), 48 + 5, 4, 4);

    let tmp = write_temp_file(b"twenty byte payload!");
    let err = orchestrator.upload_file(tmp.path()).await.unwrap_err();
    assert!(matches!(err, StorageXError::Upload { .. }));

    let file_name = tmp.path().file_name().unwrap().to_str().unwrap().to_string();
    assert!(!cat.file_exists(&file_name).await.unwrap());
    assert!(cat.list_chunks(&file_name).await.unwrap().is_empty());
    assert_eq!(adapter.object_count().await, 0);
}

/// Scenario 5: with upload_workers = 4, a 400-byte file split into 100
/// chunks appears in the catalog with contiguous indices and round-trips
/// byte-for-byte.
#[tokio::test]
async fn scenario_parallel_correctness() {
    let mut manager = BackendManager::new();
    manager.add(Arc::new(MockAdapter::new("mock:1")));

    let cat = catalog().await;
    let orchestrator = StorageOrchestrator::new(cat.clone(), Arc::new(manager), 48 + 4, 4, 4);

    let data = vec![7u8; 400];
    let tmp = write_temp_file(&data);
    orchestrator.upload_file(tmp.path()).await.unwrap();

    let file_name = tmp.path().file_name().unwrap().to_str().unwrap().to_string();
    let chunks = cat.list_chunks(&file_name).await.unwrap();
    assert_eq!(chunks.len(), 100);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.idx, i as i64);
    }

    let mut out = Vec::new();
    orchestrator.get_file(&file_name, &mut out).await.unwrap();
    assert_eq!(out, data);
}

/// Scenario 6: deleting a 3-chunk file removes every backend object
/// (verified on the mock) and both catalog tables.
#[tokio::test]
async fn scenario_delete_removes_backend_objects_and_catalog_rows() {
    let adapter = Arc::new(MockAdapter::new("mock:1"));
    let mut manager = BackendManager::new();
    manager.add(adapter.clone());

    let cat = catalog().await;
    let orchestrator = StorageOrchestrator::new(cat.clone(), Arc::new(manager), 48 + 5, 4, 4);

    let tmp = write_temp_file(b"some bytes");
    orchestrator.upload_file(tmp.path()).await.unwrap();
    assert_eq!(adapter.object_count().await, 2);

    let file_name = tmp.path().file_name().unwrap().to_str().unwrap().to_string();
    orchestrator.delete_file(&file_name).await.unwrap();

    assert_eq!(adapter.object_count().await, 0);
    assert!(!cat.file_exists(&file_name).await.unwrap());
    assert!(cat.list_chunks(&file_name).await.unwrap().is_empty());
}
