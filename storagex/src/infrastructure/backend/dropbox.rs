// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Dropbox Backend Adapter
//!
//! A token-authenticated adapter over the Dropbox HTTP content API. Objects
//! are stored at `"/<name>"` with overwrite semantics. This is a reference
//! implementation of the `BackendAdapter` capability, not an exhaustive
//! Dropbox SDK binding — it covers exactly the four operations the
//! orchestrator needs.

use async_trait::async_trait;
use serde_json::json;

use storagex_domain::{BackendAdapter, StorageXError};

const UPLOAD_URL: &str = "https://content.dropboxapi.com/2/files/upload";
const DOWNLOAD_URL: &str = "https://content.dropboxapi.com/2/files/download";
const DELETE_URL: &str = "https://api.dropboxapi.com/2/files/delete_v2";

pub struct DropboxAdapter {
    client: reqwest::Client,
    access_token: String,
    system_id: String,
}

impl DropboxAdapter {
    pub fn new(access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        let system_id = format!("dropbox:{}", short_fingerprint(&access_token));
        Self {
            client: reqwest::Client::new(),
            access_token,
            system_id,
        }
    }

    fn object_path(name: &str) -> String {
        format!("/{name}")
    }
}

/// A short, non-reversible fingerprint of the token for use in the
/// backend's stable identifier, so `system_id()` never leaks the token
/// itself into logs or metadata rows.
fn short_fingerprint(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..4])
}

#[async_trait]
impl BackendAdapter for DropboxAdapter {
    async fn upload(&self, name: &str, data: &[u8]) -> Result<(), StorageXError> {
        let api_arg = json!({
            "path": Self::object_path(name),
            "mode": "overwrite",
        });

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", api_arg.to_string())
            .header("Content-Type", "application/octet-stream")
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| StorageXError::upload(&self.system_id, e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageXError::upload(
                &self.system_id,
                format!("HTTP {}: {}", response.status(), response_body(response).await),
            ));
        }

        Ok(())
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>, StorageXError> {
        let api_arg = json!({ "path": Self::object_path(name) });

        let response = self
            .client
            .post(DOWNLOAD_URL)
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", api_arg.to_string())
            .send()
            .await
            .map_err(|e| StorageXError::download(&self.system_id, e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageXError::download(
                &self.system_id,
                format!("HTTP {}: {}", response.status(), response_body(response).await),
            ));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| StorageXError::download(&self.system_id, e.to_string()))
    }

    async fn delete(&self, name: &str) -> Result<(), StorageXError> {
        let body = json!({ "path": Self::object_path(name) });

        let response = self
            .client
            .post(DELETE_URL)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorageXError::delete(&self.system_id, e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageXError::delete(
                &self.system_id,
                format!("HTTP {}: {}", response.status(), response_body(response).await),
            ));
        }

        Ok(())
    }

    fn system_id(&self) -> &str {
        &self.system_id
    }
}

async fn response_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string())
}
