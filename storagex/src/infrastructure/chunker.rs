// /////////////////////////////////////////////////////////////////////////////
// Optimized Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Streaming Chunker
//!
//! Splits a readable byte stream into a bounded, ordered sequence of
//! `Chunk` records delivered over an `mpsc` channel. The producer owns the
//! file handle and releases it when the stream ends; the small channel
//! capacity provides backpressure so the producer never outruns the
//! consumer by more than a few chunks.

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

use storagex_domain::{Chunk, StorageXError, CHUNK_HEADER_SIZE};

/// Channel capacity for the chunk stream; small on purpose so the producer
/// applies backpressure rather than buffering the whole file in memory.
const CHANNEL_CAPACITY: usize = 8;

/// Starts a background task reading `file` in `chunk_size`-header-inclusive
/// windows, emitting one `Chunk` per window over the returned receiver.
/// `chunk_size` must exceed `CHUNK_HEADER_SIZE`; the payload capacity per
/// chunk is `chunk_size - CHUNK_HEADER_SIZE`.
pub fn spawn_chunker(
    mut file: File,
    basename: String,
    chunk_size: usize,
) -> mpsc::Receiver<Result<Chunk, StorageXError>> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let payload_capacity = chunk_size.saturating_sub(CHUNK_HEADER_SIZE);

    tokio::spawn(async move {
        if payload_capacity == 0 {
            let _ = tx
                .send(Err(StorageXError::ChunkReadFailed(format!(
                    "chunk_size {chunk_size} too small for a {CHUNK_HEADER_SIZE}-byte header"
                ))))
                .await;
            return;
        }

        let mut index = 0u64;
        let mut buf = vec![0u8; payload_capacity];

        loop {
            let mut filled = 0;
            while filled < payload_capacity {
                match file.read(&mut buf[filled..]).await {
                    Ok(0) => break,
                    Ok(n) => filled += n,
                    Err(e) => {
                        let _ = tx
                            .send(Err(StorageXError::ChunkReadFailed(e.to_string())))
                            .await;
                        return;
                    }
                }
            }

            if filled == 0 {
                break;
            }

            let chunk = Chunk::new(&basename, index, buf[..filled].to_vec());
            index += 1;

            if tx.send(Ok(chunk)).await.is_err() {
                // Receiver dropped; nothing left to do.
                return;
            }

            if filled < payload_capacity {
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn chunks_of(data: &[u8], chunk_size: usize) -> Vec<Chunk> {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(data).unwrap();
        tmp.flush().unwrap();

        let file = File::open(tmp.path()).await.unwrap();
        let mut rx = spawn_chunker(file, "f".to_string(), chunk_size);

        let mut out = Vec::new();
        while let Some(result) = rx.recv().await {
            out.push(result.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn splits_into_expected_chunk_count_and_sizes() {
        let chunks = chunks_of(b"hello, world", CHUNK_HEADER_SIZE + 5).await;
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].size_n(), 5);
        assert_eq!(chunks[1].size_n(), 5);
        assert_eq!(chunks[2].size_n(), 2);
        assert_eq!(chunks[0].index(), 0);
        assert_eq!(chunks[2].index(), 2);
    }

    #[tokio::test]
    async fn empty_file_produces_zero_chunks() {
        let chunks = chunks_of(b"", CHUNK_HEADER_SIZE + 5).await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn exact_multiple_does_not_emit_trailing_empty_chunk() {
        let chunks = chunks_of(b"0123456789", CHUNK_HEADER_SIZE + 5).await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].size_n(), 5);
        assert_eq!(chunks[1].size_n(), 5);
    }

    #[tokio::test]
    async fn rejects_chunk_size_too_small_for_header() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"x").unwrap();
        tmp.flush().unwrap();

        let file = File::open(tmp.path()).await.unwrap();
        let mut rx = spawn_chunker(file, "f".to_string(), CHUNK_HEADER_SIZE - 1);

        let result = rx.recv().await.unwrap();
        assert!(result.is_err());
    }
}
