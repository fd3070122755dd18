//! Copy step: stream source binaries into the staging tree
//!
//! Transfers may run concurrently; the entry list and its sequence numbers
//! are fixed before any transfer starts, so completion order never affects
//! names. Each file is hashed while it is written.

use crate::adapters::storage::BinaryStorage;
use crate::config::ExportConfig;
use crate::core::assembly::DeliveryFileEntry;
use crate::core::export::job::CopiedFile;
use crate::domain::ids::BinaryRef;
use crate::domain::{PhotopackError, Result, StorageError};
use futures::stream::{self, StreamExt};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::watch;

const CHUNK_SIZE: usize = 64 * 1024;

/// Copies every entry below `staging_root`
///
/// `on_copied` runs in the driving task once per finished file, so progress
/// updates never interleave. New transfers stop being started once `cancel`
/// turns true.
///
/// # Errors
///
/// Returns the first failed transfer's error, or
/// [`PhotopackError::Cancelled`]. Transfers still in flight are dropped.
pub async fn copy_entries<F>(
    storage: Arc<dyn BinaryStorage>,
    entries: Vec<DeliveryFileEntry>,
    staging_root: &Path,
    config: &ExportConfig,
    cancel: &watch::Receiver<bool>,
    mut on_copied: F,
) -> Result<Vec<CopiedFile>>
where
    F: FnMut(&CopiedFile),
{
    let total = entries.len();
    let concurrency = config.copy_concurrency.max(1);
    let staging_root = staging_root.to_path_buf();
    let retry_config = config.clone();

    // Transfers own their inputs; a job future must be `Send` for `tokio::spawn`.
    let mut transfers = stream::iter(entries.into_iter().map(move |entry| {
        let storage = Arc::clone(&storage);
        let target = staging_root.join(&entry.relative_path);
        let config = retry_config.clone();
        async move {
            let result = copy_with_retry(storage.as_ref(), &entry, &target, &config).await;
            (entry, result)
        }
    }))
    .buffer_unordered(concurrency);

    let mut copied = Vec::with_capacity(total);
    while let Some((entry, result)) = transfers.next().await {
        let file = result.map_err(|e| {
            PhotopackError::Export(format!(
                "Failed to copy {} from {}: {e}",
                entry.delivery_name, entry.source_ref
            ))
        })?;
        on_copied(&file);
        copied.push(file);

        if *cancel.borrow() {
            return Err(PhotopackError::Cancelled(format!(
                "Cancelled after copying {} of {} files",
                copied.len(),
                total
            )));
        }
    }

    Ok(copied)
}

/// Copies one entry, retrying transient storage errors
async fn copy_with_retry(
    storage: &dyn BinaryStorage,
    entry: &DeliveryFileEntry,
    target: &Path,
    config: &ExportConfig,
) -> std::result::Result<CopiedFile, StorageError> {
    let mut attempt = 0;
    loop {
        match copy_once(storage, &entry.source_ref, target).await {
            Ok((bytes, sha256)) => {
                return Ok(CopiedFile {
                    delivery_name: entry.delivery_name.clone(),
                    relative_path: entry.relative_path.clone(),
                    bytes,
                    sha256,
                })
            }
            Err(e) => {
                remove_partial(target).await;
                if !e.is_transient() || attempt >= config.max_retries {
                    return Err(e);
                }
                attempt += 1;
                crate::log_retry_attempt!(entry.delivery_name, attempt, config.max_retries, e);
                tokio::time::sleep(config.backoff_for(attempt - 1)).await;
            }
        }
    }
}

async fn copy_once(
    storage: &dyn BinaryStorage,
    source: &BinaryRef,
    target: &Path,
) -> std::result::Result<(u64, String), StorageError> {
    let mut reader = storage.open(source).await?;
    let mut file = tokio::fs::File::create(target)
        .await
        .map_err(|e| StorageError::from_io(format!("create {}", target.display()), &e))?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(|e| StorageError::from_io(format!("read {source}"), &e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n])
            .await
            .map_err(|e| StorageError::from_io(format!("write {}", target.display()), &e))?;
        total += n as u64;
    }
    file.flush()
        .await
        .map_err(|e| StorageError::from_io(format!("flush {}", target.display()), &e))?;

    Ok((total, format!("{:x}", hasher.finalize())))
}

async fn remove_partial(target: &Path) {
    if let Err(e) = tokio::fs::remove_file(target).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %target.display(), error = %e, "Failed to remove partial file");
        }
    }
}
