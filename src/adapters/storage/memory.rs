//! In-memory binary storage with failure injection
//!
//! Used by tests and dry runs. Failures can be injected per reference, either
//! permanently or for a fixed number of calls.

use super::{BinaryReader, BinaryStorage};
use crate::domain::ids::BinaryRef;
use crate::domain::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
struct InjectedFailure {
    error: StorageError,
    remaining: Option<usize>,
}

#[derive(Debug, Default)]
struct Inner {
    blobs: HashMap<String, Vec<u8>>,
    failures: HashMap<String, InjectedFailure>,
    opens: HashMap<String, usize>,
}

/// Binary storage backed by byte buffers
#[derive(Debug, Default)]
pub struct MemoryBinaryStorage {
    inner: Mutex<Inner>,
    latency: Option<Duration>,
}

impl MemoryBinaryStorage {
    /// Creates an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every `open` by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Stores a binary
    pub fn insert(&self, reference: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.lock().blobs.insert(reference.into(), bytes.into());
    }

    /// Makes every open of `reference` fail with `error`
    pub fn fail_always(&self, reference: impl Into<String>, error: StorageError) {
        self.lock().failures.insert(
            reference.into(),
            InjectedFailure {
                error,
                remaining: None,
            },
        );
    }

    /// Makes the next `times` opens of `reference` fail with `error`
    pub fn fail_times(&self, reference: impl Into<String>, times: usize, error: StorageError) {
        self.lock().failures.insert(
            reference.into(),
            InjectedFailure {
                error,
                remaining: Some(times),
            },
        );
    }

    /// Number of times `reference` was opened, failed attempts included
    pub fn open_count(&self, reference: &str) -> usize {
        self.lock().opens.get(reference).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BinaryStorage for MemoryBinaryStorage {
    async fn open(&self, reference: &BinaryRef) -> Result<BinaryReader, StorageError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut inner = self.lock();
        *inner.opens.entry(reference.to_string()).or_default() += 1;

        if let Some(failure) = inner.failures.get_mut(reference.as_str()) {
            match failure.remaining {
                None => return Err(failure.error.clone()),
                Some(0) => {}
                Some(ref mut n) => {
                    *n -= 1;
                    return Err(failure.error.clone());
                }
            }
        }

        let bytes = inner
            .blobs
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| StorageError::NotFound(reference.to_string()))?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}
