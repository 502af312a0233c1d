//! Typed document access over the substrate.
//!
//! [`Store`] wraps an [`Arc<dyn Substrate>`] with CBOR encode/decode of the
//! record types in [`records`], plus typed scans. Record-id composition
//! lives in [`keys`].

pub mod keys;
pub mod records;
pub mod substrate;

use std::sync::Arc;

use anyhow::anyhow;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use s3lite_model::error::{StorageError, StorageResult};

use substrate::{Substrate, WriteBatch};

/// Encode a record as CBOR.
pub fn encode_record<T: Serialize>(record: &T) -> StorageResult<Bytes> {
    let mut buf = Vec::new();
    ciborium::into_writer(record, &mut buf)
        .map_err(|e| StorageError::Internal(anyhow!("failed to encode record: {e}")))?;
    Ok(Bytes::from(buf))
}

/// Decode a record from CBOR.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    ciborium::from_reader(bytes)
        .map_err(|e| StorageError::Internal(anyhow!("failed to decode record: {e}")))
}

/// Typed document store over a shared substrate handle.
#[derive(Debug, Clone)]
pub struct Store {
    substrate: Arc<dyn Substrate>,
}

impl Store {
    /// Create a store over the given substrate.
    #[must_use]
    pub fn new(substrate: Arc<dyn Substrate>) -> Self {
        Self { substrate }
    }

    /// Read and decode the record at `id`, if present.
    pub async fn read<T: DeserializeOwned>(&self, id: &str) -> StorageResult<Option<T>> {
        match self.substrate.get(id).await? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Queue an encoded put of `record` at `id` into `batch`.
    pub fn stage<T: Serialize>(
        batch: &mut WriteBatch,
        id: impl Into<String>,
        record: &T,
    ) -> StorageResult<()> {
        batch.put(id, encode_record(record)?);
        Ok(())
    }

    /// Commit a batch atomically.
    pub async fn commit(&self, batch: WriteBatch) -> StorageResult<()> {
        self.substrate.commit(batch).await
    }

    /// Scan and decode records with the given id prefix, in id order.
    pub async fn scan<T: DeserializeOwned>(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> StorageResult<Vec<(String, T)>> {
        let raw = self.substrate.scan(prefix, after, limit).await?;
        let mut out = Vec::with_capacity(raw.len());
        for (id, bytes) in raw {
            out.push((id, decode_record(&bytes)?));
        }
        Ok(out)
    }

    /// Scan raw record ids with the given prefix (values discarded).
    pub async fn scan_ids(
        &self,
        prefix: &str,
        limit: Option<usize>,
    ) -> StorageResult<Vec<String>> {
        let raw = self.substrate.scan(prefix, None, limit).await?;
        Ok(raw.into_iter().map(|(id, _)| id).collect())
    }

    /// Whether any record exists with the given id prefix.
    pub async fn any_with_prefix(&self, prefix: &str) -> StorageResult<bool> {
        Ok(!self.substrate.scan(prefix, None, Some(1)).await?.is_empty())
    }

    /// Remove every record in the substrate.
    pub async fn clear(&self) -> StorageResult<()> {
        self.substrate.clear().await
    }
}
