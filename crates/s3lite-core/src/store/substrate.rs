//! The persistence substrate abstraction.
//!
//! The engine requires only three capabilities from its substrate: durable
//! point reads by record id, atomic multi-record write batches, and ordered
//! range scans by record-id prefix. [`Substrate`] captures that contract;
//! [`MemorySubstrate`] is the in-tree implementation over a sorted map.
//! Embedded document stores or SQL databases can be plugged in behind the
//! same trait.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use tracing::trace;

use s3lite_model::error::StorageResult;

// ---------------------------------------------------------------------------
// WriteBatch
// ---------------------------------------------------------------------------

/// An atomic set of record writes and deletions.
///
/// A batch is applied all-or-nothing: a reader never observes some of its
/// operations without the others.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

/// A single operation within a [`WriteBatch`].
#[derive(Debug)]
enum BatchOp {
    /// Insert or replace the record at `id`.
    Put {
        /// The record id.
        id: String,
        /// The encoded record value.
        value: Bytes,
    },
    /// Remove the record at `id`, if present.
    Delete {
        /// The record id.
        id: String,
    },
}

impl WriteBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put of `value` at `id`.
    pub fn put(&mut self, id: impl Into<String>, value: Bytes) {
        self.ops.push(BatchOp::Put {
            id: id.into(),
            value,
        });
    }

    /// Queue a deletion of `id`.
    pub fn delete(&mut self, id: impl Into<String>) {
        self.ops.push(BatchOp::Delete { id: id.into() });
    }

    /// Whether the batch contains no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

// ---------------------------------------------------------------------------
// Substrate
// ---------------------------------------------------------------------------

/// Storage substrate contract: point get, atomic commit, ordered prefix scan.
///
/// Implementations must be safe for concurrent use; every method is a
/// suspension point from the engine's perspective.
#[async_trait]
pub trait Substrate: Send + Sync + std::fmt::Debug {
    /// Read the record at `id`, if present.
    async fn get(&self, id: &str) -> StorageResult<Option<Bytes>>;

    /// Apply a batch atomically.
    async fn commit(&self, batch: WriteBatch) -> StorageResult<()>;

    /// Scan records whose id starts with `prefix`, in ascending id order.
    ///
    /// When `after` is set, only ids strictly greater than it are returned.
    /// When `limit` is set, at most that many records are returned.
    async fn scan(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> StorageResult<Vec<(String, Bytes)>>;

    /// Remove every record. Used by test harnesses to reset the store.
    async fn clear(&self) -> StorageResult<()>;
}

// ---------------------------------------------------------------------------
// MemorySubstrate
// ---------------------------------------------------------------------------

/// In-memory substrate over a sorted map.
///
/// Keys are kept sorted so prefix scans come back in lexicographic order,
/// which the listing algorithms rely on. The whole map sits behind one
/// `RwLock`; batches take the write lock once, which makes them atomic with
/// respect to every reader and other batches.
#[derive(Debug, Default)]
pub struct MemorySubstrate {
    records: RwLock<BTreeMap<String, Bytes>>,
}

impl MemorySubstrate {
    /// Create an empty substrate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the substrate holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl Substrate for MemorySubstrate {
    async fn get(&self, id: &str) -> StorageResult<Option<Bytes>> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn commit(&self, batch: WriteBatch) -> StorageResult<()> {
        let mut records = self.records.write();
        trace!(ops = batch.len(), "committing write batch");
        for op in batch.ops {
            match op {
                BatchOp::Put { id, value } => {
                    records.insert(id, value);
                }
                BatchOp::Delete { id } => {
                    records.remove(&id);
                }
            }
        }
        Ok(())
    }

    async fn scan(
        &self,
        prefix: &str,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> StorageResult<Vec<(String, Bytes)>> {
        let records = self.records.read();

        // Start at the prefix, or strictly after the `after` id when it is
        // inside the prefix range.
        let start: Bound<String> = match after {
            Some(a) if a >= prefix => Bound::Excluded(a.to_owned()),
            _ => Bound::Included(prefix.to_owned()),
        };

        let mut out = Vec::new();
        for (id, value) in records.range((start, Bound::Unbounded)) {
            if !id.starts_with(prefix) {
                break;
            }
            out.push((id.clone(), value.clone()));
            if limit.is_some_and(|l| out.len() >= l) {
                break;
            }
        }
        Ok(out)
    }

    async fn clear(&self) -> StorageResult<()> {
        self.records.write().clear();
        Ok(())
    }
}
