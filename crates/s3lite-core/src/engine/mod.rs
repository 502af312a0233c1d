//! The object engine.
//!
//! [`Engine`] is the single handle callers hold. It owns the typed store,
//! the version-id generator, and the per-key lock table; the operation
//! families are implemented in the submodules:
//!
//! - [`bucket`]: bucket registry, versioning, object-lock and opaque
//!   configuration sub-records
//! - [`object`]: put/get/head/delete/copy over the versioning state machine
//! - [`list`]: current-object and version listings
//! - [`batch`]: best-effort multi-object delete
//! - [`object_config`]: retention, legal hold, and object tagging
//! - [`multipart`]: multipart upload coordination

pub mod batch;
pub mod bucket;
pub(crate) mod cond;
pub mod list;
pub mod multipart;
pub mod object;
pub mod object_config;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use s3lite_model::error::{StorageError, StorageResult};
use s3lite_model::request::StreamingBlob;
use s3lite_model::types::Owner;

use crate::config::EngineConfig;
use crate::idgen::{EtagHasher, VersionIdGen};
use crate::locker::KeyLocker;
use crate::store::records::{BucketRecord, ObjectRecord};
use crate::store::substrate::{MemorySubstrate, Substrate};
use crate::store::{Store, keys};

/// Where a resolved version record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VersionLocation {
    /// The record is the current head (`object::…`).
    Head,
    /// The record is archived (`version::…`).
    Archived,
}

/// The object engine handle.
///
/// Cheap to share behind an `Arc`; all operations take `&self` and are safe
/// for concurrent invocation across any set of `(bucket, key)` pairs.
///
/// # Examples
///
/// ```
/// use s3lite_core::{Engine, EngineConfig};
/// use s3lite_model::input::{CreateBucketInput, GetObjectInput, PutObjectInput};
/// use s3lite_model::request::StreamingBlob;
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let engine = Engine::new(EngineConfig::default());
/// let cancel = CancellationToken::new();
///
/// engine
///     .create_bucket(
///         CreateBucketInput {
///             bucket: "demo".to_owned(),
///             object_lock_enabled: false,
///         },
///         &cancel,
///     )
///     .await
///     .unwrap();
///
/// engine
///     .put_object(
///         PutObjectInput {
///             bucket: "demo".to_owned(),
///             key: "greeting.txt".to_owned(),
///             body: StreamingBlob::from("hello"),
///             ..PutObjectInput::default()
///         },
///         &cancel,
///     )
///     .await
///     .unwrap();
///
/// let object = engine
///     .get_object(
///         GetObjectInput {
///             bucket: "demo".to_owned(),
///             key: "greeting.txt".to_owned(),
///             ..GetObjectInput::default()
///         },
///         &cancel,
///     )
///     .await
///     .unwrap();
/// assert_eq!(&object.body.into_bytes()[..], b"hello");
/// # });
/// ```
#[derive(Debug)]
pub struct Engine {
    /// Typed record store over the substrate.
    pub(crate) store: Store,
    /// Monotonic version-id generator.
    pub(crate) ids: VersionIdGen,
    /// Per-(bucket, key) write serialization.
    pub(crate) locker: KeyLocker,
    /// Engine configuration.
    pub(crate) config: EngineConfig,
    /// The owner recorded on buckets and objects.
    pub(crate) owner: Owner,
}

impl Engine {
    /// Create an engine over a fresh in-memory substrate.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_substrate(config, Arc::new(MemorySubstrate::new()))
    }

    /// Create an engine over the given substrate.
    #[must_use]
    pub fn with_substrate(config: EngineConfig, substrate: Arc<dyn Substrate>) -> Self {
        let owner = config.owner();
        Self {
            store: Store::new(substrate),
            ids: VersionIdGen::new(),
            locker: KeyLocker::new(),
            config,
            owner,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Remove all buckets, objects, versions, and uploads.
    ///
    /// Primarily useful for test harnesses.
    pub async fn reset(&self) -> StorageResult<()> {
        self.store.clear().await
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    /// Fail with [`StorageError::OperationAborted`] if the caller cancelled.
    ///
    /// Checked at every suspension point; an operation aborted before its
    /// write batch committed leaves no observable effect.
    pub(crate) fn ensure_live(cancel: &CancellationToken) -> StorageResult<()> {
        if cancel.is_cancelled() {
            return Err(StorageError::OperationAborted);
        }
        Ok(())
    }

    /// Load the bucket record, enforcing existence and the expected-owner
    /// precondition.
    pub(crate) async fn require_bucket(
        &self,
        bucket: &str,
        expected_owner: Option<&str>,
    ) -> StorageResult<BucketRecord> {
        let record: BucketRecord = self
            .store
            .read(&keys::bucket(bucket))
            .await?
            .ok_or_else(|| StorageError::NoSuchBucket {
                bucket: bucket.to_owned(),
            })?;

        if let Some(expected) = expected_owner {
            if expected != record.owner.id {
                return Err(StorageError::AccessDenied);
            }
        }

        Ok(record)
    }

    /// Read the current head record for `(bucket, key)`, if any.
    pub(crate) async fn head_record(
        &self,
        bucket: &str,
        key: &str,
    ) -> StorageResult<Option<ObjectRecord>> {
        self.store.read(&keys::object(bucket, key)).await
    }

    /// Read the archived versions of `(bucket, key)` as `(record id, record)`
    /// pairs, in ascending version-id order.
    ///
    /// The version-id prefix can over-match keys that extend `key` with the
    /// separator, so results are filtered on the record's own key field.
    pub(crate) async fn archived_versions(
        &self,
        bucket: &str,
        key: &str,
    ) -> StorageResult<Vec<(String, ObjectRecord)>> {
        let scanned: Vec<(String, ObjectRecord)> = self
            .store
            .scan(&keys::version_prefix(bucket, key), None, None)
            .await?;
        Ok(scanned
            .into_iter()
            .filter(|(_, record)| record.key == key)
            .collect())
    }

    /// Resolve a version id to its record, wherever it lives.
    ///
    /// `"null"` addresses the stored null version, which may be the head or
    /// an archived record.
    pub(crate) async fn find_version(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> StorageResult<Option<(VersionLocation, ObjectRecord)>> {
        if let Some(head) = self.head_record(bucket, key).await? {
            if head.version_id == version_id {
                return Ok(Some((VersionLocation::Head, head)));
            }
        }

        let archived: Option<ObjectRecord> = self
            .store
            .read(&keys::version(bucket, key, version_id))
            .await?;
        match archived {
            Some(record) if record.key == key => Ok(Some((VersionLocation::Archived, record))),
            _ => Ok(None),
        }
    }

    /// Pick the most recent archived version of `(bucket, key)` for head
    /// promotion, by last-modified instant with version id as tiebreak.
    pub(crate) async fn latest_archived(
        &self,
        bucket: &str,
        key: &str,
    ) -> StorageResult<Option<(String, ObjectRecord)>> {
        let versions = self.archived_versions(bucket, key).await?;
        Ok(versions.into_iter().max_by(|(_, a), (_, b)| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.version_id.cmp(&b.version_id))
        }))
    }

    /// Hash a request body in chunks, yielding between chunks so
    /// cancellation can take effect during long transfers.
    ///
    /// Returns `(etag, size)`.
    pub(crate) async fn hash_body(
        &self,
        body: &StreamingBlob,
        cancel: &CancellationToken,
    ) -> StorageResult<(String, u64)> {
        let mut hasher = EtagHasher::new();
        for chunk in body.chunks(self.config.body_chunk_size) {
            Self::ensure_live(cancel)?;
            hasher.update(&chunk);
            tokio::task::yield_now().await;
        }
        Ok(hasher.finish())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_should_create_engine_with_defaults() {
        let engine = Engine::new(EngineConfig::default());
        assert_eq!(engine.config().default_region, "us-east-1");
        assert_eq!(engine.owner.display_name, "s3lite");
    }

    #[tokio::test]
    async fn test_should_fail_require_bucket_when_missing() {
        let engine = Engine::new(EngineConfig::default());
        let result = engine.require_bucket("ghost", None).await;
        assert!(matches!(result, Err(StorageError::NoSuchBucket { .. })));
    }

    #[tokio::test]
    async fn test_should_abort_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            Engine::ensure_live(&cancel),
            Err(StorageError::OperationAborted)
        ));
        assert!(Engine::ensure_live(&CancellationToken::new()).is_ok());
    }

    #[tokio::test]
    async fn test_should_hash_body_in_chunks() {
        let engine = Engine::new(EngineConfig::builder().body_chunk_size(4).build());
        let cancel = CancellationToken::new();
        let body = StreamingBlob::from(&b"hello chunked world"[..]);

        let (etag, size) = engine.hash_body(&body, &cancel).await.expect("test hash");
        assert_eq!(etag, crate::idgen::content_etag(b"hello chunked world"));
        assert_eq!(size, 19);
    }

    #[tokio::test]
    async fn test_should_abort_hash_on_cancellation() {
        let engine = Engine::new(EngineConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let body = StreamingBlob::from(&b"data"[..]);

        let result = engine.hash_body(&body, &cancel).await;
        assert!(matches!(result, Err(StorageError::OperationAborted)));
    }
}
