//! Object CRUD: put, get, head, delete, and copy.
//!
//! All writes run under the per-key lock and commit the head record plus any
//! archive record in one atomic batch, so readers observe either the
//! pre-write or the post-write state, never a partial mix.
//!
//! The versioning state machine, per bucket mode:
//!
//! - `Unconfigured`: the head is overwritten in place with version id
//!   `"null"`; nothing is archived.
//! - `Enabled`: a fresh id is minted; the previous head migrates to an
//!   archived version under its own id.
//! - `Suspended`: the head is written with id `"null"`; a previous null
//!   head is discarded, a non-null head is archived, and any archived null
//!   version is replaced.

use chrono::{DateTime, Duration, Utc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use s3lite_model::error::{StorageError, StorageResult};
use s3lite_model::input::{
    CopyObjectInput, DeleteObjectInput, GetObjectInput, HeadObjectInput, PutObjectInput,
};
use s3lite_model::output::{
    CopyObjectOutput, DeleteObjectOutput, GetObjectOutput, HeadObjectOutput, PutObjectOutput,
};
use s3lite_model::request::StreamingBlob;
use s3lite_model::types::{MetadataDirective, Retention, VersioningStatus};

use crate::idgen::NULL_VERSION_ID;
use crate::store::records::{BucketRecord, ObjectRecord};
use crate::store::substrate::WriteBatch;
use crate::store::{Store, keys};

use super::object_config::can_destroy;
use super::{Engine, VersionLocation, cond};

impl Engine {
    /// Put (upload) an object.
    pub async fn put_object(
        &self,
        input: PutObjectInput,
        cancel: &CancellationToken,
    ) -> StorageResult<PutObjectOutput> {
        Self::ensure_live(cancel)?;
        validate_object_key(&input.key)?;

        let bucket = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let _slot = self.locker.lock(&input.bucket, &input.key).await;
        Self::ensure_live(cancel)?;

        let (etag, size) = self.hash_body(&input.body, cancel).await?;

        let head = self.head_record(&input.bucket, &input.key).await?;
        cond::check_write(&input.preconditions, head.as_ref())?;

        let now = Utc::now();
        let retention = input
            .retention
            .or_else(|| default_retention(&bucket, now));

        let mut batch = WriteBatch::new();
        let version_id = self
            .plan_head_transition(&bucket, &input.key, head.as_ref(), &mut batch)
            .await?;

        let record = ObjectRecord {
            key: input.key.clone(),
            version_id: version_id.clone(),
            etag: etag.clone(),
            size,
            content_type: input.content_type,
            user_metadata: normalize_metadata(input.metadata),
            last_modified: now,
            is_delete_marker: false,
            retention,
            legal_hold: input.legal_hold,
            tags: input.tagging.unwrap_or_default(),
            owner: self.owner.clone(),
            body: input.body.into_bytes(),
        };
        Store::stage(&mut batch, keys::object(&input.bucket, &input.key), &record)?;

        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        debug!(bucket = %input.bucket, key = %input.key, version_id = %version_id, "put_object completed");

        Ok(PutObjectOutput {
            etag,
            version_id,
            size,
        })
    }

    /// Get (download) an object or a specific version of it.
    pub async fn get_object(
        &self,
        input: GetObjectInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetObjectOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let record = match &input.version_id {
            None => {
                let head = self.head_record(&input.bucket, &input.key).await?.ok_or_else(|| {
                    StorageError::NoSuchKey {
                        key: input.key.clone(),
                    }
                })?;
                if head.is_delete_marker {
                    return Err(StorageError::NoSuchKey {
                        key: input.key.clone(),
                    });
                }
                head
            }
            Some(version_id) => {
                let (_, record) = self
                    .find_version(&input.bucket, &input.key, version_id)
                    .await?
                    .ok_or_else(|| StorageError::NoSuchVersion {
                        key: input.key.clone(),
                        version_id: version_id.clone(),
                    })?;
                // Delete markers cannot be fetched by id; HEAD reports them.
                if record.is_delete_marker {
                    return Err(StorageError::MethodNotAllowed);
                }
                record
            }
        };

        cond::check_read(&input.preconditions, &record)?;

        Ok(GetObjectOutput {
            etag: record.etag.clone(),
            version_id: record.version_id.clone(),
            size: record.size,
            content_type: record.content_type.clone(),
            metadata: record.user_metadata.clone(),
            last_modified: Some(record.last_modified),
            tag_count: (!record.tags.is_empty()).then_some(record.tags.len()),
            retention: record.retention,
            legal_hold: record.legal_hold,
            body: StreamingBlob::from(record.body),
        })
    }

    /// Head an object: metadata without the body.
    ///
    /// Unlike GET, addressing a delete marker by version id succeeds and
    /// reports the marker.
    pub async fn head_object(
        &self,
        input: HeadObjectInput,
        cancel: &CancellationToken,
    ) -> StorageResult<HeadObjectOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let record = match &input.version_id {
            None => {
                let head = self.head_record(&input.bucket, &input.key).await?.ok_or_else(|| {
                    StorageError::NoSuchKey {
                        key: input.key.clone(),
                    }
                })?;
                if head.is_delete_marker {
                    return Err(StorageError::NoSuchKey {
                        key: input.key.clone(),
                    });
                }
                head
            }
            Some(version_id) => {
                self.find_version(&input.bucket, &input.key, version_id)
                    .await?
                    .map(|(_, record)| record)
                    .ok_or_else(|| StorageError::NoSuchVersion {
                        key: input.key.clone(),
                        version_id: version_id.clone(),
                    })?
            }
        };

        if !record.is_delete_marker {
            cond::check_read(&input.preconditions, &record)?;
        }

        Ok(HeadObjectOutput {
            etag: record.etag.clone(),
            version_id: record.version_id.clone(),
            size: record.size,
            content_type: record.content_type.clone(),
            metadata: record.user_metadata.clone(),
            last_modified: Some(record.last_modified),
            delete_marker: record.is_delete_marker,
            retention: record.retention,
            legal_hold: record.legal_hold,
        })
    }

    /// Delete an object or a specific version of it.
    ///
    /// Without a version id the behavior depends on the bucket mode: the
    /// head is removed (Unconfigured) or hidden behind a delete marker
    /// (Enabled / Suspended). With a version id the referenced record is
    /// permanently removed, promoting the most recent archived version when
    /// the head was removed. Both forms are idempotent on missing targets.
    pub async fn delete_object(
        &self,
        input: DeleteObjectInput,
        cancel: &CancellationToken,
    ) -> StorageResult<DeleteObjectOutput> {
        Self::ensure_live(cancel)?;
        let bucket = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let _slot = self.locker.lock(&input.bucket, &input.key).await;
        Self::ensure_live(cancel)?;

        if let Some(version_id) = &input.version_id {
            self.delete_specific_version(&bucket, &input, version_id, cancel)
                .await
        } else {
            self.delete_current(&bucket, &input, cancel).await
        }
    }

    /// Permanently remove one version. Runs inside the key lock.
    async fn delete_specific_version(
        &self,
        bucket: &BucketRecord,
        input: &DeleteObjectInput,
        version_id: &str,
        cancel: &CancellationToken,
    ) -> StorageResult<DeleteObjectOutput> {
        let Some((location, record)) = self
            .find_version(&input.bucket, &input.key, version_id)
            .await?
        else {
            // Deleting a version that does not exist is a success.
            return Ok(DeleteObjectOutput {
                delete_marker: false,
                version_id: Some(version_id.to_owned()),
            });
        };

        if !can_destroy(&record, input.bypass_governance_retention, Utc::now()) {
            return Err(StorageError::AccessDenied);
        }
        if bucket.mfa_delete && input.mfa.is_none() {
            return Err(StorageError::AccessDenied);
        }
        if !input.preconditions.is_empty() {
            let head = self.head_record(&input.bucket, &input.key).await?;
            cond::check_write(&input.preconditions, head.as_ref())?;
        }

        let mut batch = WriteBatch::new();
        match location {
            VersionLocation::Archived => {
                batch.delete(keys::version(&input.bucket, &input.key, version_id));
            }
            VersionLocation::Head => {
                // Removing the head uncovers the most recent archived
                // version, delete marker or not.
                if let Some((record_id, promoted)) =
                    self.latest_archived(&input.bucket, &input.key).await?
                {
                    batch.delete(record_id);
                    Store::stage(
                        &mut batch,
                        keys::object(&input.bucket, &input.key),
                        &promoted,
                    )?;
                } else {
                    batch.delete(keys::object(&input.bucket, &input.key));
                }
            }
        }

        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            version_id = %version_id,
            "version permanently removed"
        );

        Ok(DeleteObjectOutput {
            delete_marker: record.is_delete_marker,
            version_id: Some(version_id.to_owned()),
        })
    }

    /// Delete without a version id. Runs inside the key lock.
    async fn delete_current(
        &self,
        bucket: &BucketRecord,
        input: &DeleteObjectInput,
        cancel: &CancellationToken,
    ) -> StorageResult<DeleteObjectOutput> {
        let head = self.head_record(&input.bucket, &input.key).await?;
        cond::check_write(&input.preconditions, head.as_ref())?;

        let now = Utc::now();
        match bucket.versioning {
            VersioningStatus::Unconfigured => {
                if head.is_some() {
                    let mut batch = WriteBatch::new();
                    batch.delete(keys::object(&input.bucket, &input.key));
                    Self::ensure_live(cancel)?;
                    self.store.commit(batch).await?;
                }
                Ok(DeleteObjectOutput {
                    delete_marker: false,
                    version_id: None,
                })
            }
            VersioningStatus::Enabled => {
                let version_id = self.ids.mint();
                let mut batch = WriteBatch::new();
                if let Some(old) = &head {
                    Store::stage(
                        &mut batch,
                        keys::version(&input.bucket, &input.key, &old.version_id),
                        old,
                    )?;
                }
                let marker = ObjectRecord::delete_marker(
                    &input.key,
                    &version_id,
                    self.owner.clone(),
                    now,
                );
                Store::stage(&mut batch, keys::object(&input.bucket, &input.key), &marker)?;

                Self::ensure_live(cancel)?;
                self.store.commit(batch).await?;

                debug!(bucket = %input.bucket, key = %input.key, version_id = %version_id, "delete marker inserted");
                Ok(DeleteObjectOutput {
                    delete_marker: true,
                    version_id: Some(version_id),
                })
            }
            VersioningStatus::Suspended => {
                let mut batch = WriteBatch::new();
                if let Some(old) = &head {
                    if old.is_null_version() {
                        // The null head is destroyed, not archived.
                        if !can_destroy(old, input.bypass_governance_retention, now) {
                            return Err(StorageError::AccessDenied);
                        }
                    } else {
                        Store::stage(
                            &mut batch,
                            keys::version(&input.bucket, &input.key, &old.version_id),
                            old,
                        )?;
                    }
                }
                self.stage_null_version_removal(&input.bucket, &input.key, &mut batch)
                    .await?;

                let marker = ObjectRecord::delete_marker(
                    &input.key,
                    NULL_VERSION_ID,
                    self.owner.clone(),
                    now,
                );
                Store::stage(&mut batch, keys::object(&input.bucket, &input.key), &marker)?;

                Self::ensure_live(cancel)?;
                self.store.commit(batch).await?;

                debug!(bucket = %input.bucket, key = %input.key, "null delete marker inserted");
                Ok(DeleteObjectOutput {
                    delete_marker: true,
                    version_id: Some(NULL_VERSION_ID.to_owned()),
                })
            }
        }
    }

    /// Copy an object: read the source, then run the put transition on the
    /// destination. The destination etag equals the source's.
    pub async fn copy_object(
        &self,
        input: CopyObjectInput,
        cancel: &CancellationToken,
    ) -> StorageResult<CopyObjectOutput> {
        Self::ensure_live(cancel)?;
        validate_object_key(&input.key)?;

        let dst_bucket = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;
        self.require_bucket(&input.source_bucket, None).await?;

        // Resolve the source; a source resolving to a delete marker reads
        // as a missing key.
        let source = match &input.source_version_id {
            None => {
                let head = self
                    .head_record(&input.source_bucket, &input.source_key)
                    .await?
                    .filter(|record| !record.is_delete_marker);
                head.ok_or_else(|| StorageError::NoSuchKey {
                    key: input.source_key.clone(),
                })?
            }
            Some(version_id) => {
                let (_, record) = self
                    .find_version(&input.source_bucket, &input.source_key, version_id)
                    .await?
                    .ok_or_else(|| StorageError::NoSuchVersion {
                        key: input.source_key.clone(),
                        version_id: version_id.clone(),
                    })?;
                if record.is_delete_marker {
                    return Err(StorageError::NoSuchKey {
                        key: input.source_key.clone(),
                    });
                }
                record
            }
        };

        cond::check_read(&input.source_preconditions, &source)?;

        let _slot = self.locker.lock(&input.bucket, &input.key).await;
        Self::ensure_live(cancel)?;

        let head = self.head_record(&input.bucket, &input.key).await?;

        let now = Utc::now();
        let (content_type, user_metadata) = match input.metadata_directive {
            MetadataDirective::Copy => (source.content_type.clone(), source.user_metadata.clone()),
            MetadataDirective::Replace => {
                (input.content_type.clone(), normalize_metadata(input.metadata))
            }
        };

        let mut batch = WriteBatch::new();
        let version_id = self
            .plan_head_transition(&dst_bucket, &input.key, head.as_ref(), &mut batch)
            .await?;

        let record = ObjectRecord {
            key: input.key.clone(),
            version_id: version_id.clone(),
            etag: source.etag.clone(),
            size: source.size,
            content_type,
            user_metadata,
            last_modified: now,
            is_delete_marker: false,
            retention: default_retention(&dst_bucket, now),
            legal_hold: None,
            tags: input.tagging.unwrap_or_else(|| source.tags.clone()),
            owner: self.owner.clone(),
            body: source.body.clone(),
        };
        Store::stage(&mut batch, keys::object(&input.bucket, &input.key), &record)?;

        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        debug!(
            src_bucket = %input.source_bucket,
            src_key = %input.source_key,
            dst_bucket = %input.bucket,
            dst_key = %input.key,
            "copy_object completed"
        );

        Ok(CopyObjectOutput {
            etag: source.etag,
            version_id,
            source_version_id: source.version_id.clone(),
            last_modified: Some(now),
        })
    }

    // -----------------------------------------------------------------------
    // Transition planning
    // -----------------------------------------------------------------------

    /// Decide the new head's version id for a write to `(bucket, key)` and
    /// stage the archive/cleanup operations the bucket mode requires.
    ///
    /// The caller stages the new head record afterwards, so the whole
    /// transition commits in one batch.
    pub(crate) async fn plan_head_transition(
        &self,
        bucket: &BucketRecord,
        key: &str,
        old_head: Option<&ObjectRecord>,
        batch: &mut WriteBatch,
    ) -> StorageResult<String> {
        match bucket.versioning {
            VersioningStatus::Unconfigured => Ok(NULL_VERSION_ID.to_owned()),
            VersioningStatus::Enabled => {
                if let Some(old) = old_head {
                    Store::stage(
                        batch,
                        keys::version(&bucket.name, key, &old.version_id),
                        old,
                    )?;
                }
                Ok(self.ids.mint())
            }
            VersioningStatus::Suspended => {
                if let Some(old) = old_head {
                    if !old.is_null_version() {
                        Store::stage(
                            batch,
                            keys::version(&bucket.name, key, &old.version_id),
                            old,
                        )?;
                    }
                    // A null head is simply overwritten.
                }
                self.stage_null_version_removal(&bucket.name, key, batch)
                    .await?;
                Ok(NULL_VERSION_ID.to_owned())
            }
        }
    }

    /// Stage removal of an archived `"null"` version, if one exists. At
    /// most one null version may exist per key.
    async fn stage_null_version_removal(
        &self,
        bucket: &str,
        key: &str,
        batch: &mut WriteBatch,
    ) -> StorageResult<()> {
        let id = keys::version(bucket, key, NULL_VERSION_ID);
        let archived: Option<ObjectRecord> = self.store.read(&id).await?;
        if archived.is_some_and(|record| record.key == key) {
            batch.delete(id);
        }
        Ok(())
    }
}

/// Compute the retention a bucket's default object-lock rule applies to a
/// newly written version, if any.
pub(crate) fn default_retention(bucket: &BucketRecord, now: DateTime<Utc>) -> Option<Retention> {
    let config = bucket.object_lock.as_ref().filter(|c| c.enabled)?;
    let rule = config.rule?;
    let retain_until = if let Some(days) = rule.days {
        now + Duration::days(i64::from(days))
    } else if let Some(years) = rule.years {
        now + Duration::days(365 * i64::from(years))
    } else {
        return None;
    };
    Some(Retention {
        mode: rule.mode,
        retain_until,
    })
}

/// Validate an object key: non-empty and at most 1024 bytes.
pub(crate) fn validate_object_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.len() > 1024 {
        return Err(StorageError::InvalidArgument {
            message: format!("invalid object key length: {}", key.len()),
        });
    }
    Ok(())
}

/// Lowercase user-metadata names; lookups are case-insensitive.
fn normalize_metadata(
    metadata: std::collections::HashMap<String, String>,
) -> std::collections::HashMap<String, String> {
    metadata
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use s3lite_model::input::CreateBucketInput;
    use s3lite_model::types::{DefaultRetention, ObjectLockConfiguration, RetentionMode};

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    async fn engine_with_bucket(bucket: &str) -> Engine {
        let engine = Engine::new(EngineConfig::default());
        engine
            .create_bucket(
                CreateBucketInput {
                    bucket: bucket.to_owned(),
                    object_lock_enabled: false,
                },
                &token(),
            )
            .await
            .expect("test create bucket");
        engine
    }

    fn put_input(bucket: &str, key: &str, body: &'static [u8]) -> PutObjectInput {
        PutObjectInput {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            body: StreamingBlob::from(body),
            ..PutObjectInput::default()
        }
    }

    fn get_input(bucket: &str, key: &str) -> GetObjectInput {
        GetObjectInput {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            ..GetObjectInput::default()
        }
    }

    #[tokio::test]
    async fn test_should_put_and_get_object() {
        let engine = engine_with_bucket("b").await;

        let put = engine
            .put_object(put_input("b", "hello.txt", b"hello"), &token())
            .await
            .expect("test put");
        assert_eq!(put.etag, crate::idgen::content_etag(b"hello"));
        assert_eq!(put.size, 5);
        assert_eq!(put.version_id, "null", "unconfigured writes carry the null id");

        let get = engine
            .get_object(get_input("b", "hello.txt"), &token())
            .await
            .expect("test get");
        assert_eq!(&get.body.into_bytes()[..], b"hello");
        assert_eq!(get.etag, put.etag);
    }

    #[tokio::test]
    async fn test_should_fail_get_of_missing_key() {
        let engine = engine_with_bucket("b").await;
        let result = engine.get_object(get_input("b", "ghost"), &token()).await;
        assert!(matches!(result, Err(StorageError::NoSuchKey { .. })));
    }

    #[tokio::test]
    async fn test_should_overwrite_in_place_when_unconfigured() {
        let engine = engine_with_bucket("b").await;
        engine
            .put_object(put_input("b", "k", b"one"), &token())
            .await
            .expect("test put one");
        engine
            .put_object(put_input("b", "k", b"two"), &token())
            .await
            .expect("test put two");

        let get = engine
            .get_object(get_input("b", "k"), &token())
            .await
            .expect("test get");
        assert_eq!(&get.body.into_bytes()[..], b"two");

        // No archived versions on an unconfigured bucket.
        let versions = engine.archived_versions("b", "k").await.expect("test scan");
        assert!(versions.is_empty());
    }

    #[tokio::test]
    async fn test_should_normalize_user_metadata_names() {
        let engine = engine_with_bucket("b").await;
        let mut input = put_input("b", "k", b"x");
        input
            .metadata
            .insert("X-Custom-Name".to_owned(), "value".to_owned());
        engine.put_object(input, &token()).await.expect("test put");

        let get = engine
            .get_object(get_input("b", "k"), &token())
            .await
            .expect("test get");
        assert_eq!(get.metadata.get("x-custom-name").map(String::as_str), Some("value"));
    }

    #[tokio::test]
    async fn test_should_enforce_if_none_match_star_on_put() {
        let engine = engine_with_bucket("b").await;
        engine
            .put_object(put_input("b", "k", b"first"), &token())
            .await
            .expect("test put");

        let mut input = put_input("b", "k", b"second");
        input.preconditions = s3lite_model::request::Preconditions::if_absent();
        let result = engine.put_object(input, &token()).await;
        assert!(matches!(result, Err(StorageError::PreconditionFailed)));
    }

    #[tokio::test]
    async fn test_should_delete_idempotently_when_unconfigured() {
        let engine = engine_with_bucket("b").await;

        let output = engine
            .delete_object(
                DeleteObjectInput {
                    bucket: "b".to_owned(),
                    key: "never-existed".to_owned(),
                    ..DeleteObjectInput::default()
                },
                &token(),
            )
            .await
            .expect("test delete");
        assert!(!output.delete_marker);
        assert!(output.version_id.is_none());
    }

    #[tokio::test]
    async fn test_should_reject_invalid_object_keys() {
        let engine = engine_with_bucket("b").await;
        let result = engine
            .put_object(put_input("b", "", b"x"), &token())
            .await;
        assert!(matches!(result, Err(StorageError::InvalidArgument { .. })));

        let long_key = "k".repeat(1025);
        let mut input = put_input("b", "k", b"x");
        input.key = long_key;
        let result = engine.put_object(input, &token()).await;
        assert!(matches!(result, Err(StorageError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_should_copy_object_preserving_etag() {
        let engine = engine_with_bucket("b").await;
        let put = engine
            .put_object(put_input("b", "src", b"payload"), &token())
            .await
            .expect("test put");

        let copy = engine
            .copy_object(
                CopyObjectInput {
                    bucket: "b".to_owned(),
                    key: "dst".to_owned(),
                    source_bucket: "b".to_owned(),
                    source_key: "src".to_owned(),
                    ..CopyObjectInput::default()
                },
                &token(),
            )
            .await
            .expect("test copy");
        assert_eq!(copy.etag, put.etag);

        let get = engine
            .get_object(get_input("b", "dst"), &token())
            .await
            .expect("test get");
        assert_eq!(&get.body.into_bytes()[..], b"payload");
    }

    #[tokio::test]
    async fn test_should_copy_with_replace_directive() {
        let engine = engine_with_bucket("b").await;
        let mut input = put_input("b", "src", b"data");
        input.content_type = Some("text/plain".to_owned());
        input
            .metadata
            .insert("origin".to_owned(), "source".to_owned());
        engine.put_object(input, &token()).await.expect("test put");

        let mut replacement = std::collections::HashMap::new();
        replacement.insert("Origin".to_owned(), "replaced".to_owned());
        engine
            .copy_object(
                CopyObjectInput {
                    bucket: "b".to_owned(),
                    key: "dst".to_owned(),
                    source_bucket: "b".to_owned(),
                    source_key: "src".to_owned(),
                    metadata_directive: MetadataDirective::Replace,
                    content_type: Some("application/json".to_owned()),
                    metadata: replacement,
                    ..CopyObjectInput::default()
                },
                &token(),
            )
            .await
            .expect("test copy");

        let get = engine
            .get_object(get_input("b", "dst"), &token())
            .await
            .expect("test get");
        assert_eq!(get.content_type.as_deref(), Some("application/json"));
        assert_eq!(get.metadata.get("origin").map(String::as_str), Some("replaced"));
    }

    #[tokio::test]
    async fn test_should_fail_copy_from_missing_source() {
        let engine = engine_with_bucket("b").await;
        let result = engine
            .copy_object(
                CopyObjectInput {
                    bucket: "b".to_owned(),
                    key: "dst".to_owned(),
                    source_bucket: "b".to_owned(),
                    source_key: "missing".to_owned(),
                    ..CopyObjectInput::default()
                },
                &token(),
            )
            .await;
        assert!(matches!(result, Err(StorageError::NoSuchKey { .. })));
    }

    #[tokio::test]
    async fn test_should_abort_put_before_commit_on_cancellation() {
        let engine = engine_with_bucket("b").await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = engine
            .put_object(put_input("b", "k", b"data"), &cancel)
            .await;
        assert!(matches!(result, Err(StorageError::OperationAborted)));

        // No observable effect remains.
        let result = engine.get_object(get_input("b", "k"), &token()).await;
        assert!(matches!(result, Err(StorageError::NoSuchKey { .. })));
    }

    #[tokio::test]
    async fn test_should_apply_default_retention_rule_on_put() {
        let engine = Engine::new(EngineConfig::default());
        engine
            .create_bucket(
                CreateBucketInput {
                    bucket: "locked".to_owned(),
                    object_lock_enabled: true,
                },
                &token(),
            )
            .await
            .expect("test create");
        engine
            .put_object_lock_configuration(
                s3lite_model::input::PutObjectLockConfigurationInput {
                    bucket: "locked".to_owned(),
                    configuration: ObjectLockConfiguration {
                        enabled: true,
                        rule: Some(DefaultRetention {
                            mode: RetentionMode::Governance,
                            days: Some(1),
                            years: None,
                        }),
                    },
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test put lock config");

        engine
            .put_object(put_input("locked", "k", b"x"), &token())
            .await
            .expect("test put");

        let head = engine
            .head_object(
                HeadObjectInput {
                    bucket: "locked".to_owned(),
                    key: "k".to_owned(),
                    ..HeadObjectInput::default()
                },
                &token(),
            )
            .await
            .expect("test head");
        let retention = head.retention.expect("default retention applied");
        assert_eq!(retention.mode, RetentionMode::Governance);
        assert!(retention.retain_until > Utc::now());
    }
}
