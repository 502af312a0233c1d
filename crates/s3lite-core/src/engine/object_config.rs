//! Per-version object configuration: retention, legal hold, and tagging.
//!
//! Retention and legal hold gate destructive operations. Compliance
//! retention is absolute until its retain-until date and can only be
//! extended; Governance retention can be weakened by callers asserting the
//! governance-bypass capability; legal hold toggles freely and blocks
//! destruction while on.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use s3lite_model::error::{StorageError, StorageResult};
use s3lite_model::input::{
    DeleteObjectTaggingInput, GetObjectLegalHoldInput, GetObjectRetentionInput,
    GetObjectTaggingInput, PutObjectLegalHoldInput, PutObjectRetentionInput,
    PutObjectTaggingInput,
};
use s3lite_model::output::{
    GetObjectLegalHoldOutput, GetObjectRetentionOutput, GetObjectTaggingOutput,
    ObjectTaggingOutput,
};
use s3lite_model::types::{Retention, RetentionMode};

use crate::store::records::ObjectRecord;
use crate::store::substrate::WriteBatch;
use crate::store::{Store, keys};

use super::{Engine, VersionLocation};

/// Whether a version may be permanently destroyed at `now`.
///
/// False while a legal hold is on, while Compliance retention is in its
/// window, or while Governance retention is in its window and the caller
/// has not asserted the bypass capability.
pub(crate) fn can_destroy(record: &ObjectRecord, bypass: bool, now: DateTime<Utc>) -> bool {
    if record.legal_hold.is_some_and(|hold| hold.is_on()) {
        return false;
    }
    match record.retention {
        Some(retention) if retention.retain_until > now => match retention.mode {
            RetentionMode::Compliance => false,
            RetentionMode::Governance => bypass,
        },
        _ => true,
    }
}

impl Engine {
    /// Apply retention to a specific version.
    pub async fn put_object_retention(
        &self,
        input: PutObjectRetentionInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        let bucket = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;
        if !bucket.object_lock_enabled() {
            return Err(StorageError::InvalidArgument {
                message: "bucket does not have object lock enabled".to_owned(),
            });
        }

        let _slot = self.locker.lock(&input.bucket, &input.key).await;
        Self::ensure_live(cancel)?;

        let (location, mut record) = self
            .resolve_configurable(&input.bucket, &input.key, input.version_id.as_deref())
            .await?;

        check_retention_transition(
            record.retention.as_ref(),
            &input.retention,
            input.bypass_governance_retention,
            Utc::now(),
        )?;

        record.retention = Some(input.retention);
        self.write_back(&input.bucket, &input.key, location, &record, cancel)
            .await?;

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            version_id = %record.version_id,
            mode = %input.retention.mode,
            "retention applied"
        );
        Ok(())
    }

    /// Read the retention of a specific version. Returns `None` when unset.
    pub async fn get_object_retention(
        &self,
        input: GetObjectRetentionInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetObjectRetentionOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let (_, record) = self
            .resolve_configurable(&input.bucket, &input.key, input.version_id.as_deref())
            .await?;
        Ok(GetObjectRetentionOutput {
            retention: record.retention,
        })
    }

    /// Apply or release a legal hold on a specific version.
    pub async fn put_object_legal_hold(
        &self,
        input: PutObjectLegalHoldInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        let bucket = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;
        if !bucket.object_lock_enabled() {
            return Err(StorageError::InvalidArgument {
                message: "bucket does not have object lock enabled".to_owned(),
            });
        }

        let _slot = self.locker.lock(&input.bucket, &input.key).await;
        Self::ensure_live(cancel)?;

        let (location, mut record) = self
            .resolve_configurable(&input.bucket, &input.key, input.version_id.as_deref())
            .await?;

        record.legal_hold = Some(input.status);
        self.write_back(&input.bucket, &input.key, location, &record, cancel)
            .await?;

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            version_id = %record.version_id,
            status = %input.status,
            "legal hold updated"
        );
        Ok(())
    }

    /// Read the legal hold of a specific version. Returns `None` when unset.
    pub async fn get_object_legal_hold(
        &self,
        input: GetObjectLegalHoldInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetObjectLegalHoldOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let (_, record) = self
            .resolve_configurable(&input.bucket, &input.key, input.version_id.as_deref())
            .await?;
        Ok(GetObjectLegalHoldOutput {
            status: record.legal_hold,
        })
    }

    // -----------------------------------------------------------------------
    // Object tagging
    // -----------------------------------------------------------------------

    /// Replace the tag set of a specific version.
    pub async fn put_object_tagging(
        &self,
        input: PutObjectTaggingInput,
        cancel: &CancellationToken,
    ) -> StorageResult<ObjectTaggingOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let _slot = self.locker.lock(&input.bucket, &input.key).await;
        Self::ensure_live(cancel)?;

        let (location, mut record) = self
            .resolve_configurable(&input.bucket, &input.key, input.version_id.as_deref())
            .await?;

        record.tags = input.tagging;
        let version_id = record.version_id.clone();
        self.write_back(&input.bucket, &input.key, location, &record, cancel)
            .await?;

        Ok(ObjectTaggingOutput {
            version_id,
        })
    }

    /// Read the tag set of a specific version.
    pub async fn get_object_tagging(
        &self,
        input: GetObjectTaggingInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetObjectTaggingOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let (_, record) = self
            .resolve_configurable(&input.bucket, &input.key, input.version_id.as_deref())
            .await?;
        Ok(GetObjectTaggingOutput {
            tagging: record.tags.clone(),
            version_id: record.version_id.clone(),
        })
    }

    /// Remove the tag set of a specific version.
    pub async fn delete_object_tagging(
        &self,
        input: DeleteObjectTaggingInput,
        cancel: &CancellationToken,
    ) -> StorageResult<ObjectTaggingOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let _slot = self.locker.lock(&input.bucket, &input.key).await;
        Self::ensure_live(cancel)?;

        let (location, mut record) = self
            .resolve_configurable(&input.bucket, &input.key, input.version_id.as_deref())
            .await?;

        record.tags = Vec::new();
        let version_id = record.version_id.clone();
        self.write_back(&input.bucket, &input.key, location, &record, cancel)
            .await?;

        Ok(ObjectTaggingOutput {
            version_id,
        })
    }

    // -----------------------------------------------------------------------
    // Shared resolution
    // -----------------------------------------------------------------------

    /// Resolve the version a configuration operation addresses.
    ///
    /// Defaults to the current head. Delete markers cannot carry
    /// configuration: an implicit marker head reads as a missing key, an
    /// explicitly addressed marker fails with `MethodNotAllowed`.
    async fn resolve_configurable(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> StorageResult<(VersionLocation, ObjectRecord)> {
        match version_id {
            None => {
                let head = self.head_record(bucket, key).await?.ok_or_else(|| {
                    StorageError::NoSuchKey {
                        key: key.to_owned(),
                    }
                })?;
                if head.is_delete_marker {
                    return Err(StorageError::NoSuchKey {
                        key: key.to_owned(),
                    });
                }
                Ok((VersionLocation::Head, head))
            }
            Some(version_id) => {
                let (location, record) = self
                    .find_version(bucket, key, version_id)
                    .await?
                    .ok_or_else(|| StorageError::NoSuchVersion {
                        key: key.to_owned(),
                        version_id: version_id.to_owned(),
                    })?;
                if record.is_delete_marker {
                    return Err(StorageError::MethodNotAllowed);
                }
                Ok((location, record))
            }
        }
    }

    /// Write a mutated record back to wherever it lives.
    async fn write_back(
        &self,
        bucket: &str,
        key: &str,
        location: VersionLocation,
        record: &ObjectRecord,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        let id = match location {
            VersionLocation::Head => keys::object(bucket, key),
            VersionLocation::Archived => keys::version(bucket, key, &record.version_id),
        };
        let mut batch = WriteBatch::new();
        Store::stage(&mut batch, id, record)?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }
}

/// Validate a retention change against the version's current retention.
fn check_retention_transition(
    current: Option<&Retention>,
    proposed: &Retention,
    bypass: bool,
    now: DateTime<Utc>,
) -> StorageResult<()> {
    let Some(current) = current.filter(|r| r.retain_until > now) else {
        // No active retention; anything goes.
        return Ok(());
    };

    match current.mode {
        RetentionMode::Compliance => {
            // Compliance is extend-only and can never leave Compliance.
            if proposed.mode != RetentionMode::Compliance
                || proposed.retain_until < current.retain_until
            {
                return Err(StorageError::AccessDenied);
            }
        }
        RetentionMode::Governance => {
            // Weakening Governance requires the bypass capability;
            // extending it (or upgrading to Compliance) does not.
            let shortens = proposed.retain_until < current.retain_until;
            if shortens && !bypass {
                return Err(StorageError::AccessDenied);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Duration;
    use s3lite_model::types::{LegalHoldStatus, Owner};
    use std::collections::HashMap;

    fn record(retention: Option<Retention>, legal_hold: Option<LegalHoldStatus>) -> ObjectRecord {
        ObjectRecord {
            key: "k".to_owned(),
            version_id: "v1".to_owned(),
            etag: "abc".to_owned(),
            size: 1,
            content_type: None,
            user_metadata: HashMap::new(),
            last_modified: Utc::now(),
            is_delete_marker: false,
            retention,
            legal_hold,
            tags: Vec::new(),
            owner: Owner::default(),
            body: Bytes::from_static(b"x"),
        }
    }

    fn governance(until: DateTime<Utc>) -> Retention {
        Retention {
            mode: RetentionMode::Governance,
            retain_until: until,
        }
    }

    fn compliance(until: DateTime<Utc>) -> Retention {
        Retention {
            mode: RetentionMode::Compliance,
            retain_until: until,
        }
    }

    #[test]
    fn test_should_destroy_unprotected_version() {
        let now = Utc::now();
        assert!(can_destroy(&record(None, None), false, now));
        assert!(can_destroy(
            &record(None, Some(LegalHoldStatus::Off)),
            false,
            now
        ));
    }

    #[test]
    fn test_should_block_destroy_under_legal_hold() {
        let now = Utc::now();
        assert!(!can_destroy(
            &record(None, Some(LegalHoldStatus::On)),
            true,
            now
        ));
    }

    #[test]
    fn test_should_block_destroy_under_compliance_until_expiry() {
        let now = Utc::now();
        let active = record(Some(compliance(now + Duration::days(1))), None);
        assert!(!can_destroy(&active, true, now), "bypass never helps compliance");

        let expired = record(Some(compliance(now - Duration::days(1))), None);
        assert!(can_destroy(&expired, false, now));
    }

    #[test]
    fn test_should_allow_governance_destroy_only_with_bypass() {
        let now = Utc::now();
        let active = record(Some(governance(now + Duration::days(1))), None);
        assert!(!can_destroy(&active, false, now));
        assert!(can_destroy(&active, true, now));
    }

    #[test]
    fn test_should_only_extend_compliance_retention() {
        let now = Utc::now();
        let current = compliance(now + Duration::days(10));

        // Extension is fine.
        assert!(
            check_retention_transition(
                Some(&current),
                &compliance(now + Duration::days(20)),
                false,
                now
            )
            .is_ok()
        );
        // Shortening is not, even with bypass.
        assert!(matches!(
            check_retention_transition(
                Some(&current),
                &compliance(now + Duration::days(5)),
                true,
                now
            ),
            Err(StorageError::AccessDenied)
        ));
        // Leaving Compliance is not.
        assert!(matches!(
            check_retention_transition(
                Some(&current),
                &governance(now + Duration::days(20)),
                true,
                now
            ),
            Err(StorageError::AccessDenied)
        ));
    }

    #[test]
    fn test_should_require_bypass_to_shorten_governance() {
        let now = Utc::now();
        let current = governance(now + Duration::days(10));

        assert!(matches!(
            check_retention_transition(
                Some(&current),
                &governance(now + Duration::days(1)),
                false,
                now
            ),
            Err(StorageError::AccessDenied)
        ));
        assert!(
            check_retention_transition(
                Some(&current),
                &governance(now + Duration::days(1)),
                true,
                now
            )
            .is_ok()
        );
        // Extension needs no bypass.
        assert!(
            check_retention_transition(
                Some(&current),
                &governance(now + Duration::days(20)),
                false,
                now
            )
            .is_ok()
        );
    }

    #[test]
    fn test_should_ignore_expired_retention_in_transition() {
        let now = Utc::now();
        let expired = compliance(now - Duration::days(1));
        assert!(
            check_retention_transition(
                Some(&expired),
                &governance(now + Duration::days(1)),
                false,
                now
            )
            .is_ok()
        );
    }
}
