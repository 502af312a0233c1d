//! Bucket registry operations.
//!
//! Bucket CRUD, versioning configuration, object-lock configuration, and
//! the configuration sub-records (policy, tagging, public access block, and
//! the opaque kinds). Versioning transitions are monotonic in
//! expressiveness: once `Enabled`, a bucket may be `Suspended` but never
//! returns to `Unconfigured`.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use s3lite_model::error::{StorageError, StorageResult};
use s3lite_model::input::{
    CreateBucketInput, DeleteBucketConfigInput, DeleteBucketInput, DeleteBucketPolicyInput,
    DeleteBucketTaggingInput, DeletePublicAccessBlockInput, GetBucketConfigInput,
    GetBucketPolicyInput, GetBucketTaggingInput, GetBucketVersioningInput,
    GetObjectLockConfigurationInput, GetPublicAccessBlockInput, HeadBucketInput, ListBucketsInput,
    PutBucketConfigInput, PutBucketPolicyInput, PutBucketTaggingInput, PutBucketVersioningInput,
    PutObjectLockConfigurationInput, PutPublicAccessBlockInput,
};
use s3lite_model::output::{
    CreateBucketOutput, GetBucketConfigOutput, GetBucketPolicyOutput, GetBucketTaggingOutput,
    GetBucketVersioningOutput, GetObjectLockConfigurationOutput, GetPublicAccessBlockOutput,
    ListBucketsOutput,
};
use s3lite_model::types::{
    BucketInfo, ObjectLockConfiguration, PublicAccessBlockConfig, TagSet, VersioningStatus,
};

use crate::store::records::BucketRecord;
use crate::store::substrate::WriteBatch;
use crate::store::{Store, keys};

use super::Engine;

impl Engine {
    /// Create a bucket.
    ///
    /// Buckets created with object lock enabled also get versioning enabled,
    /// since object lock requires a version history to protect.
    pub async fn create_bucket(
        &self,
        input: CreateBucketInput,
        cancel: &CancellationToken,
    ) -> StorageResult<CreateBucketOutput> {
        Self::ensure_live(cancel)?;
        validate_bucket_name(&input.bucket)?;

        let id = keys::bucket(&input.bucket);
        if self.store.read::<BucketRecord>(&id).await?.is_some() {
            return Err(StorageError::BucketAlreadyExists {
                bucket: input.bucket,
            });
        }

        let record = BucketRecord {
            name: input.bucket.clone(),
            created_at: Utc::now(),
            owner: self.owner.clone(),
            region: self.config.default_region.clone(),
            versioning: if input.object_lock_enabled {
                VersioningStatus::Enabled
            } else {
                VersioningStatus::Unconfigured
            },
            mfa_delete: false,
            object_lock: input.object_lock_enabled.then_some(ObjectLockConfiguration {
                enabled: true,
                rule: None,
            }),
        };

        let mut batch = WriteBatch::new();
        Store::stage(&mut batch, id, &record)?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        info!(bucket = %input.bucket, "bucket created");
        Ok(CreateBucketOutput {
            location: format!("/{}", input.bucket),
        })
    }

    /// Check that a bucket exists (and that the caller owns it, when an
    /// expected owner is supplied).
    pub async fn head_bucket(
        &self,
        input: HeadBucketInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;
        Ok(())
    }

    /// Delete a bucket.
    ///
    /// Fails with `BucketNotEmpty` while any current object, archived
    /// version, or in-progress multipart upload remains.
    pub async fn delete_bucket(
        &self,
        input: DeleteBucketInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let occupied = self
            .store
            .any_with_prefix(&keys::object_prefix(&input.bucket))
            .await?
            || self
                .store
                .any_with_prefix(&keys::bucket_versions_prefix(&input.bucket))
                .await?
            || self
                .store
                .any_with_prefix(&keys::upload_prefix(&input.bucket))
                .await?;
        if occupied {
            return Err(StorageError::BucketNotEmpty {
                bucket: input.bucket,
            });
        }

        let mut batch = WriteBatch::new();
        batch.delete(keys::bucket(&input.bucket));
        batch.delete(keys::policy(&input.bucket));
        batch.delete(keys::tagging(&input.bucket));
        batch.delete(keys::public_access_block(&input.bucket));
        for kind in [
            "encryption",
            "lifecycle",
            "cors",
            "website",
            "logging",
            "notification",
        ] {
            batch.delete(keys::bucket_config(kind, &input.bucket));
        }
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        info!(bucket = %input.bucket, "bucket deleted");
        Ok(())
    }

    /// List all buckets, sorted by name.
    pub async fn list_buckets(
        &self,
        _input: ListBucketsInput,
        cancel: &CancellationToken,
    ) -> StorageResult<ListBucketsOutput> {
        Self::ensure_live(cancel)?;
        let records: Vec<(String, BucketRecord)> =
            self.store.scan(&keys::bucket_prefix(), None, None).await?;

        let buckets = records
            .into_iter()
            .map(|(_, record)| BucketInfo {
                name: record.name,
                creation_date: record.created_at,
            })
            .collect();

        Ok(ListBucketsOutput {
            buckets,
            owner: Some(self.owner.clone()),
        })
    }

    // -----------------------------------------------------------------------
    // Versioning
    // -----------------------------------------------------------------------

    /// Configure bucket versioning.
    ///
    /// Legal transitions: `Unconfigured -> Enabled | Suspended` and
    /// `Enabled <-> Suspended`. Requesting `Unconfigured` is rejected.
    pub async fn put_bucket_versioning(
        &self,
        input: PutBucketVersioningInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        if !input.status.is_configured() {
            return Err(StorageError::InvalidArgument {
                message: "versioning status must be Enabled or Suspended".to_owned(),
            });
        }

        let mut record = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        // Object lock relies on the version history; a lock-enabled bucket
        // cannot stop keeping it.
        if record.object_lock_enabled() && input.status == VersioningStatus::Suspended {
            return Err(StorageError::InvalidArgument {
                message: "versioning cannot be suspended on an object-lock bucket".to_owned(),
            });
        }

        record.versioning = input.status;
        if let Some(mfa_delete) = input.mfa_delete {
            record.mfa_delete = mfa_delete;
        }

        let mut batch = WriteBatch::new();
        Store::stage(&mut batch, keys::bucket(&input.bucket), &record)?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        info!(bucket = %input.bucket, status = ?input.status, "bucket versioning updated");
        Ok(())
    }

    /// Read the bucket versioning configuration.
    pub async fn get_bucket_versioning(
        &self,
        input: GetBucketVersioningInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetBucketVersioningOutput> {
        Self::ensure_live(cancel)?;
        let record = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        Ok(GetBucketVersioningOutput {
            status: record.versioning,
            mfa_delete: record.versioning.is_configured().then_some(record.mfa_delete),
        })
    }

    // -----------------------------------------------------------------------
    // Object lock configuration
    // -----------------------------------------------------------------------

    /// Store the bucket's object lock configuration.
    pub async fn put_object_lock_configuration(
        &self,
        input: PutObjectLockConfigurationInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        let mut record = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        if let Some(rule) = &input.configuration.rule {
            let both = rule.days.is_some() && rule.years.is_some();
            let neither = rule.days.is_none() && rule.years.is_none();
            if both || neither {
                return Err(StorageError::InvalidArgument {
                    message: "default retention must set exactly one of days or years".to_owned(),
                });
            }
        }

        // Object lock protects versions; it cannot be enabled on a bucket
        // that does not keep them.
        if input.configuration.enabled && record.versioning != VersioningStatus::Enabled {
            return Err(StorageError::InvalidArgument {
                message: "object lock requires versioning to be enabled".to_owned(),
            });
        }

        record.object_lock = Some(input.configuration);

        let mut batch = WriteBatch::new();
        Store::stage(&mut batch, keys::bucket(&input.bucket), &record)?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;
        Ok(())
    }

    /// Read the bucket's object lock configuration.
    pub async fn get_object_lock_configuration(
        &self,
        input: GetObjectLockConfigurationInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetObjectLockConfigurationOutput> {
        Self::ensure_live(cancel)?;
        let record = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        record
            .object_lock
            .map(|configuration| GetObjectLockConfigurationOutput { configuration })
            .ok_or(StorageError::ObjectLockConfigurationNotFound)
    }

    // -----------------------------------------------------------------------
    // Bucket policy
    // -----------------------------------------------------------------------

    /// Store the bucket policy. The document must be valid JSON.
    pub async fn put_bucket_policy(
        &self,
        input: PutBucketPolicyInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        if serde_json::from_str::<serde_json::Value>(&input.policy).is_err() {
            return Err(StorageError::MalformedPolicy);
        }

        let mut batch = WriteBatch::new();
        Store::stage(&mut batch, keys::policy(&input.bucket), &input.policy)?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }

    /// Read the bucket policy.
    pub async fn get_bucket_policy(
        &self,
        input: GetBucketPolicyInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetBucketPolicyOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let policy: Option<String> = self.store.read(&keys::policy(&input.bucket)).await?;
        policy
            .map(|policy| GetBucketPolicyOutput { policy })
            .ok_or(StorageError::NoSuchBucketPolicy)
    }

    /// Delete the bucket policy. Idempotent.
    pub async fn delete_bucket_policy(
        &self,
        input: DeleteBucketPolicyInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let mut batch = WriteBatch::new();
        batch.delete(keys::policy(&input.bucket));
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }

    // -----------------------------------------------------------------------
    // Bucket tagging
    // -----------------------------------------------------------------------

    /// Store the bucket tag set.
    pub async fn put_bucket_tagging(
        &self,
        input: PutBucketTaggingInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let mut batch = WriteBatch::new();
        Store::stage(&mut batch, keys::tagging(&input.bucket), &input.tagging)?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }

    /// Read the bucket tag set.
    pub async fn get_bucket_tagging(
        &self,
        input: GetBucketTaggingInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetBucketTaggingOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let tagging: Option<TagSet> = self.store.read(&keys::tagging(&input.bucket)).await?;
        tagging
            .map(|tagging| GetBucketTaggingOutput { tagging })
            .ok_or(StorageError::NoSuchTagSet)
    }

    /// Delete the bucket tag set. Idempotent.
    pub async fn delete_bucket_tagging(
        &self,
        input: DeleteBucketTaggingInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let mut batch = WriteBatch::new();
        batch.delete(keys::tagging(&input.bucket));
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }

    // -----------------------------------------------------------------------
    // Public access block
    // -----------------------------------------------------------------------

    /// Store the public access block configuration.
    pub async fn put_public_access_block(
        &self,
        input: PutPublicAccessBlockInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let mut batch = WriteBatch::new();
        Store::stage(
            &mut batch,
            keys::public_access_block(&input.bucket),
            &input.configuration,
        )?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }

    /// Read the public access block configuration.
    pub async fn get_public_access_block(
        &self,
        input: GetPublicAccessBlockInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetPublicAccessBlockOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let configuration: Option<PublicAccessBlockConfig> = self
            .store
            .read(&keys::public_access_block(&input.bucket))
            .await?;
        configuration
            .map(|configuration| GetPublicAccessBlockOutput { configuration })
            .ok_or(StorageError::NoSuchPublicAccessBlockConfiguration)
    }

    /// Delete the public access block configuration. Idempotent.
    pub async fn delete_public_access_block(
        &self,
        input: DeletePublicAccessBlockInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let mut batch = WriteBatch::new();
        batch.delete(keys::public_access_block(&input.bucket));
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }

    // -----------------------------------------------------------------------
    // Opaque configuration sub-records
    // -----------------------------------------------------------------------

    /// Store an opaque configuration payload (encryption, lifecycle, CORS,
    /// website, logging, notification). Last writer wins per kind.
    pub async fn put_bucket_config(
        &self,
        input: PutBucketConfigInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let mut batch = WriteBatch::new();
        Store::stage(
            &mut batch,
            keys::bucket_config(input.kind.as_str(), &input.bucket),
            &input.configuration,
        )?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }

    /// Read an opaque configuration payload.
    pub async fn get_bucket_config(
        &self,
        input: GetBucketConfigInput,
        cancel: &CancellationToken,
    ) -> StorageResult<GetBucketConfigOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let configuration: Option<serde_json::Value> = self
            .store
            .read(&keys::bucket_config(input.kind.as_str(), &input.bucket))
            .await?;
        Ok(GetBucketConfigOutput { configuration })
    }

    /// Delete an opaque configuration payload. Idempotent.
    pub async fn delete_bucket_config(
        &self,
        input: DeleteBucketConfigInput,
        cancel: &CancellationToken,
    ) -> StorageResult<()> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let mut batch = WriteBatch::new();
        batch.delete(keys::bucket_config(input.kind.as_str(), &input.bucket));
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await
    }
}

/// Validate a bucket name: 3-63 chars of lowercase letters, digits, dots,
/// and dashes, starting and ending with a letter or digit.
fn validate_bucket_name(name: &str) -> StorageResult<()> {
    let valid_len = (3..=63).contains(&name.len());
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let valid_ends = name
        .chars()
        .next()
        .zip(name.chars().last())
        .is_some_and(|(first, last)| {
            first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric()
        });

    if valid_len && valid_chars && valid_ends {
        Ok(())
    } else {
        Err(StorageError::InvalidArgument {
            message: format!("invalid bucket name: {name}"),
        })
    }
}
