//! Bucket and object configuration inputs: object lock, retention, legal
//! hold, policy, tagging, public access block, and the opaque
//! configuration sub-records.

use crate::types::{
    BucketConfigKind, LegalHoldStatus, ObjectLockConfiguration, PublicAccessBlockConfig,
    Retention, TagSet,
};

// ---------------------------------------------------------------------------
// Object lock / retention / legal hold
// ---------------------------------------------------------------------------

/// Input for `put_object_lock_configuration`.
#[derive(Debug, Clone)]
pub struct PutObjectLockConfigurationInput {
    /// The bucket name.
    pub bucket: String,
    /// The configuration to store.
    pub configuration: ObjectLockConfiguration,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_object_lock_configuration`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectLockConfigurationInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `put_object_retention`.
#[derive(Debug, Clone)]
pub struct PutObjectRetentionInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID; defaults to the current version.
    pub version_id: Option<String>,
    /// The retention to apply.
    pub retention: Retention,
    /// Assert the governance-bypass capability when weakening Governance
    /// retention.
    pub bypass_governance_retention: bool,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_object_retention`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectRetentionInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID; defaults to the current version.
    pub version_id: Option<String>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `put_object_legal_hold`.
#[derive(Debug, Clone)]
pub struct PutObjectLegalHoldInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID; defaults to the current version.
    pub version_id: Option<String>,
    /// The legal hold status to apply.
    pub status: LegalHoldStatus,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_object_legal_hold`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectLegalHoldInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID; defaults to the current version.
    pub version_id: Option<String>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

// ---------------------------------------------------------------------------
// Bucket policy
// ---------------------------------------------------------------------------

/// Input for `put_bucket_policy`.
#[derive(Debug, Clone, Default)]
pub struct PutBucketPolicyInput {
    /// The bucket name.
    pub bucket: String,
    /// The policy document. Must be valid JSON.
    pub policy: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_bucket_policy`.
#[derive(Debug, Clone, Default)]
pub struct GetBucketPolicyInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `delete_bucket_policy`.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketPolicyInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

// ---------------------------------------------------------------------------
// Bucket tagging
// ---------------------------------------------------------------------------

/// Input for `put_bucket_tagging`.
#[derive(Debug, Clone, Default)]
pub struct PutBucketTaggingInput {
    /// The bucket name.
    pub bucket: String,
    /// The tag set to store.
    pub tagging: TagSet,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_bucket_tagging`.
#[derive(Debug, Clone, Default)]
pub struct GetBucketTaggingInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `delete_bucket_tagging`.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketTaggingInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

// ---------------------------------------------------------------------------
// Public access block
// ---------------------------------------------------------------------------

/// Input for `put_public_access_block`.
#[derive(Debug, Clone, Default)]
pub struct PutPublicAccessBlockInput {
    /// The bucket name.
    pub bucket: String,
    /// The configuration to store.
    pub configuration: PublicAccessBlockConfig,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_public_access_block`.
#[derive(Debug, Clone, Default)]
pub struct GetPublicAccessBlockInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `delete_public_access_block`.
#[derive(Debug, Clone, Default)]
pub struct DeletePublicAccessBlockInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

// ---------------------------------------------------------------------------
// Opaque configuration sub-records
// ---------------------------------------------------------------------------

/// Input for `put_bucket_config` (encryption, lifecycle, CORS, website,
/// logging, notification). Payloads are stored verbatim.
#[derive(Debug, Clone)]
pub struct PutBucketConfigInput {
    /// The bucket name.
    pub bucket: String,
    /// The configuration kind.
    pub kind: BucketConfigKind,
    /// The opaque configuration payload.
    pub configuration: serde_json::Value,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_bucket_config`.
#[derive(Debug, Clone)]
pub struct GetBucketConfigInput {
    /// The bucket name.
    pub bucket: String,
    /// The configuration kind.
    pub kind: BucketConfigKind,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `delete_bucket_config`.
#[derive(Debug, Clone)]
pub struct DeleteBucketConfigInput {
    /// The bucket name.
    pub bucket: String,
    /// The configuration kind.
    pub kind: BucketConfigKind,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}
