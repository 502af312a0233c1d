//! Bucket operation inputs.

use serde::{Deserialize, Serialize};

use crate::types::VersioningStatus;

/// Input for `create_bucket`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketInput {
    /// The bucket name.
    pub bucket: String,
    /// Whether object lock is enabled for the new bucket. Buckets created
    /// with object lock also have versioning enabled.
    #[serde(default)]
    pub object_lock_enabled: bool,
}

/// Input for `head_bucket`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadBucketInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_bucket_owner: Option<String>,
}

/// Input for `delete_bucket`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBucketInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_bucket_owner: Option<String>,
}

/// Input for `list_buckets`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListBucketsInput {}

/// Input for `put_bucket_versioning`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutBucketVersioningInput {
    /// The bucket name.
    pub bucket: String,
    /// The requested status (`Enabled` or `Suspended`).
    pub status: VersioningStatus,
    /// Whether MFA delete is enabled for permanent version removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_delete: Option<bool>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_bucket_versioning`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBucketVersioningInput {
    /// The bucket name.
    pub bucket: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_bucket_owner: Option<String>,
}
