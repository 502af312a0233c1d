//! Bucket operation outputs.

use serde::{Deserialize, Serialize};

use crate::types::{BucketInfo, Owner, VersioningStatus};

/// Output of `create_bucket`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketOutput {
    /// The location of the created bucket (`/{bucket}`).
    pub location: String,
}

/// Output of `list_buckets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBucketsOutput {
    /// All buckets, sorted by name.
    pub buckets: Vec<BucketInfo>,
    /// The owner of the store.
    #[serde(default)]
    pub owner: Option<Owner>,
}

/// Output of `get_bucket_versioning`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBucketVersioningOutput {
    /// The versioning status, possibly `Unconfigured`.
    pub status: VersioningStatus,
    /// Whether MFA delete is enabled; `None` when never configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_delete: Option<bool>,
}
