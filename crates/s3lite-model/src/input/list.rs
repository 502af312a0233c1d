//! Listing operation inputs.

use serde::{Deserialize, Serialize};

/// Input for `list_objects` (V1 pagination via `marker`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsInput {
    /// The bucket name.
    pub bucket: String,
    /// Only keys starting with this prefix are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Collapse keys sharing a common prefix up to this delimiter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    /// Resume listing strictly after this key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Maximum number of entries (keys plus common prefixes) to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_keys: Option<usize>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_bucket_owner: Option<String>,
}

/// Input for `list_objects_v2` (pagination via opaque continuation token).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsV2Input {
    /// The bucket name.
    pub bucket: String,
    /// Only keys starting with this prefix are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Collapse keys sharing a common prefix up to this delimiter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    /// Opaque token from a previous page's `next_continuation_token`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
    /// Start listing strictly after this key (ignored when a continuation
    /// token is present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_after: Option<String>,
    /// Maximum number of entries (keys plus common prefixes) to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_keys: Option<usize>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_bucket_owner: Option<String>,
}

/// Input for `list_object_versions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectVersionsInput {
    /// The bucket name.
    pub bucket: String,
    /// Only keys starting with this prefix are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Collapse keys sharing a common prefix up to this delimiter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    /// Resume listing at this key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_marker: Option<String>,
    /// Resume listing strictly after this version of `key_marker`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id_marker: Option<String>,
    /// Maximum number of entries (versions plus common prefixes) to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_keys: Option<usize>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_bucket_owner: Option<String>,
}
