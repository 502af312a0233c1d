//! Listing operation outputs.

use serde::{Deserialize, Serialize};

use crate::types::{ObjectInfo, ObjectVersionInfo};

/// Output of `list_objects` (V1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsOutput {
    /// Matching current objects, byte-lexicographically ascending by key.
    pub objects: Vec<ObjectInfo>,
    /// Collapsed common prefixes when a delimiter was used.
    pub common_prefixes: Vec<String>,
    /// Whether more entries remain.
    pub is_truncated: bool,
    /// The marker to resume from (last returned key), set when truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_marker: Option<String>,
}

/// Output of `list_objects_v2`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsV2Output {
    /// Matching current objects, byte-lexicographically ascending by key.
    pub objects: Vec<ObjectInfo>,
    /// Collapsed common prefixes when a delimiter was used.
    pub common_prefixes: Vec<String>,
    /// Whether more entries remain.
    pub is_truncated: bool,
    /// Opaque token to resume from, set when truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_continuation_token: Option<String>,
    /// Number of keys plus common prefixes returned in this page.
    pub key_count: usize,
}

/// Output of `list_object_versions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectVersionsOutput {
    /// Versions and delete markers: ascending by key, newest first within a
    /// key.
    pub versions: Vec<ObjectVersionInfo>,
    /// Collapsed common prefixes when a delimiter was used.
    pub common_prefixes: Vec<String>,
    /// Whether more entries remain.
    pub is_truncated: bool,
    /// The key to resume from, set when truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_key_marker: Option<String>,
    /// The version to resume after, set when truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version_id_marker: Option<String>,
}
