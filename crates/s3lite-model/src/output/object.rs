//! Object operation outputs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::request::StreamingBlob;
use crate::types::{DeleteError, DeletedObject, LegalHoldStatus, Retention, TagSet};

/// Output of `put_object`.
#[derive(Debug, Clone, Default)]
pub struct PutObjectOutput {
    /// The entity tag of the stored content (lowercase hex digest).
    pub etag: String,
    /// The version ID assigned to the new head; the literal `"null"` for
    /// unversioned and suspended-mode writes.
    pub version_id: String,
    /// The stored size in bytes.
    pub size: u64,
}

/// Output of `get_object`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectOutput {
    /// The object content.
    pub body: StreamingBlob,
    /// The entity tag.
    pub etag: String,
    /// The version ID of the returned version (`"null"` for the stored
    /// null version).
    pub version_id: String,
    /// The content size in bytes.
    pub size: u64,
    /// The MIME type.
    pub content_type: Option<String>,
    /// User-defined metadata pairs.
    pub metadata: HashMap<String, String>,
    /// When the returned version was written.
    pub last_modified: Option<DateTime<Utc>>,
    /// Number of tags on the returned version, when non-zero.
    pub tag_count: Option<usize>,
    /// Retention on the returned version, if any.
    pub retention: Option<Retention>,
    /// Legal hold on the returned version, if any.
    pub legal_hold: Option<LegalHoldStatus>,
}

/// Output of `head_object`.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectOutput {
    /// The entity tag (empty for delete markers).
    pub etag: String,
    /// The version ID of the resolved version (`"null"` for the stored
    /// null version).
    pub version_id: String,
    /// The content size in bytes.
    pub size: u64,
    /// The MIME type.
    pub content_type: Option<String>,
    /// User-defined metadata pairs.
    pub metadata: HashMap<String, String>,
    /// When the resolved version was written.
    pub last_modified: Option<DateTime<Utc>>,
    /// Whether the resolved version is a delete marker (only reachable by
    /// addressing the marker's version ID).
    pub delete_marker: bool,
    /// Retention on the resolved version, if any.
    pub retention: Option<Retention>,
    /// Legal hold on the resolved version, if any.
    pub legal_hold: Option<LegalHoldStatus>,
}

/// Output of `delete_object`.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectOutput {
    /// Whether the operation created a delete marker, or removed one.
    pub delete_marker: bool,
    /// The version ID of the created marker or the removed version.
    pub version_id: Option<String>,
}

/// Output of `delete_objects` (batch delete).
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsOutput {
    /// Successful entries. Empty in quiet mode.
    pub deleted: Vec<DeletedObject>,
    /// Failed entries. Per-entry failures never abort the batch.
    pub errors: Vec<DeleteError>,
}

/// Output of `copy_object`.
#[derive(Debug, Clone, Default)]
pub struct CopyObjectOutput {
    /// The entity tag of the destination (equals the source's).
    pub etag: String,
    /// The version ID assigned to the destination head.
    pub version_id: String,
    /// The version that was copied (`"null"` when the source bucket keeps
    /// no real ids).
    pub source_version_id: String,
    /// When the destination version was written.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Output of `get_object_tagging`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectTaggingOutput {
    /// The stored tag set.
    pub tagging: TagSet,
    /// The version the tags belong to.
    pub version_id: String,
}

/// Output of `put_object_tagging` / `delete_object_tagging`.
#[derive(Debug, Clone, Default)]
pub struct ObjectTaggingOutput {
    /// The version the tags belong to.
    pub version_id: String,
}
