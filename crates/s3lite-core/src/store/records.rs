//! Persisted record types.
//!
//! Records are encoded with CBOR (binary-safe for content bytes) and carry
//! all of their own identity fields, so record ids never need to be parsed.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use s3lite_model::types::{
    LegalHoldStatus, ObjectInfo, ObjectLockConfiguration, ObjectVersionInfo, Owner, Retention,
    TagSet, VersioningStatus,
};

use crate::idgen::NULL_VERSION_ID;

// ---------------------------------------------------------------------------
// BucketRecord
// ---------------------------------------------------------------------------

/// The per-bucket record: creation data, versioning configuration, MFA
/// delete flag, and object lock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRecord {
    /// The bucket name.
    pub name: String,
    /// When the bucket was created.
    pub created_at: DateTime<Utc>,
    /// The recorded owner.
    pub owner: Owner,
    /// Region the bucket reports.
    pub region: String,
    /// Versioning status; transitions never return to `Unconfigured`.
    pub versioning: VersioningStatus,
    /// Whether MFA delete is enabled for permanent version removal.
    #[serde(default)]
    pub mfa_delete: bool,
    /// Object lock configuration; `None` until first configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_lock: Option<ObjectLockConfiguration>,
}

impl BucketRecord {
    /// Whether object lock is enabled on this bucket.
    #[must_use]
    pub fn object_lock_enabled(&self) -> bool {
        self.object_lock.as_ref().is_some_and(|c| c.enabled)
    }
}

// ---------------------------------------------------------------------------
// ObjectRecord
// ---------------------------------------------------------------------------

/// One incarnation of an object: the current head or an archived version.
///
/// Delete markers share this shape with `is_delete_marker = true`, an empty
/// etag, and zero-length content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    /// The object key.
    pub key: String,
    /// The version id (`"null"` for unversioned/suspended writes).
    pub version_id: String,
    /// The entity tag (lowercase hex digest; empty for delete markers).
    pub etag: String,
    /// Content size in bytes.
    pub size: u64,
    /// The MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// User metadata (names normalized to lowercase).
    #[serde(default)]
    pub user_metadata: HashMap<String, String>,
    /// When this incarnation was written.
    pub last_modified: DateTime<Utc>,
    /// Whether this record is a delete marker.
    #[serde(default)]
    pub is_delete_marker: bool,
    /// Retention, once applied to this version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention: Option<Retention>,
    /// Legal hold, once applied to this version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_hold: Option<LegalHoldStatus>,
    /// Tag set for this version.
    #[serde(default)]
    pub tags: TagSet,
    /// The owner of this version.
    pub owner: Owner,
    /// The content bytes.
    pub body: Bytes,
}

impl ObjectRecord {
    /// Build a delete marker for `key` with the given version id.
    #[must_use]
    pub fn delete_marker(key: &str, version_id: &str, owner: Owner, now: DateTime<Utc>) -> Self {
        Self {
            key: key.to_owned(),
            version_id: version_id.to_owned(),
            etag: String::new(),
            size: 0,
            content_type: None,
            user_metadata: HashMap::new(),
            last_modified: now,
            is_delete_marker: true,
            retention: None,
            legal_hold: None,
            tags: Vec::new(),
            owner,
            body: Bytes::new(),
        }
    }

    /// Whether this record carries the distinguished `"null"` version id.
    #[must_use]
    pub fn is_null_version(&self) -> bool {
        self.version_id == NULL_VERSION_ID
    }

    /// Project into a current-object listing entry.
    #[must_use]
    pub fn object_info(&self) -> ObjectInfo {
        ObjectInfo {
            key: self.key.clone(),
            etag: self.etag.clone(),
            size: self.size,
            last_modified: self.last_modified,
            owner: self.owner.clone(),
        }
    }

    /// Project into a version listing entry.
    #[must_use]
    pub fn version_info(&self, is_latest: bool) -> ObjectVersionInfo {
        ObjectVersionInfo {
            key: self.key.clone(),
            version_id: self.version_id.clone(),
            etag: self.etag.clone(),
            size: self.size,
            last_modified: self.last_modified,
            is_latest,
            is_delete_marker: self.is_delete_marker,
            owner: self.owner.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Multipart records
// ---------------------------------------------------------------------------

/// An in-progress multipart upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The upload id.
    pub upload_id: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// The owner who initiated the upload.
    pub owner: Owner,
    /// Content type captured at initiation, applied on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// User metadata captured at initiation.
    #[serde(default)]
    pub user_metadata: HashMap<String, String>,
    /// Tag set captured at initiation.
    #[serde(default)]
    pub tags: TagSet,
}

/// A single uploaded part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    /// The upload this part belongs to.
    pub upload_id: String,
    /// The part number (1-based).
    pub part_number: i32,
    /// The entity tag of the part content.
    pub etag: String,
    /// Part size in bytes.
    pub size: u64,
    /// When the part was uploaded.
    pub last_modified: DateTime<Utc>,
    /// The part content.
    pub body: Bytes,
}
