//! Shared value types for the engine surface.
//!
//! Defines owners, versioning status, object-lock retention types, object
//! metadata, and the entry types returned by listing operations.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A set of object or bucket tags as ordered key/value pairs.
pub type TagSet = Vec<(String, String)>;

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// The owner of a bucket or object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// The canonical user ID of the owner.
    pub id: String,
    /// The display name of the owner.
    pub display_name: String,
}

impl Default for Owner {
    fn default() -> Self {
        Self {
            id: "c41dd96a2d4e9f0b76f62bd1f38a11f1b22c7a9f53cd1d2f09d8e3a5c0ab94de".to_owned(),
            display_name: "s3lite".to_owned(),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.display_name, self.id)
    }
}

// ---------------------------------------------------------------------------
// VersioningStatus
// ---------------------------------------------------------------------------

/// Bucket versioning status.
///
/// Transitions are monotonic in expressiveness: once `Enabled`, a bucket can
/// become `Suspended` but never return to `Unconfigured`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersioningStatus {
    /// Versioning has never been configured on this bucket.
    #[default]
    Unconfigured,
    /// Versioning is currently enabled.
    Enabled,
    /// Versioning was previously enabled but is now suspended.
    Suspended,
}

impl VersioningStatus {
    /// Whether this status has ever been explicitly configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::Unconfigured)
    }
}

// ---------------------------------------------------------------------------
// Object lock
// ---------------------------------------------------------------------------

/// Object lock retention mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetentionMode {
    /// Retention may be weakened by callers asserting the bypass capability.
    Governance,
    /// Retention is absolute until the retain-until date passes.
    Compliance,
}

impl RetentionMode {
    /// Return the canonical string representation (`GOVERNANCE` / `COMPLIANCE`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Governance => "GOVERNANCE",
            Self::Compliance => "COMPLIANCE",
        }
    }
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`RetentionMode`] from a string fails.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown retention mode: {0}")]
pub struct ParseRetentionModeError(String);

impl FromStr for RetentionMode {
    type Err = ParseRetentionModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GOVERNANCE" => Ok(Self::Governance),
            "COMPLIANCE" => Ok(Self::Compliance),
            _ => Err(ParseRetentionModeError(s.to_owned())),
        }
    }
}

/// Per-version retention: a mode plus a retain-until instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Retention {
    /// The retention mode.
    pub mode: RetentionMode,
    /// The instant until which the version is retained.
    pub retain_until: DateTime<Utc>,
}

/// Per-version legal hold status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalHoldStatus {
    /// A legal hold is in effect.
    On,
    /// No legal hold is in effect.
    Off,
}

impl LegalHoldStatus {
    /// Return the canonical string representation (`ON` / `OFF`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Whether this status blocks destructive operations.
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for LegalHoldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object lock configuration for a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLockConfiguration {
    /// Whether object lock is enabled on the bucket.
    pub enabled: bool,
    /// Optional default retention applied to new versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<DefaultRetention>,
}

/// Default retention settings within an object lock configuration.
///
/// Exactly one of `days` or `years` must be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultRetention {
    /// The retention mode applied by default.
    pub mode: RetentionMode,
    /// Number of days to retain new versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    /// Number of years to retain new versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<i32>,
}

// ---------------------------------------------------------------------------
// Public access block
// ---------------------------------------------------------------------------

/// Public access block configuration for a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct PublicAccessBlockConfig {
    /// Whether public ACLs are blocked for this bucket.
    #[serde(default)]
    pub block_public_acls: bool,
    /// Whether public ACLs are ignored for this bucket.
    #[serde(default)]
    pub ignore_public_acls: bool,
    /// Whether public bucket policies are blocked.
    #[serde(default)]
    pub block_public_policy: bool,
    /// Whether public bucket policies are restricted.
    #[serde(default)]
    pub restrict_public_buckets: bool,
}

// ---------------------------------------------------------------------------
// Object metadata
// ---------------------------------------------------------------------------

/// Caller-supplied metadata attached to an object version.
///
/// User metadata names are case-insensitive; the engine normalizes them to
/// lowercase on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// The MIME type of the object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// User-defined metadata pairs.
    #[serde(default)]
    pub user_metadata: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Listing entries
// ---------------------------------------------------------------------------

/// Information about a bucket, as returned by `list_buckets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    /// The bucket name.
    pub name: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
}

/// A current-object entry in a `list_objects` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    /// The object key.
    pub key: String,
    /// The entity tag of the current version.
    pub etag: String,
    /// The object size in bytes.
    pub size: u64,
    /// When the current version was written.
    pub last_modified: DateTime<Utc>,
    /// The owner of the object.
    pub owner: Owner,
}

/// A version entry in a `list_object_versions` result.
///
/// Covers both real versions and delete markers; markers carry a zero size
/// and an empty etag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectVersionInfo {
    /// The object key.
    pub key: String,
    /// The version ID (`"null"` for unversioned/suspended writes).
    pub version_id: String,
    /// The entity tag (empty for delete markers).
    pub etag: String,
    /// The version size in bytes (zero for delete markers).
    pub size: u64,
    /// When this version was written.
    pub last_modified: DateTime<Utc>,
    /// Whether this is the current version for its key.
    pub is_latest: bool,
    /// Whether this version is a delete marker.
    pub is_delete_marker: bool,
    /// The owner of this version.
    pub owner: Owner,
}

// ---------------------------------------------------------------------------
// Batch delete
// ---------------------------------------------------------------------------

/// Identifies one object (optionally a specific version) in a batch delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectIdentifier {
    /// The object key.
    pub key: String,
    /// Optional version ID for a permanent version delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

/// A successful entry in a batch delete result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedObject {
    /// The deleted key.
    pub key: String,
    /// The version ID that was removed, if a specific version was addressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Whether the deletion created (or removed) a delete marker.
    #[serde(default)]
    pub delete_marker: bool,
    /// The version ID of the delete marker that was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_marker_version_id: Option<String>,
}

/// A failed entry in a batch delete result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteError {
    /// The key whose deletion failed.
    pub key: String,
    /// The version ID addressed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// The stable error code.
    pub code: String,
    /// A human-readable message.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Copy
// ---------------------------------------------------------------------------

/// Controls whether a copy inherits or replaces the source metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataDirective {
    /// The destination inherits the source's metadata and content type.
    #[default]
    Copy,
    /// The destination uses caller-supplied metadata, discarding the source's.
    Replace,
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

/// A part reference supplied to `complete_multipart_upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPart {
    /// The part number (1-based).
    pub part_number: i32,
    /// The expected entity tag of the stored part.
    pub etag: String,
}

/// Information about an uploaded part, as returned by `list_parts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartInfo {
    /// The part number (1-based).
    pub part_number: i32,
    /// The entity tag of the part.
    pub etag: String,
    /// The part size in bytes.
    pub size: u64,
    /// When the part was uploaded.
    pub last_modified: DateTime<Utc>,
}

/// Information about an in-progress upload, as returned by
/// `list_multipart_uploads`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInfo {
    /// The destination key.
    pub key: String,
    /// The upload ID.
    pub upload_id: String,
    /// When the upload was initiated.
    pub initiated: DateTime<Utc>,
    /// The owner who initiated the upload.
    pub owner: Owner,
}

// ---------------------------------------------------------------------------
// Bucket sub-configurations
// ---------------------------------------------------------------------------

/// Kinds of opaque bucket configuration sub-records.
///
/// These payloads are stored and returned verbatim; the engine does not
/// interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketConfigKind {
    /// Server-side encryption configuration.
    Encryption,
    /// Lifecycle configuration.
    Lifecycle,
    /// CORS rules.
    Cors,
    /// Static website hosting configuration.
    Website,
    /// Access logging configuration.
    Logging,
    /// Event notification configuration.
    Notification,
}

impl BucketConfigKind {
    /// Return the record-id prefix segment for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encryption => "encryption",
            Self::Lifecycle => "lifecycle",
            Self::Cors => "cors",
            Self::Website => "website",
            Self::Logging => "logging",
            Self::Notification => "notification",
        }
    }
}

impl fmt::Display for BucketConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_default_versioning_to_unconfigured() {
        assert_eq!(VersioningStatus::default(), VersioningStatus::Unconfigured);
        assert!(!VersioningStatus::default().is_configured());
        assert!(VersioningStatus::Enabled.is_configured());
        assert!(VersioningStatus::Suspended.is_configured());
    }

    #[test]
    fn test_should_parse_retention_mode() {
        assert_eq!(
            "GOVERNANCE".parse::<RetentionMode>().unwrap(),
            RetentionMode::Governance
        );
        assert_eq!(
            "compliance".parse::<RetentionMode>().unwrap(),
            RetentionMode::Compliance
        );
        assert!("archive".parse::<RetentionMode>().is_err());
    }

    #[test]
    fn test_should_display_retention_mode() {
        assert_eq!(RetentionMode::Governance.to_string(), "GOVERNANCE");
        assert_eq!(RetentionMode::Compliance.to_string(), "COMPLIANCE");
    }

    #[test]
    fn test_should_report_legal_hold_state() {
        assert!(LegalHoldStatus::On.is_on());
        assert!(!LegalHoldStatus::Off.is_on());
        assert_eq!(LegalHoldStatus::On.as_str(), "ON");
    }

    #[test]
    fn test_should_default_owner() {
        let owner = Owner::default();
        assert_eq!(owner.display_name, "s3lite");
        assert!(!owner.id.is_empty());
        assert_eq!(format!("{owner}"), format!("s3lite({})", owner.id));
    }

    #[test]
    fn test_should_default_metadata_directive_to_copy() {
        assert_eq!(MetadataDirective::default(), MetadataDirective::Copy);
    }

    #[test]
    fn test_should_map_config_kind_to_prefix_segment() {
        assert_eq!(BucketConfigKind::Encryption.as_str(), "encryption");
        assert_eq!(BucketConfigKind::Lifecycle.as_str(), "lifecycle");
        assert_eq!(BucketConfigKind::Cors.as_str(), "cors");
        assert_eq!(BucketConfigKind::Website.as_str(), "website");
        assert_eq!(BucketConfigKind::Logging.as_str(), "logging");
        assert_eq!(BucketConfigKind::Notification.as_str(), "notification");
    }

    #[test]
    fn test_should_serialize_retention_to_camel_case() {
        let retention = Retention {
            mode: RetentionMode::Compliance,
            retain_until: Utc::now(),
        };
        let json = serde_json::to_string(&retention).expect("test serialization");
        assert!(json.contains("retainUntil"));
        assert!(json.contains("Compliance"));
    }
}
