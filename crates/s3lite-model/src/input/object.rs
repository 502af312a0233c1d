//! Object operation inputs.

use std::collections::HashMap;

use crate::request::{Preconditions, StreamingBlob};
use crate::types::{
    LegalHoldStatus, MetadataDirective, ObjectIdentifier, Retention, TagSet,
};

/// Input for `put_object`.
#[derive(Debug, Clone, Default)]
pub struct PutObjectInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The object content.
    pub body: StreamingBlob,
    /// The MIME type of the content.
    pub content_type: Option<String>,
    /// User-defined metadata pairs (names are case-insensitive).
    pub metadata: HashMap<String, String>,
    /// Optional tag set applied to the new version.
    pub tagging: Option<TagSet>,
    /// Write preconditions, evaluated against the current head inside the
    /// key lock.
    pub preconditions: Preconditions,
    /// Optional retention applied to the new version.
    pub retention: Option<Retention>,
    /// Optional legal hold applied to the new version.
    pub legal_hold: Option<LegalHoldStatus>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_object`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID. `"null"` addresses the stored null version.
    pub version_id: Option<String>,
    /// Read preconditions.
    pub preconditions: Preconditions,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `head_object`.
#[derive(Debug, Clone, Default)]
pub struct HeadObjectInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID. Unlike GET, HEAD of a delete marker by version
    /// ID succeeds and reports the marker.
    pub version_id: Option<String>,
    /// Read preconditions.
    pub preconditions: Preconditions,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `delete_object`.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID for a permanent version delete.
    pub version_id: Option<String>,
    /// Delete preconditions, evaluated against the current head inside the
    /// key lock.
    pub preconditions: Preconditions,
    /// Assert the governance-bypass capability for retention-bound versions.
    pub bypass_governance_retention: bool,
    /// MFA assertion, required for permanent version removal when the
    /// bucket has MFA delete enabled.
    pub mfa: Option<String>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `delete_objects` (batch delete).
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectsInput {
    /// The bucket name.
    pub bucket: String,
    /// The entries to delete.
    pub objects: Vec<ObjectIdentifier>,
    /// Suppress the `deleted` list in the output, returning only errors.
    pub quiet: bool,
    /// Assert the governance-bypass capability for retention-bound versions.
    pub bypass_governance_retention: bool,
    /// MFA assertion for permanent version removals.
    pub mfa: Option<String>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `copy_object`.
#[derive(Debug, Clone, Default)]
pub struct CopyObjectInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The source bucket.
    pub source_bucket: String,
    /// The source key.
    pub source_key: String,
    /// Optional source version ID.
    pub source_version_id: Option<String>,
    /// Whether the destination inherits or replaces the source metadata.
    pub metadata_directive: MetadataDirective,
    /// Replacement content type (used with [`MetadataDirective::Replace`]).
    pub content_type: Option<String>,
    /// Replacement user metadata (used with [`MetadataDirective::Replace`]).
    pub metadata: HashMap<String, String>,
    /// Optional tag set applied to the destination version.
    pub tagging: Option<TagSet>,
    /// Preconditions evaluated against the source object.
    pub source_preconditions: Preconditions,
    /// Expected owner id of the destination bucket.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `get_object_tagging`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectTaggingInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID.
    pub version_id: Option<String>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `put_object_tagging`.
#[derive(Debug, Clone, Default)]
pub struct PutObjectTaggingInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID.
    pub version_id: Option<String>,
    /// The tag set to store.
    pub tagging: TagSet,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `delete_object_tagging`.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectTaggingInput {
    /// The bucket name.
    pub bucket: String,
    /// The object key.
    pub key: String,
    /// Optional version ID.
    pub version_id: Option<String>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}
