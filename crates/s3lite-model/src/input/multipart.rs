//! Multipart upload operation inputs.

use std::collections::HashMap;

use crate::request::StreamingBlob;
use crate::types::{CompletedPart, TagSet};

/// Input for `create_multipart_upload`.
#[derive(Debug, Clone, Default)]
pub struct CreateMultipartUploadInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The MIME type of the final object.
    pub content_type: Option<String>,
    /// User-defined metadata pairs applied to the final object.
    pub metadata: HashMap<String, String>,
    /// Optional tag set applied to the final object.
    pub tagging: Option<TagSet>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `upload_part`.
#[derive(Debug, Clone, Default)]
pub struct UploadPartInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The upload ID from `create_multipart_upload`.
    pub upload_id: String,
    /// The part number, between 1 and 10 000 inclusive.
    pub part_number: i32,
    /// The part content.
    pub body: StreamingBlob,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `complete_multipart_upload`.
#[derive(Debug, Clone, Default)]
pub struct CompleteMultipartUploadInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The upload ID.
    pub upload_id: String,
    /// The parts to assemble, in ascending part-number order.
    pub parts: Vec<CompletedPart>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `abort_multipart_upload`.
#[derive(Debug, Clone, Default)]
pub struct AbortMultipartUploadInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The upload ID.
    pub upload_id: String,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `list_parts`.
#[derive(Debug, Clone, Default)]
pub struct ListPartsInput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The upload ID.
    pub upload_id: String,
    /// Maximum number of parts to return.
    pub max_parts: Option<usize>,
    /// Resume listing strictly after this part number.
    pub part_number_marker: Option<i32>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}

/// Input for `list_multipart_uploads`.
#[derive(Debug, Clone, Default)]
pub struct ListMultipartUploadsInput {
    /// The bucket name.
    pub bucket: String,
    /// Only uploads for keys starting with this prefix are returned.
    pub prefix: Option<String>,
    /// Maximum number of uploads to return.
    pub max_uploads: Option<usize>,
    /// Expected owner id; mismatch fails with `AccessDenied`.
    pub expected_bucket_owner: Option<String>,
}
