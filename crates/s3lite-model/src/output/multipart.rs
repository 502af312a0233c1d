//! Multipart upload operation outputs.

use crate::types::{PartInfo, UploadInfo};

/// Output of `create_multipart_upload`.
#[derive(Debug, Clone, Default)]
pub struct CreateMultipartUploadOutput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The new upload ID.
    pub upload_id: String,
}

/// Output of `upload_part`.
#[derive(Debug, Clone, Default)]
pub struct UploadPartOutput {
    /// The entity tag of the stored part.
    pub etag: String,
}

/// Output of `complete_multipart_upload`.
#[derive(Debug, Clone, Default)]
pub struct CompleteMultipartUploadOutput {
    /// The destination bucket.
    pub bucket: String,
    /// The destination key.
    pub key: String,
    /// The composite entity tag (`{hex digest}-{part count}`).
    pub etag: String,
    /// The version ID assigned to the assembled object.
    pub version_id: String,
    /// The total size of the assembled object in bytes.
    pub size: u64,
}

/// Output of `abort_multipart_upload`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortMultipartUploadOutput {}

/// Output of `list_parts`.
#[derive(Debug, Clone, Default)]
pub struct ListPartsOutput {
    /// The upload's parts, ascending by part number.
    pub parts: Vec<PartInfo>,
    /// Whether more parts remain.
    pub is_truncated: bool,
    /// The part number to resume after, set when truncated.
    pub next_part_number_marker: Option<i32>,
}

/// Output of `list_multipart_uploads`.
#[derive(Debug, Clone, Default)]
pub struct ListMultipartUploadsOutput {
    /// In-progress uploads, ascending by key then initiation time.
    pub uploads: Vec<UploadInfo>,
    /// Whether more uploads remain.
    pub is_truncated: bool,
}
