//! Typed record-id composition.
//!
//! Every record lives in one flat namespace with a type-prefixed id, so
//! range scans by prefix are cheap:
//!
//! ```text
//! bucket::{name}
//! object::{bucket}::{key}
//! version::{bucket}::{key}::{version-id}
//! upload::{bucket}::{key}::{upload-id}
//! part::{bucket}::{key}::{upload-id}::{part number, zero-padded}
//! policy::{bucket}  tagging::{bucket}  pab::{bucket}  encryption::{bucket} ...
//! ```
//!
//! Ids are write-only: object keys may themselves contain the `::`
//! separator, so ids are never parsed back into components. Records carry
//! their own bucket/key/version fields, and scans that could over-match
//! (e.g. versions of key `a` vs. key `a::b`) filter on the decoded record.

/// Record id for a bucket.
#[must_use]
pub fn bucket(name: &str) -> String {
    format!("bucket::{name}")
}

/// Prefix covering all bucket records.
#[must_use]
pub fn bucket_prefix() -> String {
    "bucket::".to_owned()
}

/// Record id for the current head at `(bucket, key)`.
#[must_use]
pub fn object(bucket: &str, key: &str) -> String {
    format!("object::{bucket}::{key}")
}

/// Prefix covering all heads in `bucket`.
#[must_use]
pub fn object_prefix(bucket: &str) -> String {
    format!("object::{bucket}::")
}

/// Record id for an archived version.
#[must_use]
pub fn version(bucket: &str, key: &str, version_id: &str) -> String {
    format!("version::{bucket}::{key}::{version_id}")
}

/// Prefix covering the archived versions of `(bucket, key)`.
///
/// May over-match keys that extend `key` with the separator; callers filter
/// on the decoded record's own key field.
#[must_use]
pub fn version_prefix(bucket: &str, key: &str) -> String {
    format!("version::{bucket}::{key}::")
}

/// Prefix covering every archived version in `bucket`.
#[must_use]
pub fn bucket_versions_prefix(bucket: &str) -> String {
    format!("version::{bucket}::")
}

/// Record id for an in-progress multipart upload.
#[must_use]
pub fn upload(bucket: &str, key: &str, upload_id: &str) -> String {
    format!("upload::{bucket}::{key}::{upload_id}")
}

/// Prefix covering every in-progress upload in `bucket`.
#[must_use]
pub fn upload_prefix(bucket: &str) -> String {
    format!("upload::{bucket}::")
}

/// Record id for an uploaded part.
///
/// The part number is zero-padded so scan order equals numeric order.
#[must_use]
pub fn part(bucket: &str, key: &str, upload_id: &str, part_number: i32) -> String {
    format!("part::{bucket}::{key}::{upload_id}::{part_number:05}")
}

/// Prefix covering every part of one upload.
#[must_use]
pub fn part_prefix(bucket: &str, key: &str, upload_id: &str) -> String {
    format!("part::{bucket}::{key}::{upload_id}::")
}

/// Record id for the bucket policy sub-record.
#[must_use]
pub fn policy(bucket: &str) -> String {
    format!("policy::{bucket}")
}

/// Record id for the bucket tagging sub-record.
#[must_use]
pub fn tagging(bucket: &str) -> String {
    format!("tagging::{bucket}")
}

/// Record id for the public-access-block sub-record.
#[must_use]
pub fn public_access_block(bucket: &str) -> String {
    format!("pab::{bucket}")
}

/// Record id for an opaque configuration sub-record of the given kind.
#[must_use]
pub fn bucket_config(kind: &str, bucket: &str) -> String {
    format!("{kind}::{bucket}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_compose_typed_ids() {
        assert_eq!(bucket("b"), "bucket::b");
        assert_eq!(object("b", "path/to/k"), "object::b::path/to/k");
        assert_eq!(version("b", "k", "v1"), "version::b::k::v1");
        assert_eq!(upload("b", "k", "u1"), "upload::b::k::u1");
        assert_eq!(policy("b"), "policy::b");
        assert_eq!(tagging("b"), "tagging::b");
        assert_eq!(public_access_block("b"), "pab::b");
        assert_eq!(bucket_config("cors", "b"), "cors::b");
    }

    #[test]
    fn test_should_pad_part_numbers_for_scan_order() {
        let p2 = part("b", "k", "u", 2);
        let p10 = part("b", "k", "u", 10);
        assert!(p2 < p10, "part ids must sort numerically: {p2} vs {p10}");
        assert!(p2.starts_with(&part_prefix("b", "k", "u")));
        assert_eq!(p2, "part::b::k::u::00002");
    }

    #[test]
    fn test_should_scope_prefixes_to_bucket() {
        assert!(object("mybucket", "k").starts_with(&object_prefix("mybucket")));
        assert!(!object("mybucket2", "k").starts_with(&object_prefix("mybucket")));
        assert!(version("b", "k", "v").starts_with(&bucket_versions_prefix("b")));
    }

    #[test]
    fn test_should_note_version_prefix_over_match() {
        // Versions of key "a::b" fall inside the prefix for key "a"; scans
        // filter on the record's own key field.
        let ambiguous = version("b", "a::b", "v1");
        assert!(ambiguous.starts_with(&version_prefix("b", "a")));
    }
}
