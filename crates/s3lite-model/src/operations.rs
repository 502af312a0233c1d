//! The operation envelope.
//!
//! [`Operation`] models the engine's request surface as tagged variants, one
//! per operation, each carrying its input struct. Dispatch-style callers (a
//! transport façade, a replay harness) match on the envelope; direct callers
//! invoke the engine's typed methods and never construct one.

use crate::input::{
    AbortMultipartUploadInput, CompleteMultipartUploadInput, CopyObjectInput, CreateBucketInput,
    CreateMultipartUploadInput, DeleteBucketConfigInput, DeleteBucketInput,
    DeleteBucketPolicyInput, DeleteBucketTaggingInput, DeleteObjectInput,
    DeleteObjectTaggingInput, DeleteObjectsInput, DeletePublicAccessBlockInput,
    GetBucketConfigInput, GetBucketPolicyInput, GetBucketTaggingInput, GetBucketVersioningInput,
    GetObjectInput, GetObjectLegalHoldInput, GetObjectLockConfigurationInput,
    GetObjectRetentionInput, GetObjectTaggingInput, GetPublicAccessBlockInput, HeadBucketInput,
    HeadObjectInput, ListBucketsInput, ListMultipartUploadsInput, ListObjectVersionsInput,
    ListObjectsInput, ListObjectsV2Input, ListPartsInput, PutBucketConfigInput,
    PutBucketPolicyInput, PutBucketTaggingInput, PutBucketVersioningInput, PutObjectInput,
    PutObjectLegalHoldInput, PutObjectLockConfigurationInput, PutObjectRetentionInput,
    PutObjectTaggingInput, PutPublicAccessBlockInput, UploadPartInput,
};

/// A single engine request as a tagged variant.
#[derive(Debug)]
#[allow(missing_docs)] // Variant names mirror the operations they wrap.
pub enum Operation {
    CreateBucket(CreateBucketInput),
    HeadBucket(HeadBucketInput),
    DeleteBucket(DeleteBucketInput),
    ListBuckets(ListBucketsInput),
    PutBucketVersioning(PutBucketVersioningInput),
    GetBucketVersioning(GetBucketVersioningInput),
    PutObject(PutObjectInput),
    GetObject(GetObjectInput),
    HeadObject(HeadObjectInput),
    DeleteObject(DeleteObjectInput),
    DeleteObjects(DeleteObjectsInput),
    CopyObject(CopyObjectInput),
    ListObjects(ListObjectsInput),
    ListObjectsV2(ListObjectsV2Input),
    ListObjectVersions(ListObjectVersionsInput),
    PutObjectTagging(PutObjectTaggingInput),
    GetObjectTagging(GetObjectTaggingInput),
    DeleteObjectTagging(DeleteObjectTaggingInput),
    PutObjectLockConfiguration(PutObjectLockConfigurationInput),
    GetObjectLockConfiguration(GetObjectLockConfigurationInput),
    PutObjectRetention(PutObjectRetentionInput),
    GetObjectRetention(GetObjectRetentionInput),
    PutObjectLegalHold(PutObjectLegalHoldInput),
    GetObjectLegalHold(GetObjectLegalHoldInput),
    CreateMultipartUpload(CreateMultipartUploadInput),
    UploadPart(UploadPartInput),
    CompleteMultipartUpload(CompleteMultipartUploadInput),
    AbortMultipartUpload(AbortMultipartUploadInput),
    ListParts(ListPartsInput),
    ListMultipartUploads(ListMultipartUploadsInput),
    PutBucketPolicy(PutBucketPolicyInput),
    GetBucketPolicy(GetBucketPolicyInput),
    DeleteBucketPolicy(DeleteBucketPolicyInput),
    PutBucketTagging(PutBucketTaggingInput),
    GetBucketTagging(GetBucketTaggingInput),
    DeleteBucketTagging(DeleteBucketTaggingInput),
    PutPublicAccessBlock(PutPublicAccessBlockInput),
    GetPublicAccessBlock(GetPublicAccessBlockInput),
    DeletePublicAccessBlock(DeletePublicAccessBlockInput),
    PutBucketConfig(PutBucketConfigInput),
    GetBucketConfig(GetBucketConfigInput),
    DeleteBucketConfig(DeleteBucketConfigInput),
}

/// The discriminant of an [`Operation`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // Variant names mirror the operations they identify.
pub enum OperationKind {
    CreateBucket,
    HeadBucket,
    DeleteBucket,
    ListBuckets,
    PutBucketVersioning,
    GetBucketVersioning,
    PutObject,
    GetObject,
    HeadObject,
    DeleteObject,
    DeleteObjects,
    CopyObject,
    ListObjects,
    ListObjectsV2,
    ListObjectVersions,
    PutObjectTagging,
    GetObjectTagging,
    DeleteObjectTagging,
    PutObjectLockConfiguration,
    GetObjectLockConfiguration,
    PutObjectRetention,
    GetObjectRetention,
    PutObjectLegalHold,
    GetObjectLegalHold,
    CreateMultipartUpload,
    UploadPart,
    CompleteMultipartUpload,
    AbortMultipartUpload,
    ListParts,
    ListMultipartUploads,
    PutBucketPolicy,
    GetBucketPolicy,
    DeleteBucketPolicy,
    PutBucketTagging,
    GetBucketTagging,
    DeleteBucketTagging,
    PutPublicAccessBlock,
    GetPublicAccessBlock,
    DeletePublicAccessBlock,
    PutBucketConfig,
    GetBucketConfig,
    DeleteBucketConfig,
}

impl Operation {
    /// Returns the discriminant of this operation.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreateBucket(_) => OperationKind::CreateBucket,
            Self::HeadBucket(_) => OperationKind::HeadBucket,
            Self::DeleteBucket(_) => OperationKind::DeleteBucket,
            Self::ListBuckets(_) => OperationKind::ListBuckets,
            Self::PutBucketVersioning(_) => OperationKind::PutBucketVersioning,
            Self::GetBucketVersioning(_) => OperationKind::GetBucketVersioning,
            Self::PutObject(_) => OperationKind::PutObject,
            Self::GetObject(_) => OperationKind::GetObject,
            Self::HeadObject(_) => OperationKind::HeadObject,
            Self::DeleteObject(_) => OperationKind::DeleteObject,
            Self::DeleteObjects(_) => OperationKind::DeleteObjects,
            Self::CopyObject(_) => OperationKind::CopyObject,
            Self::ListObjects(_) => OperationKind::ListObjects,
            Self::ListObjectsV2(_) => OperationKind::ListObjectsV2,
            Self::ListObjectVersions(_) => OperationKind::ListObjectVersions,
            Self::PutObjectTagging(_) => OperationKind::PutObjectTagging,
            Self::GetObjectTagging(_) => OperationKind::GetObjectTagging,
            Self::DeleteObjectTagging(_) => OperationKind::DeleteObjectTagging,
            Self::PutObjectLockConfiguration(_) => OperationKind::PutObjectLockConfiguration,
            Self::GetObjectLockConfiguration(_) => OperationKind::GetObjectLockConfiguration,
            Self::PutObjectRetention(_) => OperationKind::PutObjectRetention,
            Self::GetObjectRetention(_) => OperationKind::GetObjectRetention,
            Self::PutObjectLegalHold(_) => OperationKind::PutObjectLegalHold,
            Self::GetObjectLegalHold(_) => OperationKind::GetObjectLegalHold,
            Self::CreateMultipartUpload(_) => OperationKind::CreateMultipartUpload,
            Self::UploadPart(_) => OperationKind::UploadPart,
            Self::CompleteMultipartUpload(_) => OperationKind::CompleteMultipartUpload,
            Self::AbortMultipartUpload(_) => OperationKind::AbortMultipartUpload,
            Self::ListParts(_) => OperationKind::ListParts,
            Self::ListMultipartUploads(_) => OperationKind::ListMultipartUploads,
            Self::PutBucketPolicy(_) => OperationKind::PutBucketPolicy,
            Self::GetBucketPolicy(_) => OperationKind::GetBucketPolicy,
            Self::DeleteBucketPolicy(_) => OperationKind::DeleteBucketPolicy,
            Self::PutBucketTagging(_) => OperationKind::PutBucketTagging,
            Self::GetBucketTagging(_) => OperationKind::GetBucketTagging,
            Self::DeleteBucketTagging(_) => OperationKind::DeleteBucketTagging,
            Self::PutPublicAccessBlock(_) => OperationKind::PutPublicAccessBlock,
            Self::GetPublicAccessBlock(_) => OperationKind::GetPublicAccessBlock,
            Self::DeletePublicAccessBlock(_) => OperationKind::DeletePublicAccessBlock,
            Self::PutBucketConfig(_) => OperationKind::PutBucketConfig,
            Self::GetBucketConfig(_) => OperationKind::GetBucketConfig,
            Self::DeleteBucketConfig(_) => OperationKind::DeleteBucketConfig,
        }
    }

    /// Returns the bucket this operation addresses, if any.
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Self::ListBuckets(_) => None,
            Self::CreateBucket(i) => Some(&i.bucket),
            Self::HeadBucket(i) => Some(&i.bucket),
            Self::DeleteBucket(i) => Some(&i.bucket),
            Self::PutBucketVersioning(i) => Some(&i.bucket),
            Self::GetBucketVersioning(i) => Some(&i.bucket),
            Self::PutObject(i) => Some(&i.bucket),
            Self::GetObject(i) => Some(&i.bucket),
            Self::HeadObject(i) => Some(&i.bucket),
            Self::DeleteObject(i) => Some(&i.bucket),
            Self::DeleteObjects(i) => Some(&i.bucket),
            Self::CopyObject(i) => Some(&i.bucket),
            Self::ListObjects(i) => Some(&i.bucket),
            Self::ListObjectsV2(i) => Some(&i.bucket),
            Self::ListObjectVersions(i) => Some(&i.bucket),
            Self::PutObjectTagging(i) => Some(&i.bucket),
            Self::GetObjectTagging(i) => Some(&i.bucket),
            Self::DeleteObjectTagging(i) => Some(&i.bucket),
            Self::PutObjectLockConfiguration(i) => Some(&i.bucket),
            Self::GetObjectLockConfiguration(i) => Some(&i.bucket),
            Self::PutObjectRetention(i) => Some(&i.bucket),
            Self::GetObjectRetention(i) => Some(&i.bucket),
            Self::PutObjectLegalHold(i) => Some(&i.bucket),
            Self::GetObjectLegalHold(i) => Some(&i.bucket),
            Self::CreateMultipartUpload(i) => Some(&i.bucket),
            Self::UploadPart(i) => Some(&i.bucket),
            Self::CompleteMultipartUpload(i) => Some(&i.bucket),
            Self::AbortMultipartUpload(i) => Some(&i.bucket),
            Self::ListParts(i) => Some(&i.bucket),
            Self::ListMultipartUploads(i) => Some(&i.bucket),
            Self::PutBucketPolicy(i) => Some(&i.bucket),
            Self::GetBucketPolicy(i) => Some(&i.bucket),
            Self::DeleteBucketPolicy(i) => Some(&i.bucket),
            Self::PutBucketTagging(i) => Some(&i.bucket),
            Self::GetBucketTagging(i) => Some(&i.bucket),
            Self::DeleteBucketTagging(i) => Some(&i.bucket),
            Self::PutPublicAccessBlock(i) => Some(&i.bucket),
            Self::GetPublicAccessBlock(i) => Some(&i.bucket),
            Self::DeletePublicAccessBlock(i) => Some(&i.bucket),
            Self::PutBucketConfig(i) => Some(&i.bucket),
            Self::GetBucketConfig(i) => Some(&i.bucket),
            Self::DeleteBucketConfig(i) => Some(&i.bucket),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_report_operation_kind() {
        let op = Operation::CreateBucket(CreateBucketInput {
            bucket: "b".to_owned(),
            object_lock_enabled: false,
        });
        assert_eq!(op.kind(), OperationKind::CreateBucket);
    }

    #[test]
    fn test_should_expose_bucket_name() {
        let op = Operation::HeadBucket(HeadBucketInput {
            bucket: "photos".to_owned(),
            expected_bucket_owner: None,
        });
        assert_eq!(op.bucket(), Some("photos"));

        let op = Operation::ListBuckets(ListBucketsInput {});
        assert_eq!(op.bucket(), None);
    }
}
