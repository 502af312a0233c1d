//! Engine error types.
//!
//! Defines [`StorageError`], the single error enum every engine operation
//! returns. Each variant carries a stable S3-style error code string
//! (via [`StorageError::code`]) and an HTTP status (via
//! [`StorageError::status_code`]) so a transport façade can render error
//! payloads without inspecting variants.
//!
//! # Usage
//!
//! ```
//! use s3lite_model::error::StorageError;
//!
//! let err = StorageError::NoSuchBucket {
//!     bucket: "my-bucket".to_owned(),
//! };
//! assert_eq!(err.code(), "NoSuchBucket");
//! assert_eq!(err.status_code(), 404);
//! ```

/// Engine error type.
///
/// Variants map one-to-one onto the stable error codes surfaced to callers.
/// Error kinds are never converted into one another: a missing version is
/// `NoSuchVersion`, never `NoSuchKey`, and vice versa.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    // -----------------------------------------------------------------------
    // Bucket errors
    // -----------------------------------------------------------------------
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The requested bucket name is already taken.
    #[error("The requested bucket name is not available: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The bucket is not empty and cannot be deleted.
    #[error("The bucket you tried to delete is not empty: {bucket}")]
    BucketNotEmpty {
        /// The bucket name that is not empty.
        bucket: String,
    },

    // -----------------------------------------------------------------------
    // Object / key errors
    // -----------------------------------------------------------------------
    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The specified version does not exist.
    #[error("The specified version does not exist: key={key}, version_id={version_id}")]
    NoSuchVersion {
        /// The key for the version.
        key: String,
        /// The version ID that was not found.
        version_id: String,
    },

    /// The operation is not allowed against this resource (e.g. GET of a
    /// delete marker addressed by version ID).
    #[error("The specified method is not allowed against this resource")]
    MethodNotAllowed,

    // -----------------------------------------------------------------------
    // Conditional request errors
    // -----------------------------------------------------------------------
    /// A precondition specified in the request was not met.
    #[error("At least one of the preconditions you specified did not hold")]
    PreconditionFailed,

    /// The resource has not been modified (conditional read short-circuit).
    #[error("Not modified")]
    NotModified,

    // -----------------------------------------------------------------------
    // Access errors
    // -----------------------------------------------------------------------
    /// Access denied (owner mismatch, retention, legal hold, or MFA delete).
    #[error("Access Denied")]
    AccessDenied,

    // -----------------------------------------------------------------------
    // Multipart upload errors
    // -----------------------------------------------------------------------
    /// The specified multipart upload does not exist.
    #[error("The specified upload does not exist: {upload_id}")]
    NoSuchUpload {
        /// The upload ID that was not found.
        upload_id: String,
    },

    /// One or more of the specified parts could not be found or did not
    /// match the expected entity tag.
    #[error("One or more of the specified parts could not be found")]
    InvalidPart,

    /// The list of parts was not in ascending order.
    #[error("The list of parts was not in ascending order")]
    InvalidPartOrder,

    // -----------------------------------------------------------------------
    // Validation errors
    // -----------------------------------------------------------------------
    /// An argument provided is invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// The provided bucket policy is not valid JSON.
    #[error("The policy is not in the valid JSON format")]
    MalformedPolicy,

    // -----------------------------------------------------------------------
    // Configuration-not-found errors
    // -----------------------------------------------------------------------
    /// The object lock configuration was never set on the bucket.
    #[error("Object Lock configuration does not exist for this bucket")]
    ObjectLockConfigurationNotFound,

    /// The bucket policy does not exist.
    #[error("The bucket policy does not exist")]
    NoSuchBucketPolicy,

    /// The tag set does not exist.
    #[error("The TagSet does not exist")]
    NoSuchTagSet,

    /// The public access block configuration does not exist.
    #[error("The public access block configuration was not found")]
    NoSuchPublicAccessBlockConfiguration,

    // -----------------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------------
    /// The operation was aborted by the caller's cancellation signal before
    /// its write batch committed.
    #[error("The operation was aborted before completion")]
    OperationAborted,

    // -----------------------------------------------------------------------
    // Internal / substrate
    // -----------------------------------------------------------------------
    /// Internal error with context (substrate I/O, codec failures).
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl StorageError {
    /// Returns the stable error code string for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSuchBucket { .. } => "NoSuchBucket",
            Self::BucketAlreadyExists { .. } => "BucketAlreadyExists",
            Self::BucketNotEmpty { .. } => "BucketNotEmpty",
            Self::NoSuchKey { .. } => "NoSuchKey",
            Self::NoSuchVersion { .. } => "NoSuchVersion",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::PreconditionFailed => "PreconditionFailed",
            Self::NotModified => "NotModified",
            Self::AccessDenied => "AccessDenied",
            Self::NoSuchUpload { .. } => "NoSuchUpload",
            Self::InvalidPart => "InvalidPart",
            Self::InvalidPartOrder => "InvalidPartOrder",
            Self::InvalidArgument { .. } => "InvalidArgument",
            Self::MalformedPolicy => "MalformedPolicy",
            Self::ObjectLockConfigurationNotFound => "ObjectLockConfigurationNotFoundError",
            Self::NoSuchBucketPolicy => "NoSuchBucketPolicy",
            Self::NoSuchTagSet => "NoSuchTagSet",
            Self::NoSuchPublicAccessBlockConfiguration => "NoSuchPublicAccessBlockConfiguration",
            Self::OperationAborted => "OperationAborted",
            Self::Internal(_) => "InternalError",
        }
    }

    /// Returns the HTTP status code associated with this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotModified => 304,
            Self::InvalidPart | Self::InvalidPartOrder | Self::InvalidArgument { .. } => 400,
            Self::MalformedPolicy => 400,
            Self::AccessDenied => 403,
            Self::NoSuchBucket { .. }
            | Self::NoSuchKey { .. }
            | Self::NoSuchVersion { .. }
            | Self::NoSuchUpload { .. }
            | Self::ObjectLockConfigurationNotFound
            | Self::NoSuchBucketPolicy
            | Self::NoSuchTagSet
            | Self::NoSuchPublicAccessBlockConfiguration => 404,
            Self::MethodNotAllowed => 405,
            Self::OperationAborted => 408,
            Self::BucketAlreadyExists { .. } | Self::BucketNotEmpty { .. } => 409,
            Self::PreconditionFailed => 412,
            Self::Internal(_) => 500,
        }
    }
}

/// Convenience result type for engine operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_not_found_errors_to_404() {
        let cases = [
            StorageError::NoSuchBucket {
                bucket: "b".to_owned(),
            },
            StorageError::NoSuchKey {
                key: "k".to_owned(),
            },
            StorageError::NoSuchVersion {
                key: "k".to_owned(),
                version_id: "v".to_owned(),
            },
            StorageError::NoSuchUpload {
                upload_id: "u".to_owned(),
            },
            StorageError::ObjectLockConfigurationNotFound,
            StorageError::NoSuchBucketPolicy,
            StorageError::NoSuchTagSet,
            StorageError::NoSuchPublicAccessBlockConfiguration,
        ];
        for err in cases {
            assert_eq!(err.status_code(), 404, "wrong status for {}", err.code());
        }
    }

    #[test]
    fn test_should_map_conflict_errors_to_409() {
        assert_eq!(
            StorageError::BucketAlreadyExists {
                bucket: "taken".to_owned()
            }
            .status_code(),
            409
        );
        assert_eq!(
            StorageError::BucketNotEmpty {
                bucket: "full".to_owned()
            }
            .status_code(),
            409
        );
    }

    #[test]
    fn test_should_expose_stable_codes() {
        assert_eq!(StorageError::PreconditionFailed.code(), "PreconditionFailed");
        assert_eq!(StorageError::NotModified.code(), "NotModified");
        assert_eq!(StorageError::MethodNotAllowed.code(), "MethodNotAllowed");
        assert_eq!(
            StorageError::ObjectLockConfigurationNotFound.code(),
            "ObjectLockConfigurationNotFoundError"
        );
    }

    #[test]
    fn test_should_map_precondition_statuses() {
        assert_eq!(StorageError::PreconditionFailed.status_code(), 412);
        assert_eq!(StorageError::NotModified.status_code(), 304);
    }

    #[test]
    fn test_should_not_conflate_version_and_key_errors() {
        let version_err = StorageError::NoSuchVersion {
            key: "k".to_owned(),
            version_id: "v".to_owned(),
        };
        let key_err = StorageError::NoSuchKey {
            key: "k".to_owned(),
        };
        assert_ne!(version_err.code(), key_err.code());
    }

    #[test]
    fn test_should_wrap_internal_error() {
        let err = StorageError::Internal(anyhow::anyhow!("substrate I/O failure"));
        assert_eq!(err.code(), "InternalError");
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("substrate I/O failure"));
    }

    #[test]
    fn test_should_include_context_in_messages() {
        let err = StorageError::NoSuchVersion {
            key: "photos/cat.jpg".to_owned(),
            version_id: "abc".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("photos/cat.jpg"));
        assert!(msg.contains("abc"));
    }
}
