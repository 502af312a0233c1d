//! Configuration operation outputs.

use crate::types::{
    LegalHoldStatus, ObjectLockConfiguration, PublicAccessBlockConfig, Retention, TagSet,
};

/// Output of `get_object_lock_configuration`.
#[derive(Debug, Clone)]
pub struct GetObjectLockConfigurationOutput {
    /// The stored configuration.
    pub configuration: ObjectLockConfiguration,
}

/// Output of `get_object_retention`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectRetentionOutput {
    /// The retention of the addressed version; `None` when unset.
    pub retention: Option<Retention>,
}

/// Output of `get_object_legal_hold`.
#[derive(Debug, Clone, Default)]
pub struct GetObjectLegalHoldOutput {
    /// The legal hold status of the addressed version; `None` when unset.
    pub status: Option<LegalHoldStatus>,
}

/// Output of `get_bucket_policy`.
#[derive(Debug, Clone, Default)]
pub struct GetBucketPolicyOutput {
    /// The stored policy document.
    pub policy: String,
}

/// Output of `get_bucket_tagging`.
#[derive(Debug, Clone, Default)]
pub struct GetBucketTaggingOutput {
    /// The stored tag set.
    pub tagging: TagSet,
}

/// Output of `get_public_access_block`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetPublicAccessBlockOutput {
    /// The stored configuration.
    pub configuration: PublicAccessBlockConfig,
}

/// Output of `get_bucket_config`.
#[derive(Debug, Clone, Default)]
pub struct GetBucketConfigOutput {
    /// The stored opaque payload; `None` when never set.
    pub configuration: Option<serde_json::Value>,
}
