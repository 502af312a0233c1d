//! Engine configuration.
//!
//! Provides [`EngineConfig`] for configuring the s3lite object engine.
//! Values can be loaded from environment variables via
//! [`EngineConfig::from_env`].

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Object engine configuration.
///
/// All fields have sensible defaults for an embedded development store.
///
/// # Examples
///
/// ```
/// use s3lite_core::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.default_region, "us-east-1");
/// assert!(config.body_chunk_size > 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Default region reported for buckets.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Canonical owner id recorded on buckets and objects.
    #[builder(default = String::from(
        "c41dd96a2d4e9f0b76f62bd1f38a11f1b22c7a9f53cd1d2f09d8e3a5c0ab94de"
    ))]
    pub owner_id: String,

    /// Display name paired with the owner id.
    #[builder(default = String::from("s3lite"))]
    pub owner_display_name: String,

    /// Secret used to sign and verify presigned URLs.
    #[builder(default = String::from("s3lite-dev-secret"))]
    pub presign_secret: String,

    /// Chunk size (in bytes) used when hashing request bodies. Long
    /// transfers hit a suspension point between chunks so cancellation can
    /// take effect.
    #[builder(default = 65_536)]
    pub body_chunk_size: usize,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_region: String::from("us-east-1"),
            owner_id: String::from(
                "c41dd96a2d4e9f0b76f62bd1f38a11f1b22c7a9f53cd1d2f09d8e3a5c0ab94de",
            ),
            owner_display_name: String::from("s3lite"),
            presign_secret: String::from("s3lite-dev-secret"),
            body_chunk_size: 65_536,
            log_level: String::from("info"),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `S3LITE_REGION` | `us-east-1` |
    /// | `S3LITE_OWNER_ID` | built-in canonical id |
    /// | `S3LITE_OWNER_DISPLAY_NAME` | `s3lite` |
    /// | `S3LITE_PRESIGN_SECRET` | `s3lite-dev-secret` |
    /// | `S3LITE_BODY_CHUNK_SIZE` | `65536` |
    /// | `S3LITE_LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("S3LITE_REGION") {
            config.default_region = v;
        }
        if let Ok(v) = std::env::var("S3LITE_OWNER_ID") {
            config.owner_id = v;
        }
        if let Ok(v) = std::env::var("S3LITE_OWNER_DISPLAY_NAME") {
            config.owner_display_name = v;
        }
        if let Ok(v) = std::env::var("S3LITE_PRESIGN_SECRET") {
            config.presign_secret = v;
        }
        if let Ok(v) = std::env::var("S3LITE_BODY_CHUNK_SIZE") {
            if let Ok(n) = v.parse::<usize>() {
                config.body_chunk_size = n.max(1);
            }
        }
        if let Ok(v) = std::env::var("S3LITE_LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Build the [`Owner`](s3lite_model::types::Owner) recorded on buckets
    /// and objects.
    #[must_use]
    pub fn owner(&self) -> s3lite_model::types::Owner {
        s3lite_model::types::Owner {
            id: self.owner_id.clone(),
            display_name: self.owner_display_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.default_region, "us-east-1");
        assert_eq!(config.owner_display_name, "s3lite");
        assert_eq!(config.body_chunk_size, 65_536);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = EngineConfig::builder()
            .default_region("eu-west-1".into())
            .owner_id("owner-1".into())
            .owner_display_name("tester".into())
            .presign_secret("secret".into())
            .body_chunk_size(1024)
            .log_level("debug".into())
            .build();

        assert_eq!(config.default_region, "eu-west-1");
        assert_eq!(config.owner_id, "owner-1");
        assert_eq!(config.body_chunk_size, 1024);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_should_build_owner_from_config() {
        let config = EngineConfig::builder()
            .owner_id("abc".into())
            .owner_display_name("dev".into())
            .build();
        let owner = config.owner();
        assert_eq!(owner.id, "abc");
        assert_eq!(owner.display_name, "dev");
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).expect("test serialization");
        assert!(json.contains("defaultRegion"));
        assert!(json.contains("bodyChunkSize"));
    }
}
