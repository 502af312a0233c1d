//! Presigned URL minting and verification.
//!
//! A presigned URL encodes the verb, bucket, key, optional version id, and
//! expiry in query parameters, signed with HMAC-SHA256 over a canonical
//! string. Verification recomputes the signature, compares in constant
//! time, and rejects expired or tampered URLs.
//!
//! URL shape:
//!
//! ```text
//! {scheme}://{bucket}/{key}?X-Expires={unix-seconds}&X-Verb={GET|PUT|DELETE}[&versionId={v}]&X-Signature={hex}
//! ```
//!
//! The key path segment is percent-encoded.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use s3lite_model::error::{StorageError, StorageResult};

type HmacSha256 = Hmac<Sha256>;

/// Characters escaped in the key path segment. `/` stays literal so keys
/// keep their path shape.
const KEY_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'&')
    .add(b'=')
    .add(b'+');

/// The verb a presigned URL authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresignVerb {
    /// Read the object.
    Get,
    /// Write the object.
    Put,
    /// Delete the object.
    Delete,
}

impl PresignVerb {
    /// Return the canonical string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for PresignVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresignVerb {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(StorageError::InvalidArgument {
                message: format!("unknown presign verb: {other}"),
            }),
        }
    }
}

/// The validated claims carried by a presigned URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignClaims {
    /// The authorized verb.
    pub verb: PresignVerb,
    /// The bucket.
    pub bucket: String,
    /// The object key (decoded).
    pub key: String,
    /// Optional version id.
    pub version_id: Option<String>,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Mint a presigned URL for the given claims.
#[must_use]
pub fn presign_url(secret: &[u8], scheme: &str, claims: &PresignClaims) -> String {
    let expires = claims.expires_at.timestamp();
    let signature = compute_signature(secret, claims);
    let encoded_key = utf8_percent_encode(&claims.key, KEY_SEGMENT);

    let mut url = format!(
        "{scheme}://{}/{encoded_key}?X-Expires={expires}&X-Verb={}",
        claims.bucket, claims.verb
    );
    if let Some(version_id) = &claims.version_id {
        url.push_str("&versionId=");
        url.push_str(version_id);
    }
    url.push_str("&X-Signature=");
    url.push_str(&signature);
    url
}

/// Verify a presigned URL at `now`, returning its claims.
///
/// Fails with `AccessDenied` on signature mismatch or expiry, and
/// `InvalidArgument` on malformed URLs.
pub fn verify_url(secret: &[u8], url: &str, now: DateTime<Utc>) -> StorageResult<PresignClaims> {
    let rest = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .ok_or_else(|| malformed("missing scheme"))?;
    let (bucket, path_and_query) = rest
        .split_once('/')
        .ok_or_else(|| malformed("missing key path"))?;
    let (encoded_key, query) = path_and_query
        .split_once('?')
        .ok_or_else(|| malformed("missing query"))?;

    if bucket.is_empty() || encoded_key.is_empty() {
        return Err(malformed("empty bucket or key"));
    }
    let key = percent_decode_str(encoded_key)
        .decode_utf8()
        .map_err(|_| malformed("key is not valid UTF-8"))?
        .into_owned();

    let mut expires: Option<i64> = None;
    let mut verb: Option<PresignVerb> = None;
    let mut version_id: Option<String> = None;
    let mut signature: Option<String> = None;
    for param in query.split('&').filter(|p| !p.is_empty()) {
        let (name, value) = param.split_once('=').unwrap_or((param, ""));
        match name {
            "X-Expires" => {
                expires = Some(
                    value
                        .parse()
                        .map_err(|_| malformed("X-Expires is not an integer"))?,
                );
            }
            "X-Verb" => verb = Some(value.parse()?),
            "versionId" => version_id = Some(value.to_owned()),
            "X-Signature" => signature = Some(value.to_owned()),
            _ => {}
        }
    }

    let expires = expires.ok_or_else(|| malformed("missing X-Expires"))?;
    let verb = verb.ok_or_else(|| malformed("missing X-Verb"))?;
    let signature = signature.ok_or_else(|| malformed("missing X-Signature"))?;

    let expires_at = DateTime::<Utc>::from_timestamp(expires, 0)
        .ok_or_else(|| malformed("X-Expires out of range"))?;

    let claims = PresignClaims {
        verb,
        bucket: bucket.to_owned(),
        key,
        version_id,
        expires_at,
    };

    let expected = compute_signature(secret, &claims);
    let matches: bool = expected
        .as_bytes()
        .ct_eq(signature.as_bytes())
        .into();
    if !matches {
        return Err(StorageError::AccessDenied);
    }
    if now > claims.expires_at {
        return Err(StorageError::AccessDenied);
    }

    Ok(claims)
}

/// HMAC-SHA256 over the canonical claim string, hex-encoded.
fn compute_signature(secret: &[u8], claims: &PresignClaims) -> String {
    let canonical = format!(
        "{}\n{}\n{}\n{}\n{}",
        claims.verb,
        claims.bucket,
        claims.key,
        claims.version_id.as_deref().unwrap_or(""),
        claims.expires_at.timestamp()
    );
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn malformed(detail: &str) -> StorageError {
    StorageError::InvalidArgument {
        message: format!("malformed presigned URL: {detail}"),
    }
}
