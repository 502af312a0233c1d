//! Version-id and entity-tag generation.
//!
//! Version ids are 128-bit identifiers rendered as 32 lowercase hex
//! characters: a 64-bit strictly monotonic microsecond prefix followed by a
//! 64-bit random tail. The prefix is clamped so it never retreats within a
//! process, which gives the key property the lister relies on: for any two
//! ids minted by the same generator, the later one sorts strictly greater
//! under plain byte comparison.
//!
//! Entity tags are lowercase hex SHA-256 digests of the content bytes, so
//! two writes of identical bytes always produce identical etags and a copy's
//! etag equals its source's.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::anyhow;
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use s3lite_model::error::{StorageError, StorageResult};

/// The distinguished version id used for writes in Unconfigured and
/// Suspended versioning modes.
pub const NULL_VERSION_ID: &str = "null";

// ---------------------------------------------------------------------------
// VersionIdGen
// ---------------------------------------------------------------------------

/// Monotonic, lexicographically sortable version-id generator.
#[derive(Debug, Default)]
pub struct VersionIdGen {
    /// The last microsecond value handed out; never retreats.
    last_micros: AtomicU64,
}

impl VersionIdGen {
    /// Create a new generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh version id.
    ///
    /// Ids minted later by the same generator sort strictly greater
    /// lexicographically, even when the wall clock does not advance between
    /// calls.
    #[must_use]
    pub fn mint(&self) -> String {
        let micros = self.next_micros();
        let tail: u64 = rand::random();
        format!("{micros:016x}{tail:016x}")
    }

    /// Return the next microsecond counter value, clamped to be strictly
    /// greater than every previously returned value.
    fn next_micros(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_micros()).unwrap_or(0);
        let mut last = self.last_micros.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_micros.compare_exchange_weak(
                last,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => last = observed,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entity tags
// ---------------------------------------------------------------------------

/// Compute the entity tag (lowercase hex SHA-256) of a byte slice.
///
/// # Examples
///
/// ```
/// use s3lite_core::idgen::content_etag;
///
/// let etag = content_etag(b"hello");
/// assert_eq!(etag.len(), 64);
/// assert_eq!(etag, content_etag(b"hello"));
/// assert_ne!(etag, content_etag(b"world"));
/// ```
#[must_use]
pub fn content_etag(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Incremental etag hasher for chunked body consumption.
///
/// Feeds chunks as they are pulled from the request body and produces the
/// final etag plus the byte count.
#[derive(Debug, Default)]
pub struct EtagHasher {
    hasher: Sha256,
    size: u64,
}

impl EtagHasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of content.
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.size += chunk.len() as u64;
    }

    /// Finish hashing, returning `(etag, size)`.
    #[must_use]
    pub fn finish(self) -> (String, u64) {
        (hex::encode(self.hasher.finalize()), self.size)
    }
}

/// Compute the composite multipart etag from the parts' individual etags.
///
/// The form is `{hex(sha256(concat(raw part digests)))}-{count}`. Callers
/// must pass the parts in assembly order.
pub fn multipart_etag<'a, I>(part_etags: I) -> StorageResult<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Sha256::new();
    let mut count = 0usize;
    for etag in part_etags {
        let digest = hex::decode(etag)
            .map_err(|e| StorageError::Internal(anyhow!("stored part etag is not hex: {e}")))?;
        hasher.update(&digest);
        count += 1;
    }
    Ok(format!("{}-{count}", hex::encode(hasher.finalize())))
}

/// Generate a unique upload id for multipart uploads.
#[must_use]
pub fn generate_upload_id() -> String {
    Uuid::new_v4().simple().to_string()
}
