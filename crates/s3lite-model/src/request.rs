//! Request plumbing: body streams and conditional preconditions.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StreamingBlob
// ---------------------------------------------------------------------------

/// A body payload handed to or returned by the engine.
///
/// The engine consumes request bodies exactly once: content is pulled in
/// chunks (so large uploads can observe cancellation between chunks), hashed,
/// and committed. Response bodies are read the same way.
#[derive(Debug, Clone, Default)]
pub struct StreamingBlob {
    /// The underlying bytes.
    pub data: Bytes,
}

impl StreamingBlob {
    /// Create a new blob from anything convertible to [`Bytes`].
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Returns true if the blob is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the length of the blob in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Consume the blob, returning the underlying bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Iterate over the content in chunks of at most `chunk_size` bytes.
    ///
    /// The engine pulls chunks through this iterator so that long transfers
    /// hit a suspension point between chunks.
    pub fn chunks(&self, chunk_size: usize) -> impl Iterator<Item = Bytes> + '_ {
        let size = chunk_size.max(1);
        (0..self.data.len())
            .step_by(size)
            .map(move |start| self.data.slice(start..(start + size).min(self.data.len())))
    }
}

impl From<Bytes> for StreamingBlob {
    fn from(data: Bytes) -> Self {
        Self { data }
    }
}

impl From<Vec<u8>> for StreamingBlob {
    fn from(data: Vec<u8>) -> Self {
        Self { data: data.into() }
    }
}

impl From<&'static [u8]> for StreamingBlob {
    fn from(data: &'static [u8]) -> Self {
        Self {
            data: Bytes::from_static(data),
        }
    }
}

impl From<&'static str> for StreamingBlob {
    fn from(data: &'static str) -> Self {
        Self {
            data: Bytes::from_static(data.as_bytes()),
        }
    }
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

/// Conditional-request preconditions attached to reads, writes, and deletes.
///
/// Etag lists may contain the literal `"*"` wildcard. For writes,
/// `if_none_match: ["*"]` means "only if no object exists".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preconditions {
    /// Proceed only if the current etag is in this list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_match: Option<Vec<String>>,
    /// Proceed only if the current etag is NOT in this list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_none_match: Option<Vec<String>>,
    /// Proceed only if the object was modified after this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_modified_since: Option<DateTime<Utc>>,
    /// Proceed only if the object was NOT modified after this instant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_unmodified_since: Option<DateTime<Utc>>,
}

impl Preconditions {
    /// The wildcard etag matching any (or, for `if_none_match`, every) object.
    pub const WILDCARD: &'static str = "*";

    /// Whether no precondition is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.if_match.is_none()
            && self.if_none_match.is_none()
            && self.if_modified_since.is_none()
            && self.if_unmodified_since.is_none()
    }

    /// Convenience constructor for an `If-Match` precondition on one etag.
    #[must_use]
    pub fn if_match(etag: impl Into<String>) -> Self {
        Self {
            if_match: Some(vec![etag.into()]),
            ..Self::default()
        }
    }

    /// Convenience constructor for `If-None-Match: *` ("create only").
    #[must_use]
    pub fn if_absent() -> Self {
        Self {
            if_none_match: Some(vec![Self::WILDCARD.to_owned()]),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_chunk_blob_content() {
        let blob = StreamingBlob::from(&b"abcdefghij"[..]);
        let chunks: Vec<Bytes> = blob.chunks(4).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(&chunks[0][..], b"abcd");
        assert_eq!(&chunks[1][..], b"efgh");
        assert_eq!(&chunks[2][..], b"ij");
    }

    #[test]
    fn test_should_chunk_empty_blob() {
        let blob = StreamingBlob::default();
        assert!(blob.is_empty());
        assert_eq!(blob.chunks(8).count(), 0);
    }

    #[test]
    fn test_should_clamp_zero_chunk_size() {
        let blob = StreamingBlob::from(&b"ab"[..]);
        let chunks: Vec<Bytes> = blob.chunks(0).collect();
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_should_convert_into_bytes() {
        let blob = StreamingBlob::from("hello");
        assert_eq!(blob.len(), 5);
        assert_eq!(&blob.into_bytes()[..], b"hello");
    }

    #[test]
    fn test_should_report_empty_preconditions() {
        assert!(Preconditions::default().is_empty());
        assert!(!Preconditions::if_absent().is_empty());
        assert!(!Preconditions::if_match("abc").is_empty());
    }

    #[test]
    fn test_should_build_if_absent_wildcard() {
        let pre = Preconditions::if_absent();
        assert_eq!(
            pre.if_none_match,
            Some(vec![Preconditions::WILDCARD.to_owned()])
        );
    }
}
