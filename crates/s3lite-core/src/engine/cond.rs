//! Conditional-request evaluation.
//!
//! Preconditions are evaluated in the order RFC 9110 prescribes:
//! `If-Match` first (falling back to `If-Unmodified-Since` only when
//! `If-Match` is absent), then `If-None-Match` (falling back to
//! `If-Modified-Since` only when `If-None-Match` is absent). Reads
//! short-circuit to `NotModified` where writes fail with
//! `PreconditionFailed`.

use chrono::{DateTime, Utc};

use s3lite_model::error::{StorageError, StorageResult};
use s3lite_model::request::Preconditions;

use crate::store::records::ObjectRecord;

/// Strip surrounding double quotes from an etag for comparison.
pub(crate) fn normalize_etag(etag: &str) -> &str {
    etag.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(etag)
}

/// Whether `etag` appears in `candidates`, honoring the `*` wildcard.
fn etag_in(candidates: &[String], etag: &str) -> bool {
    let target = normalize_etag(etag);
    candidates
        .iter()
        .any(|c| c == Preconditions::WILDCARD || normalize_etag(c) == target)
}

/// Evaluate read preconditions against a resolved record.
///
/// Returns `PreconditionFailed` for `If-Match` / `If-Unmodified-Since`
/// violations and `NotModified` for `If-None-Match` / `If-Modified-Since`
/// ones, without touching the body.
pub(crate) fn check_read(pre: &Preconditions, record: &ObjectRecord) -> StorageResult<()> {
    if let Some(if_match) = &pre.if_match {
        if !etag_in(if_match, &record.etag) {
            return Err(StorageError::PreconditionFailed);
        }
    } else if let Some(since) = pre.if_unmodified_since {
        if modified_after(record.last_modified, since) {
            return Err(StorageError::PreconditionFailed);
        }
    }

    if let Some(if_none_match) = &pre.if_none_match {
        if etag_in(if_none_match, &record.etag) {
            return Err(StorageError::NotModified);
        }
    } else if let Some(since) = pre.if_modified_since {
        if !modified_after(record.last_modified, since) {
            return Err(StorageError::NotModified);
        }
    }

    Ok(())
}

/// Evaluate write/delete preconditions against the current head.
///
/// A delete-marker head counts as "no object exists": `If-None-Match: *`
/// succeeds over it and `If-Match` fails.
pub(crate) fn check_write(pre: &Preconditions, head: Option<&ObjectRecord>) -> StorageResult<()> {
    if pre.is_empty() {
        return Ok(());
    }

    let visible = head.filter(|h| !h.is_delete_marker);

    if let Some(if_match) = &pre.if_match {
        match visible {
            Some(record) if etag_in(if_match, &record.etag) => {}
            _ => return Err(StorageError::PreconditionFailed),
        }
    } else if let Some(since) = pre.if_unmodified_since {
        if let Some(record) = visible {
            if modified_after(record.last_modified, since) {
                return Err(StorageError::PreconditionFailed);
            }
        }
    }

    if let Some(if_none_match) = &pre.if_none_match {
        if let Some(record) = visible {
            if etag_in(if_none_match, &record.etag) {
                return Err(StorageError::PreconditionFailed);
            }
        }
    }

    Ok(())
}

/// HTTP date comparisons have one-second resolution; compare at that
/// granularity so a record written within the same second as the condition
/// date counts as unmodified.
fn modified_after(last_modified: DateTime<Utc>, condition: DateTime<Utc>) -> bool {
    last_modified.timestamp() > condition.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Duration;
    use s3lite_model::types::Owner;
    use std::collections::HashMap;

    fn record_with(etag: &str, last_modified: DateTime<Utc>) -> ObjectRecord {
        ObjectRecord {
            key: "k".to_owned(),
            version_id: "null".to_owned(),
            etag: etag.to_owned(),
            size: 1,
            content_type: None,
            user_metadata: HashMap::new(),
            last_modified,
            is_delete_marker: false,
            retention: None,
            legal_hold: None,
            tags: Vec::new(),
            owner: Owner::default(),
            body: Bytes::from_static(b"x"),
        }
    }

    #[test]
    fn test_should_pass_read_with_matching_if_match() {
        let record = record_with("abc", Utc::now());
        let pre = Preconditions::if_match("abc");
        assert!(check_read(&pre, &record).is_ok());
    }

    #[test]
    fn test_should_fail_read_with_mismatched_if_match() {
        let record = record_with("abc", Utc::now());
        let pre = Preconditions::if_match("xyz");
        assert!(matches!(
            check_read(&pre, &record),
            Err(StorageError::PreconditionFailed)
        ));
    }

    #[test]
    fn test_should_match_quoted_etags() {
        let record = record_with("abc", Utc::now());
        let pre = Preconditions::if_match("\"abc\"");
        assert!(check_read(&pre, &record).is_ok());
    }

    #[test]
    fn test_should_short_circuit_read_with_if_none_match() {
        let record = record_with("abc", Utc::now());
        let pre = Preconditions {
            if_none_match: Some(vec!["abc".to_owned()]),
            ..Preconditions::default()
        };
        assert!(matches!(
            check_read(&pre, &record),
            Err(StorageError::NotModified)
        ));
    }

    #[test]
    fn test_should_fail_read_if_unmodified_since_in_past() {
        let now = Utc::now();
        let record = record_with("abc", now);
        let pre = Preconditions {
            if_unmodified_since: Some(now - Duration::hours(1)),
            ..Preconditions::default()
        };
        assert!(matches!(
            check_read(&pre, &record),
            Err(StorageError::PreconditionFailed)
        ));
    }

    #[test]
    fn test_should_ignore_if_unmodified_since_when_if_match_present() {
        // RFC order: If-Match wins over If-Unmodified-Since.
        let now = Utc::now();
        let record = record_with("abc", now);
        let pre = Preconditions {
            if_match: Some(vec!["abc".to_owned()]),
            if_unmodified_since: Some(now - Duration::hours(1)),
            ..Preconditions::default()
        };
        assert!(check_read(&pre, &record).is_ok());
    }

    #[test]
    fn test_should_return_not_modified_when_unchanged_since() {
        let now = Utc::now();
        let record = record_with("abc", now - Duration::hours(2));
        let pre = Preconditions {
            if_modified_since: Some(now - Duration::hours(1)),
            ..Preconditions::default()
        };
        assert!(matches!(
            check_read(&pre, &record),
            Err(StorageError::NotModified)
        ));
    }

    #[test]
    fn test_should_pass_when_modified_since() {
        let now = Utc::now();
        let record = record_with("abc", now);
        let pre = Preconditions {
            if_modified_since: Some(now - Duration::hours(1)),
            ..Preconditions::default()
        };
        assert!(check_read(&pre, &record).is_ok());
    }

    #[test]
    fn test_should_fail_write_if_none_match_wildcard_over_existing() {
        let record = record_with("abc", Utc::now());
        let pre = Preconditions::if_absent();
        assert!(matches!(
            check_write(&pre, Some(&record)),
            Err(StorageError::PreconditionFailed)
        ));
    }

    #[test]
    fn test_should_pass_write_if_none_match_wildcard_over_absent() {
        let pre = Preconditions::if_absent();
        assert!(check_write(&pre, None).is_ok());
    }

    #[test]
    fn test_should_treat_marker_head_as_absent_for_writes() {
        let mut marker = record_with("", Utc::now());
        marker.is_delete_marker = true;

        assert!(check_write(&Preconditions::if_absent(), Some(&marker)).is_ok());
        assert!(matches!(
            check_write(&Preconditions::if_match("abc"), Some(&marker)),
            Err(StorageError::PreconditionFailed)
        ));
    }

    #[test]
    fn test_should_fail_write_if_match_over_absent_head() {
        let pre = Preconditions::if_match("abc");
        assert!(matches!(
            check_write(&pre, None),
            Err(StorageError::PreconditionFailed)
        ));
    }

    #[test]
    fn test_should_pass_empty_preconditions() {
        let record = record_with("abc", Utc::now());
        assert!(check_read(&Preconditions::default(), &record).is_ok());
        assert!(check_write(&Preconditions::default(), Some(&record)).is_ok());
        assert!(check_write(&Preconditions::default(), None).is_ok());
    }
}
