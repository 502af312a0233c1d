//! Key-space enumeration: current objects (V1/V2) and versions.
//!
//! All listings come back in byte-lexicographic key order, as the substrate
//! scans already are. Delimiter grouping collapses keys sharing a common
//! prefix (up to the first delimiter occurrence strictly after the request
//! prefix) into one common-prefix entry. Both object entries and common
//! prefixes count toward max-keys.
//!
//! Each page is one point-in-time scan; paged listings may span commits.

use std::collections::{BTreeMap, HashSet};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use tokio_util::sync::CancellationToken;

use s3lite_model::error::{StorageError, StorageResult};
use s3lite_model::input::{ListObjectVersionsInput, ListObjectsInput, ListObjectsV2Input};
use s3lite_model::output::{ListObjectVersionsOutput, ListObjectsOutput, ListObjectsV2Output};
use s3lite_model::types::ObjectInfo;

use crate::store::keys;
use crate::store::records::ObjectRecord;

use super::Engine;

/// Default page size when the caller does not specify max-keys.
const DEFAULT_MAX_KEYS: usize = 1000;

/// One page of a current-object listing.
#[derive(Debug, Default)]
struct CurrentPage {
    objects: Vec<ObjectInfo>,
    common_prefixes: Vec<String>,
    is_truncated: bool,
    next_marker: Option<String>,
}

impl Engine {
    /// List current objects with V1 marker pagination.
    pub async fn list_objects(
        &self,
        input: ListObjectsInput,
        cancel: &CancellationToken,
    ) -> StorageResult<ListObjectsOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let page = self
            .list_current(
                &input.bucket,
                input.prefix.as_deref().unwrap_or(""),
                input.delimiter.as_deref(),
                input.marker.as_deref(),
                input.max_keys.unwrap_or(DEFAULT_MAX_KEYS),
            )
            .await?;

        Ok(ListObjectsOutput {
            objects: page.objects,
            common_prefixes: page.common_prefixes,
            is_truncated: page.is_truncated,
            next_marker: page.next_marker,
        })
    }

    /// List current objects with V2 continuation-token pagination.
    pub async fn list_objects_v2(
        &self,
        input: ListObjectsV2Input,
        cancel: &CancellationToken,
    ) -> StorageResult<ListObjectsV2Output> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        // A continuation token supersedes start-after.
        let resume = match &input.continuation_token {
            Some(token) => Some(decode_continuation_token(token)?),
            None => input.start_after.clone(),
        };

        let page = self
            .list_current(
                &input.bucket,
                input.prefix.as_deref().unwrap_or(""),
                input.delimiter.as_deref(),
                resume.as_deref(),
                input.max_keys.unwrap_or(DEFAULT_MAX_KEYS),
            )
            .await?;

        let key_count = page.objects.len() + page.common_prefixes.len();
        Ok(ListObjectsV2Output {
            objects: page.objects,
            common_prefixes: page.common_prefixes,
            is_truncated: page.is_truncated,
            next_continuation_token: page.next_marker.as_deref().map(encode_continuation_token),
            key_count,
        })
    }

    /// Shared current-object listing: prefix filter, delimiter grouping,
    /// resume-after-marker, max-keys truncation.
    async fn list_current(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<&str>,
        after: Option<&str>,
        max_keys: usize,
    ) -> StorageResult<CurrentPage> {
        if max_keys == 0 {
            return Ok(CurrentPage::default());
        }

        // Resume the scan after the marker's record id; entries grouped
        // under an already-returned common prefix are filtered below.
        let scan_after = after.map(|marker| keys::object(bucket, marker));
        let heads: Vec<(String, ObjectRecord)> = self
            .store
            .scan(&keys::object_prefix(bucket), scan_after.as_deref(), None)
            .await?;

        let delimiter = delimiter.filter(|d| !d.is_empty());
        let mut page = CurrentPage::default();
        let mut seen_prefixes: HashSet<String> = HashSet::new();
        let mut count = 0usize;
        let mut last_entry: Option<String> = None;

        for (_, record) in heads {
            let key = record.key.as_str();

            if key < prefix {
                continue;
            }
            if !key.starts_with(prefix) {
                // Keys are sorted; once past the prefix range nothing more
                // matches.
                break;
            }
            if record.is_delete_marker {
                continue;
            }

            if let Some(delim) = delimiter {
                let rest = &key[prefix.len()..];
                if let Some(pos) = rest.find(delim) {
                    let common = &key[..prefix.len() + pos + delim.len()];
                    // A prefix at or before the marker was returned on an
                    // earlier page.
                    if after.is_some_and(|marker| common <= marker) {
                        continue;
                    }
                    if seen_prefixes.contains(common) {
                        continue;
                    }
                    if count == max_keys {
                        page.is_truncated = true;
                        break;
                    }
                    seen_prefixes.insert(common.to_owned());
                    page.common_prefixes.push(common.to_owned());
                    last_entry = Some(common.to_owned());
                    count += 1;
                    continue;
                }
            }

            if count == max_keys {
                page.is_truncated = true;
                break;
            }
            last_entry = Some(key.to_owned());
            page.objects.push(record.object_info());
            count += 1;
        }

        if page.is_truncated {
            page.next_marker = last_entry;
        }
        Ok(page)
    }

    /// List versions and delete markers.
    ///
    /// Keys ascend; within a key the head comes first, then archived
    /// versions in descending version-id order (newest first, by the id
    /// generator's lexicographic property).
    #[allow(clippy::too_many_lines)]
    pub async fn list_object_versions(
        &self,
        input: ListObjectVersionsInput,
        cancel: &CancellationToken,
    ) -> StorageResult<ListObjectVersionsOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let max_keys = input.max_keys.unwrap_or(DEFAULT_MAX_KEYS);
        let mut output = ListObjectVersionsOutput::default();
        if max_keys == 0 {
            return Ok(output);
        }

        let prefix = input.prefix.as_deref().unwrap_or("");
        let delimiter = input.delimiter.as_deref().filter(|d| !d.is_empty());
        let key_marker = input.key_marker.as_deref();
        let version_marker = input.version_id_marker.as_deref();

        // Assemble the full version set per key: head first, then archived
        // newest-first.
        let heads: Vec<(String, ObjectRecord)> = self
            .store
            .scan(&keys::object_prefix(&input.bucket), None, None)
            .await?;
        let archived: Vec<(String, ObjectRecord)> = self
            .store
            .scan(&keys::bucket_versions_prefix(&input.bucket), None, None)
            .await?;

        let mut per_key: BTreeMap<String, (Vec<ObjectRecord>, Vec<ObjectRecord>)> =
            BTreeMap::new();
        for (_, record) in heads {
            per_key.entry(record.key.clone()).or_default().0.push(record);
        }
        for (_, record) in archived {
            per_key.entry(record.key.clone()).or_default().1.push(record);
        }
        let per_key: BTreeMap<String, Vec<(bool, ObjectRecord)>> = per_key
            .into_iter()
            .map(|(key, (head, mut tail))| {
                tail.sort_by(|a, b| b.version_id.cmp(&a.version_id));
                let composed = head
                    .into_iter()
                    .map(|record| (true, record))
                    .chain(tail.into_iter().map(|record| (false, record)))
                    .collect();
                (key, composed)
            })
            .collect();

        let mut seen_prefixes: HashSet<String> = HashSet::new();
        let mut count = 0usize;
        let mut last_key: Option<String> = None;
        let mut last_version: Option<String> = None;

        'keys: for (key, versions) in &per_key {
            let key = key.as_str();

            if key < prefix {
                continue;
            }
            if !key.starts_with(prefix) {
                break;
            }

            if let Some(delim) = delimiter {
                let rest = &key[prefix.len()..];
                if let Some(pos) = rest.find(delim) {
                    let common = &key[..prefix.len() + pos + delim.len()];
                    if key_marker.is_some_and(|marker| common <= marker) {
                        continue;
                    }
                    if seen_prefixes.contains(common) {
                        continue;
                    }
                    if count == max_keys {
                        output.is_truncated = true;
                        break;
                    }
                    seen_prefixes.insert(common.to_owned());
                    output.common_prefixes.push(common.to_owned());
                    last_key = Some(common.to_owned());
                    last_version = None;
                    count += 1;
                    continue;
                }
            }

            // Key-marker resumption: skip keys before the marker entirely;
            // within the marker key, resume after the version-id marker.
            let mut skipping = match key_marker {
                Some(marker) if key < marker => continue,
                Some(marker) if key == marker => {
                    if version_marker.is_none() {
                        continue;
                    }
                    true
                }
                _ => false,
            };

            for (is_latest, record) in versions {
                if skipping {
                    if version_marker == Some(record.version_id.as_str()) {
                        skipping = false;
                    }
                    continue;
                }

                if count == max_keys {
                    output.is_truncated = true;
                    break 'keys;
                }
                output.versions.push(record.version_info(*is_latest));
                last_key = Some(key.to_owned());
                last_version = Some(record.version_id.clone());
                count += 1;
            }
        }

        if output.is_truncated {
            output.next_key_marker = last_key;
            output.next_version_id_marker = last_version;
        }
        Ok(output)
    }
}

/// Encode a resume key as an opaque continuation token.
fn encode_continuation_token(key: &str) -> String {
    BASE64_STANDARD.encode(key.as_bytes())
}

/// Decode a continuation token back to the resume key.
fn decode_continuation_token(token: &str) -> StorageResult<String> {
    let bytes = BASE64_STANDARD
        .decode(token)
        .map_err(|_| StorageError::InvalidArgument {
            message: "invalid continuation token".to_owned(),
        })?;
    String::from_utf8(bytes).map_err(|_| StorageError::InvalidArgument {
        message: "continuation token is not valid UTF-8".to_owned(),
    })
}
