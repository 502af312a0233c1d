//! Multipart upload coordination.
//!
//! Uploads and their parts live as records under `upload::` and `part::`
//! ids. Completion validates the requested part list, concatenates the
//! stored parts, and reuses the object put transition; the final object
//! write, the part deletions, and the upload-record deletion commit in one
//! atomic batch.

use bytes::BytesMut;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use s3lite_model::error::{StorageError, StorageResult};
use s3lite_model::input::{
    AbortMultipartUploadInput, CompleteMultipartUploadInput, CreateMultipartUploadInput,
    ListMultipartUploadsInput, ListPartsInput, UploadPartInput,
};
use s3lite_model::output::{
    AbortMultipartUploadOutput, CompleteMultipartUploadOutput, CreateMultipartUploadOutput,
    ListMultipartUploadsOutput, ListPartsOutput, UploadPartOutput,
};
use s3lite_model::types::{PartInfo, UploadInfo};

use crate::idgen::{generate_upload_id, multipart_etag};
use crate::store::records::{ObjectRecord, PartRecord, UploadRecord};
use crate::store::substrate::WriteBatch;
use crate::store::{Store, keys};

use super::object::{default_retention, validate_object_key};
use super::{Engine, cond};

/// Inclusive bounds for multipart part numbers.
const PART_NUMBER_RANGE: std::ops::RangeInclusive<i32> = 1..=10_000;

/// Default page size for part listings.
const DEFAULT_MAX_PARTS: usize = 1000;

/// Default page size for upload listings.
const DEFAULT_MAX_UPLOADS: usize = 1000;

impl Engine {
    /// Start a multipart upload.
    pub async fn create_multipart_upload(
        &self,
        input: CreateMultipartUploadInput,
        cancel: &CancellationToken,
    ) -> StorageResult<CreateMultipartUploadOutput> {
        Self::ensure_live(cancel)?;
        validate_object_key(&input.key)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let upload_id = generate_upload_id();
        let record = UploadRecord {
            bucket: input.bucket.clone(),
            key: input.key.clone(),
            upload_id: upload_id.clone(),
            initiated: Utc::now(),
            owner: self.owner.clone(),
            content_type: input.content_type,
            user_metadata: input
                .metadata
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value))
                .collect(),
            tags: input.tagging.unwrap_or_default(),
        };

        let mut batch = WriteBatch::new();
        Store::stage(
            &mut batch,
            keys::upload(&input.bucket, &input.key, &upload_id),
            &record,
        )?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            upload_id = %upload_id,
            "multipart upload initiated"
        );

        Ok(CreateMultipartUploadOutput {
            bucket: input.bucket,
            key: input.key,
            upload_id,
        })
    }

    /// Store one part of an upload. Re-uploading a part number replaces it.
    pub async fn upload_part(
        &self,
        input: UploadPartInput,
        cancel: &CancellationToken,
    ) -> StorageResult<UploadPartOutput> {
        Self::ensure_live(cancel)?;
        if !PART_NUMBER_RANGE.contains(&input.part_number) {
            return Err(StorageError::InvalidArgument {
                message: "part number must be between 1 and 10000".to_owned(),
            });
        }

        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;
        self.require_upload(&input.bucket, &input.key, &input.upload_id)
            .await?;

        let (etag, size) = self.hash_body(&input.body, cancel).await?;
        let record = PartRecord {
            upload_id: input.upload_id.clone(),
            part_number: input.part_number,
            etag: etag.clone(),
            size,
            last_modified: Utc::now(),
            body: input.body.into_bytes(),
        };

        let mut batch = WriteBatch::new();
        Store::stage(
            &mut batch,
            keys::part(&input.bucket, &input.key, &input.upload_id, input.part_number),
            &record,
        )?;
        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        debug!(
            bucket = %input.bucket,
            upload_id = %input.upload_id,
            part_number = input.part_number,
            size,
            "part stored"
        );

        Ok(UploadPartOutput { etag })
    }

    /// Assemble the parts into the final object.
    ///
    /// Parts must be listed in ascending part-number order and each
    /// expected etag must match the stored part. The assembled object
    /// carries the composite etag `{digest}-{count}`.
    pub async fn complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadInput,
        cancel: &CancellationToken,
    ) -> StorageResult<CompleteMultipartUploadOutput> {
        Self::ensure_live(cancel)?;
        let bucket = self
            .require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;
        let upload = self
            .require_upload(&input.bucket, &input.key, &input.upload_id)
            .await?;

        if input.parts.is_empty() {
            return Err(StorageError::InvalidArgument {
                message: "at least one part is required".to_owned(),
            });
        }
        let ascending = input
            .parts
            .windows(2)
            .all(|pair| pair[0].part_number < pair[1].part_number);
        if !ascending {
            return Err(StorageError::InvalidPartOrder);
        }

        // Match every requested part against its stored record.
        let mut assembled = Vec::with_capacity(input.parts.len());
        for requested in &input.parts {
            if !PART_NUMBER_RANGE.contains(&requested.part_number) {
                return Err(StorageError::InvalidPart);
            }
            let stored: Option<PartRecord> = self
                .store
                .read(&keys::part(
                    &input.bucket,
                    &input.key,
                    &input.upload_id,
                    requested.part_number,
                ))
                .await?;
            let stored = stored.ok_or(StorageError::InvalidPart)?;
            if cond::normalize_etag(&requested.etag) != stored.etag {
                return Err(StorageError::InvalidPart);
            }
            assembled.push(stored);
        }

        // Concatenate in order, observing cancellation between parts.
        let mut body = BytesMut::new();
        for part in &assembled {
            Self::ensure_live(cancel)?;
            body.extend_from_slice(&part.body);
            tokio::task::yield_now().await;
        }
        let size = body.len() as u64;
        let etag = multipart_etag(assembled.iter().map(|part| part.etag.as_str()))?;

        let _slot = self.locker.lock(&input.bucket, &input.key).await;
        Self::ensure_live(cancel)?;

        let head = self.head_record(&input.bucket, &input.key).await?;
        let now = Utc::now();

        let mut batch = WriteBatch::new();
        let version_id = self
            .plan_head_transition(&bucket, &input.key, head.as_ref(), &mut batch)
            .await?;

        let record = ObjectRecord {
            key: input.key.clone(),
            version_id: version_id.clone(),
            etag: etag.clone(),
            size,
            content_type: upload.content_type.clone(),
            user_metadata: upload.user_metadata.clone(),
            last_modified: now,
            is_delete_marker: false,
            retention: default_retention(&bucket, now),
            legal_hold: None,
            tags: upload.tags.clone(),
            owner: upload.owner.clone(),
            body: body.freeze(),
        };
        Store::stage(&mut batch, keys::object(&input.bucket, &input.key), &record)?;

        // The upload and all of its parts (listed or not) go away with the
        // same commit.
        for part_id in self
            .store
            .scan_ids(&keys::part_prefix(&input.bucket, &input.key, &input.upload_id), None)
            .await?
        {
            batch.delete(part_id);
        }
        batch.delete(keys::upload(&input.bucket, &input.key, &input.upload_id));

        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        debug!(
            bucket = %input.bucket,
            key = %input.key,
            upload_id = %input.upload_id,
            parts = input.parts.len(),
            size,
            "multipart upload completed"
        );

        Ok(CompleteMultipartUploadOutput {
            bucket: input.bucket,
            key: input.key,
            etag,
            version_id,
            size,
        })
    }

    /// Abort an upload, removing the upload record and all stored parts.
    pub async fn abort_multipart_upload(
        &self,
        input: AbortMultipartUploadInput,
        cancel: &CancellationToken,
    ) -> StorageResult<AbortMultipartUploadOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;
        self.require_upload(&input.bucket, &input.key, &input.upload_id)
            .await?;

        let mut batch = WriteBatch::new();
        for part_id in self
            .store
            .scan_ids(&keys::part_prefix(&input.bucket, &input.key, &input.upload_id), None)
            .await?
        {
            batch.delete(part_id);
        }
        batch.delete(keys::upload(&input.bucket, &input.key, &input.upload_id));

        Self::ensure_live(cancel)?;
        self.store.commit(batch).await?;

        debug!(
            bucket = %input.bucket,
            upload_id = %input.upload_id,
            "multipart upload aborted"
        );
        Ok(AbortMultipartUploadOutput {})
    }

    /// List the stored parts of an upload, ascending by part number.
    pub async fn list_parts(
        &self,
        input: ListPartsInput,
        cancel: &CancellationToken,
    ) -> StorageResult<ListPartsOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;
        self.require_upload(&input.bucket, &input.key, &input.upload_id)
            .await?;

        let max_parts = input.max_parts.unwrap_or(DEFAULT_MAX_PARTS);
        let marker = input.part_number_marker.unwrap_or(0);

        let parts: Vec<(String, PartRecord)> = self
            .store
            .scan(&keys::part_prefix(&input.bucket, &input.key, &input.upload_id), None, None)
            .await?;

        let mut infos: Vec<PartInfo> = parts
            .into_iter()
            .map(|(_, record)| PartInfo {
                part_number: record.part_number,
                etag: record.etag,
                size: record.size,
                last_modified: record.last_modified,
            })
            .filter(|part| part.part_number > marker)
            .collect();

        let is_truncated = infos.len() > max_parts;
        infos.truncate(max_parts);
        let next_part_number_marker = if is_truncated {
            infos.last().map(|part| part.part_number)
        } else {
            None
        };

        Ok(ListPartsOutput {
            parts: infos,
            is_truncated,
            next_part_number_marker,
        })
    }

    /// List in-progress uploads for a bucket, ascending by key then
    /// initiation time.
    pub async fn list_multipart_uploads(
        &self,
        input: ListMultipartUploadsInput,
        cancel: &CancellationToken,
    ) -> StorageResult<ListMultipartUploadsOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let max_uploads = input.max_uploads.unwrap_or(DEFAULT_MAX_UPLOADS);
        let prefix = input.prefix.unwrap_or_default();

        let records: Vec<(String, UploadRecord)> = self
            .store
            .scan(&keys::upload_prefix(&input.bucket), None, None)
            .await?;

        let mut uploads: Vec<UploadInfo> = records
            .into_iter()
            .map(|(_, record)| UploadInfo {
                key: record.key,
                upload_id: record.upload_id,
                initiated: record.initiated,
                owner: record.owner,
            })
            .filter(|upload| upload.key.starts_with(&prefix))
            .collect();
        uploads.sort_by(|a, b| a.key.cmp(&b.key).then(a.initiated.cmp(&b.initiated)));

        let is_truncated = uploads.len() > max_uploads;
        uploads.truncate(max_uploads);

        Ok(ListMultipartUploadsOutput {
            uploads,
            is_truncated,
        })
    }

    /// Load an upload record, failing with `NoSuchUpload` when absent.
    async fn require_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> StorageResult<UploadRecord> {
        self.store
            .read(&keys::upload(bucket, key, upload_id))
            .await?
            .ok_or_else(|| StorageError::NoSuchUpload {
                upload_id: upload_id.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::idgen::content_etag;
    use s3lite_model::input::{CreateBucketInput, GetObjectInput};
    use s3lite_model::request::StreamingBlob;
    use s3lite_model::types::CompletedPart;

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    async fn engine_with_bucket(bucket: &str) -> Engine {
        let engine = Engine::new(EngineConfig::default());
        engine
            .create_bucket(
                CreateBucketInput {
                    bucket: bucket.to_owned(),
                    object_lock_enabled: false,
                },
                &token(),
            )
            .await
            .expect("test create bucket");
        engine
    }

    async fn initiate(engine: &Engine, bucket: &str, key: &str) -> String {
        engine
            .create_multipart_upload(
                CreateMultipartUploadInput {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                    ..CreateMultipartUploadInput::default()
                },
                &token(),
            )
            .await
            .expect("test initiate")
            .upload_id
    }

    async fn put_part(
        engine: &Engine,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: &'static [u8],
    ) -> String {
        engine
            .upload_part(
                UploadPartInput {
                    bucket: bucket.to_owned(),
                    key: key.to_owned(),
                    upload_id: upload_id.to_owned(),
                    part_number,
                    body: StreamingBlob::from(body),
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test upload part")
            .etag
    }

    #[tokio::test]
    async fn test_should_assemble_parts_in_order() {
        let engine = engine_with_bucket("b").await;
        let upload_id = initiate(&engine, "b", "big.bin").await;

        let etag1 = put_part(&engine, "b", "big.bin", &upload_id, 1, b"hello ").await;
        let etag2 = put_part(&engine, "b", "big.bin", &upload_id, 2, b"world").await;
        assert_eq!(etag1, content_etag(b"hello "));

        let output = engine
            .complete_multipart_upload(
                CompleteMultipartUploadInput {
                    bucket: "b".to_owned(),
                    key: "big.bin".to_owned(),
                    upload_id: upload_id.clone(),
                    parts: vec![
                        CompletedPart {
                            part_number: 1,
                            etag: etag1,
                        },
                        CompletedPart {
                            part_number: 2,
                            etag: etag2,
                        },
                    ],
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test complete");

        assert_eq!(output.size, 11);
        assert!(output.etag.ends_with("-2"), "composite etag: {}", output.etag);

        let get = engine
            .get_object(
                GetObjectInput {
                    bucket: "b".to_owned(),
                    key: "big.bin".to_owned(),
                    ..GetObjectInput::default()
                },
                &token(),
            )
            .await
            .expect("test get");
        assert_eq!(&get.body.into_bytes()[..], b"hello world");

        // The upload and its parts are gone.
        let result = engine
            .list_parts(
                ListPartsInput {
                    bucket: "b".to_owned(),
                    key: "big.bin".to_owned(),
                    upload_id,
                    ..ListPartsInput::default()
                },
                &token(),
            )
            .await;
        assert!(matches!(result, Err(StorageError::NoSuchUpload { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_out_of_range_part_number() {
        let engine = engine_with_bucket("b").await;
        let upload_id = initiate(&engine, "b", "k").await;

        for bad in [0, -1, 10_001] {
            let result = engine
                .upload_part(
                    UploadPartInput {
                        bucket: "b".to_owned(),
                        key: "k".to_owned(),
                        upload_id: upload_id.clone(),
                        part_number: bad,
                        body: StreamingBlob::from(&b"x"[..]),
                        expected_bucket_owner: None,
                    },
                    &token(),
                )
                .await;
            assert!(
                matches!(result, Err(StorageError::InvalidArgument { .. })),
                "part number {bad} must be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_should_fail_part_upload_for_unknown_upload() {
        let engine = engine_with_bucket("b").await;
        let result = engine
            .upload_part(
                UploadPartInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    upload_id: "does-not-exist".to_owned(),
                    part_number: 1,
                    body: StreamingBlob::from(&b"x"[..]),
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await;
        assert!(matches!(result, Err(StorageError::NoSuchUpload { .. })));
    }

    #[tokio::test]
    async fn test_should_reject_descending_part_order() {
        let engine = engine_with_bucket("b").await;
        let upload_id = initiate(&engine, "b", "k").await;
        let etag1 = put_part(&engine, "b", "k", &upload_id, 1, b"one").await;
        let etag2 = put_part(&engine, "b", "k", &upload_id, 2, b"two").await;

        let result = engine
            .complete_multipart_upload(
                CompleteMultipartUploadInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    upload_id,
                    parts: vec![
                        CompletedPart {
                            part_number: 2,
                            etag: etag2,
                        },
                        CompletedPart {
                            part_number: 1,
                            etag: etag1,
                        },
                    ],
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await;
        assert!(matches!(result, Err(StorageError::InvalidPartOrder)));
    }

    #[tokio::test]
    async fn test_should_reject_mismatched_part_etag() {
        let engine = engine_with_bucket("b").await;
        let upload_id = initiate(&engine, "b", "k").await;
        put_part(&engine, "b", "k", &upload_id, 1, b"one").await;

        let result = engine
            .complete_multipart_upload(
                CompleteMultipartUploadInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    upload_id,
                    parts: vec![CompletedPart {
                        part_number: 1,
                        etag: content_etag(b"different"),
                    }],
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await;
        assert!(matches!(result, Err(StorageError::InvalidPart)));
    }

    #[tokio::test]
    async fn test_should_replace_reuploaded_part() {
        let engine = engine_with_bucket("b").await;
        let upload_id = initiate(&engine, "b", "k").await;
        put_part(&engine, "b", "k", &upload_id, 1, b"old").await;
        let etag = put_part(&engine, "b", "k", &upload_id, 1, b"new").await;

        let output = engine
            .complete_multipart_upload(
                CompleteMultipartUploadInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    upload_id,
                    parts: vec![CompletedPart {
                        part_number: 1,
                        etag,
                    }],
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test complete");
        assert_eq!(output.size, 3);

        let get = engine
            .get_object(
                GetObjectInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    ..GetObjectInput::default()
                },
                &token(),
            )
            .await
            .expect("test get");
        assert_eq!(&get.body.into_bytes()[..], b"new");
    }

    #[tokio::test]
    async fn test_should_abort_upload_and_free_bucket() {
        use s3lite_model::input::DeleteBucketInput;

        let engine = engine_with_bucket("b").await;
        let upload_id = initiate(&engine, "b", "k").await;
        put_part(&engine, "b", "k", &upload_id, 1, b"data").await;

        // An in-progress upload keeps the bucket occupied.
        let result = engine
            .delete_bucket(
                DeleteBucketInput {
                    bucket: "b".to_owned(),
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await;
        assert!(matches!(result, Err(StorageError::BucketNotEmpty { .. })));

        engine
            .abort_multipart_upload(
                AbortMultipartUploadInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    upload_id: upload_id.clone(),
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test abort");

        // Abort of an already-aborted upload fails.
        let result = engine
            .abort_multipart_upload(
                AbortMultipartUploadInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    upload_id,
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await;
        assert!(matches!(result, Err(StorageError::NoSuchUpload { .. })));

        engine
            .delete_bucket(
                DeleteBucketInput {
                    bucket: "b".to_owned(),
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test delete bucket after abort");
    }

    #[tokio::test]
    async fn test_should_list_parts_with_marker() {
        let engine = engine_with_bucket("b").await;
        let upload_id = initiate(&engine, "b", "k").await;
        for n in 1..=5 {
            put_part(&engine, "b", "k", &upload_id, n, b"chunk").await;
        }

        let page = engine
            .list_parts(
                ListPartsInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    upload_id: upload_id.clone(),
                    max_parts: Some(2),
                    part_number_marker: None,
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test list parts");
        assert_eq!(page.parts.len(), 2);
        assert!(page.is_truncated);
        assert_eq!(page.next_part_number_marker, Some(2));

        let rest = engine
            .list_parts(
                ListPartsInput {
                    bucket: "b".to_owned(),
                    key: "k".to_owned(),
                    upload_id,
                    max_parts: None,
                    part_number_marker: page.next_part_number_marker,
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test list rest");
        let numbers: Vec<i32> = rest.parts.iter().map(|p| p.part_number).collect();
        assert_eq!(numbers, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn test_should_list_uploads_by_prefix() {
        let engine = engine_with_bucket("b").await;
        initiate(&engine, "b", "logs/2024/a").await;
        initiate(&engine, "b", "logs/2024/b").await;
        initiate(&engine, "b", "data/x").await;

        let output = engine
            .list_multipart_uploads(
                ListMultipartUploadsInput {
                    bucket: "b".to_owned(),
                    prefix: Some("logs/".to_owned()),
                    max_uploads: None,
                    expected_bucket_owner: None,
                },
                &token(),
            )
            .await
            .expect("test list uploads");
        assert_eq!(output.uploads.len(), 2);
        assert!(output.uploads.iter().all(|u| u.key.starts_with("logs/")));
    }
}
