//! Best-effort multi-object delete.
//!
//! Each entry runs through the single-object delete path under its own key
//! lock. Per-entry failures land in the `errors` list and never abort the
//! remaining entries; only a missing bucket or caller cancellation fails
//! the request as a whole.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use s3lite_model::error::{StorageError, StorageResult};
use s3lite_model::input::{DeleteObjectInput, DeleteObjectsInput};
use s3lite_model::output::DeleteObjectsOutput;
use s3lite_model::request::Preconditions;
use s3lite_model::types::{DeleteError, DeletedObject};

use super::Engine;

impl Engine {
    /// Delete a list of objects (optionally specific versions) in one
    /// logical request.
    pub async fn delete_objects(
        &self,
        input: DeleteObjectsInput,
        cancel: &CancellationToken,
    ) -> StorageResult<DeleteObjectsOutput> {
        Self::ensure_live(cancel)?;
        self.require_bucket(&input.bucket, input.expected_bucket_owner.as_deref())
            .await?;

        let mut deleted: Vec<DeletedObject> = Vec::with_capacity(input.objects.len());
        let mut errors: Vec<DeleteError> = Vec::new();

        for entry in input.objects {
            let result = self
                .delete_object(
                    DeleteObjectInput {
                        bucket: input.bucket.clone(),
                        key: entry.key.clone(),
                        version_id: entry.version_id.clone(),
                        preconditions: Preconditions::default(),
                        bypass_governance_retention: input.bypass_governance_retention,
                        mfa: input.mfa.clone(),
                        expected_bucket_owner: None,
                    },
                    cancel,
                )
                .await;

            match result {
                Ok(output) => deleted.push(DeletedObject {
                    key: entry.key,
                    version_id: entry.version_id,
                    delete_marker: output.delete_marker,
                    delete_marker_version_id: output
                        .delete_marker
                        .then_some(output.version_id)
                        .flatten(),
                }),
                // Cancellation aborts the whole request; entries already
                // committed stand.
                Err(StorageError::OperationAborted) => {
                    return Err(StorageError::OperationAborted);
                }
                Err(err) => errors.push(DeleteError {
                    key: entry.key,
                    version_id: entry.version_id,
                    code: err.code().to_owned(),
                    message: err.to_string(),
                }),
            }
        }

        debug!(
            bucket = %input.bucket,
            deleted_count = deleted.len(),
            error_count = errors.len(),
            "delete_objects completed"
        );

        Ok(DeleteObjectsOutput {
            deleted: if input.quiet { Vec::new() } else { deleted },
            errors,
        })
    }
}
