//! Batch job that adds every photo under a prefix to the face collection.

use crate::external_id::ExternalImageId;
use crate::rekognition::{FaceIndex, FaceIndexError};
use crate::s3::{list_image_keys, ObjectLister, StorageError};
use crate::types::{IndexOutcome, IndexingSummary};
use std::time::Duration;

pub const DEFAULT_PREFIX: &str = "prewed/";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Index one object. Never fails: every error becomes `IndexOutcome::Failed`.
pub async fn index_image(index: &dyn FaceIndex, bucket: &str, key: &str) -> IndexOutcome {
    let external_id = match ExternalImageId::encode(key) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("✗ Cannot index {}: {}", key, e);
            return IndexOutcome::Failed(e.to_string());
        }
    };

    match index.index_faces(bucket, key, &external_id).await {
        Ok(0) => {
            tracing::warn!("⚠ No faces detected in: {}", key);
            IndexOutcome::NoFaces
        }
        Ok(n) => {
            tracing::info!("✓ Indexed {} face(s) in: {}", n, key);
            IndexOutcome::Indexed(n)
        }
        Err(e @ FaceIndexError::InvalidParameter(_)) => {
            tracing::warn!("⚠ Invalid image or no faces: {} ({})", key, e);
            IndexOutcome::Failed(e.to_string())
        }
        Err(e) => {
            tracing::error!("✗ Error indexing {}: {}", key, e);
            IndexOutcome::Failed(e.to_string())
        }
    }
}

/// Index `keys` one at a time, sleeping `delay` after each call.
/// `summary` is updated in place so a caller that abandons the future
/// (e.g. on a deadline) still sees the partial counts.
pub async fn index_keys(
    index: &dyn FaceIndex,
    bucket: &str,
    keys: &[String],
    delay: Duration,
    summary: &mut IndexingSummary,
) {
    summary.total_images = keys.len();
    for key in keys {
        let outcome = index_image(index, bucket, key).await;
        summary.record(&outcome);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// List the images under `prefix` and index all of them.
pub async fn index_prefix(
    lister: &dyn ObjectLister,
    index: &dyn FaceIndex,
    bucket: &str,
    prefix: &str,
    delay: Duration,
    summary: &mut IndexingSummary,
) -> Result<(), StorageError> {
    tracing::info!("Starting face indexing for path: {}", prefix);

    let keys = list_image_keys(lister, bucket, prefix).await?;
    tracing::info!("Found {} images to process", keys.len());

    index_keys(index, bucket, &keys, delay, summary).await;
    Ok(())
}

pub fn log_summary(summary: &IndexingSummary) {
    tracing::info!("--- Summary ---");
    tracing::info!("Total images: {}", summary.total_images);
    tracing::info!("Successfully indexed: {}", summary.indexed);
    tracing::info!(
        "Failed/No faces: {} ({} without faces)",
        summary.failed,
        summary.no_faces
    );
    tracing::info!("Total faces indexed: {}", summary.total_faces);
}
