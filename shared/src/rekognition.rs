use crate::external_id::ExternalImageId;
use async_trait::async_trait;
use aws_sdk_rekognition as rek;
use aws_sdk_rekognition::error::SdkError;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, Image, QualityFilter, S3Object};

/// Limits applied to a search-by-image call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub max_faces: i32,
    pub face_match_threshold: f32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_faces: 50,
            face_match_threshold: 70.0,
        }
    }
}

pub const INDEX_MAX_FACES: i32 = 10;

/// A match as returned by the face index, before any mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFaceMatch {
    pub external_image_id: Option<String>,
    pub similarity: Option<f32>,
}

#[derive(Debug, thiserror::Error)]
pub enum FaceIndexError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid image format: {0}")]
    InvalidImageFormat(String),
    #[error("face index request failed: {0}")]
    Service(String),
}

/// Add faces to, and search, a face collection.
#[async_trait]
pub trait FaceIndex: Send + Sync {
    /// Index the faces of an object already stored in `bucket`; returns the
    /// number of face records created.
    async fn index_faces(
        &self,
        bucket: &str,
        key: &str,
        external_id: &ExternalImageId,
    ) -> Result<usize, FaceIndexError>;

    async fn search_faces_by_image(
        &self,
        image: Vec<u8>,
        params: SearchParams,
    ) -> Result<Vec<IndexedFaceMatch>, FaceIndexError>;
}

#[derive(Clone)]
pub struct RekognitionFaceIndex {
    client: rek::Client,
    collection_id: String,
}

impl RekognitionFaceIndex {
    pub fn new(client: rek::Client, collection_id: impl Into<String>) -> Self {
        Self {
            client,
            collection_id: collection_id.into(),
        }
    }
}

#[async_trait]
impl FaceIndex for RekognitionFaceIndex {
    async fn index_faces(
        &self,
        bucket: &str,
        key: &str,
        external_id: &ExternalImageId,
    ) -> Result<usize, FaceIndexError> {
        let s3_obj = S3Object::builder().bucket(bucket).name(key).build();
        let image = Image::builder().s3_object(s3_obj).build();

        let resp = self
            .client
            .index_faces()
            .collection_id(&self.collection_id)
            .image(image)
            .external_image_id(external_id.as_str())
            .max_faces(INDEX_MAX_FACES)
            .quality_filter(QualityFilter::Auto)
            .detection_attributes(Attribute::Default)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(ctx) if ctx.err().is_invalid_parameter_exception() => {
                    FaceIndexError::InvalidParameter(ctx.err().to_string())
                }
                SdkError::ServiceError(ctx) if ctx.err().is_invalid_image_format_exception() => {
                    FaceIndexError::InvalidImageFormat(ctx.err().to_string())
                }
                _ => FaceIndexError::Service(format!("{}", rek::error::DisplayErrorContext(&e))),
            })?;

        Ok(resp.face_records().len())
    }

    async fn search_faces_by_image(
        &self,
        image: Vec<u8>,
        params: SearchParams,
    ) -> Result<Vec<IndexedFaceMatch>, FaceIndexError> {
        let image = Image::builder().bytes(Blob::new(image)).build();

        let resp = self
            .client
            .search_faces_by_image()
            .collection_id(&self.collection_id)
            .image(image)
            .max_faces(params.max_faces)
            .face_match_threshold(params.face_match_threshold)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(ctx) if ctx.err().is_invalid_parameter_exception() => {
                    FaceIndexError::InvalidParameter(ctx.err().to_string())
                }
                SdkError::ServiceError(ctx) if ctx.err().is_invalid_image_format_exception() => {
                    FaceIndexError::InvalidImageFormat(ctx.err().to_string())
                }
                _ => FaceIndexError::Service(format!("{}", rek::error::DisplayErrorContext(&e))),
            })?;

        Ok(resp
            .face_matches()
            .iter()
            .map(|m| IndexedFaceMatch {
                external_image_id: m
                    .face()
                    .and_then(|f| f.external_image_id())
                    .map(str::to_string),
                similarity: m.similarity(),
            })
            .collect())
    }
}
