use crate::external_id::ExternalImageId;
use crate::rekognition::SearchParams;
use crate::response;
use crate::types::{FaceMatch, SearchResponse};
use crate::AppState;
use bytes::Bytes;
use lambda_http::{http::StatusCode, Body, Error, Response};

const IMAGE_FIELD: &str = "image";
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5MB
// Rekognition only reads JPEG and PNG bytes, so webp uploads are refused here.
const ALLOWED_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

#[derive(Debug, PartialEq, Eq)]
pub enum UploadRejection {
    NoImage,
    InvalidType,
    TooLarge,
}

impl UploadRejection {
    pub fn message(&self) -> &'static str {
        match self {
            UploadRejection::NoImage => "No image provided",
            UploadRejection::InvalidType => "Invalid file type",
            UploadRejection::TooLarge => "File too large",
        }
    }
}

/// The `image` part of a multipart upload.
#[derive(Debug)]
pub struct UploadedImage {
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Pull the `image` field out of a buffered multipart body. Any parse
/// failure is treated the same as a missing field.
pub async fn read_image_field(content_type: Option<&str>, body: &[u8]) -> Option<UploadedImage> {
    let boundary = multer::parse_boundary(content_type?).ok()?;
    let data = Bytes::copy_from_slice(body);
    let stream = futures::stream::once(async move { Ok::<Bytes, std::convert::Infallible>(data) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(IMAGE_FIELD) => {
                let content_type = field.content_type().map(|m| m.essence_str().to_string());
                let bytes = field.bytes().await.ok()?;
                return Some(UploadedImage {
                    content_type,
                    bytes,
                });
            }
            Ok(Some(_)) => continue,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to parse multipart body: {}", e);
                return None;
            }
        }
    }
}

/// Validation order: presence, then type, then size.
pub fn validate_upload(upload: Option<&UploadedImage>) -> Result<&UploadedImage, UploadRejection> {
    let upload = upload.ok_or(UploadRejection::NoImage)?;

    let allowed = upload
        .content_type
        .as_deref()
        .map(|ct| ALLOWED_TYPES.iter().any(|t| ct.eq_ignore_ascii_case(t)))
        .unwrap_or(false);
    if !allowed {
        return Err(UploadRejection::InvalidType);
    }

    if upload.bytes.len() > MAX_FILE_SIZE {
        return Err(UploadRejection::TooLarge);
    }

    Ok(upload)
}

/// POST /api/search-face
pub async fn search_face(
    state: &AppState,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let upload = read_image_field(content_type, body).await;
    let upload = match validate_upload(upload.as_ref()) {
        Ok(upload) => upload,
        Err(rejection) => {
            tracing::info!("Rejected face search upload: {:?}", rejection);
            return response::error(StatusCode::BAD_REQUEST, rejection.message());
        }
    };

    tracing::info!("🔍 Searching faces for {} byte upload", upload.bytes.len());

    let found = match state
        .face_index
        .search_faces_by_image(upload.bytes.to_vec(), SearchParams::default())
        .await
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Face search error: {}", e);
            return response::error(StatusCode::INTERNAL_SERVER_ERROR, "Search failed");
        }
    };

    let matches: Vec<FaceMatch> = found
        .into_iter()
        .filter_map(|m| {
            let key = ExternalImageId::from_raw(m.external_image_id?).decode();
            Some(FaceMatch {
                src: state.config.public_url(&key),
                similarity: m.similarity.unwrap_or(0.0),
            })
        })
        .filter(|m| m.src.contains(&state.config.photo_prefix))
        .collect();

    tracing::info!("Face search returned {} match(es)", matches.len());
    response::json(StatusCode::OK, &SearchResponse { matches })
}
