use crate::response;
use crate::s3::{list_image_keys, StorageError};
use crate::types::{Orientation, Photo, PhotosResponse};
use crate::AppState;
use lambda_http::{http::StatusCode, Body, Error, Response};

const ALT_PREFIX: &str = "Adristi and Fadhriga";

/// List the photos of one orientation folder, e.g. `prewed/landscape/`.
pub async fn list_orientation(
    state: &AppState,
    orientation: Orientation,
) -> Result<Vec<Photo>, StorageError> {
    let prefix = format!("{}{}/", state.config.photo_prefix, orientation.as_str());
    let keys = list_image_keys(state.lister.as_ref(), &state.config.aws.bucket, &prefix).await?;

    Ok(keys
        .iter()
        .map(|key| Photo {
            src: state.config.public_url(key),
            alt: format!("{} {}", ALT_PREFIX, orientation.as_str()),
            orientation,
        })
        .collect())
}

/// GET /api/photos
pub async fn list_photos(state: &AppState) -> Result<Response<Body>, Error> {
    let result = tokio::try_join!(
        list_orientation(state, Orientation::Landscape),
        list_orientation(state, Orientation::Portrait),
    );

    match result {
        Ok((landscape, portrait)) => {
            tracing::info!(
                "Listed {} landscape and {} portrait photos",
                landscape.len(),
                portrait.len()
            );
            response::json(StatusCode::OK, &PhotosResponse { landscape, portrait })
        }
        Err(e) => {
            tracing::error!("Failed to fetch photos: {}", e);
            response::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch photos")
        }
    }
}
