use crate::response;
use crate::AppState;
use lambda_http::{http::StatusCode, Body, Error, Response};
use reqwest::header::CONTENT_TYPE;

#[derive(Debug, PartialEq, Eq)]
pub enum DownloadRejection {
    MissingUrl,
    InvalidUrl,
}

/// Only URLs under the CDN origin may be proxied. This is a plain string
/// prefix check, not a parsed-origin comparison. The base always gets a
/// trailing slash so `https://cdn.example.com.evil.net/` cannot pass.
pub fn check_download_url<'a>(
    url: Option<&'a str>,
    cdn_base_url: &str,
) -> Result<&'a str, DownloadRejection> {
    let url = url
        .filter(|u| !u.is_empty())
        .ok_or(DownloadRejection::MissingUrl)?;
    let base = format!("{}/", cdn_base_url.trim_end_matches('/'));
    if !url.starts_with(&base) {
        return Err(DownloadRejection::InvalidUrl);
    }
    Ok(url)
}

/// GET /api/download-image?url=...
///
/// Fetch a CDN image and hand it back as an attachment so the browser saves
/// it instead of navigating cross-origin.
pub async fn download_image(state: &AppState, url: Option<&str>) -> Result<Response<Body>, Error> {
    let url = match check_download_url(url, &state.config.cdn_base_url) {
        Ok(url) => url,
        Err(DownloadRejection::MissingUrl) => {
            return response::error(StatusCode::BAD_REQUEST, "URL parameter required");
        }
        Err(DownloadRejection::InvalidUrl) => {
            tracing::warn!("Refusing to proxy non-CDN URL: {}", url.unwrap_or_default());
            return response::error(StatusCode::BAD_REQUEST, "Invalid URL");
        }
    };

    match fetch(state, url).await {
        Ok((content_type, bytes)) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", content_type)
            .header("Content-Disposition", "attachment")
            .header("Cache-Control", "no-cache")
            .header("Access-Control-Allow-Origin", "*")
            .body(bytes.into())
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!("Failed to download {}: {}", url, e);
            response::error(StatusCode::INTERNAL_SERVER_ERROR, "Download failed")
        }
    }
}

async fn fetch(state: &AppState, url: &str) -> Result<(String, Vec<u8>), reqwest::Error> {
    let resp = state
        .http_client
        .get(url)
        .timeout(state.config.aws.outbound_timeout)
        .send()
        .await?
        .error_for_status()?;

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = resp.bytes().await?;
    Ok((content_type, bytes.to_vec()))
}
