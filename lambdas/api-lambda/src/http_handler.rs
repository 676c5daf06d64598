use amour_shared::{face_search, image_proxy, photos, response, AppState};
use lambda_http::{
    http::{header::CONTENT_TYPE, Method},
    Body, Error, Request, RequestExt, Response,
};
use std::sync::Arc;

/// Main Lambda handler - routes /api requests to the endpoint handlers
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path().trim_end_matches('/');
    tracing::info!("🚀 API Lambda invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if *method == Method::OPTIONS {
        return response::preflight();
    }

    match path {
        "/api/photos" => match method {
            &Method::GET => photos::list_photos(&state).await,
            _ => response::method_not_allowed(),
        },
        "/api/search-face" => match method {
            &Method::POST => {
                let content_type = event
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok());
                face_search::search_face(&state, content_type, event.body()).await
            }
            _ => response::method_not_allowed(),
        },
        "/api/download-image" => match method {
            &Method::GET => {
                let params = event.query_string_parameters();
                image_proxy::download_image(&state, params.first("url")).await
            }
            _ => response::method_not_allowed(),
        },
        _ => {
            tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
            response::not_found()
        }
    }
}
