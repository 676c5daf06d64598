use crate::types::ErrorResponse;
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

pub fn error(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    json(
        status,
        &ErrorResponse {
            error: message.to_string(),
        },
    )
}

pub fn not_found() -> Result<Response<Body>, Error> {
    error(StatusCode::NOT_FOUND, "Not found")
}

pub fn method_not_allowed() -> Result<Response<Body>, Error> {
    error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub fn preflight() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET,POST,OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Empty)
        .map_err(Box::new)?)
}

#[cfg(test)]
pub(crate) fn body_json(resp: &Response<Body>) -> serde_json::Value {
    serde_json::from_slice(resp.body().as_ref()).unwrap()
}
