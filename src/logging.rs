//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a request or response body logged at the `info`
/// level. Longer bodies are truncated, the full text is logged at `debug`.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const BODY_NOT_LOGGED: &str = "<binary body not logged>";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level.
///
/// Only text bodies are read for logging. Other bodies, e.g. images served
/// from the static directory, are passed through untouched.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = if has_text_body(&parts.headers) {
        let body_bytes = match read_body(body).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!("Could not read request body: {error}");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };
        log_request(&parts, &String::from_utf8_lossy(&body_bytes));
        Body::from(body_bytes)
    } else {
        log_request(&parts, BODY_NOT_LOGGED);
        body
    };

    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body = if has_text_body(&parts.headers) {
        let body_bytes = match read_body(body).await {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::error!("Could not read response body: {error}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        log_response(&parts, &String::from_utf8_lossy(&body_bytes));
        Body::from(body_bytes)
    } else {
        log_response(&parts, BODY_NOT_LOGGED);
        body
    };

    Response::from_parts(parts, body)
}

/// Whether the `Content-Type` header names a text format, or is missing.
fn has_text_body(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };

    let Ok(content_type) = content_type.to_str() else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/")
        || mime.ends_with("json")
        || mime.ends_with("javascript")
        || mime == "application/x-www-form-urlencoded"
}

async fn read_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a
/// character.
fn truncate_body(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}
