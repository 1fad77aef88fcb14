//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of characters of a body that is logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Binary bodies, such as spreadsheet downloads, are logged by their length
/// only and passed through untouched.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let display_text = describe_body(&parts.headers, &body);
    log_body("Received request", &format!("{parts:#?}"), &display_text);

    let request = Request::from_parts(parts, Body::from(body));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let display_text = describe_body(&parts.headers, &body);
    log_body("Sending response", &format!("{parts:#?}"), &display_text);

    Response::from_parts(parts, Body::from(body))
}

fn is_text_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return true;
    };

    let content_type = content_type.to_str().unwrap_or_default();

    content_type.starts_with("text/")
        || content_type.starts_with("application/x-www-form-urlencoded")
        || content_type.starts_with("application/json")
}

/// The body as text, or a placeholder with its length if it is binary.
fn describe_body(headers: &HeaderMap, body: &Bytes) -> String {
    if is_text_content_type(headers)
        && let Ok(text) = std::str::from_utf8(body)
    {
        return text.to_owned();
    }

    format!("<{} bytes of binary data>", body.len())
}

fn truncate(text: &str, limit: usize) -> Option<&str> {
    text.char_indices().nth(limit).map(|(end, _)| &text[..end])
}

fn log_body(message: &str, headers: &str, body: &str) {
    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(truncated) => {
            tracing::info!("{message}: {headers}\nbody: {truncated}...");
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{message}: {headers}\nbody: {body:?}"),
    }
}
