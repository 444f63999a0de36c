//! HTTP response building module
//!
//! Builders for the response shapes the API produces. A builder never panics:
//! if assembling a response fails the error is logged and a bare fallback is returned.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build a plain text response
pub fn build_text_response(
    status: StatusCode,
    content: impl Into<Bytes>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    build_body_response(status, TEXT_CONTENT_TYPE, content.into(), is_head)
}

/// Build a JSON response from any serializable value
///
/// Serialization failure yields a 500 with a generic error body.
pub fn build_json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    body: &T,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => build_body_response(status, JSON_CONTENT_TYPE, Bytes::from(json), is_head),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_body_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                JSON_CONTENT_TYPE,
                Bytes::from_static(br#"{"detail":"Internal server error"}"#),
                is_head,
            )
        }
    }
}

/// Build an error response with a `{"detail": ...}` body
pub fn build_error_response(
    status: StatusCode,
    detail: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    build_json_response(status, &serde_json::json!({ "detail": detail }), is_head)
}

/// Build 404 Not Found response for unknown paths
pub fn build_404_response(is_head: bool) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, "Not Found", is_head)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from_static(
            br#"{"detail":"Method Not Allowed"}"#,
        )))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", false)
}

/// Build health check response
pub fn build_health_response(status: &str, is_head: bool) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::OK, status.to_string(), is_head)
}

/// Stamp headers every response carries
pub fn apply_common_headers(response: &mut Response<Full<Bytes>>, http: &HttpConfig) {
    let headers = response.headers_mut();
    match HeaderValue::from_str(&http.server_name) {
        Ok(value) => {
            headers.insert(SERVER, value);
        }
        Err(e) => crate::logger::log_warning(&format!(
            "Invalid server_name '{}': {e}",
            http.server_name
        )),
    }
    if http.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

/// Build a response with a body, keeping `Content-Length` for HEAD requests
fn build_body_response(
    status: StatusCode,
    content_type: &str,
    data: Bytes,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
