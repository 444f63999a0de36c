//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::AppState;
use crate::handler::blockchain;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_LENGTH;
use hyper::{HeaderMap, Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let mut response = dispatch(req.method(), req.uri().path(), req.headers(), &state).await;
    http::apply_common_headers(&mut response, &state.config.http);
    Ok(response)
}

async fn dispatch(
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    state: &AppState,
) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(headers, state.config.http.max_body_size) {
        return resp;
    }

    let is_head = *method == Method::HEAD;
    route_request(normalize_path(path), is_head, state).await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Strip trailing slashes so `/blockchain/` routes like `/blockchain`
fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Route request based on path
async fn route_request(path: &str, is_head: bool, state: &AppState) -> Response<Full<Bytes>> {
    // Health check endpoints never touch the chain file
    if state.config.health.matches(path) {
        return http::build_health_response("ok", is_head);
    }

    match path {
        "/" => blockchain::root(is_head),
        "/blockchain" => blockchain::get_chain(state, is_head).await,
        "/blockchain/height" => blockchain::get_height(state, is_head).await,
        "/blockchain/last_block" => blockchain::get_last_block(state, is_head).await,
        _ => {
            logger::log_debug(&format!("No route for {path}"));
            http::build_404_response(is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        state: Arc<AppState>,
    }

    /// State whose chain file lives in a fresh temp dir; `content` of `None` leaves it absent
    fn fixture(content: Option<&str>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chaindata").join("blockchain.json");
        if let Some(content) = content {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, content).unwrap();
        }
        Fixture {
            state: state_for(&path),
            _dir: dir,
        }
    }

    fn state_for(path: &Path) -> Arc<AppState> {
        Arc::new(AppState::new(&Config::for_chain_file(path)))
    }

    async fn send(state: &Arc<AppState>, method: Method, path: &str) -> (StatusCode, Bytes) {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(state)).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    async fn get_json(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
        let (status, body) = send(state, Method::GET, path).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    const THREE_BLOCKS: &str = r#"[{"index":0},{"index":1},{"index":2}]"#;

    #[tokio::test]
    async fn test_chain_returned_in_order() {
        let chain = r#"[
            {"index":0,"hash":"genesis","previousHash":"0"},
            {"index":1,"hash":"b1","previousHash":"genesis"},
            {"index":2,"hash":"b2","previousHash":"b1"}
        ]"#;
        let fx = fixture(Some(chain));
        let (status, body) = get_json(&fx.state, "/blockchain").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::from_str::<Value>(chain).unwrap());
    }

    #[tokio::test]
    async fn test_height_and_last_block() {
        let fx = fixture(Some(THREE_BLOCKS));

        let (status, body) = get_json(&fx.state, "/blockchain/height").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"block_height": 2}));

        let (status, body) = get_json(&fx.state, "/blockchain/last_block").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"index": 2}));
    }

    #[tokio::test]
    async fn test_missing_file_is_404_everywhere() {
        let fx = fixture(None);
        for path in ["/blockchain", "/blockchain/height", "/blockchain/last_block"] {
            let (status, body) = get_json(&fx.state, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(body, json!({"detail": "Blockchain file not found"}));
        }
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let fx = fixture(Some("[]"));

        let (status, body) = get_json(&fx.state, "/blockchain").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        for path in ["/blockchain/height", "/blockchain/last_block"] {
            let (status, body) = get_json(&fx.state, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(body, json!({"detail": "No blocks found in blockchain"}));
        }
    }

    #[tokio::test]
    async fn test_non_array_chain_has_no_blocks() {
        let fx = fixture(Some(r#"{"index": 7}"#));

        let (status, _) = get_json(&fx.state, "/blockchain").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_json(&fx.state, "/blockchain/height").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get_json(&fx.state, "/blockchain/last_block").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_json_is_500() {
        let fx = fixture(Some("[{\"index\": 0}"));
        let expected = [
            ("/blockchain", "An error occurred while reading the blockchain"),
            ("/blockchain/height", "An error occurred while fetching block height"),
            ("/blockchain/last_block", "An error occurred while fetching the last block"),
        ];
        for (path, detail) in expected {
            let (status, body) = get_json(&fx.state, path).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
            assert_eq!(body, json!({ "detail": detail }));
        }
    }

    #[tokio::test]
    async fn test_root_always_ok() {
        for content in [None, Some("[]"), Some("not json"), Some(THREE_BLOCKS)] {
            let fx = fixture(content);
            let (status, body) = send(&fx.state, Method::GET, "/").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, Bytes::from_static(blockchain::ROOT_HELP.as_bytes()));
        }
    }

    #[tokio::test]
    async fn test_height_without_index_is_null() {
        let fx = fixture(Some(r#"[{"index":0},{"hash":"ff"}]"#));
        let (status, body) = get_json(&fx.state, "/blockchain/height").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"block_height": null}));
    }

    #[tokio::test]
    async fn test_height_of_non_object_tip_is_500() {
        for chain in ["[1, 2, 3]", r#"[{"index":0},"tip"]"#] {
            let fx = fixture(Some(chain));
            let (status, body) = get_json(&fx.state, "/blockchain/height").await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{chain}");
            assert_eq!(
                body,
                json!({"detail": "An error occurred while fetching block height"})
            );
        }
    }

    #[tokio::test]
    async fn test_chain_bytes_preserved() {
        let chain = r#"[{"index":0,"timestamp":1,"amount":123456789012345678901234567890,"hash":"ab"}]"#;
        let fx = fixture(Some(chain));

        let (status, body) = send(&fx.state, Method::GET, "/blockchain").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from(chain));

        let (_, body) = send(&fx.state, Method::GET, "/blockchain/last_block").await;
        assert_eq!(body, Bytes::copy_from_slice(chain[1..chain.len() - 1].as_bytes()));
    }

    #[tokio::test]
    async fn test_last_element_is_trusted_as_tip() {
        let fx = fixture(Some(r#"[{"index":4},{"index":9},{"index":3}]"#));
        let (_, body) = get_json(&fx.state, "/blockchain/height").await;
        assert_eq!(body, json!({"block_height": 3}));
    }

    #[tokio::test]
    async fn test_trailing_slash() {
        let fx = fixture(Some(THREE_BLOCKS));
        let (status, body) = get_json(&fx.state, "/blockchain/height/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"block_height": 2}));
    }

    #[tokio::test]
    async fn test_unknown_path_and_health() {
        let fx = fixture(None);

        let (status, body) = get_json(&fx.state, "/blocks").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Not Found"}));

        let (status, body) = send(&fx.state, Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"ok"));
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let fx = fixture(Some(THREE_BLOCKS));
        let (status, body) = send(&fx.state, Method::HEAD, "/blockchain/last_block").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_method_handling() {
        let fx = fixture(Some(THREE_BLOCKS));

        let (status, _) = send(&fx.state, Method::POST, "/blockchain").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = send(&fx.state, Method::OPTIONS, "/blockchain").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let fx = fixture(Some(THREE_BLOCKS));
        let req = Request::builder()
            .uri("/blockchain")
            .header("content-length", "99999999")
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&fx.state)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_server_header() {
        let fx = fixture(None);
        let req = Request::builder().uri("/").body(()).unwrap();
        let resp = handle_request(req, Arc::clone(&fx.state)).await.unwrap();
        assert!(resp.headers()["server"]
            .to_str()
            .unwrap()
            .starts_with("chaindata-api/"));
        assert!(!resp.headers().contains_key("access-control-allow-origin"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("/blockchain/"), "/blockchain");
        assert_eq!(normalize_path("/blockchain/height"), "/blockchain/height");
    }
}
