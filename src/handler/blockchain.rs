//! Chain endpoints
//!
//! Each handler is a stateless read: load the chain file, pick what the
//! endpoint exposes, and map failures to 404/500 with a short detail message.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde_json::{json, Value};

use crate::chain::{self, ChainError};
use crate::config::AppState;
use crate::http;
use crate::logger;

/// Static help text served at `/`
pub const ROOT_HELP: &str = "Welcome to the Blockchain API \n\n\
Available Endpoints: \n\n\
1. Get Blockchain Data: /blockchain \n\n\
2. Get Latest Block Height: /blockchain/height \n\n\
3. Get Latest Block: /blockchain/last_block \n\n";

const FILE_NOT_FOUND: &str = "Blockchain file not found";
const NO_BLOCKS: &str = "No blocks found in blockchain";

/// `GET /`
pub fn root(is_head: bool) -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, ROOT_HELP, is_head)
}

/// `GET /blockchain` - the full chain as stored
pub async fn get_chain(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match state.chain.read().await {
        Ok(blocks) => http::build_json_response(StatusCode::OK, &blocks, is_head),
        Err(e) => error_response(
            state,
            &e,
            "An error occurred while reading the blockchain",
            is_head,
        ),
    }
}

/// `GET /blockchain/height` - `{"block_height": <index of last block>}`
pub async fn get_height(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    let height = state
        .chain
        .read()
        .await
        .and_then(|blocks| chain::block_height(&blocks));

    match height {
        Ok(height) => {
            http::build_json_response(StatusCode::OK, &json!({ "block_height": height }), is_head)
        }
        Err(e) => error_response(
            state,
            &e,
            "An error occurred while fetching block height",
            is_head,
        ),
    }
}

/// `GET /blockchain/last_block` - the last block object, verbatim
pub async fn get_last_block(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    let blocks = match state.chain.read().await {
        Ok(blocks) => blocks,
        Err(e) => {
            return error_response(
                state,
                &e,
                "An error occurred while fetching the last block",
                is_head,
            )
        }
    };

    match chain::last_block(&blocks) {
        Ok(block) => http::build_json_response::<Value>(StatusCode::OK, block, is_head),
        Err(e) => error_response(
            state,
            &e,
            "An error occurred while fetching the last block",
            is_head,
        ),
    }
}

fn error_response(
    state: &AppState,
    err: &ChainError,
    internal_detail: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    logger::log_chain_error(&state.config.chain.data_file, err);

    let detail = match err {
        ChainError::NotFound { .. } => FILE_NOT_FOUND,
        ChainError::Empty => NO_BLOCKS,
        ChainError::Parse { .. } | ChainError::MalformedBlock | ChainError::Io { .. } => {
            internal_detail
        }
    };
    http::build_error_response(err.status(), detail, is_head)
}
