// Chain read errors
// Two client-visible classes: not found (404) and internal (500)

use hyper::StatusCode;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The chain file does not exist
    #[error("chain file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The chain is not an array, or the array holds no blocks
    #[error("no blocks found in chain")]
    Empty,

    /// The chain file exists but is not valid JSON
    #[error("failed to parse chain file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The tip is not a JSON object, so it has no fields to read
    #[error("last block is not an object")]
    MalformedBlock,

    /// Any other I/O failure while reading the chain file
    #[error("failed to read chain file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ChainError {
    /// HTTP status this error maps to
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::Empty => StatusCode::NOT_FOUND,
            Self::Parse { .. } | Self::MalformedBlock | Self::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the error belongs to the not-found class
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Empty)
    }
}
