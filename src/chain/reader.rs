//! Chain file reader
//!
//! Every call re-reads and re-parses the file from disk, so the served view
//! always reflects whatever the external writer last produced.

use super::error::ChainError;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Reads the chain file at a fixed path
#[derive(Debug, Clone)]
pub struct ChainReader {
    path: PathBuf,
}

impl ChainReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the whole chain
    ///
    /// # Errors
    ///
    /// * `ChainError::NotFound` - the file does not exist
    /// * `ChainError::Parse` - the content is not valid JSON
    /// * `ChainError::Io` - any other read failure
    pub async fn read(&self) -> Result<Value, ChainError> {
        let data = fs::read(&self.path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ChainError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                ChainError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        serde_json::from_slice(&data).map_err(|source| ChainError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Most recent block of the chain
///
/// The last array element is taken as the tip; ordering is the writer's
/// responsibility and is not checked here.
pub fn last_block(chain: &Value) -> Result<&Value, ChainError> {
    chain
        .as_array()
        .and_then(|blocks| blocks.last())
        .ok_or(ChainError::Empty)
}

/// Height of the most recent block (its `index` field, `null` if absent)
///
/// A tip that is not an object is `ChainError::MalformedBlock`.
pub fn block_height(chain: &Value) -> Result<Value, ChainError> {
    let block = last_block(chain)?
        .as_object()
        .ok_or(ChainError::MalformedBlock)?;
    Ok(block.get("index").cloned().unwrap_or(Value::Null))
}
