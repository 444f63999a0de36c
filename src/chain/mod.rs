//! Chain data module
//!
//! Read-only access to the chain file written by an external producer.
//! The file holds a JSON array of block objects in ascending height order;
//! nothing here creates, mutates, sorts or validates it.

mod error;
mod reader;

pub use error::ChainError;
pub use reader::{block_height, last_block, ChainReader};

/// Default location of the chain file, relative to the working directory
pub const DEFAULT_CHAIN_FILE: &str = "chaindata/blockchain.json";
