// Application state module
// Shared, read-only state handed to every connection

use super::types::Config;
use crate::chain::ChainReader;

/// Application state
pub struct AppState {
    pub config: Config,
    pub chain: ChainReader,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            chain: ChainReader::new(&config.chain.data_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_reader_follows_configured_file() {
        let mut config = Config::for_chain_file(Path::new("/srv/chain/blockchain.json"));
        config.logging.access_log = false;
        let state = AppState::new(&config);
        assert!(!state.config.logging.access_log);
        assert_eq!(state.chain.path(), Path::new("/srv/chain/blockchain.json"));
    }
}
