use tracing::error;

use crate::error::RpcError;
use crate::types::GameConfig;

/// Baseline game configuration bundled into the binary at build time
static BUNDLED_GAME_CONFIG: &str = include_str!("../../config/game_config.json");

/// Source of the baseline game configuration.
///
/// Handlers receive this as an injected dependency so tests can supply
/// their own document without touching the bundled one.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource: Send + Sync {
    /// Baseline configuration as pretty-printed JSON (2-space indent)
    fn load_baseline(&self) -> Result<String, RpcError>;
}

/// Reads the baseline from an immutable, compiled-in document
#[derive(Debug, Clone, Copy)]
pub struct BundledConfig {
    source: &'static str,
}

impl BundledConfig {
    pub fn new() -> Self {
        Self { source: BUNDLED_GAME_CONFIG }
    }

    pub fn from_source(source: &'static str) -> Self {
        Self { source }
    }

    /// Decoded baseline, for callers that need typed access
    pub fn decode(&self) -> Result<GameConfig, RpcError> {
        serde_json::from_str(self.source).map_err(|e| {
            error!("Error decoding embedded JSON: {}", e);
            RpcError::UnmarshallingError
        })
    }
}

impl Default for BundledConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for BundledConfig {
    fn load_baseline(&self) -> Result<String, RpcError> {
        let config = self.decode()?;
        serde_json::to_string_pretty(&config).map_err(|e| {
            error!("Error encoding JSON: {}", e);
            RpcError::MarshallingError
        })
    }
}
