use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::LaneEngine;
use crate::model::chain::builtin_chains;
use crate::model::{ChainConfig, ChainConfigError, ChainTable, LaneLayout};

/// Pool size used when none is configured.
pub const DEFAULT_POOL_CAPACITY: usize = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid chain table: {0}")]
    Chain(#[from] ChainConfigError),
}

/// Tunables for a [`LaneEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed number of particle slots; spawns beyond it are dropped.
    pub pool_capacity: usize,
    pub layout: LaneLayout,
    /// Seed for spawn jitter. Hosts replace 0 with a clock-derived seed.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            layout: LaneLayout::default(),
            seed: 0,
        }
    }
}

/// Everything needed to start a simulation, as read from a config file.
///
/// ```json
/// {
///   "engine": { "pool_capacity": 8192, "layout": "columns" },
///   "chains": [ { "name": "Solana", "tps": 1000, "color": "#14F195" } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default = "builtin_chains")]
    pub chains: Vec<ChainConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            chains: builtin_chains(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_slice(data)?;
        config.chain_table()?;
        Ok(config)
    }

    pub fn chain_table(&self) -> Result<ChainTable, ChainConfigError> {
        ChainTable::new(self.chains.clone())
    }

    pub fn build_engine(&self) -> Result<LaneEngine, ConfigError> {
        Ok(LaneEngine::new(self.chain_table()?, &self.engine))
    }
}
