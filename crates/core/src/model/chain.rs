use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tps_lanes_protocol::HexColor;

/// Base particle speed in pixels per tick used by the built-in table.
pub const DEFAULT_SPEED: f64 = 5.0;

#[derive(Debug, Error, PartialEq)]
pub enum ChainConfigError {
    #[error("chain #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("chain {name:?}: tps must be a positive number, got {tps}")]
    Tps { name: String, tps: f64 },
    #[error("chain {name:?}: speed must be a positive number, got {speed}")]
    Speed { name: String, speed: f64 },
    #[error("chain {name:?}: glow must be zero or positive, got {glow}")]
    Glow { name: String, glow: f64 },
}

/// Static description of one chain: how it looks and how fast it streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    /// Transactions per second; drives the lane's spawn rate.
    pub tps: f64,
    pub color: HexColor,
    /// Base particle speed in pixels per tick.
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub glow: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

fn default_enabled() -> bool {
    true
}

impl ChainConfig {
    fn validate(&self, index: usize) -> Result<(), ChainConfigError> {
        if self.name.trim().is_empty() {
            return Err(ChainConfigError::EmptyName { index });
        }
        if !(self.tps.is_finite() && self.tps > 0.0) {
            return Err(ChainConfigError::Tps {
                name: self.name.clone(),
                tps: self.tps,
            });
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ChainConfigError::Speed {
                name: self.name.clone(),
                speed: self.speed,
            });
        }
        if !(self.glow.is_finite() && self.glow >= 0.0) {
            return Err(ChainConfigError::Glow {
                name: self.name.clone(),
                glow: self.glow,
            });
        }
        Ok(())
    }
}

/// Ordered, validated, read-only set of chains.
///
/// Records are shared with lanes through `Arc`, so rebuilding lanes never
/// copies configuration.
#[derive(Debug, Clone, Default)]
pub struct ChainTable {
    chains: Vec<Arc<ChainConfig>>,
}

impl ChainTable {
    pub fn new(chains: Vec<ChainConfig>) -> Result<Self, ChainConfigError> {
        for (index, chain) in chains.iter().enumerate() {
            chain.validate(index)?;
        }
        Ok(Self {
            chains: chains.into_iter().map(Arc::new).collect(),
        })
    }

    /// The deployed chain table. Only Bitcoin, Ethereum, Base and Solana
    /// are enabled.
    pub fn builtin() -> Self {
        Self {
            chains: builtin_chains().into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ChainConfig>> {
        self.chains.iter()
    }

    /// Enabled chains in configuration order.
    pub fn enabled(&self) -> impl Iterator<Item = &Arc<ChainConfig>> {
        self.chains.iter().filter(|c| c.enabled)
    }
}

pub fn builtin_chains() -> Vec<ChainConfig> {
    let chain = |name: &str, tps: f64, color: HexColor, glow: f64, enabled: bool| ChainConfig {
        name: name.to_string(),
        tps,
        color,
        speed: DEFAULT_SPEED,
        glow,
        enabled,
    };
    vec![
        chain("Bitcoin", 7.0, HexColor::rgb(0xF7, 0x93, 0x1A), 2.0, true),
        chain("Ethereum", 20.0, HexColor::rgb(0x62, 0x7E, 0xEA), 3.0, true),
        chain("Base", 180.0, HexColor::rgb(0x00, 0x52, 0xFF), 2.0, true),
        chain("BSC", 200.0, HexColor::rgb(0xF0, 0xB9, 0x0B), 3.0, false),
        chain("Solana", 1000.0, HexColor::rgb(0x14, 0xF1, 0x95), 2.0, true),
        chain("Tron", 150.0, HexColor::rgb(0xFF, 0x00, 0x13), 2.0, false),
        chain("Avalanche", 90.0, HexColor::rgb(0xE8, 0x41, 0x42), 2.0, false),
        chain("Near", 100_000.0, HexColor::rgb(0x00, 0xC0, 0x8B), 1.0, false),
        chain("Sui", 50.0, HexColor::rgb(0x6F, 0xBC, 0xF0), 1.0, false),
        chain("Aptos", 50.0, HexColor::rgb(0x4E, 0xCD, 0xC4), 1.0, false),
        chain("Polygon", 190.0, HexColor::rgb(0x82, 0x47, 0xE5), 4.0, false),
        chain("Arbitrum", 50.0, HexColor::rgb(0x28, 0xA0, 0xF0), 1.0, false),
        chain("TON", 20.0, HexColor::rgb(0x00, 0x88, 0xCC), 1.0, false),
    ]
}
