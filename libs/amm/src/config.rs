//! Quote configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) yields the standard trade-size limits.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Top-level quote configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub stable: StableQuoteConfig,
}

/// Stable pool trade-size limits and amplification scaling
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StableQuoteConfig {
    /// Largest exact-in trade as a fraction of the input balance
    pub max_in_ratio: Decimal,
    /// Largest exact-out trade as a fraction of the output balance
    pub max_out_ratio: Decimal,
    /// Decimal places the amplification parameter is scaled by before solving
    pub amp_precision: u32,
}

impl Default for StableQuoteConfig {
    fn default() -> Self {
        Self {
            max_in_ratio: dec!(0.3),
            max_out_ratio: dec!(0.3),
            amp_precision: 3,
        }
    }
}

impl QuoteConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse quote configuration")?;
        config.validate()?;
        debug!(?config, "Parsed quote configuration");
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading quote configuration: {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read quote configuration {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid quote configuration in {:?}", path))
    }

    pub fn validate(&self) -> Result<()> {
        let stable = &self.stable;
        for (name, ratio) in [
            ("max_in_ratio", stable.max_in_ratio),
            ("max_out_ratio", stable.max_out_ratio),
        ] {
            if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
                bail!("stable.{} must be in (0, 1], got {}", name, ratio);
            }
        }
        // 10^amp_precision times any realistic amp must stay well inside U256
        if stable.amp_precision > 18 {
            bail!(
                "stable.amp_precision must be at most 18, got {}",
                stable.amp_precision
            );
        }
        Ok(())
    }
}
