//! Pricing Configuration Module
//!
//! Loads the fee schedule, slippage tolerances, chain endpoint and logging
//! settings from a TOML file with `MARKET__`-prefixed environment overrides.

use crate::defaults;
use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use market_amm::{ConstantProductEngine, Decimal, FeeSchedule, SlippageTolerance};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main pricing configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PricingConfig {
    pub fee: FeeConfig,
    pub slippage: SlippageConfig,
    pub chain: ChainConfig,
    pub logging: LoggingConfig,
}

/// Protocol fee as `numerator / denominator`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct FeeConfig {
    pub numerator: u32,
    pub denominator: u32,
}

/// Fractions of a quote the user still accepts
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SlippageConfig {
    /// Applied to buy/sell `min-amount-out`
    pub trade_tolerance: Decimal,
    /// Applied to liquidity add/remove guards
    pub liquidity_tolerance: Decimal,
}

/// Where the chain-state reader finds the market contract
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChainConfig {
    pub api_endpoint: String,
    pub contract_address: String,
    pub contract_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            numerator: defaults::fee::NUMERATOR,
            denominator: defaults::fee::DENOMINATOR,
        }
    }
}

impl Default for SlippageConfig {
    fn default() -> Self {
        Self {
            trade_tolerance: defaults::slippage::trade_tolerance(),
            liquidity_tolerance: defaults::slippage::liquidity_tolerance(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            api_endpoint: defaults::chain::API_ENDPOINT.to_string(),
            contract_address: defaults::chain::CONTRACT_ADDRESS.to_string(),
            contract_name: defaults::chain::CONTRACT_NAME.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::logging::LEVEL.to_string(),
            json: false,
        }
    }
}

impl ChainConfig {
    /// URL of a read-only function on the market contract
    pub fn read_only_url(&self, function: &str) -> String {
        format!(
            "{}/v2/contracts/call-read/{}/{}/{}",
            self.api_endpoint.trim_end_matches('/'),
            self.contract_address,
            self.contract_name,
            function
        )
    }
}

impl PricingConfig {
    /// Load configuration from a file with environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let builder = Config::builder()
            .add_source(File::from(path).required(true))
            // Override with environment variables, e.g. MARKET__FEE__NUMERATOR
            .add_source(
                Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().context("Failed to build configuration")?;
        let mut pricing: PricingConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        pricing.expand_env_vars()?;
        pricing.validate()?;
        info!(path = ?path, fee = ?pricing.fee, "Loaded pricing configuration");
        Ok(pricing)
    }

    /// Parse a TOML document without environment overrides
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let pricing: PricingConfig =
            toml::from_str(content).context("Failed to parse pricing configuration")?;
        pricing.validate()?;
        Ok(pricing)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize pricing configuration")
    }

    /// Check every value converts to a valid pricing type
    pub fn validate(&self) -> Result<()> {
        self.fee_schedule()?;
        self.trade_tolerance()?;
        self.liquidity_tolerance()?;
        debug!("Pricing configuration validated");
        Ok(())
    }

    pub fn fee_schedule(&self) -> Result<FeeSchedule> {
        FeeSchedule::new(self.fee.numerator, self.fee.denominator).context("Invalid fee schedule")
    }

    pub fn trade_tolerance(&self) -> Result<SlippageTolerance> {
        SlippageTolerance::new(self.slippage.trade_tolerance)
            .context("Invalid trade slippage tolerance")
    }

    pub fn liquidity_tolerance(&self) -> Result<SlippageTolerance> {
        SlippageTolerance::new(self.slippage.liquidity_tolerance)
            .context("Invalid liquidity slippage tolerance")
    }

    /// Pricing engine built from the configured fee
    pub fn engine(&self) -> Result<ConstantProductEngine> {
        Ok(ConstantProductEngine::new(self.fee_schedule()?))
    }

    /// Expand environment variables in chain endpoint values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        let chain = &mut self.chain;
        chain.api_endpoint = shellexpand::env(&chain.api_endpoint)
            .context("Failed to expand API endpoint")?
            .to_string();
        chain.contract_address = shellexpand::env(&chain.contract_address)
            .context("Failed to expand contract address")?
            .to_string();
        chain.contract_name = shellexpand::env(&chain.contract_name)
            .context("Failed to expand contract name")?
            .to_string();
        Ok(())
    }
}

/// Convenience function to load configuration from the default location
pub fn load_config() -> Result<PricingConfig> {
    PricingConfig::load(Path::new(defaults::CONFIG_PATH))
}
