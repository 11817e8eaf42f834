//! # Market Pricing Configuration
//!
//! Centralized configuration for the pricing engine, replacing the fee and
//! tolerance constants that used to be repeated in every trade handler.
//!
//! ## Features
//!
//! - **Fee schedule**: numerator / denominator, validated on load
//! - **Slippage tolerances**: separate trade and liquidity guards
//! - **Chain endpoint**: node API and market contract identity
//! - **Logging**: tracing subscriber level and format
//!
//! ## Usage
//!
//! ```rust,no_run
//! use market_config::{init_logging, load_config};
//! use market_amm::PricingEngine;
//!
//! let config = load_config()?;
//! init_logging(&config.logging)?;
//! let engine = config.engine()?;
//! assert_eq!(engine.version(), market_amm::PRICING_MODEL_VERSION);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod defaults;
pub mod logging;
pub mod pricing_config;

// Re-export commonly used types
pub use logging::init_logging;
pub use pricing_config::{
    load_config, ChainConfig, FeeConfig, LoggingConfig, PricingConfig, SlippageConfig,
};
