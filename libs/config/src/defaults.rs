//! Default configuration values
//!
//! Tolerances differ between trades and liquidity changes: swaps default to
//! 1% adverse movement, liquidity guards to 5%.

use market_amm::{dec, Decimal, DEFAULT_FEE_BPS, FEE_DENOMINATOR};

/// Environment variable prefix for overrides (`MARKET__SECTION__KEY`)
pub const ENV_PREFIX: &str = "MARKET";

/// Default configuration file location
pub const CONFIG_PATH: &str = "config/pricing.toml";

/// Protocol fee defaults
pub mod fee {
    use super::*;

    /// 100 / 10,000 = 1%
    pub const NUMERATOR: u32 = DEFAULT_FEE_BPS;
    pub const DENOMINATOR: u32 = FEE_DENOMINATOR;
}

/// Slippage tolerance defaults
pub mod slippage {
    use super::*;

    pub fn trade_tolerance() -> Decimal {
        dec!(0.99)
    }

    pub fn liquidity_tolerance() -> Decimal {
        dec!(0.95)
    }
}

/// Market contract defaults (testnet deployment)
pub mod chain {
    pub const API_ENDPOINT: &str = "https://stacks-node-api.testnet.stacks.co";
    pub const CONTRACT_ADDRESS: &str = "ST1EJ799Q4EJ511FP9C7J71ESA4920QJV7D8YKK2C";
    pub const CONTRACT_NAME: &str = "market8";
}

pub mod logging {
    pub const LEVEL: &str = "info";
}
