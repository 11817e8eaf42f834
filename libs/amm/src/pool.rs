//! Pool snapshot, fee schedule and trade/liquidity intents
//!
//! A snapshot is read fresh from chain state before every quote. Nothing here
//! is cached between calls.

use crate::error::{PricingError, PricingResult};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Smallest-unit scale of the stake token (1 STX = 1_000_000 micro-STX)
pub const MICRO_UNITS_PER_TOKEN: u128 = 1_000_000;

/// Denominator used for basis-point fees
pub const FEE_DENOMINATOR: u32 = 10_000;

/// Protocol fee observed on the market contract (100 bps = 1%)
pub const DEFAULT_FEE_BPS: u32 = 100;

/// Market outcome side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    pub fn opposite(self) -> Self {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }
}

/// Reserves of a two-outcome market at one point in time
///
/// `yes_reserve` / `no_reserve` mirror the contract's `lp-yes-pool` and
/// `lp-no-pool`; `total_liquidity` is the outstanding LP-token supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub yes_reserve: u128,
    pub no_reserve: u128,
    pub total_liquidity: u128,
}

impl PoolSnapshot {
    pub fn new(yes_reserve: u128, no_reserve: u128, total_liquidity: u128) -> Self {
        Self {
            yes_reserve,
            no_reserve,
            total_liquidity,
        }
    }

    /// Reserve holding tokens of `outcome`
    pub fn reserve(&self, outcome: Outcome) -> u128 {
        match outcome {
            Outcome::Yes => self.yes_reserve,
            Outcome::No => self.no_reserve,
        }
    }

    /// Value held by both sub-pools
    pub fn pooled_value(&self) -> PricingResult<u128> {
        self.yes_reserve
            .checked_add(self.no_reserve)
            .ok_or_else(|| PricingError::overflow("yes reserve + no reserve"))
    }

    /// Constant product `k = yes * no`
    pub fn product(&self) -> PricingResult<u128> {
        self.yes_reserve
            .checked_mul(self.no_reserve)
            .ok_or_else(|| PricingError::overflow("yes reserve * no reserve"))
    }

    /// Both reserves must be non-zero before any price is defined
    pub fn ensure_priceable(&self) -> PricingResult<()> {
        if self.yes_reserve == 0 {
            return Err(PricingError::degenerate("yes reserve is zero"));
        }
        if self.no_reserve == 0 {
            return Err(PricingError::degenerate("no reserve is zero"));
        }
        Ok(())
    }
}

/// Fee as `numerator / denominator` of the traded amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    numerator: u32,
    denominator: u32,
}

impl FeeSchedule {
    pub const ZERO: FeeSchedule = FeeSchedule {
        numerator: 0,
        denominator: FEE_DENOMINATOR,
    };

    /// Create a schedule; requires `0 <= numerator < denominator`
    pub fn new(numerator: u32, denominator: u32) -> PricingResult<Self> {
        if denominator == 0 {
            return Err(PricingError::invalid_input("fee denominator must be positive"));
        }
        if numerator >= denominator {
            return Err(PricingError::invalid_input(format!(
                "fee {numerator}/{denominator} must be below 100%"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Fee in basis points out of 10,000
    pub fn from_bps(fee_bps: u32) -> PricingResult<Self> {
        Self::new(fee_bps, FEE_DENOMINATOR)
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// `floor(amount * (den - num) / den)`
    pub fn apply(&self, amount: u128) -> PricingResult<u128> {
        let keep = u128::from(self.denominator - self.numerator);
        amount
            .checked_mul(keep)
            .map(|scaled| scaled / u128::from(self.denominator))
            .ok_or_else(|| PricingError::overflow("amount * fee multiplier"))
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            numerator: DEFAULT_FEE_BPS,
            denominator: FEE_DENOMINATOR,
        }
    }
}

/// Fraction of a quoted output the caller still accepts, in `(0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct SlippageTolerance(Decimal);

impl SlippageTolerance {
    /// Accept the full quote only
    pub const EXACT: SlippageTolerance = SlippageTolerance(Decimal::ONE);

    pub fn new(fraction: Decimal) -> PricingResult<Self> {
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(PricingError::invalid_input(format!(
                "slippage tolerance {fraction} must be in (0, 1]"
            )));
        }
        Ok(Self(fraction))
    }

    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// `floor(output * fraction)`
    pub fn apply(&self, output: u128) -> PricingResult<u128> {
        let scaled = Decimal::from_u128(output)
            .and_then(|out| out.checked_mul(self.0))
            .ok_or_else(|| PricingError::overflow("output * tolerance"))?;
        scaled
            .floor()
            .to_u128()
            .ok_or_else(|| PricingError::overflow("minimum acceptable output"))
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self(dec!(0.99))
    }
}

impl TryFrom<Decimal> for SlippageTolerance {
    type Error = PricingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SlippageTolerance> for Decimal {
    fn from(value: SlippageTolerance) -> Self {
        value.0
    }
}

/// Kind of trade against the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    BuyYes,
    BuyNo,
    SellYes,
    SellNo,
}

impl TradeKind {
    pub fn outcome(self) -> Outcome {
        match self {
            TradeKind::BuyYes | TradeKind::SellYes => Outcome::Yes,
            TradeKind::BuyNo | TradeKind::SellNo => Outcome::No,
        }
    }

    pub fn is_buy(self) -> bool {
        matches!(self, TradeKind::BuyYes | TradeKind::BuyNo)
    }
}

/// A trade the user is about to submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub kind: TradeKind,
    /// Stake for buys, outcome tokens for sells (micro-units)
    pub amount: u128,
    pub tolerance: SlippageTolerance,
}

impl TradeIntent {
    pub fn new(kind: TradeKind, amount: u128, tolerance: SlippageTolerance) -> Self {
        Self {
            kind,
            amount,
            tolerance,
        }
    }
}

/// A liquidity change the user is about to submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityIntent {
    /// Deposit `amount` micro-units of stake
    Add { amount: u128 },
    /// Withdraw `percentage` (0-100) of the caller's LP balance, given in
    /// whole LP tokens
    Remove {
        percentage: Decimal,
        user_total_liquidity: Decimal,
    },
}
