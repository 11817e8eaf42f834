//! Liquidity provisioning and redemption estimates
//!
//! Deposits are split across the YES and NO sub-pools in proportion to the
//! current reserves so the implied price does not move. LP tokens track a
//! proportional claim on both sub-pools.

use crate::error::{PricingError, PricingResult};
use crate::pool::{PoolSnapshot, MICRO_UNITS_PER_TOKEN};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Liquidity accounting functions
pub struct LiquidityMath;

impl LiquidityMath {
    /// LP tokens issued for depositing `stx_amount` micro-units
    ///
    /// The first deposit into an empty pool is issued 1:1. Afterwards issuance
    /// is `floor(stx * total_liquidity / pooled_value)`. Reserves without any
    /// LP supply (the legacy layout) cannot be priced.
    pub fn add_liquidity(
        stx_amount: u128,
        pooled_value_before: u128,
        total_liquidity_before: u128,
    ) -> PricingResult<u128> {
        if stx_amount == 0 {
            return Err(PricingError::invalid_input("deposit must be positive"));
        }
        if total_liquidity_before == 0 {
            if pooled_value_before == 0 {
                return Ok(stx_amount);
            }
            return Err(PricingError::degenerate(
                "pool holds reserves but no LP supply",
            ));
        }
        if pooled_value_before == 0 {
            return Err(PricingError::degenerate(
                "pool has LP supply but no pooled value",
            ));
        }

        let issued = stx_amount
            .checked_mul(total_liquidity_before)
            .ok_or_else(|| PricingError::overflow("deposit * LP supply"))?
            / pooled_value_before;
        if issued == 0 {
            return Err(PricingError::invalid_input(
                "deposit too small to issue any LP tokens",
            ));
        }
        Ok(issued)
    }

    /// Split a deposit into `(yes_add, no_add)` without moving the price
    pub fn split_deposit(
        stx_amount: u128,
        yes_reserve: u128,
        no_reserve: u128,
    ) -> PricingResult<(u128, u128)> {
        if stx_amount == 0 {
            return Err(PricingError::invalid_input("deposit must be positive"));
        }

        let yes_add = if yes_reserve == 0 && no_reserve == 0 {
            stx_amount / 2
        } else {
            if yes_reserve == 0 || no_reserve == 0 {
                return Err(PricingError::degenerate(
                    "one-sided pool cannot accept a balanced deposit",
                ));
            }
            let pooled = yes_reserve
                .checked_add(no_reserve)
                .ok_or_else(|| PricingError::overflow("yes reserve + no reserve"))?;
            stx_amount
                .checked_mul(yes_reserve)
                .ok_or_else(|| PricingError::overflow("deposit * yes reserve"))?
                / pooled
        };
        let no_add = stx_amount - yes_add;

        if yes_add == 0 || no_add == 0 {
            return Err(PricingError::invalid_input(
                "deposit too small to fund both sub-pools",
            ));
        }
        Ok((yes_add, no_add))
    }

    /// Display estimate of what `lp_tokens` are worth in stake units
    pub fn estimated_value(
        lp_tokens: u128,
        lp_supply: u128,
        pooled_value: u128,
    ) -> PricingResult<Decimal> {
        if lp_supply == 0 {
            return Err(PricingError::degenerate("no LP tokens outstanding"));
        }
        let tokens = Self::to_decimal(lp_tokens)?;
        let supply = Self::to_decimal(lp_supply)?;
        let value = Self::to_decimal(pooled_value)?;

        tokens
            .checked_mul(value)
            .and_then(|scaled| scaled.checked_div(supply))
            .ok_or_else(|| PricingError::overflow("LP token value"))
    }

    /// LP tokens (micro-units) to burn for withdrawing `percentage` of a
    /// balance given in whole LP tokens
    ///
    /// `floor(user_total_liquidity * percentage / 100 * 1_000_000)`
    pub fn remove_liquidity(
        percentage: Decimal,
        user_total_liquidity: Decimal,
    ) -> PricingResult<u128> {
        if percentage < Decimal::ZERO || percentage > dec!(100) {
            return Err(PricingError::invalid_input(format!(
                "percentage {percentage} must be between 0 and 100"
            )));
        }
        if user_total_liquidity < Decimal::ZERO {
            return Err(PricingError::invalid_input("LP balance cannot be negative"));
        }

        let scaled = user_total_liquidity
            .checked_mul(percentage)
            .and_then(|v| v.checked_div(dec!(100)))
            .and_then(|v| v.checked_mul(Decimal::from(MICRO_UNITS_PER_TOKEN as u64)))
            .ok_or_else(|| PricingError::overflow("LP tokens to remove"))?;

        scaled
            .floor()
            .to_u128()
            .ok_or_else(|| PricingError::overflow("LP tokens to remove"))
    }

    /// `(yes_out, no_out)` released by burning `lp_tokens`
    pub fn withdrawal_amounts(lp_tokens: u128, pool: &PoolSnapshot) -> PricingResult<(u128, u128)> {
        if lp_tokens == 0 {
            return Err(PricingError::invalid_input("LP amount must be positive"));
        }
        if pool.total_liquidity == 0 {
            return Err(PricingError::degenerate("no LP tokens outstanding"));
        }
        if lp_tokens > pool.total_liquidity {
            return Err(PricingError::pool_exhausted(lp_tokens, pool.total_liquidity));
        }

        let share = |reserve: u128| -> PricingResult<u128> {
            lp_tokens
                .checked_mul(reserve)
                .map(|v| v / pool.total_liquidity)
                .ok_or_else(|| PricingError::overflow("LP tokens * reserve"))
        };
        Ok((share(pool.yes_reserve)?, share(pool.no_reserve)?))
    }

    fn to_decimal(value: u128) -> PricingResult<Decimal> {
        Decimal::from_u128(value).ok_or_else(|| PricingError::overflow("decimal conversion"))
    }
}
