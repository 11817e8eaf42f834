//! Constant-product swap math for YES/NO outcome pools
//!
//! Integer-only with floor division throughout, matching the market
//! contract's on-chain arithmetic so a quote never promises more than the
//! reserves can pay.
//!
//! Buying outcome `X` puts the net stake into the opposite pool and draws `X`
//! tokens from the `X` pool. Selling `X` returns tokens to the `X` pool and
//! draws stake from the opposite pool.

use crate::error::{PricingError, PricingResult};
use crate::pool::{FeeSchedule, Outcome, SlippageTolerance};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Swap pricing functions for two-outcome pools
pub struct SwapMath;

impl SwapMath {
    /// Outcome tokens received for `stx_input` micro-units of stake
    ///
    /// # Arguments
    /// * `outcome` - Side being bought
    /// * `stx_input` - Stake in micro-units, before fee
    /// * `yes_reserve` / `no_reserve` - Current sub-pool reserves
    /// * `fee` - Protocol fee taken from the stake
    pub fn quote_buy(
        outcome: Outcome,
        stx_input: u128,
        yes_reserve: u128,
        no_reserve: u128,
        fee: FeeSchedule,
    ) -> PricingResult<u128> {
        if stx_input == 0 {
            return Err(PricingError::invalid_input("stake must be positive"));
        }
        let (input_side, other_side) = Self::sides(outcome.opposite(), yes_reserve, no_reserve)?;

        let net_input = fee.apply(stx_input)?;

        // out = floor(net * other / (input + net))
        let numerator = net_input
            .checked_mul(other_side)
            .ok_or_else(|| PricingError::overflow("net input * output reserve"))?;
        let denominator = input_side
            .checked_add(net_input)
            .ok_or_else(|| PricingError::overflow("input reserve + net input"))?;
        let output = numerator / denominator;

        if output >= other_side {
            return Err(PricingError::pool_exhausted(output, other_side));
        }
        Ok(output)
    }

    /// Stake received for returning `token_input` outcome tokens
    pub fn quote_sell(
        outcome: Outcome,
        token_input: u128,
        yes_reserve: u128,
        no_reserve: u128,
        fee: FeeSchedule,
    ) -> PricingResult<u128> {
        if token_input == 0 {
            return Err(PricingError::invalid_input("token amount must be positive"));
        }
        let (side_pool, other_pool) = Self::sides(outcome, yes_reserve, no_reserve)?;

        let new_side_pool = side_pool
            .checked_add(token_input)
            .ok_or_else(|| PricingError::overflow("side reserve + token input"))?;
        let k = side_pool
            .checked_mul(other_pool)
            .ok_or_else(|| PricingError::overflow("constant product"))?;
        let required_other_pool = k / new_side_pool;

        let gross_output = other_pool
            .checked_sub(required_other_pool)
            .ok_or_else(|| PricingError::invalid_input("sell would produce a negative output"))?;
        if gross_output >= other_pool {
            return Err(PricingError::pool_exhausted(gross_output, other_pool));
        }

        fee.apply(gross_output)
    }

    /// Slippage guard passed on-chain as `min-amount-out`
    pub fn min_acceptable(output: u128, tolerance: SlippageTolerance) -> PricingResult<u128> {
        tolerance.apply(output)
    }

    /// Price movement caused by the trade, in percent with two decimals
    ///
    /// With `k = r_in * r_out`, the spot price `r_out / r_in` and the average
    /// execution price `(r_out - k / (r_in + a)) / a = r_out / (r_in + a)`,
    /// the relative change reduces to `a / (r_in + a)`.
    pub fn estimate_slippage(
        input_amount: u128,
        input_reserve: u128,
        output_reserve: u128,
    ) -> PricingResult<Decimal> {
        if input_amount == 0 {
            return Err(PricingError::degenerate("slippage is undefined for a zero amount"));
        }
        if input_reserve == 0 || output_reserve == 0 {
            return Err(PricingError::degenerate("slippage is undefined for an empty reserve"));
        }

        let amount = Self::to_decimal(input_amount)?;
        let new_input_reserve = Self::to_decimal(input_reserve)?
            .checked_add(amount)
            .ok_or_else(|| PricingError::overflow("input reserve + input amount"))?;

        let slippage = amount
            .checked_div(new_input_reserve)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or_else(|| PricingError::overflow("slippage ratio"))?;

        Ok(slippage.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// `(input side, output side)` reserves, both required to be non-zero
    fn sides(
        input: Outcome,
        yes_reserve: u128,
        no_reserve: u128,
    ) -> PricingResult<(u128, u128)> {
        if yes_reserve == 0 {
            return Err(PricingError::degenerate("yes reserve is zero"));
        }
        if no_reserve == 0 {
            return Err(PricingError::degenerate("no reserve is zero"));
        }
        Ok(match input {
            Outcome::Yes => (yes_reserve, no_reserve),
            Outcome::No => (no_reserve, yes_reserve),
        })
    }

    fn to_decimal(value: u128) -> PricingResult<Decimal> {
        Decimal::from_u128(value).ok_or_else(|| PricingError::overflow("decimal conversion"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MILLION: u128 = 1_000_000;

    #[test]
    fn test_buy_matches_contract_floor() {
        // net = floor(100000 * 9900 / 10000) = 99000
        // out = floor(99000 * 1e6 / 1099000) = 90081
        let out = SwapMath::quote_buy(
            Outcome::Yes,
            100_000,
            MILLION,
            MILLION,
            FeeSchedule::default(),
        )
        .unwrap();
        assert_eq!(out, 90_081);
    }

    #[test]
    fn test_buy_draws_from_bought_side() {
        // Buying YES from a pool rich in YES yields more tokens than from a poor one
        let rich = SwapMath::quote_buy(Outcome::Yes, 10_000, 2 * MILLION, MILLION, FeeSchedule::ZERO)
            .unwrap();
        let poor = SwapMath::quote_buy(Outcome::Yes, 10_000, MILLION, 2 * MILLION, FeeSchedule::ZERO)
            .unwrap();
        assert!(rich > poor);
    }

    #[test]
    fn test_zero_reserve_is_degenerate() {
        let fee = FeeSchedule::default();
        for outcome in [Outcome::Yes, Outcome::No] {
            assert!(matches!(
                SwapMath::quote_buy(outcome, 1_000, 0, MILLION, fee),
                Err(PricingError::DegenerateState { .. })
            ));
            assert!(matches!(
                SwapMath::quote_sell(outcome, 1_000, 0, MILLION, fee),
                Err(PricingError::DegenerateState { .. })
            ));
        }
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let fee = FeeSchedule::default();
        assert!(matches!(
            SwapMath::quote_buy(Outcome::No, 0, MILLION, MILLION, fee),
            Err(PricingError::InvalidInput { .. })
        ));
        assert!(matches!(
            SwapMath::quote_sell(Outcome::No, 0, MILLION, MILLION, fee),
            Err(PricingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_sell_on_tiny_pool_exhausts() {
        // k = 1, new side = 1 + 10 => required other = 0, gross = whole reserve
        let result = SwapMath::quote_sell(Outcome::Yes, 10, 1, 1, FeeSchedule::ZERO);
        assert_eq!(result, Err(PricingError::pool_exhausted(1, 1)));
    }

    #[test]
    fn test_sell_preserves_product() {
        let out = SwapMath::quote_sell(Outcome::Yes, 100_000, MILLION, MILLION, FeeSchedule::ZERO)
            .unwrap();
        // required other = floor(1e12 / 1.1e6) = 909090, gross = 90910
        assert_eq!(out, 90_910);
        let with_fee = SwapMath::quote_sell(
            Outcome::Yes,
            100_000,
            MILLION,
            MILLION,
            FeeSchedule::default(),
        )
        .unwrap();
        // floor(90910 * 0.99) = 90000
        assert_eq!(with_fee, 90_000);
    }

    #[test]
    fn test_overflow_is_rejected_not_wrapped() {
        let result = SwapMath::quote_buy(
            Outcome::Yes,
            u128::MAX / 2,
            u128::MAX / 2,
            u128::MAX / 2,
            FeeSchedule::ZERO,
        );
        assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
    }

    #[test]
    fn test_slippage_values() {
        // 100000 / 1100000 = 9.0909..%
        let slippage = SwapMath::estimate_slippage(100_000, MILLION, MILLION).unwrap();
        assert_eq!(slippage, dec!(9.09));

        let small = SwapMath::estimate_slippage(1, MILLION, MILLION).unwrap();
        assert_eq!(small, dec!(0.00));
    }

    #[test]
    fn test_slippage_degenerate_inputs() {
        assert!(matches!(
            SwapMath::estimate_slippage(0, MILLION, MILLION),
            Err(PricingError::DegenerateState { .. })
        ));
        assert!(matches!(
            SwapMath::estimate_slippage(10, 0, MILLION),
            Err(PricingError::DegenerateState { .. })
        ));
        assert!(matches!(
            SwapMath::estimate_slippage(10, MILLION, 0),
            Err(PricingError::DegenerateState { .. })
        ));
    }

    #[test]
    fn test_min_acceptable() {
        let tolerance = SlippageTolerance::new(dec!(0.95)).unwrap();
        assert_eq!(SwapMath::min_acceptable(90_081, tolerance).unwrap(), 85_576);
        assert_eq!(
            SwapMath::min_acceptable(90_081, SlippageTolerance::EXACT).unwrap(),
            90_081
        );
    }
}
