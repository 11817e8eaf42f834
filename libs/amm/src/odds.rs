//! Market display math: implied odds and parimutuel payouts

use crate::error::{PricingError, PricingResult};
use crate::pool::Outcome;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// `(yes %, no %)` share of the pooled value, two decimals, summing to 100
///
/// An empty pool shows an even market.
pub fn implied_odds(yes_pool: u128, no_pool: u128) -> PricingResult<(Decimal, Decimal)> {
    let total = yes_pool
        .checked_add(no_pool)
        .ok_or_else(|| PricingError::overflow("yes pool + no pool"))?;
    if total == 0 {
        return Ok((dec!(50), dec!(50)));
    }

    let yes = to_decimal(yes_pool)?;
    let total = to_decimal(total)?;
    let yes_pct = (yes / total * dec!(100))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok((yes_pct, dec!(100) - yes_pct))
}

/// Winnings for a parimutuel stake of `bet` on `outcome`:
/// `bet / (yes + no) * opposite_pool`
pub fn parimutuel_payout(
    bet: Decimal,
    outcome: Outcome,
    yes_pool: u128,
    no_pool: u128,
) -> PricingResult<Decimal> {
    if bet <= Decimal::ZERO {
        return Err(PricingError::invalid_input("bet must be positive"));
    }
    let total = yes_pool
        .checked_add(no_pool)
        .ok_or_else(|| PricingError::overflow("yes pool + no pool"))?;
    if total == 0 {
        return Err(PricingError::degenerate("no bets placed yet"));
    }
    let opposite = match outcome {
        Outcome::Yes => no_pool,
        Outcome::No => yes_pool,
    };

    bet.checked_div(to_decimal(total)?)
        .and_then(|share| share.checked_mul(Decimal::from_u128(opposite)?))
        .ok_or_else(|| PricingError::overflow("parimutuel payout"))
}

fn to_decimal(value: u128) -> PricingResult<Decimal> {
    Decimal::from_u128(value).ok_or_else(|| PricingError::overflow("decimal conversion"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odds_sum_to_hundred() {
        let (yes, no) = implied_odds(1, 2).unwrap();
        assert_eq!(yes, dec!(33.33));
        assert_eq!(no, dec!(66.67));
        assert_eq!(yes + no, dec!(100));
    }

    #[test]
    fn test_empty_market_is_even() {
        assert_eq!(implied_odds(0, 0).unwrap(), (dec!(50), dec!(50)));
    }

    #[test]
    fn test_parimutuel_payout() {
        let payout = parimutuel_payout(dec!(10), Outcome::Yes, 60, 40).unwrap();
        assert_eq!(payout, dec!(4));
        assert!(matches!(
            parimutuel_payout(dec!(10), Outcome::No, 0, 0),
            Err(PricingError::DegenerateState { .. })
        ));
    }
}
