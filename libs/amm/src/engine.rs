//! Pricing engine interface and the canonical constant-product engine
//!
//! The engine holds no market state. Callers pass a fresh [`PoolSnapshot`]
//! on every call, and a [`Quote`] is only valid against the snapshot it was
//! computed from.

use crate::error::{PricingError, PricingResult};
use crate::liquidity_math::LiquidityMath;
use crate::pool::{FeeSchedule, LiquidityIntent, PoolSnapshot, SlippageTolerance, TradeIntent};
use crate::swap_math::SwapMath;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Version of the pool model priced by [`ConstantProductEngine`]: split
/// `lp-yes-pool` / `lp-no-pool` reserves plus an LP-token supply
pub const PRICING_MODEL_VERSION: u32 = 2;

/// Priced trade, ready to become a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub amount_in: u128,
    pub output_amount: u128,
    /// Guard passed on-chain; execution below this aborts
    pub min_amount_out: u128,
    /// Two decimal places
    pub slippage_percent: Decimal,
}

impl Quote {
    /// Parameters for the transaction submitter
    pub fn order(&self, market_id: u64) -> SwapOrder {
        SwapOrder {
            market_id,
            amount_in: self.amount_in,
            min_amount_out: self.min_amount_out,
        }
    }
}

/// `{marketId, amountIn, minAmountOut}` as consumed by the submitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOrder {
    pub market_id: u64,
    pub amount_in: u128,
    pub min_amount_out: u128,
}

/// Priced liquidity change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityQuote {
    Added {
        lp_tokens: u128,
        min_lp_tokens: u128,
        yes_added: u128,
        no_added: u128,
        pool_after: PoolSnapshot,
    },
    Removed {
        lp_tokens: u128,
        yes_out: u128,
        no_out: u128,
        min_yes_out: u128,
        min_no_out: u128,
        pool_after: PoolSnapshot,
    },
}

impl LiquidityQuote {
    pub fn lp_tokens(&self) -> u128 {
        match self {
            LiquidityQuote::Added { lp_tokens, .. } | LiquidityQuote::Removed { lp_tokens, .. } => {
                *lp_tokens
            }
        }
    }

    pub fn pool_after(&self) -> &PoolSnapshot {
        match self {
            LiquidityQuote::Added { pool_after, .. }
            | LiquidityQuote::Removed { pool_after, .. } => pool_after,
        }
    }
}

/// Unified pricing interface for market front-ends
pub trait PricingEngine: Send + Sync {
    /// Price a buy or sell against `pool`
    fn quote_trade(&self, pool: &PoolSnapshot, intent: &TradeIntent) -> PricingResult<Quote>;

    /// Price a liquidity deposit or withdrawal against `pool`
    fn quote_liquidity(
        &self,
        pool: &PoolSnapshot,
        intent: &LiquidityIntent,
        tolerance: SlippageTolerance,
    ) -> PricingResult<LiquidityQuote>;

    /// Pool model version this engine prices
    fn version(&self) -> u32;
}

/// Constant-product engine matching the market contract's arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstantProductEngine {
    fee: FeeSchedule,
}

impl ConstantProductEngine {
    pub fn new(fee: FeeSchedule) -> Self {
        Self { fee }
    }

    pub fn fee(&self) -> FeeSchedule {
        self.fee
    }
}

impl PricingEngine for ConstantProductEngine {
    fn quote_trade(&self, pool: &PoolSnapshot, intent: &TradeIntent) -> PricingResult<Quote> {
        pool.ensure_priceable()?;
        let outcome = intent.kind.outcome();
        let bought_side = pool.reserve(outcome);
        let opposite_side = pool.reserve(outcome.opposite());

        let priced = if intent.kind.is_buy() {
            SwapMath::quote_buy(outcome, intent.amount, pool.yes_reserve, pool.no_reserve, self.fee)
                .and_then(|out| {
                    let slippage =
                        SwapMath::estimate_slippage(intent.amount, opposite_side, bought_side)?;
                    Ok((out, slippage))
                })
        } else {
            SwapMath::quote_sell(outcome, intent.amount, pool.yes_reserve, pool.no_reserve, self.fee)
                .and_then(|out| {
                    let slippage =
                        SwapMath::estimate_slippage(intent.amount, bought_side, opposite_side)?;
                    Ok((out, slippage))
                })
        };

        let (output_amount, slippage_percent) = priced.map_err(|e| {
            debug!(kind = ?intent.kind, amount = %intent.amount, error = %e, "Trade rejected");
            e
        })?;
        let min_amount_out = SwapMath::min_acceptable(output_amount, intent.tolerance)?;

        debug!(
            kind = ?intent.kind,
            amount_in = %intent.amount,
            output = %output_amount,
            min_out = %min_amount_out,
            slippage = %slippage_percent,
            "Quoted trade"
        );

        Ok(Quote {
            amount_in: intent.amount,
            output_amount,
            min_amount_out,
            slippage_percent,
        })
    }

    fn quote_liquidity(
        &self,
        pool: &PoolSnapshot,
        intent: &LiquidityIntent,
        tolerance: SlippageTolerance,
    ) -> PricingResult<LiquidityQuote> {
        let quote = match *intent {
            LiquidityIntent::Add { amount } => {
                let lp_tokens =
                    LiquidityMath::add_liquidity(amount, pool.pooled_value()?, pool.total_liquidity)?;
                let (yes_added, no_added) =
                    LiquidityMath::split_deposit(amount, pool.yes_reserve, pool.no_reserve)?;

                let pool_after = PoolSnapshot {
                    yes_reserve: checked_add(pool.yes_reserve, yes_added, "yes reserve")?,
                    no_reserve: checked_add(pool.no_reserve, no_added, "no reserve")?,
                    total_liquidity: checked_add(pool.total_liquidity, lp_tokens, "LP supply")?,
                };

                LiquidityQuote::Added {
                    lp_tokens,
                    min_lp_tokens: tolerance.apply(lp_tokens)?,
                    yes_added,
                    no_added,
                    pool_after,
                }
            }
            LiquidityIntent::Remove {
                percentage,
                user_total_liquidity,
            } => {
                let lp_tokens = LiquidityMath::remove_liquidity(percentage, user_total_liquidity)?;
                if lp_tokens == 0 {
                    return Err(PricingError::invalid_input("nothing to withdraw"));
                }
                let (yes_out, no_out) = LiquidityMath::withdrawal_amounts(lp_tokens, pool)?;

                // withdrawal_amounts bounds every share by its reserve
                let pool_after = PoolSnapshot {
                    yes_reserve: pool.yes_reserve - yes_out,
                    no_reserve: pool.no_reserve - no_out,
                    total_liquidity: pool.total_liquidity - lp_tokens,
                };

                LiquidityQuote::Removed {
                    lp_tokens,
                    yes_out,
                    no_out,
                    min_yes_out: tolerance.apply(yes_out)?,
                    min_no_out: tolerance.apply(no_out)?,
                    pool_after,
                }
            }
        };

        debug!(?intent, lp_tokens = %quote.lp_tokens(), "Quoted liquidity change");
        Ok(quote)
    }

    fn version(&self) -> u32 {
        PRICING_MODEL_VERSION
    }
}

fn checked_add(a: u128, b: u128, what: &str) -> PricingResult<u128> {
    a.checked_add(b).ok_or_else(|| PricingError::overflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::TradeKind;
    use rust_decimal_macros::dec;

    fn pool() -> PoolSnapshot {
        PoolSnapshot::new(1_000_000, 1_000_000, 2_000_000)
    }

    #[test]
    fn test_buy_quote_and_order() {
        let engine = ConstantProductEngine::default();
        let intent = TradeIntent::new(
            TradeKind::BuyYes,
            100_000,
            SlippageTolerance::new(dec!(0.99)).unwrap(),
        );
        let quote = engine.quote_trade(&pool(), &intent).unwrap();

        assert_eq!(quote.output_amount, 90_081);
        // floor(90081 * 0.99) = 89180
        assert_eq!(quote.min_amount_out, 89_180);
        assert_eq!(quote.slippage_percent, dec!(9.09));

        let order = quote.order(7);
        assert_eq!(
            order,
            SwapOrder {
                market_id: 7,
                amount_in: 100_000,
                min_amount_out: 89_180
            }
        );
        let json = serde_json::to_value(order).unwrap();
        assert!(json.get("minAmountOut").is_some());
    }

    #[test]
    fn test_trade_on_empty_side_is_degenerate() {
        let engine = ConstantProductEngine::default();
        let pool = PoolSnapshot::new(0, 1_000_000, 0);
        let intent = TradeIntent::new(TradeKind::SellNo, 10, SlippageTolerance::default());
        assert!(matches!(
            engine.quote_trade(&pool, &intent),
            Err(PricingError::DegenerateState { .. })
        ));
    }

    #[test]
    fn test_add_liquidity_quote() {
        let engine = ConstantProductEngine::default();
        let quote = engine
            .quote_liquidity(
                &PoolSnapshot::new(600_000, 400_000, 1_000_000),
                &LiquidityIntent::Add { amount: 500_000 },
                SlippageTolerance::new(dec!(0.95)).unwrap(),
            )
            .unwrap();

        match quote {
            LiquidityQuote::Added {
                lp_tokens,
                min_lp_tokens,
                yes_added,
                no_added,
                pool_after,
            } => {
                assert_eq!(lp_tokens, 500_000);
                assert_eq!(min_lp_tokens, 475_000);
                assert_eq!((yes_added, no_added), (300_000, 200_000));
                assert_eq!(pool_after, PoolSnapshot::new(900_000, 600_000, 1_500_000));
            }
            other => panic!("expected add quote, got {other:?}"),
        }
    }

    #[test]
    fn test_remove_liquidity_quote() {
        let engine = ConstantProductEngine::default();
        let quote = engine
            .quote_liquidity(
                &PoolSnapshot::new(6_000_000, 4_000_000, 10_000_000),
                &LiquidityIntent::Remove {
                    percentage: dec!(50),
                    user_total_liquidity: dec!(2),
                },
                SlippageTolerance::EXACT,
            )
            .unwrap();

        assert_eq!(quote.lp_tokens(), 1_000_000);
        assert_eq!(
            *quote.pool_after(),
            PoolSnapshot::new(5_400_000, 3_600_000, 9_000_000)
        );
    }

    #[test]
    fn test_add_to_pool_without_lp_supply_rejected() {
        let engine = ConstantProductEngine::default();
        let result = engine.quote_liquidity(
            &PoolSnapshot::new(1_000_000, 1_000_000, 0),
            &LiquidityIntent::Add { amount: 1_000 },
            SlippageTolerance::EXACT,
        );
        assert!(matches!(result, Err(PricingError::DegenerateState { .. })));
    }

    #[test]
    fn test_add_to_empty_pool_bootstraps() {
        let engine = ConstantProductEngine::default();
        let quote = engine
            .quote_liquidity(
                &PoolSnapshot::default(),
                &LiquidityIntent::Add { amount: 1_000 },
                SlippageTolerance::EXACT,
            )
            .unwrap();
        assert_eq!(quote.lp_tokens(), 1_000);
        assert_eq!(*quote.pool_after(), PoolSnapshot::new(500, 500, 1_000));
    }

    #[test]
    fn test_remove_zero_percent_rejected() {
        let engine = ConstantProductEngine::default();
        let result = engine.quote_liquidity(
            &pool(),
            &LiquidityIntent::Remove {
                percentage: dec!(0),
                user_total_liquidity: dec!(2),
            },
            SlippageTolerance::EXACT,
        );
        assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConstantProductEngine>();
        assert_eq!(ConstantProductEngine::default().version(), PRICING_MODEL_VERSION);
    }
}
