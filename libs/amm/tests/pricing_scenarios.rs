//! End-to-end pricing scenarios with literal pool values (fee = 1%)

use market_amm::{
    dec, ConstantProductEngine, FeeSchedule, LiquidityMath, Outcome, PoolSnapshot, PricingEngine,
    PricingError, SlippageTolerance, SwapMath, TradeIntent, TradeKind,
};

const NO_FEE: FeeSchedule = FeeSchedule::ZERO;

fn one_percent() -> FeeSchedule {
    FeeSchedule::new(100, 10_000).unwrap()
}

#[test]
fn test_buy_yes_on_balanced_pool() {
    let out = SwapMath::quote_buy(Outcome::Yes, 100_000, 1_000_000, 1_000_000, one_percent()).unwrap();
    assert_eq!(out, 99_000_000_000 / 1_099_000);
    assert_eq!(out, 90_081);
}

#[test]
fn test_empty_yes_reserve_never_prices() {
    let fee = one_percent();
    let cases = [
        SwapMath::quote_buy(Outcome::Yes, 100_000, 0, 1_000_000, fee),
        SwapMath::quote_buy(Outcome::No, 100_000, 0, 1_000_000, fee),
        SwapMath::quote_sell(Outcome::Yes, 100_000, 0, 1_000_000, fee),
        SwapMath::quote_sell(Outcome::No, 100_000, 0, 1_000_000, fee),
    ];
    for case in cases {
        assert!(matches!(case, Err(PricingError::DegenerateState { .. })));
    }
}

#[test]
fn test_remove_half_of_lp_balance() {
    assert_eq!(
        LiquidityMath::remove_liquidity(dec!(50), dec!(10.5)).unwrap(),
        5_250_000
    );
}

#[test]
fn test_zero_amount_slippage_is_degenerate() {
    assert!(matches!(
        SwapMath::estimate_slippage(0, 1_000_000, 1_000_000),
        Err(PricingError::DegenerateState { .. })
    ));
}

#[test]
fn test_round_trip_leaks_fee() {
    let (yes, no) = (1_000_000u128, 1_000_000u128);
    let fee = one_percent();
    let stake = 100_000;

    let bought = SwapMath::quote_buy(Outcome::Yes, stake, yes, no, fee).unwrap();
    let net = fee.apply(stake).unwrap();
    let returned =
        SwapMath::quote_sell(Outcome::Yes, bought, yes - bought, no + net, fee).unwrap();

    assert!(returned <= stake);
    assert!(returned < net);
}

#[test]
fn test_zero_fee_round_trip_is_near_exact() {
    let (yes, no) = (5_000_000u128, 3_000_000u128);
    let bought = SwapMath::quote_buy(Outcome::No, 250_000, yes, no, NO_FEE).unwrap();
    let returned =
        SwapMath::quote_sell(Outcome::No, bought, yes + 250_000, no - bought, NO_FEE).unwrap();
    assert!(returned <= 250_000);
    assert!(250_000 - returned <= 2);
}

#[test]
fn test_engine_sell_quote_uses_tolerance() {
    let engine = ConstantProductEngine::new(one_percent());
    let pool = PoolSnapshot::new(1_000_000, 1_000_000, 2_000_000);
    let intent = TradeIntent::new(
        TradeKind::SellYes,
        100_000,
        SlippageTolerance::new(dec!(0.95)).unwrap(),
    );

    let quote = engine.quote_trade(&pool, &intent).unwrap();
    assert_eq!(quote.output_amount, 90_000);
    assert_eq!(quote.min_amount_out, 85_500);
    assert_eq!(quote.slippage_percent, dec!(9.09));
}

#[test]
fn test_oversized_sell_is_rejected_before_submission() {
    let engine = ConstantProductEngine::default();
    let pool = PoolSnapshot::new(1, 1, 1);
    let intent = TradeIntent::new(TradeKind::SellNo, 1_000, SlippageTolerance::default());
    assert!(matches!(
        engine.quote_trade(&pool, &intent),
        Err(PricingError::PoolExhausted { .. })
    ));
}
