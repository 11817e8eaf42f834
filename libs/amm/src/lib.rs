//! # Market AMM - Prediction Market Pricing Engine
//!
//! ## Purpose
//!
//! Pure pricing functions for a two-outcome (YES/NO) constant-product market.
//! Computes swap outputs, protocol fees, minimum-received guards and slippage
//! for trades, and issuance/redemption amounts for liquidity changes. Every
//! amount is an integer in micro-units and every division floors, mirroring
//! the market contract's on-chain arithmetic.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool snapshots decoded by `market-codec` from contract
//!   read-only calls, trade input from front-end event handlers
//! - **Output Destinations**: Transaction submitter (`SwapOrder`), display layer
//!   (`Quote::slippage_percent`, implied odds)
//! - **Configuration**: Fee schedule and tolerances from `market-config`
//!
//! ## Architecture Role
//!
//! The engine holds no state. Each call depends only on its arguments, so
//! independent callers may quote concurrently without locking. A quote is
//! only valid against the snapshot it was computed from; callers re-read
//! reserves before recomputing.
//!
//! See [`architecture_diagram()`] for the data flow.

pub mod engine;
pub mod error;
pub mod liquidity_math;
pub mod odds;
pub mod pool;
pub mod swap_math;
pub mod units;

pub use engine::{
    ConstantProductEngine, LiquidityQuote, PricingEngine, Quote, SwapOrder, PRICING_MODEL_VERSION,
};
pub use error::{PricingError, PricingResult};
pub use liquidity_math::LiquidityMath;
pub use pool::{
    FeeSchedule, LiquidityIntent, Outcome, PoolSnapshot, SlippageTolerance, TradeIntent, TradeKind,
    DEFAULT_FEE_BPS, FEE_DENOMINATOR, MICRO_UNITS_PER_TOKEN,
};
pub use swap_math::SwapMath;

/// Common types for pricing calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

/// Architecture diagram showing the pricing data flow
#[cfg_attr(doc, aquamarine::aquamarine)]
/// ```mermaid
/// graph LR
///     subgraph Chain["⛓ Chain State"]
///         RO[Read-only call]
///         CV[Clarity tuple]
///     end
///
///     subgraph Engine["🧮 Pricing Engine"]
///         PS[PoolSnapshot]
///         SW[Swap math]
///         LQ[Liquidity math]
///         QT[Quote]
///     end
///
///     subgraph Caller["🎯 Front-end"]
///         TX[SwapOrder / min-amount-out]
///         UI[Slippage and odds display]
///     end
///
///     RO --> CV
///     CV --> PS
///     PS --> SW
///     PS --> LQ
///     SW --> QT
///     LQ --> QT
///     QT --> TX
///     QT --> UI
///
///     style Chain fill:#e1f5fe
///     style Engine fill:#fff3e0
///     style Caller fill:#e8f5e9
/// ```
pub fn architecture_diagram() {
    // This function exists solely for documentation purposes
    // The diagram is rendered by aquamarine in rustdoc
}
