//! # Market Codec - Typed Contract State Decoding
//!
//! ## Purpose
//!
//! Decodes the results of the market contract's read-only calls into typed
//! values. Replaces pattern-matching over `cvToString` output with a real
//! decoder of the Clarity consensus serialization, then maps the market
//! details tuple straight into a [`market_amm::PoolSnapshot`].
//!
//! ## Integration Points
//!
//! - **Input**: JSON body of `/v2/contracts/call-read/...` (hex `result`)
//! - **Output**: [`MarketDetails`] for the pricing engine
//! - **Requests**: [`ReadOnlyRequest::for_market`] builds the uint-keyed body
//!
//! ## Architecture Role
//!
//! ```text
//! chain reader → [codec] → market-amm
//!     ↑             ↓           ↓
//!  JSON/hex    ClarityValue   Quote
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - HTTP transport (belongs to the chain-state reader)
//! - Transaction construction or signing

pub mod clarity;
pub mod error;
pub mod market;
pub mod response;

pub use clarity::{encode_uint_arg, ClarityValue, MAX_NAME_LENGTH, MAX_NESTING_DEPTH};
pub use error::{CodecError, CodecResult};
pub use market::{MarketDetails, PoolLayout};
pub use response::{ReadOnlyRequest, ReadOnlyResponse};
