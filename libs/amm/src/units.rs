//! Conversions between display amounts and contract micro-units

use crate::error::{PricingError, PricingResult};
use crate::pool::MICRO_UNITS_PER_TOKEN;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a user-typed token amount into micro-units, flooring sub-micro
/// digits
pub fn to_micro_units(amount: &str) -> PricingResult<u128> {
    let trimmed = amount.trim();
    let value = Decimal::from_str(trimmed)
        .map_err(|_| PricingError::invalid_input(format!("'{trimmed}' is not a number")))?;
    decimal_to_micro_units(value)
}

/// `floor(amount * 1_000_000)`
pub fn decimal_to_micro_units(amount: Decimal) -> PricingResult<u128> {
    if amount < Decimal::ZERO {
        return Err(PricingError::invalid_input("amount cannot be negative"));
    }
    amount
        .checked_mul(Decimal::from(MICRO_UNITS_PER_TOKEN as u64))
        .map(|v| v.floor())
        .and_then(|v| v.to_u128())
        .ok_or_else(|| PricingError::overflow("micro-unit amount"))
}

/// Whole-token display value of a micro-unit amount
pub fn from_micro_units(micro: u128) -> PricingResult<Decimal> {
    Decimal::from_u128(micro)
        .map(|v| v / Decimal::from(MICRO_UNITS_PER_TOKEN as u64))
        .ok_or_else(|| PricingError::overflow("micro-unit amount"))
}

/// Convert a float from a UI field, refusing NaN and infinities
pub fn decimal_from_f64(value: f64) -> PricingResult<Decimal> {
    if !value.is_finite() {
        return Err(PricingError::invalid_input(format!("{value} is not finite")));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| PricingError::invalid_input(format!("{value} is out of range")))
}
