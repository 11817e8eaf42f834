//! Market details mapping: `get-market-details` result → [`PoolSnapshot`]
//!
//! The current contract exposes split sub-pools (`lp-yes-pool`, `lp-no-pool`)
//! and an LP-token supply (`total-liquidity`). Older deployments returned a
//! shared `yes-pool` / `no-pool` pair with no LP accounting; that layout is
//! still accepted but logged, since quotes against it do not reflect LP
//! shares.

use crate::clarity::ClarityValue;
use crate::error::{CodecError, CodecResult};
use crate::response::ReadOnlyResponse;
use market_amm::PoolSnapshot;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const FIELD_LP_YES_POOL: &str = "lp-yes-pool";
pub const FIELD_LP_NO_POOL: &str = "lp-no-pool";
pub const FIELD_TOTAL_LIQUIDITY: &str = "total-liquidity";
pub const FIELD_RESOLVED: &str = "resolved";
pub const LEGACY_FIELD_YES_POOL: &str = "yes-pool";
pub const LEGACY_FIELD_NO_POOL: &str = "no-pool";

/// Which reserve layout the contract returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolLayout {
    /// `lp-yes-pool` / `lp-no-pool` / `total-liquidity`
    SplitLiquidity,
    /// `yes-pool` / `no-pool` only
    LegacyShared,
}

/// Pricing-relevant part of a market's on-chain state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDetails {
    pub pool: PoolSnapshot,
    pub resolved: Option<bool>,
    pub layout: PoolLayout,
}

impl MarketDetails {
    /// Map a decoded `(ok (tuple ...))` (optionally wrapped in `some`)
    pub fn from_clarity(value: &ClarityValue) -> CodecResult<Self> {
        let fields = market_tuple(value)?;

        let layout = if fields.contains_key(FIELD_LP_YES_POOL) {
            PoolLayout::SplitLiquidity
        } else if fields.contains_key(LEGACY_FIELD_YES_POOL) {
            PoolLayout::LegacyShared
        } else {
            return Err(CodecError::missing_field(FIELD_LP_YES_POOL, "market details"));
        };

        let pool = match layout {
            PoolLayout::SplitLiquidity => PoolSnapshot::new(
                uint_field(fields, FIELD_LP_YES_POOL)?,
                uint_field(fields, FIELD_LP_NO_POOL)?,
                uint_field(fields, FIELD_TOTAL_LIQUIDITY)?,
            ),
            PoolLayout::LegacyShared => {
                warn!(
                    "Market details use legacy '{}'/'{}' layout; LP supply unavailable",
                    LEGACY_FIELD_YES_POOL, LEGACY_FIELD_NO_POOL
                );
                let total_liquidity = match fields.get(FIELD_TOTAL_LIQUIDITY) {
                    Some(_) => uint_field(fields, FIELD_TOTAL_LIQUIDITY)?,
                    None => 0,
                };
                PoolSnapshot::new(
                    uint_field(fields, LEGACY_FIELD_YES_POOL)?,
                    uint_field(fields, LEGACY_FIELD_NO_POOL)?,
                    total_liquidity,
                )
            }
        };

        let resolved = match fields.get(FIELD_RESOLVED) {
            Some(value) => Some(value.as_bool().ok_or_else(|| {
                CodecError::unexpected_type(FIELD_RESOLVED, "bool", value.type_name())
            })?),
            None => None,
        };

        debug!(?pool, ?layout, ?resolved, "Decoded market details");
        Ok(Self {
            pool,
            resolved,
            layout,
        })
    }

    /// Decode the JSON body returned by `get-market-details`
    pub fn from_response_json(body: &str) -> CodecResult<Self> {
        let value = ReadOnlyResponse::from_json(body)?.into_value()?;
        Self::from_clarity(&value)
    }

    /// Snapshot validated for pricing: both reserves must be non-zero
    pub fn priceable_pool(&self) -> CodecResult<PoolSnapshot> {
        self.pool.ensure_priceable()?;
        Ok(self.pool)
    }
}

fn market_tuple(value: &ClarityValue) -> CodecResult<&BTreeMap<String, ClarityValue>> {
    match value {
        ClarityValue::ResponseErr(inner) => Err(CodecError::ErrResponse {
            value: inner.to_string(),
        }),
        ClarityValue::ResponseOk(inner) | ClarityValue::OptionalSome(inner) => market_tuple(inner),
        ClarityValue::OptionalNone => Err(CodecError::missing_field("market", "market details")),
        other => other.as_tuple().ok_or_else(|| {
            CodecError::unexpected_type("market details", "tuple", other.type_name())
        }),
    }
}

fn uint_field(fields: &BTreeMap<String, ClarityValue>, name: &str) -> CodecResult<u128> {
    let value = fields
        .get(name)
        .ok_or_else(|| CodecError::missing_field(name, "market details"))?;
    value
        .as_uint()
        .ok_or_else(|| CodecError::unexpected_type(name, "uint", value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(fields: &[(&str, ClarityValue)]) -> ClarityValue {
        ClarityValue::Tuple(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_split_layout() {
        let value = ClarityValue::ResponseOk(Box::new(tuple(&[
            (FIELD_LP_YES_POOL, ClarityValue::UInt(1_000_000)),
            (FIELD_LP_NO_POOL, ClarityValue::UInt(2_000_000)),
            (FIELD_TOTAL_LIQUIDITY, ClarityValue::UInt(3_000_000)),
            (FIELD_RESOLVED, ClarityValue::Bool(false)),
        ])));

        let details = MarketDetails::from_clarity(&value).unwrap();
        assert_eq!(details.layout, PoolLayout::SplitLiquidity);
        assert_eq!(details.pool, PoolSnapshot::new(1_000_000, 2_000_000, 3_000_000));
        assert_eq!(details.resolved, Some(false));
    }

    #[test]
    fn test_legacy_layout_defaults_supply() {
        let value = ClarityValue::ResponseOk(Box::new(tuple(&[
            (LEGACY_FIELD_YES_POOL, ClarityValue::UInt(10)),
            (LEGACY_FIELD_NO_POOL, ClarityValue::UInt(20)),
        ])));
        let details = MarketDetails::from_clarity(&value).unwrap();
        assert_eq!(details.layout, PoolLayout::LegacyShared);
        assert_eq!(details.pool, PoolSnapshot::new(10, 20, 0));
        assert_eq!(details.resolved, None);
    }

    #[test]
    fn test_wrong_field_type() {
        let value = tuple(&[
            (FIELD_LP_YES_POOL, ClarityValue::Int(5)),
            (FIELD_LP_NO_POOL, ClarityValue::UInt(5)),
            (FIELD_TOTAL_LIQUIDITY, ClarityValue::UInt(5)),
        ]);
        assert_eq!(
            MarketDetails::from_clarity(&value).unwrap_err(),
            CodecError::unexpected_type(FIELD_LP_YES_POOL, "uint", "int")
        );
    }

    #[test]
    fn test_non_tuple_payload_rejected() {
        let value = ClarityValue::ResponseOk(Box::new(ClarityValue::UInt(1)));
        assert_eq!(
            MarketDetails::from_clarity(&value).unwrap_err(),
            CodecError::unexpected_type("market details", "tuple", "uint")
        );
    }

    #[test]
    fn test_err_response_surfaces() {
        let value = ClarityValue::ResponseErr(Box::new(ClarityValue::UInt(404)));
        assert_eq!(
            MarketDetails::from_clarity(&value).unwrap_err(),
            CodecError::ErrResponse {
                value: "u404".to_string()
            }
        );
    }

    #[test]
    fn test_empty_reserve_not_priceable() {
        let value = tuple(&[
            (FIELD_LP_YES_POOL, ClarityValue::UInt(0)),
            (FIELD_LP_NO_POOL, ClarityValue::UInt(5)),
            (FIELD_TOTAL_LIQUIDITY, ClarityValue::UInt(5)),
        ]);
        let details = MarketDetails::from_clarity(&value).unwrap();
        assert!(matches!(
            details.priceable_pool(),
            Err(CodecError::Pricing(_))
        ));
    }
}
