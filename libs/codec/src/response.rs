//! Read-only contract call envelope
//!
//! Request and response bodies of the node's
//! `/v2/contracts/call-read/{address}/{contract}/{function}` endpoint.

use crate::clarity::{encode_uint_arg, ClarityValue};
use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};

/// Body posted to the read-only call endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOnlyRequest {
    pub sender: String,
    /// Hex-serialized Clarity arguments
    pub arguments: Vec<String>,
}

impl ReadOnlyRequest {
    /// Request keyed by a numeric market identifier
    pub fn for_market(sender: impl Into<String>, market_id: u64) -> Self {
        Self {
            sender: sender.into(),
            arguments: vec![encode_uint_arg(u128::from(market_id))],
        }
    }
}

/// Reply from the read-only call endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOnlyResponse {
    pub okay: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
}

impl ReadOnlyResponse {
    pub fn from_json(body: &str) -> CodecResult<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Decoded result value; a failed call surfaces its cause
    pub fn into_value(self) -> CodecResult<ClarityValue> {
        if !self.okay {
            return Err(CodecError::CallFailed {
                cause: self.cause.unwrap_or_else(|| "no cause reported".to_string()),
            });
        }
        let result = self
            .result
            .ok_or_else(|| CodecError::missing_field("result", "read-only response"))?;
        ClarityValue::decode_hex(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let request = ReadOnlyRequest::for_market("ST1EJ799Q4EJ511FP9C7J71ESA4920QJV7D8YKK2C", 4);
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"sender":"ST1EJ799Q4EJ511FP9C7J71ESA4920QJV7D8YKK2C","arguments":["0x0100000000000000000000000000000004"]}"#
        );
    }

    #[test]
    fn test_failed_call_reports_cause() {
        let response =
            ReadOnlyResponse::from_json(r#"{"okay":false,"cause":"Unchecked(NoSuchContract)"}"#)
                .unwrap();
        assert_eq!(
            response.into_value().unwrap_err(),
            CodecError::CallFailed {
                cause: "Unchecked(NoSuchContract)".to_string()
            }
        );
    }

    #[test]
    fn test_okay_without_result() {
        let response = ReadOnlyResponse::from_json(r#"{"okay":true}"#).unwrap();
        assert!(matches!(
            response.into_value(),
            Err(CodecError::MissingField { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ReadOnlyResponse::from_json("not json"),
            Err(CodecError::Json(_))
        ));
    }
}
