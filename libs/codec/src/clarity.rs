//! # Clarity Value Codec
//!
//! Decodes the consensus serialization used by contract-call results into a
//! typed [`ClarityValue`] tree, so market state never travels through
//! stringified intermediate forms.
//!
//! ## Wire Format
//!
//! Every value starts with a one-byte type id followed by its body. Integers
//! are 16-byte big-endian, lengths are 4-byte big-endian, tuple keys and
//! contract names carry a one-byte length.
//!
//! | id | type | body |
//! |----|------|------|
//! | 0x00 | int | i128 |
//! | 0x01 | uint | u128 |
//! | 0x02 | buffer | u32 len + bytes |
//! | 0x03 / 0x04 | true / false | - |
//! | 0x05 | standard principal | version + 20-byte hash |
//! | 0x06 | contract principal | version + hash + u8 len + name |
//! | 0x07 / 0x08 | (ok v) / (err v) | value |
//! | 0x09 / 0x0a | none / (some v) | - / value |
//! | 0x0b | list | u32 len + values |
//! | 0x0c | tuple | u32 len + (u8 len + key + value)* |
//! | 0x0d / 0x0e | string-ascii / string-utf8 | u32 len + bytes |

use crate::error::{CodecError, CodecResult};
use byteorder::{BigEndian, ByteOrder};
use std::collections::BTreeMap;
use std::fmt;

/// Deepest nesting accepted by the decoder
pub const MAX_NESTING_DEPTH: usize = 32;

/// Longest tuple key or contract name Clarity allows
pub const MAX_NAME_LENGTH: usize = 128;

const TYPE_INT: u8 = 0x00;
const TYPE_UINT: u8 = 0x01;
const TYPE_BUFFER: u8 = 0x02;
const TYPE_BOOL_TRUE: u8 = 0x03;
const TYPE_BOOL_FALSE: u8 = 0x04;
const TYPE_STANDARD_PRINCIPAL: u8 = 0x05;
const TYPE_CONTRACT_PRINCIPAL: u8 = 0x06;
const TYPE_RESPONSE_OK: u8 = 0x07;
const TYPE_RESPONSE_ERR: u8 = 0x08;
const TYPE_OPTIONAL_NONE: u8 = 0x09;
const TYPE_OPTIONAL_SOME: u8 = 0x0a;
const TYPE_LIST: u8 = 0x0b;
const TYPE_TUPLE: u8 = 0x0c;
const TYPE_STRING_ASCII: u8 = 0x0d;
const TYPE_STRING_UTF8: u8 = 0x0e;

/// Typed Clarity value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClarityValue {
    Int(i128),
    UInt(u128),
    Buffer(Vec<u8>),
    Bool(bool),
    StandardPrincipal {
        version: u8,
        hash160: [u8; 20],
    },
    ContractPrincipal {
        version: u8,
        hash160: [u8; 20],
        name: String,
    },
    ResponseOk(Box<ClarityValue>),
    ResponseErr(Box<ClarityValue>),
    OptionalNone,
    OptionalSome(Box<ClarityValue>),
    List(Vec<ClarityValue>),
    Tuple(BTreeMap<String, ClarityValue>),
    StringAscii(String),
    StringUtf8(String),
}

impl ClarityValue {
    /// Decode exactly one value from `bytes`
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        let mut reader = Reader::new(bytes);
        let value = reader.read_value(0)?;
        if reader.offset != bytes.len() {
            return Err(CodecError::TrailingBytes {
                consumed: reader.offset,
                total: bytes.len(),
            });
        }
        Ok(value)
    }

    /// Decode a hex string as returned by the node, with or without `0x`
    pub fn decode_hex(hex_str: &str) -> CodecResult<Self> {
        let trimmed = hex_str.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits)?;
        Self::decode(&bytes)
    }

    /// Consensus serialization of this value
    ///
    /// Fails when a name, key or length does not fit its wire prefix.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// `0x`-prefixed hex serialization, the form used for call arguments
    pub fn encode_hex(&self) -> CodecResult<String> {
        Ok(format!("0x{}", hex::encode(self.encode()?)))
    }

    /// Human-readable type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ClarityValue::Int(_) => "int",
            ClarityValue::UInt(_) => "uint",
            ClarityValue::Buffer(_) => "buffer",
            ClarityValue::Bool(_) => "bool",
            ClarityValue::StandardPrincipal { .. } => "standard-principal",
            ClarityValue::ContractPrincipal { .. } => "contract-principal",
            ClarityValue::ResponseOk(_) => "response-ok",
            ClarityValue::ResponseErr(_) => "response-err",
            ClarityValue::OptionalNone => "none",
            ClarityValue::OptionalSome(_) => "some",
            ClarityValue::List(_) => "list",
            ClarityValue::Tuple(_) => "tuple",
            ClarityValue::StringAscii(_) => "string-ascii",
            ClarityValue::StringUtf8(_) => "string-utf8",
        }
    }

    pub fn as_uint(&self) -> Option<u128> {
        match self {
            ClarityValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClarityValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&BTreeMap<String, ClarityValue>> {
        match self {
            ClarityValue::Tuple(fields) => Some(fields),
            _ => None,
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) -> CodecResult<()> {
        match self {
            ClarityValue::Int(v) => {
                out.push(TYPE_INT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            ClarityValue::UInt(v) => {
                out.push(TYPE_UINT);
                out.extend_from_slice(&v.to_be_bytes());
            }
            ClarityValue::Buffer(bytes) => {
                out.push(TYPE_BUFFER);
                write_len_prefixed(out, bytes, "buffer")?;
            }
            ClarityValue::Bool(true) => out.push(TYPE_BOOL_TRUE),
            ClarityValue::Bool(false) => out.push(TYPE_BOOL_FALSE),
            ClarityValue::StandardPrincipal { version, hash160 } => {
                out.push(TYPE_STANDARD_PRINCIPAL);
                out.push(*version);
                out.extend_from_slice(hash160);
            }
            ClarityValue::ContractPrincipal {
                version,
                hash160,
                name,
            } => {
                out.push(TYPE_CONTRACT_PRINCIPAL);
                out.push(*version);
                out.extend_from_slice(hash160);
                write_name(out, name, "contract name")?;
            }
            ClarityValue::ResponseOk(inner) => {
                out.push(TYPE_RESPONSE_OK);
                inner.write_to(out)?;
            }
            ClarityValue::ResponseErr(inner) => {
                out.push(TYPE_RESPONSE_ERR);
                inner.write_to(out)?;
            }
            ClarityValue::OptionalNone => out.push(TYPE_OPTIONAL_NONE),
            ClarityValue::OptionalSome(inner) => {
                out.push(TYPE_OPTIONAL_SOME);
                inner.write_to(out)?;
            }
            ClarityValue::List(items) => {
                out.push(TYPE_LIST);
                write_len(out, items.len(), "list")?;
                for item in items {
                    item.write_to(out)?;
                }
            }
            ClarityValue::Tuple(fields) => {
                out.push(TYPE_TUPLE);
                write_len(out, fields.len(), "tuple")?;
                for (key, value) in fields {
                    write_name(out, key, "tuple key")?;
                    value.write_to(out)?;
                }
            }
            ClarityValue::StringAscii(s) => {
                out.push(TYPE_STRING_ASCII);
                write_len_prefixed(out, s.as_bytes(), "string-ascii")?;
            }
            ClarityValue::StringUtf8(s) => {
                out.push(TYPE_STRING_UTF8);
                write_len_prefixed(out, s.as_bytes(), "string-utf8")?;
            }
        }
        Ok(())
    }
}

/// Serialized `uint` argument for a read-only call keyed by market id
pub fn encode_uint_arg(value: u128) -> String {
    format!("0x{TYPE_UINT:02x}{}", hex::encode(value.to_be_bytes()))
}

fn write_len(out: &mut Vec<u8>, len: usize, context: &str) -> CodecResult<()> {
    let len = u32::try_from(len)
        .map_err(|_| CodecError::too_large(context, len, u32::MAX as usize))?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn write_len_prefixed(out: &mut Vec<u8>, bytes: &[u8], context: &str) -> CodecResult<()> {
    write_len(out, bytes.len(), context)?;
    out.extend_from_slice(bytes);
    Ok(())
}

/// One-byte length plus name, bounded by [`MAX_NAME_LENGTH`]
fn write_name(out: &mut Vec<u8>, name: &str, context: &str) -> CodecResult<()> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(CodecError::too_large(context, name.len(), MAX_NAME_LENGTH));
    }
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

/// Renders the `cvToString` textual form, with principals shown as
/// `'version:hash160` hex
impl fmt::Display for ClarityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClarityValue::Int(v) => write!(f, "{v}"),
            ClarityValue::UInt(v) => write!(f, "u{v}"),
            ClarityValue::Buffer(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            ClarityValue::Bool(v) => write!(f, "{v}"),
            ClarityValue::StandardPrincipal { version, hash160 } => {
                write!(f, "'{version}:{}", hex::encode(hash160))
            }
            ClarityValue::ContractPrincipal {
                version,
                hash160,
                name,
            } => write!(f, "'{version}:{}.{name}", hex::encode(hash160)),
            ClarityValue::ResponseOk(inner) => write!(f, "(ok {inner})"),
            ClarityValue::ResponseErr(inner) => write!(f, "(err {inner})"),
            ClarityValue::OptionalNone => write!(f, "none"),
            ClarityValue::OptionalSome(inner) => write!(f, "(some {inner})"),
            ClarityValue::List(items) => {
                write!(f, "(list")?;
                for item in items {
                    write!(f, " {item}")?;
                }
                write!(f, ")")
            }
            ClarityValue::Tuple(fields) => {
                write!(f, "(tuple")?;
                for (key, value) in fields {
                    write!(f, " ({key} {value})")?;
                }
                write!(f, ")")
            }
            ClarityValue::StringAscii(s) => write!(f, "\"{s}\""),
            ClarityValue::StringUtf8(s) => write!(f, "u\"{s}\""),
        }
    }
}

/// Bounds-checked cursor over the serialized bytes
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: usize, context: &str) -> CodecResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(CodecError::truncated(
                len,
                self.remaining(),
                self.offset,
                context,
            ));
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_u8(&mut self, context: &str) -> CodecResult<u8> {
        Ok(self.take(1, context)?[0])
    }

    fn read_u32(&mut self, context: &str) -> CodecResult<u32> {
        Ok(BigEndian::read_u32(self.take(4, context)?))
    }

    fn read_hash160(&mut self) -> CodecResult<[u8; 20]> {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(self.take(20, "principal hash160")?);
        Ok(hash)
    }

    fn read_len_prefixed(&mut self, context: &str) -> CodecResult<&'a [u8]> {
        let len = self.read_u32(context)? as usize;
        self.take(len, context)
    }

    fn read_text(bytes_offset: usize, bytes: &[u8], ascii: bool) -> CodecResult<String> {
        if ascii && !bytes.is_ascii() {
            return Err(CodecError::InvalidText {
                offset: bytes_offset,
                reason: "string-ascii contains non-ASCII bytes".to_string(),
            });
        }
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::InvalidText {
            offset: bytes_offset,
            reason: e.to_string(),
        })
    }

    fn read_value(&mut self, depth: usize) -> CodecResult<ClarityValue> {
        if depth > MAX_NESTING_DEPTH {
            return Err(CodecError::NestingTooDeep {
                depth,
                max: MAX_NESTING_DEPTH,
            });
        }

        let prefix_offset = self.offset;
        let prefix = self.read_u8("type prefix")?;
        let value = match prefix {
            TYPE_INT => ClarityValue::Int(BigEndian::read_i128(self.take(16, "int")?)),
            TYPE_UINT => ClarityValue::UInt(BigEndian::read_u128(self.take(16, "uint")?)),
            TYPE_BUFFER => ClarityValue::Buffer(self.read_len_prefixed("buffer")?.to_vec()),
            TYPE_BOOL_TRUE => ClarityValue::Bool(true),
            TYPE_BOOL_FALSE => ClarityValue::Bool(false),
            TYPE_STANDARD_PRINCIPAL => {
                let version = self.read_u8("principal version")?;
                let hash160 = self.read_hash160()?;
                ClarityValue::StandardPrincipal { version, hash160 }
            }
            TYPE_CONTRACT_PRINCIPAL => {
                let version = self.read_u8("principal version")?;
                let hash160 = self.read_hash160()?;
                let name_len = self.read_u8("contract name length")? as usize;
                let name_offset = self.offset;
                let name_bytes = self.take(name_len, "contract name")?;
                let name = Self::read_text(name_offset, name_bytes, true)?;
                ClarityValue::ContractPrincipal {
                    version,
                    hash160,
                    name,
                }
            }
            TYPE_RESPONSE_OK => ClarityValue::ResponseOk(Box::new(self.read_value(depth + 1)?)),
            TYPE_RESPONSE_ERR => ClarityValue::ResponseErr(Box::new(self.read_value(depth + 1)?)),
            TYPE_OPTIONAL_NONE => ClarityValue::OptionalNone,
            TYPE_OPTIONAL_SOME => ClarityValue::OptionalSome(Box::new(self.read_value(depth + 1)?)),
            TYPE_LIST => {
                let len = self.read_u32("list length")? as usize;
                // every element needs at least its type byte
                let mut items = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    items.push(self.read_value(depth + 1)?);
                }
                ClarityValue::List(items)
            }
            TYPE_TUPLE => {
                let len = self.read_u32("tuple length")? as usize;
                let mut fields = BTreeMap::new();
                for _ in 0..len {
                    let key_len = self.read_u8("tuple key length")? as usize;
                    let key_offset = self.offset;
                    let key_bytes = self.take(key_len, "tuple key")?;
                    let key = Self::read_text(key_offset, key_bytes, true)?;
                    let value = self.read_value(depth + 1)?;
                    fields.insert(key, value);
                }
                ClarityValue::Tuple(fields)
            }
            TYPE_STRING_ASCII => {
                let text_offset = self.offset + 4;
                let bytes = self.read_len_prefixed("string-ascii")?;
                ClarityValue::StringAscii(Self::read_text(text_offset, bytes, true)?)
            }
            TYPE_STRING_UTF8 => {
                let text_offset = self.offset + 4;
                let bytes = self.read_len_prefixed("string-utf8")?;
                ClarityValue::StringUtf8(Self::read_text(text_offset, bytes, false)?)
            }
            other => {
                return Err(CodecError::UnknownTypePrefix {
                    prefix: other,
                    offset: prefix_offset,
                })
            }
        };
        Ok(value)
    }
}
