//! Elementary types

use abikit_primitives::{Address, H256, I256, U256, WORD_SIZE};

use crate::calldata::{padded_len, usize_word, CalldataCursor};
use crate::error::AbiError;
use crate::rules::DecodingRules;
use crate::value::Value;

/// Elementary type kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Unsigned integer with bit width
    Uint(usize),
    /// Signed integer with bit width
    Int(usize),
    /// Boolean
    Bool,
    /// 20-byte address
    Address,
    /// Fixed-size byte array with byte width
    FixedBytes(usize),
    /// Dynamic byte array
    Bytes,
    /// UTF-8 string
    String,
}

/// Elementary type with its cached signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    kind: ScalarKind,
    signature: String,
}

impl ScalarType {
    /// Validate widths and build the type
    pub fn new(kind: ScalarKind) -> Result<Self, AbiError> {
        let signature = match kind {
            ScalarKind::Uint(bits) | ScalarKind::Int(bits) => {
                if bits == 0 || bits > 256 || bits % 8 != 0 {
                    return Err(AbiError::descriptor(format!(
                        "integer width must be a multiple of 8 in 8..=256, got {}",
                        bits
                    )));
                }
                let prefix = if matches!(kind, ScalarKind::Uint(_)) { "uint" } else { "int" };
                format!("{}{}", prefix, bits)
            }
            ScalarKind::FixedBytes(len) => {
                if len == 0 || len > WORD_SIZE {
                    return Err(AbiError::descriptor(format!(
                        "fixed bytes width must be in 1..=32, got {}",
                        len
                    )));
                }
                format!("bytes{}", len)
            }
            ScalarKind::Bool => "bool".to_string(),
            ScalarKind::Address => "address".to_string(),
            ScalarKind::Bytes => "bytes".to_string(),
            ScalarKind::String => "string".to_string(),
        };
        Ok(Self { kind, signature })
    }

    /// Type kind
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Canonical signature
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Everything but `bytes` and `string` is one inline word
    pub fn is_static(&self) -> bool {
        !matches!(self.kind, ScalarKind::Bytes | ScalarKind::String)
    }

    fn mismatch(&self, value: &Value) -> AbiError {
        AbiError::encoding(format!("expected {}, got {}", self.signature, value.kind_name()))
    }

    /// Encode a static value as its head word
    pub(crate) fn encode_word(&self, value: &Value) -> Result<H256, AbiError> {
        let word = match (self.kind, value) {
            (ScalarKind::Uint(bits), Value::Uint(v)) => {
                if v.bits() > bits {
                    return Err(AbiError::encoding(format!("{} does not fit {}", v, self.signature)));
                }
                H256::from_u256(*v)
            }
            (ScalarKind::Int(bits), Value::Int(v)) => {
                if !v.fits_bits(bits) {
                    return Err(AbiError::encoding(format!("{} does not fit {}", v, self.signature)));
                }
                let word = v.to_twos_complement().map_err(|e| AbiError::encoding(e.to_string()))?;
                H256::from_u256(word)
            }
            (ScalarKind::Bool, Value::Bool(b)) => H256::from_u256(U256::from(*b as u8)),
            (ScalarKind::Address, Value::Address(a)) => a.to_word(),
            (ScalarKind::FixedBytes(len), Value::FixedBytes(bytes)) => {
                if bytes.len() > len {
                    return Err(AbiError::encoding(format!(
                        "{} bytes do not fit {}",
                        bytes.len(),
                        self.signature
                    )));
                }
                let mut word = [0u8; WORD_SIZE];
                word[..bytes.len()].copy_from_slice(bytes);
                H256::from_bytes(word)
            }
            (ScalarKind::Bytes | ScalarKind::String, _) => {
                return Err(AbiError::encoding(format!("{} has no inline word", self.signature)))
            }
            _ => return Err(self.mismatch(value)),
        };
        Ok(word)
    }

    /// Payload of a dynamic value: length word, then bytes right-padded
    fn payload<'v>(&self, value: &'v Value) -> Result<&'v [u8], AbiError> {
        match (self.kind, value) {
            (ScalarKind::Bytes, Value::Bytes(bytes)) => Ok(bytes),
            (ScalarKind::String, Value::String(s)) => Ok(s.as_bytes()),
            _ => Err(self.mismatch(value)),
        }
    }

    pub(crate) fn encode_region(&self, value: &Value) -> Result<Vec<u8>, AbiError> {
        if self.is_static() {
            return Ok(self.encode_word(value)?.as_bytes().to_vec());
        }
        let bytes = self.payload(value)?;
        let mut out = Vec::with_capacity(WORD_SIZE + padded_len(bytes.len()));
        out.extend_from_slice(usize_word(bytes.len()).as_bytes());
        out.extend_from_slice(bytes);
        out.resize(WORD_SIZE + padded_len(bytes.len()), 0);
        Ok(out)
    }

    pub(crate) fn encoded_len(&self, value: &Value) -> Result<usize, AbiError> {
        if self.is_static() {
            return Ok(WORD_SIZE);
        }
        Ok(WORD_SIZE + padded_len(self.payload(value)?.len()))
    }

    pub(crate) fn decode_region(
        &self,
        cursor: &mut CalldataCursor<'_>,
        rules: &DecodingRules,
    ) -> Result<Value, AbiError> {
        if self.is_static() {
            let word = cursor.read_word()?;
            return self.decode_word(&word, rules);
        }

        let len = cursor.read_length()?;
        if len > cursor.remaining() {
            return Err(AbiError::decoding(format!(
                "declared length {} exceeds the {} remaining bytes",
                len,
                cursor.remaining()
            )));
        }
        rules.check_length(len)?;
        let bytes = cursor.read_padded_bytes(len)?;

        match self.kind {
            ScalarKind::String if rules.strict => std::str::from_utf8(bytes)
                .map(|s| Value::String(s.to_string()))
                .map_err(|e| AbiError::decoding(format!("invalid UTF-8: {}", e))),
            ScalarKind::String => Ok(Value::String(String::from_utf8_lossy(bytes).into_owned())),
            _ => Ok(Value::Bytes(bytes.to_vec())),
        }
    }

    fn decode_word(&self, word: &H256, rules: &DecodingRules) -> Result<Value, AbiError> {
        let raw = word.to_u256();
        let value = match self.kind {
            ScalarKind::Uint(bits) => {
                if raw.bits() > bits {
                    if rules.strict {
                        return Err(AbiError::decoding(format!(
                            "{} does not fit {}",
                            raw, self.signature
                        )));
                    }
                    Value::Uint(raw & low_mask(bits))
                } else {
                    Value::Uint(raw)
                }
            }
            ScalarKind::Int(bits) => {
                if bits == 256 {
                    Value::Int(I256::from_twos_complement(raw))
                } else {
                    let half = U256::one() << (bits - 1);
                    let canonical = raw < half || raw >= !(half - U256::one());
                    if canonical {
                        Value::Int(I256::from_twos_complement(raw))
                    } else if rules.strict {
                        return Err(AbiError::decoding(format!(
                            "word {} is not a sign-extended {}",
                            word, self.signature
                        )));
                    } else {
                        let mask = low_mask(bits);
                        let mut truncated = raw & mask;
                        if truncated.bit(bits - 1) {
                            truncated = truncated | !mask;
                        }
                        Value::Int(I256::from_twos_complement(truncated))
                    }
                }
            }
            ScalarKind::Bool => {
                if raw > U256::one() && rules.strict {
                    return Err(AbiError::decoding(format!("word {} is not a bool", word)));
                }
                Value::Bool(!raw.is_zero())
            }
            ScalarKind::Address => {
                if rules.strict && !Address::is_clean_word(word) {
                    return Err(AbiError::decoding(format!("word {} has dirty address padding", word)));
                }
                Value::Address(Address::from_word(word))
            }
            ScalarKind::FixedBytes(len) => {
                let bytes = word.as_bytes();
                if rules.strict && bytes[len..].iter().any(|b| *b != 0) {
                    return Err(AbiError::decoding(format!(
                        "word {} has dirty {} padding",
                        word, self.signature
                    )));
                }
                Value::FixedBytes(bytes[..len].to_vec())
            }
            ScalarKind::Bytes | ScalarKind::String => {
                return Err(AbiError::decoding(format!("{} has no inline word", self.signature)))
            }
        };
        Ok(value)
    }
}

/// Mask of the low `bits` bits
fn low_mask(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::one() << bits) - U256::one()
    }
}
