// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! Parses the JSON object handed to the witness calculator into a mapping
//! from signal name to a recursive tree of big integers, and flattens that
//! tree in array-row-major order for the ABI driver.

use crate::error::ParseError;
use num_bigint::BigInt;
use std::collections::HashMap;
use std::str::FromStr;

/// One signal's value tree: either a leaf integer, or a nested array of the
/// same (Circom input signals may be arbitrarily-nested arrays).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputValue {
    Scalar(BigInt),
    Array(Vec<InputValue>),
}

impl InputValue {
    /// Flatten in array-row-major order, the order the guest expects values
    /// to arrive in for a multi-dimensional signal.
    pub fn flatten(&self) -> Vec<BigInt> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<BigInt>) {
        match self {
            InputValue::Scalar(v) => out.push(v.clone()),
            InputValue::Array(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

/// Parse a JSON object mapping signal names to recursive number/string/array
/// leaves into signal-name -> [`InputValue`] pairs.
pub fn parse_inputs(json: &[u8]) -> Result<HashMap<String, InputValue>, ParseError> {
    let raw: HashMap<String, serde_json::Value> = serde_json::from_slice(json)?;
    raw.into_iter()
        .map(|(name, value)| {
            let parsed = parse_value(&value, &name)?;
            Ok((name, parsed))
        })
        .collect()
}

fn parse_value(value: &serde_json::Value, path: &str) -> Result<InputValue, ParseError> {
    match value {
        serde_json::Value::String(s) => Ok(InputValue::Scalar(parse_integer_str(s)?)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(InputValue::Scalar(BigInt::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(InputValue::Scalar(BigInt::from(u)))
            } else {
                Err(ParseError::UnparsableInteger {
                    value: n.to_string(),
                })
            }
        }
        serde_json::Value::Array(items) => {
            let parsed = items
                .iter()
                .enumerate()
                .map(|(i, item)| parse_value(item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(InputValue::Array(parsed))
        }
        _ => Err(ParseError::UnexpectedLeaf {
            path: path.to_string(),
        }),
    }
}

/// Parse a decimal or `0x`-prefixed hex integer string.
fn parse_integer_str(s: &str) -> Result<BigInt, ParseError> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        BigInt::from_str_radix_unsigned(hex, 16)
    } else {
        BigInt::from_str(body).ok()
    }
    .ok_or_else(|| ParseError::UnparsableInteger {
        value: s.to_string(),
    })?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Small extension trait so callers above can parse an unsigned magnitude in
/// an arbitrary radix without pulling in `num_traits::Num` at the call site.
trait FromStrRadixUnsigned: Sized {
    fn from_str_radix_unsigned(s: &str, radix: u32) -> Option<Self>;
}

impl FromStrRadixUnsigned for BigInt {
    fn from_str_radix_unsigned(s: &str, radix: u32) -> Option<Self> {
        num_bigint::BigUint::parse_bytes(s.as_bytes(), radix).map(BigInt::from)
    }
}

/// Reduce `v` into `[0, q)`, per §4.4 step 3: `((v mod q) + q) mod q`.
pub fn reduce_mod(v: &BigInt, q: &BigInt) -> BigInt {
    ((v % q) + q) % q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_integer_str("42").unwrap(), BigInt::from(42));
        assert_eq!(parse_integer_str("0x2a").unwrap(), BigInt::from(42));
        assert_eq!(parse_integer_str("-7").unwrap(), BigInt::from(-7));
    }

    #[test]
    fn flattens_nested_arrays_row_major() {
        let v = InputValue::Array(vec![
            InputValue::Array(vec![
                InputValue::Scalar(BigInt::from(1)),
                InputValue::Scalar(BigInt::from(2)),
            ]),
            InputValue::Array(vec![
                InputValue::Scalar(BigInt::from(3)),
                InputValue::Scalar(BigInt::from(4)),
            ]),
        ]);
        assert_eq!(
            v.flatten(),
            vec![
                BigInt::from(1),
                BigInt::from(2),
                BigInt::from(3),
                BigInt::from(4)
            ]
        );
    }

    #[test]
    fn parses_object_of_mixed_leaves() {
        let json = br#"{"a": 5, "b": "7", "c": [1, 2, "3"]}"#;
        let parsed = parse_inputs(json).unwrap();
        assert_eq!(parsed["a"].flatten(), vec![BigInt::from(5)]);
        assert_eq!(parsed["b"].flatten(), vec![BigInt::from(7)]);
        assert_eq!(
            parsed["c"].flatten(),
            vec![BigInt::from(1), BigInt::from(2), BigInt::from(3)]
        );
    }

    #[test]
    fn reduce_mod_handles_negative_values() {
        let q = BigInt::from(13);
        assert_eq!(reduce_mod(&BigInt::from(-1), &q), BigInt::from(12));
        assert_eq!(reduce_mod(&BigInt::from(14), &q), BigInt::from(1));
    }
}
