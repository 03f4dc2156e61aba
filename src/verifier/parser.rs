//! Decodes verification-key, proof, and public-signal JSON (§6.1, §6.2)
//! into `ark_bn254`/`ark_groth16` types.
//!
//! Coordinates arrive as decimal strings or `0x`-prefixed hex; detection is
//! local to each point, keyed off its first string. A historical quirk in
//! decimal mode writes the point-at-infinity placeholder as coordinate
//! strings equal to `"1"`; rather than propagate that string substitution
//! (as the reference parser does before byte-marshaling into a legacy
//! curve library), this module substitutes it the same way but then detects
//! the identity explicitly from the resulting all-zero coordinates, per
//! the Design Notes' recommendation.
//!
//! G2 coordinate pairs are stored `[c0, c1]` in the reference JSON — the
//! reference implementation's `(x.c1, x.c0, ...)` byte order is an artifact
//! of the legacy `bn256` library's `Marshal` format (imaginary part first
//! on the wire), not the JSON field order, so no reordering is needed when
//! constructing `Fq2` directly.

use crate::error::{ParseError, RangeError};
use ark_bn254::{Bn254, Fq, Fq2, Fr};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};
use ark_groth16::{Proof, VerifyingKey};
use num_bigint::BigUint;
use serde::Deserialize;

type G1Affine = ark_bn254::G1Affine;
type G2Affine = ark_bn254::G2Affine;

#[derive(Deserialize)]
struct VerifyingKeyJson {
    #[serde(rename = "vk_alpha_1")]
    alpha: Vec<String>,
    #[serde(rename = "vk_beta_2")]
    beta: Vec<Vec<String>>,
    #[serde(rename = "vk_gamma_2")]
    gamma: Vec<Vec<String>>,
    #[serde(rename = "vk_delta_2")]
    delta: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    ic: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct ProofJson {
    pi_a: Vec<String>,
    pi_b: Vec<Vec<String>>,
    pi_c: Vec<String>,
}

fn is_hex(s: &str) -> bool {
    s.starts_with("0x") || s.starts_with("0X")
}

fn parse_fq(raw: &str, hex_mode: bool) -> Result<Fq, ParseError> {
    let substituted;
    let s = if !hex_mode && raw == "1" {
        substituted = "0".to_string();
        substituted.as_str()
    } else {
        raw
    };
    let (digits, radix) = if hex_mode {
        (s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s), 16)
    } else {
        (s, 10)
    };
    let value = BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| ParseError::UnparsableInteger {
        value: raw.to_string(),
    })?;
    Ok(Fq::from_be_bytes_mod_order(&value.to_bytes_be()))
}

fn is_zero_fq(v: &Fq) -> bool {
    *v == Fq::from(0u64)
}

fn parse_g1(coords: &[String]) -> Result<G1Affine, ParseError> {
    if coords.len() < 2 {
        return Err(ParseError::CoordinateCount {
            expected: 2,
            found: coords.len(),
        });
    }
    let hex_mode = is_hex(&coords[0]);
    let x = parse_fq(&coords[0], hex_mode)?;
    let y = parse_fq(&coords[1], hex_mode)?;
    if is_zero_fq(&x) && is_zero_fq(&y) {
        return Ok(G1Affine::identity());
    }
    Ok(G1Affine::new_unchecked(x, y))
}

fn parse_g2(coords: &[Vec<String>]) -> Result<G2Affine, ParseError> {
    if coords.len() < 2 {
        return Err(ParseError::CoordinateCount {
            expected: 2,
            found: coords.len(),
        });
    }
    for pair in &coords[..2] {
        if pair.len() < 2 {
            return Err(ParseError::CoordinateCount {
                expected: 2,
                found: pair.len(),
            });
        }
    }
    let hex_mode = is_hex(&coords[0][0]);
    let x = Fq2::new(parse_fq(&coords[0][0], hex_mode)?, parse_fq(&coords[0][1], hex_mode)?);
    let y = Fq2::new(parse_fq(&coords[1][0], hex_mode)?, parse_fq(&coords[1][1], hex_mode)?);
    if is_zero_fq(&x.c0) && is_zero_fq(&x.c1) && is_zero_fq(&y.c0) && is_zero_fq(&y.c1) {
        return Ok(G2Affine::identity());
    }
    Ok(G2Affine::new_unchecked(x, y))
}

/// Parse a verification-key JSON object (§6.1) into an `ark_groth16`
/// verifying key.
pub fn parse_verifying_key(json: &[u8]) -> Result<VerifyingKey<Bn254>, ParseError> {
    let raw: VerifyingKeyJson = serde_json::from_slice(json)?;
    let alpha_g1 = parse_g1(&raw.alpha)?;
    let beta_g2 = parse_g2(&raw.beta)?;
    let gamma_g2 = parse_g2(&raw.gamma)?;
    let delta_g2 = parse_g2(&raw.delta)?;
    let gamma_abc_g1 = raw.ic.iter().map(|p| parse_g1(p)).collect::<Result<Vec<_>, _>>()?;
    Ok(VerifyingKey {
        alpha_g1,
        beta_g2,
        gamma_g2,
        delta_g2,
        gamma_abc_g1,
    })
}

/// Parse a proof JSON object (§6.2) into an `ark_groth16` proof.
pub fn parse_proof(json: &[u8]) -> Result<Proof<Bn254>, ParseError> {
    let raw: ProofJson = serde_json::from_slice(json)?;
    Ok(Proof {
        a: parse_g1(&raw.pi_a)?,
        b: parse_g2(&raw.pi_b)?,
        c: parse_g1(&raw.pi_c)?,
    })
}

/// Parse a public-signals JSON array into scalar-field elements, rejecting
/// any value that is not strictly less than the scalar-field modulus (§4.6)
/// rather than silently reducing it.
pub fn parse_public_signals(json: &[u8]) -> Result<Vec<Fr>, crate::error::Error> {
    let raw: Vec<String> = serde_json::from_slice(json).map_err(ParseError::from)?;
    let modulus = BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be());

    raw.iter()
        .enumerate()
        .map(|(index, s)| {
            let hex_mode = is_hex(s);
            let (digits, radix) = if hex_mode {
                (s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s), 16)
            } else {
                (s.as_str(), 10)
            };
            let value = BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| {
                crate::error::Error::Parse(ParseError::UnparsableInteger { value: s.clone() })
            })?;
            if value >= modulus {
                return Err(RangeError::SignalNotInField { index }.into());
            }
            Ok(Fr::from_be_bytes_mod_order(&value.to_bytes_be()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_g1() {
        let g1 = parse_g1(&["3".to_string(), "5".to_string(), "1".to_string()]).unwrap();
        assert_eq!(g1.x, Fq::from(3u64));
        assert_eq!(g1.y, Fq::from(5u64));
    }

    #[test]
    fn detects_g1_identity_placeholder() {
        let g1 = parse_g1(&["1".to_string(), "1".to_string(), "0".to_string()]).unwrap();
        assert_eq!(g1, G1Affine::identity());
    }

    #[test]
    fn parses_hex_g1() {
        let g1 = parse_g1(&["0x3".to_string(), "0x5".to_string(), "0x1".to_string()]).unwrap();
        assert_eq!(g1.x, Fq::from(3u64));
        assert_eq!(g1.y, Fq::from(5u64));
    }

    #[test]
    fn rejects_out_of_range_public_signal() {
        let modulus = BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be());
        let json = format!("[\"{}\"]", modulus);
        let err = parse_public_signals(json.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Range(RangeError::SignalNotInField { index: 0 })
        ));
    }

    #[test]
    fn accepts_in_range_public_signal() {
        let signals = parse_public_signals(b"[\"42\"]").unwrap();
        assert_eq!(signals[0], Fr::from(42u64));
    }
}
