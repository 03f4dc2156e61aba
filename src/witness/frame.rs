// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! Output framing: the raw little-endian concatenation, and the `wtns` v2
//! section-tagged container (§4.5). The reader is symmetric with the
//! writer, since the calculator's own tests and a future prover binding
//! both round-trip through it.

use crate::error::ParseError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use num_bigint::{BigInt, Sign};
use std::io::{Cursor, Read};

fn to_le_bytes_fixed(v: &BigInt, n8: usize) -> Vec<u8> {
    let (_, be) = v.to_bytes_be();
    let mut buf = vec![0u8; n8];
    let copy_len = be.len().min(n8);
    let start = n8 - copy_len;
    buf[start..].copy_from_slice(&be[be.len() - copy_len..]);
    buf.reverse();
    buf
}

fn from_le_bytes(bytes: &[u8]) -> BigInt {
    let mut be = bytes.to_vec();
    be.reverse();
    BigInt::from_bytes_be(Sign::Plus, &be)
}

/// Concatenate each witness element as a fixed-width `n8 = 4*n32`-byte
/// little-endian block. No header.
pub fn write_raw(witness: &[BigInt], n32: usize) -> Vec<u8> {
    let n8 = n32 * 4;
    let mut out = Vec::with_capacity(witness.len() * n8);
    for w in witness {
        out.extend_from_slice(&to_le_bytes_fixed(w, n8));
    }
    out
}

/// Write the `wtns` v2 container described in §4.5.
pub fn write_wtns(witness: &[BigInt], n32: usize, prime: &BigInt) -> Vec<u8> {
    let n8 = (n32 * 4) as u32;
    let mut buf = Vec::new();
    buf.extend_from_slice(b"wtns");
    buf.write_u32::<LittleEndian>(2).unwrap();
    buf.write_u32::<LittleEndian>(2).unwrap();

    buf.write_u32::<LittleEndian>(1).unwrap();
    buf.write_u64::<LittleEndian>(8 + n8 as u64).unwrap();
    buf.write_u32::<LittleEndian>(n8).unwrap();
    buf.extend_from_slice(&to_le_bytes_fixed(prime, n8 as usize));
    buf.write_u32::<LittleEndian>(witness.len() as u32).unwrap();

    buf.write_u32::<LittleEndian>(2).unwrap();
    buf.write_u64::<LittleEndian>(n8 as u64 * witness.len() as u64)
        .unwrap();
    for w in witness {
        buf.extend_from_slice(&to_le_bytes_fixed(w, n8 as usize));
    }
    buf
}

/// Read a `wtns` v2 container back into its witness vector and field prime.
pub fn read_wtns(bytes: &[u8]) -> Result<(Vec<BigInt>, BigInt), ParseError> {
    let mut cur = Cursor::new(bytes);

    let mut magic = [0u8; 4];
    cur.read_exact(&mut magic)
        .map_err(|_| ParseError::WitnessHeaderError)?;
    if &magic != b"wtns" {
        return Err(ParseError::WitnessHeaderError);
    }

    let version = cur
        .read_u32::<LittleEndian>()
        .map_err(|_| ParseError::WitnessHeaderError)?;
    if version > 2 {
        return Err(ParseError::WitnessVersionNotSupported(version));
    }

    let n_sections = cur
        .read_u32::<LittleEndian>()
        .map_err(|_| ParseError::WitnessHeaderError)?;
    if n_sections != 2 {
        return Err(ParseError::SectionCountError(n_sections));
    }

    let sec1_id = cur
        .read_u32::<LittleEndian>()
        .map_err(|_| ParseError::WitnessHeaderError)?;
    if sec1_id != 1 {
        return Err(ParseError::SectionTypeError {
            expected: 1,
            found: sec1_id,
        });
    }
    let sec1_len = cur
        .read_u64::<LittleEndian>()
        .map_err(|_| ParseError::WitnessHeaderError)?;
    let n8 = cur
        .read_u32::<LittleEndian>()
        .map_err(|_| ParseError::WitnessHeaderError)?;
    if n8 != 32 {
        return Err(ParseError::FieldByteSizeError {
            expected: 32,
            found: n8,
        });
    }
    if sec1_len != 8 + n8 as u64 {
        return Err(ParseError::SectionLengthError {
            expected: 8 + n8 as u64,
            found: sec1_len,
        });
    }

    let mut prime_bytes = vec![0u8; n8 as usize];
    cur.read_exact(&mut prime_bytes)
        .map_err(|_| ParseError::WitnessHeaderError)?;
    let prime = from_le_bytes(&prime_bytes);

    let witness_len = cur
        .read_u32::<LittleEndian>()
        .map_err(|_| ParseError::WitnessHeaderError)?;

    let sec2_id = cur
        .read_u32::<LittleEndian>()
        .map_err(|_| ParseError::WitnessHeaderError)?;
    if sec2_id != 2 {
        return Err(ParseError::SectionTypeError {
            expected: 2,
            found: sec2_id,
        });
    }
    let sec2_len = cur
        .read_u64::<LittleEndian>()
        .map_err(|_| ParseError::WitnessHeaderError)?;
    let expected_len = n8 as u64 * witness_len as u64;
    if sec2_len != expected_len {
        return Err(ParseError::SectionLengthError {
            expected: expected_len,
            found: sec2_len,
        });
    }

    let mut witness = Vec::with_capacity(witness_len as usize);
    for _ in 0..witness_len {
        let mut buf = vec![0u8; n8 as usize];
        cur.read_exact(&mut buf)
            .map_err(|_| ParseError::WitnessHeaderError)?;
        witness.push(from_le_bytes(&buf));
    }

    Ok((witness, prime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        let witness = vec![BigInt::from(1), BigInt::from(33), BigInt::from(u64::MAX)];
        let raw = write_raw(&witness, 8);
        assert_eq!(raw.len(), witness.len() * 32);
        for (i, w) in witness.iter().enumerate() {
            let chunk = &raw[i * 32..(i + 1) * 32];
            assert_eq!(&from_le_bytes(chunk), w);
        }
    }

    #[test]
    fn wtns_round_trip() {
        let prime = BigInt::parse_bytes(
            b"21888242871839275222246405745257275088548364400416034343698204186575808495617",
            10,
        )
        .unwrap();
        let witness = vec![BigInt::from(1), BigInt::from(42), BigInt::from(0)];
        let bytes = write_wtns(&witness, 8, &prime);
        let (read_back, read_prime) = read_wtns(&bytes).unwrap();
        assert_eq!(read_back, witness);
        assert_eq!(read_prime, prime);
    }

    #[test]
    fn wtns_rejects_bad_magic() {
        let bytes = vec![0u8; 64];
        assert!(matches!(
            read_wtns(&bytes),
            Err(ParseError::WitnessHeaderError)
        ));
    }
}
