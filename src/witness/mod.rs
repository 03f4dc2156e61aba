// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! # Witness module
//!
//! Drives a Circom-2 WASM guest to compute a circuit's witness vector from a
//! JSON input assignment, and frames the result as either raw little-endian
//! bytes or a section-tagged `wtns` container.
//!
//! - `abi`: the Circom-2 guest export surface, generic over any engine.
//! - `calculator`: owns one guest instance and drives `Calculate`.
//! - `frame`: the raw and `wtns` v2 binary encodings, read and write.

mod abi;
mod calculator;
mod frame;

pub use calculator::WitnessCalculator;
pub use frame::{read_wtns, write_raw, write_wtns};

use num_bigint::BigInt;

/// Interpret an array of `n32` 32-bit words, most-significant word first, as
/// a big integer.
///
/// This is *not* the order words actually occupy in the shared RW memory
/// region. The guest's own limbs are little-endian, and `readSharedRWMemory`/
/// `writeSharedRWMemory` address that same little-endian layout directly
/// (index `j` is the `j`-th least-significant word) — so the host must
/// reverse limb index when copying between the region and an
/// MSB-first array: `region[j]` holds `words[n32-1-j]` (§4.4). See
/// [`read_region`]/[`write_region`], which perform that reversal.
pub(crate) fn region_to_bigint(words_msb_first: &[u32]) -> BigInt {
    let mut bytes_be = Vec::with_capacity(words_msb_first.len() * 4);
    for w in words_msb_first {
        bytes_be.extend_from_slice(&w.to_be_bytes());
    }
    BigInt::from_bytes_be(num_bigint::Sign::Plus, &bytes_be)
}

/// Inverse of [`region_to_bigint`]: encode `v` as `n32` big-endian 32-bit
/// words, ready to be handed to [`write_region`].
pub(crate) fn bigint_to_region(v: &BigInt, n32: usize) -> Vec<u32> {
    let (_, bytes_be) = v.to_bytes_be();
    let mut padded = vec![0u8; n32 * 4];
    let start = padded.len().saturating_sub(bytes_be.len());
    let copy_len = bytes_be.len().min(padded.len());
    padded[start..].copy_from_slice(&bytes_be[bytes_be.len() - copy_len..]);
    padded
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Read `n32` words out of the shared RW memory region via `read`
/// (typically `readSharedRWMemory`), reversing limb index so the result is
/// most-significant-word-first and can be handed to [`region_to_bigint`].
pub(crate) fn read_region<E>(n32: u32, mut read: impl FnMut(u32) -> Result<u32, E>) -> Result<Vec<u32>, E> {
    let mut words = vec![0u32; n32 as usize];
    for j in 0..n32 {
        words[(n32 - 1 - j) as usize] = read(j)?;
    }
    Ok(words)
}

/// Write an MSB-first word array (as produced by [`bigint_to_region`]) into
/// the shared RW memory region via `write` (typically
/// `writeSharedRWMemory`), reversing limb index to match the region's
/// little-endian layout.
pub(crate) fn write_region<E>(words: &[u32], mut write: impl FnMut(u32, u32) -> Result<(), E>) -> Result<(), E> {
    let n32 = words.len() as u32;
    for j in 0..n32 {
        write(j, words[(n32 - 1 - j) as usize])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_roundtrip() {
        let v = BigInt::from(0x1234_5678_9abc_def0u64);
        let words = bigint_to_region(&v, 8);
        assert_eq!(region_to_bigint(&words), v);
    }

    #[test]
    fn region_roundtrip_zero() {
        let v = BigInt::from(0u32);
        let words = bigint_to_region(&v, 8);
        assert!(words.iter().all(|&w| w == 0));
        assert_eq!(region_to_bigint(&words), v);
    }

    /// A known vector: region index 0 holds the least-significant word, so
    /// reading raw region words `[0x00000002, 0x00000001]` (n32 = 2) must
    /// reconstruct `0x00000001_00000002`, matching the teacher's
    /// `arr[n32-1-j] = readSharedRWMemory(j)` convention.
    #[test]
    fn read_region_known_vector() {
        let raw_region = [0x0000_0002u32, 0x0000_0001u32];
        let words = read_region::<std::convert::Infallible>(2, |j| Ok(raw_region[j as usize])).unwrap();
        assert_eq!(words, vec![0x0000_0001, 0x0000_0002]);
        assert_eq!(region_to_bigint(&words), BigInt::from(0x0000_0001_0000_0002u64));
    }

    #[test]
    fn write_region_known_vector() {
        let mut raw_region = [0u32; 2];
        let words = bigint_to_region(&BigInt::from(0x0000_0001_0000_0002u64), 2);
        write_region::<std::convert::Infallible>(&words, |j, v| {
            raw_region[j as usize] = v;
            Ok(())
        })
        .unwrap();
        assert_eq!(raw_region, [0x0000_0002, 0x0000_0001]);
    }
}
