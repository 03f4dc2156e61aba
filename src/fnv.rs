// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! FNV-1a/64 signal-name hashing, split into the (MSB, LSB) halves the
//! Circom-2 ABI addresses signals by.

use fnv::FnvHasher;
use std::hash::Hasher;

/// Hash `name` with FNV-1a/64 and split the digest into its upper and lower
/// 32-bit halves, the form `setInputSignal`/`getInputSignalSize` expect.
pub(crate) fn hash_signal_name(name: &str) -> (u32, u32) {
    let mut hasher = FnvHasher::default();
    hasher.write(name.as_bytes());
    let h = hasher.finish();

    ((h >> 32) as u32, h as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answer() {
        // FNV-1a/64 of "main": offset 0xcbf29ce484222325, prime 0x100000001b3.
        assert_eq!(hash_signal_name("main"), (0x1f5962a2, 0xce9803c8));
    }

    #[test]
    fn distinct_names_hash_differently() {
        assert_ne!(hash_signal_name("a"), hash_signal_name("b"));
    }
}
