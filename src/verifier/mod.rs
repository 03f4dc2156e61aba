// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! Groth16 proof verification on BN254.
//!
//! - `parser`: decodes verification-key, proof, and public-signal JSON.
//! - `groth16`: the IC-length check and the pairing check itself.

mod groth16;
mod parser;

pub use groth16::verify;
pub use parser::{parse_proof, parse_public_signals, parse_verifying_key};

use crate::error::Error;

/// Parse a verification key, a proof, and a public-signals array from JSON
/// and run the full verification (§4.6).
pub fn verify_json(vk_json: &[u8], proof_json: &[u8], public_json: &[u8]) -> Result<(), Error> {
    let vk = parse_verifying_key(vk_json)?;
    let proof = parse_proof(proof_json)?;
    let public_signals = parse_public_signals(public_json)?;
    verify(&vk, &proof, &public_signals)
}
