// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! Witness calculation for Circom-2 WebAssembly circuits, and Groth16 proof
//! verification on BN254.
//!
//! Two independent subsystems, composable but usable on their own:
//!
//! - [`witness`] drives a Circom-2 guest through a [`config::WitnessCalculatorOptions`]
//!   to compute a witness vector from a JSON input assignment.
//! - [`verifier`] checks a Groth16 proof against a verification key and a
//!   vector of public signals, both decoded from the reference JSON
//!   encoding.
//!
//! Proof generation is out of scope: it is a native, pairing-heavy
//! computation left to an external prover, with [`verifier`] and
//! [`witness::write_wtns`] producing the inputs such a prover would consume.

pub mod config;
pub mod engine;
pub mod error;
pub(crate) mod fnv;
pub mod input;
pub mod verifier;
pub mod witness;

pub use error::{Error, Result};
pub use input::InputValue;
pub use witness::WitnessCalculator;
