// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! Drives one Circom-2 WASM guest instance through `Calculate` and its three
//! consumer operations (`CalculateWitness`, `CalculateBinWitness`,
//! `CalculateWTNSBin`).

use super::abi::Circom2Abi;
use super::frame::{write_raw, write_wtns};
use super::{bigint_to_region, read_region, region_to_bigint, write_region};
use crate::engine::{GuestInstance, GuestState, SharedGuestState, WasmEngine};
use crate::error::{AbiError, CircuitError, Error};
use crate::fnv::hash_signal_name;
use crate::input::{reduce_mod, InputValue};
use num_bigint::BigInt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Owns one compiled-and-instantiated Circom-2 guest and the metadata
/// queried from it at construction time. Calculation mutates the guest's
/// linear memory in place, so `calculate` takes `&mut self`: the borrow
/// checker statically forbids two overlapping calculations on the same
/// instance. Share one calculator across threads that take turns with a
/// `Mutex<WitnessCalculator>`.
pub struct WitnessCalculator<G> {
    instance: G,
    state: SharedGuestState,
    n32: u32,
    witness_size: u32,
    input_size: u32,
    version: u32,
    prime: BigInt,
}

impl<G: GuestInstance> WitnessCalculator<G> {
    /// Compile and instantiate `wasm_bytes` with `engine`, then query and
    /// cache the metadata `Calculate` needs on every call.
    pub fn new<E: WasmEngine<Instance = G>>(engine: &E, wasm_bytes: &[u8]) -> Result<Self, Error> {
        let state: SharedGuestState = Arc::new(Mutex::new(GuestState::default()));
        let mut instance = engine.instantiate(wasm_bytes, state.clone())?;

        instance.init(true)?;
        let version = instance.get_version()?;
        let n32 = instance.get_field_num_len32()?;
        let witness_size = instance.get_witness_size()?;
        let input_size = instance.get_input_size()?;

        instance.get_raw_prime()?;
        let prime_words = read_region(n32, |j| instance.read_shared_rw_memory(j))?;
        let prime = region_to_bigint(&prime_words);

        Ok(WitnessCalculator {
            instance,
            state,
            n32,
            witness_size,
            input_size,
            version,
            prime,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn field_num_len32(&self) -> u32 {
        self.n32
    }

    pub fn witness_size(&self) -> u32 {
        self.witness_size
    }

    pub fn prime(&self) -> &BigInt {
        &self.prime
    }

    /// Run `Calculate` and return the witness vector as big integers.
    pub fn calculate_witness(
        &mut self,
        inputs: &HashMap<String, InputValue>,
        sanity_check: bool,
    ) -> Result<Vec<BigInt>, Error> {
        self.state.lock().unwrap().reset();
        self.instance.init(sanity_check)?;

        let mut inputs_set = 0u32;
        for (name, value) in inputs {
            let (hmsb, hlsb) = hash_signal_name(name);
            let flattened = value.flatten();

            if let Some(expected) = self.instance.get_input_signal_size(hmsb, hlsb)? {
                if expected < 0 {
                    return Err(AbiError::SignalNotFound(name.clone()).into());
                }
                if expected as usize != flattened.len() {
                    return Err(AbiError::SignalSizeMismatch {
                        name: name.clone(),
                        expected: expected as u32,
                        found: flattened.len() as u32,
                    }
                    .into());
                }
            }

            for (i, raw_value) in flattened.iter().enumerate() {
                let reduced = reduce_mod(raw_value, &self.prime);
                let words = bigint_to_region(&reduced, self.n32 as usize);
                write_region(&words, |j, v| self.instance.write_shared_rw_memory(j, v))?;
                self.instance.set_input_signal(hmsb, hlsb, i as u32)?;
                inputs_set += 1;
            }

            if let Some(exc) = self.take_exception() {
                return Err(exc.into());
            }
        }

        if inputs_set != self.input_size {
            return Err(AbiError::InputSizeMismatch(inputs_set, self.input_size).into());
        }

        let mut witness = Vec::with_capacity(self.witness_size as usize);
        for i in 0..self.witness_size {
            self.instance.get_witness(i)?;
            if let Some(exc) = self.take_exception() {
                return Err(exc.into());
            }
            let words = read_region(self.n32, |j| self.instance.read_shared_rw_memory(j))?;
            witness.push(region_to_bigint(&words));
        }

        if let Some(exc) = self.take_exception() {
            return Err(exc.into());
        }

        self.flush_guest_log();
        Ok(witness)
    }

    /// Concatenate each witness element as a fixed-width `n8`-byte
    /// little-endian block, with no header.
    pub fn calculate_bin_witness(
        &mut self,
        inputs: &HashMap<String, InputValue>,
        sanity_check: bool,
    ) -> Result<Vec<u8>, Error> {
        let witness = self.calculate_witness(inputs, sanity_check)?;
        Ok(write_raw(&witness, self.n32 as usize))
    }

    /// Emit the `wtns` v2 section-tagged container (§4.5).
    pub fn calculate_wtns_bin(
        &mut self,
        inputs: &HashMap<String, InputValue>,
        sanity_check: bool,
    ) -> Result<Vec<u8>, Error> {
        let witness = self.calculate_witness(inputs, sanity_check)?;
        Ok(write_wtns(&witness, self.n32 as usize, &self.prime))
    }

    fn take_exception(&self) -> Option<CircuitError> {
        let mut state = self.state.lock().unwrap();
        let (code, printed) = state.exception.take()?;
        let log_line = state.log_lines.join("\n");
        let err = CircuitError::from_code(code, &printed, &log_line);
        log::warn!("latched guest exception: {err}");
        Some(err)
    }

    /// Emit every complete guest log line accumulated this calculation.
    fn flush_guest_log(&self) {
        for line in &self.state.lock().unwrap().log_lines {
            log::debug!("guest: {line}");
        }
    }
}
