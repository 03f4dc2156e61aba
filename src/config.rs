// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! Builder for constructing a [`WitnessCalculator`](crate::witness::WitnessCalculator):
//! composes the WASM engine selection and the default sanity-check flag,
//! mirroring the teacher's `CircomConfig` (§4.8).

use crate::engine::WasmEngine;
use crate::error::{AbiError, Error};
use crate::witness::WitnessCalculator;

/// Incrementally-built configuration for a witness calculator. `engine` is
/// required; `new` fails at construction time rather than falling back to a
/// silent default when it is missing.
pub struct WitnessCalculatorOptions<E> {
    engine: Option<E>,
    sanity_check: bool,
}

impl<E> Default for WitnessCalculatorOptions<E> {
    fn default() -> Self {
        WitnessCalculatorOptions {
            engine: None,
            sanity_check: false,
        }
    }
}

impl<E: WasmEngine> WitnessCalculatorOptions<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the WASM engine to compile and instantiate the guest with.
    pub fn engine(mut self, engine: E) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the default `sanityCheck` flag threaded to `init` when a caller
    /// does not override it on an individual `calculate_*` call.
    pub fn sanity_check(mut self, sanity_check: bool) -> Self {
        self.sanity_check = sanity_check;
        self
    }

    /// Compile and instantiate `wasm_bytes`, returning a calculator ready to
    /// run `Calculate`. Fails if no engine was set.
    pub fn build(self, wasm_bytes: &[u8]) -> Result<WitnessCalculator<E::Instance>, Error> {
        let engine = self.engine.ok_or(AbiError::NoEngineSet)?;
        WitnessCalculator::new(&engine, wasm_bytes)
    }

    pub fn default_sanity_check(&self) -> bool {
        self.sanity_check
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WasmerEngine;

    #[test]
    fn missing_engine_is_a_construction_error() {
        let opts: WitnessCalculatorOptions<WasmerEngine> = WitnessCalculatorOptions::new();
        let err = opts.build(&[]).unwrap_err();
        assert!(matches!(err, Error::Abi(AbiError::NoEngineSet)));
    }
}
