// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! The Circom-2 guest export surface, as a trait over anything implementing
//! [`GuestInstance`]. Blanket-implemented so any conforming WASM engine
//! automatically gets the Circom-2 ABI for free.

use crate::engine::GuestInstance;
use crate::error::AbiError;

pub(crate) trait Circom2Abi {
    fn init(&mut self, sanity_check: bool) -> Result<(), AbiError>;
    fn get_field_num_len32(&mut self) -> Result<u32, AbiError>;
    fn get_input_size(&mut self) -> Result<u32, AbiError>;
    /// `getInputSignalSize` is absent on pre-v2.0.4 guests; `None` means the
    /// export simply doesn't exist, distinct from the guest returning `< 0`
    /// for "signal not found" (which is surfaced as `Ok(Some(n))`, `n < 0`).
    fn get_input_signal_size(&mut self, hmsb: u32, hlsb: u32) -> Result<Option<i32>, AbiError>;
    fn get_raw_prime(&mut self) -> Result<(), AbiError>;
    fn get_version(&mut self) -> Result<u32, AbiError>;
    fn get_witness_size(&mut self) -> Result<u32, AbiError>;
    fn get_witness(&mut self, i: u32) -> Result<(), AbiError>;
    fn set_input_signal(&mut self, hmsb: u32, hlsb: u32, idx: u32) -> Result<(), AbiError>;
    fn read_shared_rw_memory(&mut self, i: u32) -> Result<u32, AbiError>;
    fn write_shared_rw_memory(&mut self, i: u32, v: u32) -> Result<(), AbiError>;
}

impl<G: GuestInstance> Circom2Abi for G {
    fn init(&mut self, sanity_check: bool) -> Result<(), AbiError> {
        self.invoke("init", &[i32::from(sanity_check)])?;
        Ok(())
    }

    fn get_field_num_len32(&mut self) -> Result<u32, AbiError> {
        Ok(self.invoke("getFieldNumLen32", &[])?[0] as u32)
    }

    fn get_input_size(&mut self) -> Result<u32, AbiError> {
        Ok(self.invoke("getInputSize", &[])?[0] as u32)
    }

    fn get_input_signal_size(&mut self, hmsb: u32, hlsb: u32) -> Result<Option<i32>, AbiError> {
        if !self.has_export("getInputSignalSize") {
            return Ok(None);
        }
        let result = self.invoke("getInputSignalSize", &[hmsb as i32, hlsb as i32])?;
        Ok(Some(result[0]))
    }

    fn get_raw_prime(&mut self) -> Result<(), AbiError> {
        self.invoke("getRawPrime", &[])?;
        Ok(())
    }

    fn get_version(&mut self) -> Result<u32, AbiError> {
        if !self.has_export("getVersion") {
            return Ok(1);
        }
        Ok(self.invoke("getVersion", &[])?[0] as u32)
    }

    fn get_witness_size(&mut self) -> Result<u32, AbiError> {
        Ok(self.invoke("getWitnessSize", &[])?[0] as u32)
    }

    fn get_witness(&mut self, i: u32) -> Result<(), AbiError> {
        self.invoke("getWitness", &[i as i32])?;
        Ok(())
    }

    fn set_input_signal(&mut self, hmsb: u32, hlsb: u32, idx: u32) -> Result<(), AbiError> {
        self.invoke("setInputSignal", &[hmsb as i32, hlsb as i32, idx as i32])?;
        Ok(())
    }

    fn read_shared_rw_memory(&mut self, i: u32) -> Result<u32, AbiError> {
        Ok(self.invoke("readSharedRWMemory", &[i as i32])?[0] as u32)
    }

    fn write_shared_rw_memory(&mut self, i: u32, v: u32) -> Result<(), AbiError> {
        self.invoke("writeSharedRWMemory", &[i as i32, v as i32])?;
        Ok(())
    }
}
