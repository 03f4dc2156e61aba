// Copyright (c) 2021 Georgios Konstantopoulos
// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! WASM engine abstraction.
//!
//! The witness calculator only needs four capabilities from a WASM runtime:
//! compile bytes into a module, instantiate it while wiring the guest's
//! `runtime` imports to a shared [`GuestState`], look up an export by name,
//! and invoke an export with `i32` arguments. [`WasmEngine`] draws that
//! boundary narrowly enough that a second runtime could be slotted in
//! without touching [`crate::witness::WitnessCalculator`]; [`WasmerEngine`]
//! is the one implementation the core ships, matching the teacher's stack.

use crate::error::AbiError;
use std::sync::{Arc, Mutex};

/// Transient, per-instance state the guest's `runtime` imports mutate and
/// the calculator inspects after each call returns. Guest callbacks must
/// never fail or unwind (some runtimes, wasmer included, do not tolerate a
/// host import erroring mid-call) — they only ever latch state here.
#[derive(Debug, Default)]
pub struct GuestState {
    /// `(code, printed error context)` latched by `exceptionHandler`, after
    /// `printErrorMessage` has drained any pending message into it.
    pub exception: Option<(i32, String)>,
    /// Accumulated printed-error text, drained via `getMessageChar` on
    /// `printErrorMessage` and cleared once consumed by `exceptionHandler`.
    pub error_buf: String,
    /// The current, not-yet-terminated guest log line.
    pub log_line: String,
    /// Complete log lines, emitted once `writeBufferMessage` sees `"\n"`.
    pub log_lines: Vec<String>,
}

impl GuestState {
    pub fn reset(&mut self) {
        self.exception = None;
        self.error_buf.clear();
        self.log_line.clear();
        self.log_lines.clear();
    }
}

pub type SharedGuestState = Arc<Mutex<GuestState>>;

/// A narrow handle to a compiled, instantiated guest: look up exports by
/// name and invoke them with `i32` arguments.
pub trait GuestInstance {
    fn has_export(&mut self, name: &str) -> bool;
    fn invoke(&mut self, name: &str, args: &[i32]) -> Result<Vec<i32>, AbiError>;
}

/// Compiles and instantiates Circom-2 WASM modules, wiring their `runtime`
/// imports to a caller-supplied [`GuestState`].
pub trait WasmEngine {
    type Instance: GuestInstance;

    fn instantiate(&self, wasm_bytes: &[u8], state: SharedGuestState) -> Result<Self::Instance, AbiError>;
}

mod wasmer_engine {
    use super::*;
    use wasmer::{
        imports, Function, FunctionEnv, FunctionEnvMut, Instance, Memory, MemoryType, Module,
        Store,
    };

    /// The one WASM runtime the core ships an implementation for.
    #[derive(Default)]
    pub struct WasmerEngine;

    pub struct WasmerGuest {
        store: Store,
        instance: Instance,
    }

    impl GuestInstance for WasmerGuest {
        fn has_export(&mut self, name: &str) -> bool {
            self.instance.exports.get_function(name).is_ok()
        }

        fn invoke(&mut self, name: &str, args: &[i32]) -> Result<Vec<i32>, AbiError> {
            let func = self
                .instance
                .exports
                .get_function(name)
                .map_err(|_| AbiError::MissingExport(name.to_string()))?;
            let wasm_args: Vec<wasmer::Value> = args.iter().map(|v| wasmer::Value::I32(*v)).collect();
            let results = func.call(&mut self.store, &wasm_args).map_err(|e| AbiError::Runtime {
                name: name.to_string(),
                source: anyhow::Error::from(e),
            })?;
            Ok(results.iter().map(|v| v.unwrap_i32()).collect())
        }
    }

    /// Environment captured by the `runtime` host functions: the shared
    /// guest state to latch into, plus a handle back into the instance so
    /// `printErrorMessage`/`showSharedRWMemory` can call the guest's own
    /// exports (`getMessageChar`, `readSharedRWMemory`) to drain data. The
    /// instance handle is filled in once instantiation completes, since the
    /// imports must be built before the instance they close over exists.
    struct HostEnv {
        state: SharedGuestState,
        instance: Option<Instance>,
    }

    impl WasmEngine for WasmerEngine {
        type Instance = WasmerGuest;

        fn instantiate(&self, wasm_bytes: &[u8], state: SharedGuestState) -> Result<Self::Instance, AbiError> {
            let mut store = Store::default();
            let module = Module::new(&store, wasm_bytes).map_err(|e| AbiError::Compile(anyhow::Error::from(e)))?;

            let memory = Memory::new(&mut store, MemoryType::new(2000, Some(100_000), false))
                .map_err(|e| AbiError::Instantiate(anyhow::Error::from(e)))?;

            let env = FunctionEnv::new(
                &mut store,
                HostEnv {
                    state: state.clone(),
                    instance: None,
                },
            );

            let import_object = imports! {
                "env" => {
                    "memory" => memory.clone(),
                },
                "runtime" => {
                    "exceptionHandler" => Function::new_typed_with_env(&mut store, &env, exception_handler),
                    "printErrorMessage" => Function::new_typed_with_env(&mut store, &env, print_error_message),
                    "writeBufferMessage" => Function::new_typed_with_env(&mut store, &env, write_buffer_message),
                    "showSharedRWMemory" => Function::new_typed_with_env(&mut store, &env, show_shared_rw_memory),
                    "log" => Function::new_typed(&mut store, |_: i32| {}),
                },
            };

            let instance = Instance::new(&mut store, &module, &import_object)
                .map_err(|e| AbiError::Instantiate(anyhow::Error::from(e)))?;

            env.as_mut(&mut store).instance = Some(instance.clone());

            Ok(WasmerGuest { store, instance })
        }
    }

    fn exception_handler(mut env: FunctionEnvMut<HostEnv>, code: i32) {
        let printed = std::mem::take(&mut env.data_mut().state.lock().unwrap().error_buf);
        let mut state = env.data().state.lock().unwrap();
        state.exception = Some((code, printed));
    }

    /// Drain one pending message from the guest by popping bytes off
    /// `getMessageChar` until a `0` terminator.
    fn drain_message(env: &mut FunctionEnvMut<HostEnv>) -> String {
        let (data, mut store) = env.data_and_store_mut();
        let instance = data.instance.clone().expect("instance set");
        let get_char = match instance.exports.get_function("getMessageChar") {
            Ok(f) => f,
            Err(_) => return String::new(),
        };
        let mut msg = String::new();
        loop {
            let res = match get_char.call(&mut store, &[]) {
                Ok(r) => r,
                Err(_) => break,
            };
            let byte = res.first().map(|v| v.unwrap_i32()).unwrap_or(0);
            if byte == 0 {
                break;
            }
            msg.push(byte as u8 as char);
        }
        msg
    }

    fn print_error_message(mut env: FunctionEnvMut<HostEnv>) {
        let msg = drain_message(&mut env);
        let data = env.data();
        data.state.lock().unwrap().error_buf.push_str(&msg);
    }

    fn write_buffer_message(mut env: FunctionEnvMut<HostEnv>) {
        let msg = drain_message(&mut env);
        let data = env.data();
        let mut state = data.state.lock().unwrap();
        // A `log()` call always ends with a lone `"\n"` message, at which
        // point the accumulated line is complete; any other message is
        // appended (space-separated) to the line still being built.
        if msg == "\n" {
            let line = std::mem::take(&mut state.log_line);
            state.log_lines.push(line);
        } else {
            if !state.log_line.is_empty() {
                state.log_line.push(' ');
            }
            state.log_line.push_str(&msg);
        }
    }

    fn show_shared_rw_memory(mut env: FunctionEnvMut<HostEnv>) {
        let (data, mut store) = env.data_and_store_mut();
        let instance = data.instance.clone().expect("instance set");
        let n32 = match instance.exports.get_function("getFieldNumLen32") {
            Ok(f) => f
                .call(&mut store, &[])
                .ok()
                .and_then(|r| r.first().map(|v| v.unwrap_i32()))
                .unwrap_or(0),
            Err(_) => 0,
        };
        let read = match instance.exports.get_function("readSharedRWMemory") {
            Ok(f) => f,
            Err(_) => return,
        };
        let mut limbs = vec![0u32; n32 as usize];
        for i in 0..n32 {
            let v = read
                .call(&mut store, &[wasmer::Value::I32(i)])
                .ok()
                .and_then(|r| r.first().map(|v| v.unwrap_i32()))
                .unwrap_or(0);
            limbs[(n32 - 1 - i) as usize] = v as u32;
        }
        let value = crate::witness::region_to_bigint(&limbs);
        let data = env.data();
        data.state.lock().unwrap().log_line.push_str(&value.to_string());
    }
}

pub use wasmer_engine::{WasmerEngine, WasmerGuest};
