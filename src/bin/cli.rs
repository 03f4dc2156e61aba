// Copyright (c) Lurk Lab
// SPDX-License-Identifier: MIT
//! Thin `witness`/`verify` front-end over the library (§6.4).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use circom_groth16::config::WitnessCalculatorOptions;
use circom_groth16::engine::WasmerEngine;
use circom_groth16::input::parse_inputs;
use circom_groth16::verifier::verify_json;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "circom-groth16", about = "Circom-2 witness calculation and Groth16 verification")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the witness calculator over a compiled Circom-2 WASM module.
    Witness {
        #[arg(long)]
        wasm: PathBuf,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Wtns)]
        format: Format,
        #[arg(long)]
        sanity_check: bool,
    },
    /// Verify a Groth16 proof against a verification key and public signals.
    Verify {
        #[arg(long)]
        vk: PathBuf,
        #[arg(long)]
        proof: PathBuf,
        #[arg(long)]
        public: PathBuf,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum Format {
    Raw,
    Wtns,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Witness {
            wasm,
            input,
            output,
            format,
            sanity_check,
        } => {
            let wasm_bytes = fs::read(&wasm)?;
            let input_json = fs::read(&input)?;
            let inputs = parse_inputs(&input_json)?;

            let mut calculator = WitnessCalculatorOptions::new()
                .engine(WasmerEngine)
                .build(&wasm_bytes)?;

            let (bytes, default_name) = match format {
                Format::Raw => (
                    calculator.calculate_bin_witness(&inputs, sanity_check)?,
                    "witness.bin",
                ),
                Format::Wtns => (
                    calculator.calculate_wtns_bin(&inputs, sanity_check)?,
                    "witness.wtns",
                ),
            };
            let output = output.unwrap_or_else(|| PathBuf::from(default_name));
            fs::write(output, bytes)?;
            Ok(())
        }
        Command::Verify { vk, proof, public } => {
            let vk_json = fs::read(&vk)?;
            let proof_json = fs::read(&proof)?;
            let public_json = fs::read(&public)?;
            verify_json(&vk_json, &proof_json, &public_json)?;
            Ok(())
        }
    }
}
