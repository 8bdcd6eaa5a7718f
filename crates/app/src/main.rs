//! huffpack: command-line canonical Huffman compressor.
//!
//! The binary is a thin collaborator around `huffpack-core`: it opens the
//! streams, runs the requested operation, and maps any codec error to a
//! mode-qualified message and a non-zero exit status. Partially written
//! output files are left on disk for the caller to inspect or remove.

mod config;
mod sample;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::process::ExitCode;

use config::{Config, Mode};
use huffpack_core::codec;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("huffpack: {msg}");
            eprintln!("try 'huffpack --help'");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), String> {
    match config.mode {
        Mode::Encode => {
            let stats = encode_file(config).map_err(|e| format!("Encoding failed: {e}"))?;
            if config.print_stats {
                let ratio = if stats.input_bytes > 0 {
                    stats.output_bytes as f64 / stats.input_bytes as f64
                } else {
                    f64::NAN
                };
                println!(
                    "encoded {} -> {} bytes (ratio {:.3})",
                    stats.input_bytes, stats.output_bytes, ratio
                );
            }
        }
        Mode::Decode => {
            let stats = decode_file(config).map_err(|e| format!("Decoding failed: {e}"))?;
            if config.print_stats {
                println!("decoded {} bytes", stats.output_bytes);
            }
        }
        Mode::Sample => {
            sample::write_sample(&config.output_file, config.seed, config.sample_bytes)
                .map_err(|e| format!("Sample generation failed: {e}"))?;
            if config.print_stats {
                println!(
                    "wrote {} sample bytes (seed {})",
                    config.sample_bytes, config.seed
                );
            }
        }
    }
    Ok(())
}

fn encode_file(config: &Config) -> Result<codec::EncodeStats, huffpack_core::Error> {
    // The encoder seeks back to the start between its two passes, so the
    // input is handed over unbuffered.
    let input_path = config.input_file.as_ref().expect("checked during parsing");
    let mut input = File::open(input_path)?;
    let output = BufWriter::new(File::create(&config.output_file)?);
    codec::encode(&mut input, output)
}

fn decode_file(config: &Config) -> Result<codec::DecodeStats, huffpack_core::Error> {
    let input_path = config.input_file.as_ref().expect("checked during parsing");
    let input = BufReader::new(File::open(input_path)?);
    let mut output = BufWriter::new(File::create(&config.output_file)?);
    codec::decode(input, &mut output)
}
