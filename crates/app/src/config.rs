//! Configuration for the huffpack command-line tool.
//!
//! Parses the operating mode and file paths from the argument list. The
//! tool stays deliberately thin: it opens streams, hands them to the
//! codec, and maps failures to exit status; it never inspects codec
//! internals.

use std::path::PathBuf;

/// What the invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compress `--in` into `--out`
    Encode,
    /// Decompress `--in` into `--out`
    Decode,
    /// Write a deterministic mixed-compressibility test file to `--out`
    Sample,
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,

    /// Input file path (unused by `sample`)
    pub input_file: Option<PathBuf>,

    /// Output file path
    pub output_file: PathBuf,

    /// Seed for sample generation
    pub seed: u64,

    /// Size in bytes for sample generation
    pub sample_bytes: usize,

    /// Whether to print byte counts and ratio after a successful run
    pub print_stats: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (without argv[0]).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut mode: Option<Mode> = None;
        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut sample_bytes: Option<usize> = None;
        let mut print_stats = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "encode" | "decode" | "sample" if mode.is_none() && i == 0 => {
                    mode = Some(match args[i].as_str() {
                        "encode" => Mode::Encode,
                        "decode" => Mode::Decode,
                        _ => Mode::Sample,
                    });
                }
                "--in" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--in requires a path".to_string());
                    }
                    input_file = Some(PathBuf::from(&args[i]));
                }
                "--out" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--out requires a path".to_string());
                    }
                    output_file = Some(PathBuf::from(&args[i]));
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--size requires a number".to_string());
                    }
                    sample_bytes = Some(args[i].parse().map_err(|_| "invalid size")?);
                }
                "--quiet" => {
                    print_stats = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    return Err(format!("unknown argument: {other}"));
                }
            }
            i += 1;
        }

        let mode = mode.ok_or("missing mode: expected encode, decode or sample")?;
        if matches!(mode, Mode::Encode | Mode::Decode) && input_file.is_none() {
            return Err("--in is required for encode and decode".to_string());
        }
        let output_file = output_file.ok_or("--out is required")?;

        Ok(Config {
            mode,
            input_file,
            output_file,
            seed: seed.unwrap_or(0),
            sample_bytes: sample_bytes.unwrap_or(1 << 20),
            print_stats,
        })
    }
}

fn print_help() {
    println!("huffpack: canonical Huffman file compressor");
    println!();
    println!("USAGE:");
    println!("    huffpack <MODE> [OPTIONS]");
    println!();
    println!("MODES:");
    println!("    encode                  Compress --in into --out");
    println!("    decode                  Decompress --in into --out");
    println!("    sample                  Generate a test file at --out");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>             Input file");
    println!("    --out <PATH>            Output file (required)");
    println!("    --seed <N>              Sample generation seed (default: 0)");
    println!("    --size <N>              Sample size in bytes (default: 1 MiB)");
    println!("    --quiet                 Suppress the stats line");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    huffpack encode --in notes.txt --out notes.hp");
    println!("    huffpack decode --in notes.hp --out notes.txt");
    println!("    huffpack sample --seed 42 --size 65536 --out sample.bin");
    println!();
}
