//! Deterministic test-file generation.
//!
//! `huffpack sample` writes files with a mix of compressibility so the
//! codec's behavior is visible: long runs compress to almost nothing,
//! text-like sections land in the middle, and random sections show the
//! fixed header overhead. Runs are reproducible from the seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::Path;

/// Generate `size_bytes` of mixed-compressibility data from `seed`.
pub fn generate(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let section = (size_bytes - data.len()).min(rng.gen_range(1024..=16384));
        match rng.gen_range(0..4u8) {
            // Runs of a single byte: near-degenerate alphabet.
            0 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(section));
            }
            // Skewed small alphabet, roughly text-shaped.
            1 => {
                let alphabet = b"etaoin shrdlu.,\n";
                for _ in 0..section {
                    // Squaring biases the draw toward the front letters.
                    let r: f64 = rng.gen();
                    let idx = ((r * r) * alphabet.len() as f64) as usize;
                    data.push(alphabet[idx.min(alphabet.len() - 1)]);
                }
            }
            // Short repeating pattern.
            2 => {
                let pattern: Vec<u8> = (0..rng.gen_range(3..=24)).map(|_| rng.gen()).collect();
                for i in 0..section {
                    data.push(pattern[i % pattern.len()]);
                }
            }
            // Uniform random bytes: incompressible.
            _ => {
                for _ in 0..section {
                    data.push(rng.gen());
                }
            }
        }
    }

    data.truncate(size_bytes);
    data
}

/// Generate and write a sample file.
pub fn write_sample(path: &Path, seed: u64, size_bytes: usize) -> std::io::Result<()> {
    let data = generate(seed, size_bytes);
    let mut file = std::fs::File::create(path)?;
    file.write_all(&data)?;
    Ok(())
}
