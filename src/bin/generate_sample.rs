//! Writes a deterministic `sample_students.csv` for trying out the viewer.
//!
//! Usage: `cargo run --bin generate_sample [OUTPUT]`

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct StudentRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Math")]
    math: Option<f64>,
    #[serde(rename = "Science")]
    science: Option<f64>,
    #[serde(rename = "English")]
    english: Option<f64>,
    #[serde(rename = "History")]
    history: Option<f64>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// A score around the student's ability, clamped to 0–100 and rounded.
/// About one cell in twenty is left empty.
fn score(rng: &mut SimpleRng, ability: f64, difficulty: f64) -> Option<f64> {
    if rng.next_f64() < 0.05 {
        return None;
    }
    let raw = rng.gauss(ability - difficulty, 8.0);
    Some(raw.clamp(0.0, 100.0).round())
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_students.csv".to_string());

    let mut rng = SimpleRng::new(42);

    let first = ["Alice", "Bob", "Carol", "Dan", "Eve", "Farah", "Gus", "Hana", "Ivan", "Jia"];
    let last = ["Smith", "Okafor", "Nguyen", "Garcia", "Kowalski"];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut count = 0;
    for l in &last {
        for f in &first {
            let ability = rng.gauss(68.0, 14.0);
            writer.serialize(StudentRow {
                name: format!("{f} {l}"),
                math: score(&mut rng, ability, 4.0),
                science: score(&mut rng, ability, 0.0),
                english: score(&mut rng, ability, -3.0),
                history: score(&mut rng, ability, 1.0),
            })?;
            count += 1;
        }
    }
    writer.flush().context("flushing CSV writer")?;

    println!("Wrote {count} students to {output_path}");
    Ok(())
}
