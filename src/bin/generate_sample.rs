use anyhow::{Context, Result};

use rusty_curve::config::DEFAULT_STEP;
use rusty_curve::data::model::DEFAULT_NULL;

const N_SAMPLES: usize = 2000;
const TOP: f64 = 1500.0;

/// Smooth bump used to lay down sand bodies in the gamma-ray log.
fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
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

/// Gamma ray in API: shale baseline with clean sands carved out.
fn gamma_ray(depth: f64, sands: &[(f64, f64, f64)], rng: &mut SimpleRng) -> f64 {
    let sand: f64 = sands
        .iter()
        .map(|&(mu, sigma, amp)| gaussian(depth, mu, sigma, amp))
        .sum();
    (110.0 - sand + rng.gauss(0.0, 4.0)).max(5.0)
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_log.csv".to_string());

    let sands = [(1560.0, 6.0, 70.0), (1640.0, 10.0, 55.0), (1710.0, 4.0, 80.0)];

    // Tool depth jitters slightly around the nominal half-foot sampling.
    let depth: Vec<f64> = (0..N_SAMPLES)
        .map(|i| TOP + i as f64 * DEFAULT_STEP + rng.gauss(0.0, 0.002))
        .collect();

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["DEPT [m]", "GR [API]", "RHOB [g/cc]"])?;

    let mut spikes = 0usize;
    for (i, &d) in depth.iter().enumerate() {
        let mut gr = gamma_ray(d, &sands, &mut rng);
        if rng.next_f64() < 0.005 {
            gr += 250.0;
            spikes += 1;
        }
        let rhob = 2.65 - 0.002 * (110.0 - gr).max(0.0) + rng.gauss(0.0, 0.01);

        // A washout with no density reading.
        let rhob = if (700..760).contains(&i) { DEFAULT_NULL } else { rhob };

        writer.write_record([
            format!("{d:.4}"),
            format!("{gr:.3}"),
            format!("{rhob:.4}"),
        ])?;
    }
    writer.flush()?;

    println!(
        "Wrote {N_SAMPLES} samples ({spikes} GR spikes) from {TOP} m to {output_path}"
    );
    Ok(())
}
