use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use segy_features::data::model::{SampleFormat, TraceGrid};
use segy_features::data::writer::{write_file, SurveyLayout};

/// Write a small synthetic 2D survey tree for trying out `segy-features`.
#[derive(Debug, Parser)]
struct Args {
    /// Root of the generated tree
    #[arg(long, default_value = "sample_survey")]
    out: PathBuf,

    /// Number of seismic lines (subdirectories)
    #[arg(long, default_value_t = 2)]
    lines: usize,

    /// Files per line
    #[arg(long, default_value_t = 3)]
    files: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Ricker wavelet with peak frequency `freq_hz`, centred on `t0` seconds.
fn ricker(t: f64, t0: f64, freq_hz: f64) -> f64 {
    let a = (std::f64::consts::PI * freq_hz * (t - t0)).powi(2);
    (1.0 - 2.0 * a) * (-a).exp()
}

fn generate_trace(
    samples: usize,
    dt_s: f64,
    reflectors: &[(f64, f64)],
    freq_hz: f64,
    noise_level: f64,
    rng: &mut NoiseSource,
) -> Vec<f64> {
    (0..samples)
        .map(|i| {
            let t = i as f64 * dt_s;
            let signal: f64 = reflectors
                .iter()
                .map(|&(t0, coeff)| coeff * ricker(t, t0, freq_hz))
                .sum();
            signal + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Seeded noise source so a given `--seed` always yields the same survey.
///
/// SplitMix64 for the raw stream; amplitudes are drawn uniformly for reflector
/// placement and from a normal distribution for ambient trace noise.
struct NoiseSource {
    state: u64,
}

impl NoiseSource {
    fn new(seed: u64) -> Self {
        NoiseSource { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Gaussian sample via Box-Muller, used for incoherent background noise.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.unit().max(f64::MIN_POSITIVE);
        let u2 = self.unit();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = NoiseSource::new(args.seed);

    let layout = SurveyLayout {
        format: SampleFormat::IeeeFloat32,
        sample_interval_us: 4000,
        extended_headers: 0,
        description: "SYNTHETIC 2D LINE, RICKER REFLECTORS".to_string(),
    };
    let dt_s = layout.sample_interval_us as f64 * 1e-6;

    let mut written = 0;
    for line in 0..args.lines {
        let line_name = format!("LINE_{}", (b'A' + (line % 26) as u8) as char);
        let dir = args.out.join(&line_name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating {}", dir.display()))?;

        for file in 0..args.files {
            // Vary geometry so traces and samples rarely line up.
            let traces = 40 + 20 * file + line * 7;
            let samples = 250 + 50 * line;
            let freq_hz = rng.range(15.0, 45.0);
            let reflectors: Vec<(f64, f64)> = (0..4)
                .map(|_| {
                    (
                        rng.range(0.1, samples as f64 * dt_s - 0.1),
                        rng.range(-1.0, 1.0),
                    )
                })
                .collect();

            let rows: Vec<Vec<f64>> = (0..traces)
                .map(|_| generate_trace(samples, dt_s, &reflectors, freq_hz, 0.05, &mut rng))
                .collect();
            let grid = TraceGrid::from_traces(rows).context("building trace grid")?;

            let path = dir.join(format!("{line_name}_{:02}.sgy", file + 1));
            write_file(&path, &grid, &layout)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("{}: {traces} traces x {samples} samples", path.display());
            written += 1;
        }
    }

    println!("Wrote {written} synthetic surveys under {}", args.out.display());
    Ok(())
}
