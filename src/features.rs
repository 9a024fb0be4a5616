//! Per-depth amplitude statistics and per-trace dominant frequency.
//!
//! Note the two axes: `depth`, `avg_amplitude` and `max_amplitude` have one
//! entry per sample position, while `dominant_frequency` has one entry per
//! trace. [`FeatureTable`] pads every column with [`MISSING`] up to the longest
//! one so they can share rows, but a row's dominant frequency belongs to
//! trace `row`, not to depth `row`.

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use serde::Serialize;

use crate::data::model::TraceGrid;

/// Padding value for cells past a column's natural length.
pub const MISSING: f64 = f64::NAN;

/// `0, 1, …, sample_count - 1`.
pub fn depth_index(sample_count: usize) -> Vec<f64> {
    (0..sample_count).map(|d| d as f64).collect()
}

/// Mean of `|amplitude|` across traces, for every sample position.
pub fn avg_amplitude(grid: &TraceGrid) -> Vec<f64> {
    let mut sums = vec![0.0; grid.sample_count()];
    for trace in grid.traces() {
        for (sum, &v) in sums.iter_mut().zip(trace) {
            *sum += v.abs();
        }
    }
    let n = grid.trace_count() as f64;
    sums.into_iter().map(|s| s / n).collect()
}

/// Max of `|amplitude|` across traces, for every sample position. A NaN
/// sample makes its depth NaN, as it does for [`avg_amplitude`].
pub fn max_amplitude(grid: &TraceGrid) -> Vec<f64> {
    let mut maxima = vec![f64::NEG_INFINITY; grid.sample_count()];
    for trace in grid.traces() {
        for (max, &v) in maxima.iter_mut().zip(trace) {
            let v = v.abs();
            if v.is_nan() || v > *max {
                *max = v;
            }
        }
    }
    maxima
}

/// For every trace, the DFT bin with the highest power `|X[k]|²`.
///
/// Traces are real, so bins `k` and `N - k` carry the same power; only
/// `0..=N/2` is searched, which reports the lower bin of each mirrored pair.
/// On ties the lowest bin wins, so an all-zero trace reports the DC bin.
pub fn dominant_frequency(grid: &TraceGrid) -> Vec<usize> {
    let n = grid.sample_count();
    if n == 0 {
        return vec![0; grid.trace_count()];
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let mut scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];
    let mut buffer = vec![Complex64::new(0.0, 0.0); n];

    grid.traces()
        .map(|trace| {
            for (slot, &v) in buffer.iter_mut().zip(trace) {
                *slot = Complex64::new(v, 0.0);
            }
            fft.process_with_scratch(&mut buffer, &mut scratch);
            peak_bin(&buffer[..=n / 2])
        })
        .collect()
}

/// Index of the first bin with maximum power.
fn peak_bin(spectrum: &[Complex64]) -> usize {
    let mut best = 0;
    let mut best_power = f64::NEG_INFINITY;
    for (k, c) in spectrum.iter().enumerate() {
        let power = c.norm_sqr();
        if power > best_power {
            best_power = power;
            best = k;
        }
    }
    best
}

/// Right-pad `values` with [`MISSING`] until it is `len` long.
pub fn pad_with_missing(mut values: Vec<f64>, len: usize) -> Vec<f64> {
    if values.len() < len {
        values.resize(len, MISSING);
    }
    values
}

// ---------------------------------------------------------------------------
// FeatureTable – four equally long columns
// ---------------------------------------------------------------------------

/// One output row. Field names are the literal CSV headers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    #[serde(rename = "Depth")]
    pub depth: f64,
    #[serde(rename = "AvgAmplitude")]
    pub avg_amplitude: f64,
    #[serde(rename = "MaxAmplitude")]
    pub max_amplitude: f64,
    #[serde(rename = "Dominant Frequency")]
    pub dominant_frequency: f64,
}

#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub depth: Vec<f64>,
    pub avg_amplitude: Vec<f64>,
    pub max_amplitude: Vec<f64>,
    pub dominant_frequency: Vec<f64>,
}

impl FeatureTable {
    /// Compute all four statistics and pad them to a common length.
    pub fn from_grid(grid: &TraceGrid) -> Self {
        let depth = depth_index(grid.sample_count());
        let avg = avg_amplitude(grid);
        let max = max_amplitude(grid);
        let dominant: Vec<f64> = dominant_frequency(grid)
            .into_iter()
            .map(|bin| bin as f64)
            .collect();

        let len = [depth.len(), avg.len(), max.len(), dominant.len()]
            .into_iter()
            .max()
            .unwrap_or(0);

        FeatureTable {
            depth: pad_with_missing(depth, len),
            avg_amplitude: pad_with_missing(avg, len),
            max_amplitude: pad_with_missing(max, len),
            dominant_frequency: pad_with_missing(dominant, len),
        }
    }

    /// Row count, shared by every column.
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = FeatureRow> + '_ {
        (0..self.len()).map(move |i| FeatureRow {
            depth: self.depth[i],
            avg_amplitude: self.avg_amplitude[i],
            max_amplitude: self.max_amplitude[i],
            dominant_frequency: self.dominant_frequency[i],
        })
    }
}
