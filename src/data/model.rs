use std::fmt;

// ---------------------------------------------------------------------------
// SampleFormat – how one trace sample is stored on disk
// ---------------------------------------------------------------------------

/// Data sample format codes from the SEG-Y binary header (bytes 3225–3226).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Code 1: 4-byte IBM hexadecimal floating point.
    IbmFloat32,
    /// Code 2: 4-byte two's complement integer.
    Int32,
    /// Code 3: 2-byte two's complement integer.
    Int16,
    /// Code 5: 4-byte IEEE floating point.
    IeeeFloat32,
    /// Code 8: 1-byte two's complement integer.
    Int8,
}

impl SampleFormat {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(SampleFormat::IbmFloat32),
            2 => Some(SampleFormat::Int32),
            3 => Some(SampleFormat::Int16),
            5 => Some(SampleFormat::IeeeFloat32),
            8 => Some(SampleFormat::Int8),
            _ => None,
        }
    }

    pub fn code(self) -> u16 {
        match self {
            SampleFormat::IbmFloat32 => 1,
            SampleFormat::Int32 => 2,
            SampleFormat::Int16 => 3,
            SampleFormat::IeeeFloat32 => 5,
            SampleFormat::Int8 => 8,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::IbmFloat32 | SampleFormat::Int32 | SampleFormat::IeeeFloat32 => 4,
            SampleFormat::Int16 => 2,
            SampleFormat::Int8 => 1,
        }
    }

    /// Decode one big-endian sample. `bytes` must be exactly
    /// [`bytes_per_sample`](Self::bytes_per_sample) long.
    pub fn decode(self, bytes: &[u8]) -> f64 {
        match self {
            SampleFormat::IbmFloat32 => {
                ibm_to_f64(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            SampleFormat::Int32 => {
                i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
            }
            SampleFormat::Int16 => i16::from_be_bytes([bytes[0], bytes[1]]) as f64,
            SampleFormat::IeeeFloat32 => {
                f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
            }
            SampleFormat::Int8 => bytes[0] as i8 as f64,
        }
    }

    /// Encode one sample big-endian. Integer formats round and saturate.
    pub fn encode(self, value: f64, out: &mut Vec<u8>) {
        match self {
            SampleFormat::IbmFloat32 => out.extend_from_slice(&f64_to_ibm(value).to_be_bytes()),
            SampleFormat::Int32 => out.extend_from_slice(&(value.round() as i32).to_be_bytes()),
            SampleFormat::Int16 => out.extend_from_slice(&(value.round() as i16).to_be_bytes()),
            SampleFormat::IeeeFloat32 => out.extend_from_slice(&(value as f32).to_be_bytes()),
            SampleFormat::Int8 => out.push(value.round() as i8 as u8),
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleFormat::IbmFloat32 => "ibm-float32",
            SampleFormat::Int32 => "int32",
            SampleFormat::Int16 => "int16",
            SampleFormat::IeeeFloat32 => "ieee-float32",
            SampleFormat::Int8 => "int8",
        };
        write!(f, "{name}")
    }
}

/// IBM System/360 single precision: sign bit, 7-bit base-16 exponent biased
/// by 64, 24-bit fraction.
pub fn ibm_to_f64(bits: u32) -> f64 {
    let fraction = bits & 0x00ff_ffff;
    if fraction == 0 {
        return 0.0;
    }
    let sign = if bits >> 31 == 1 { -1.0 } else { 1.0 };
    let exponent = ((bits >> 24) & 0x7f) as i32 - 64;
    sign * (fraction as f64 / (1u32 << 24) as f64) * 16f64.powi(exponent)
}

pub fn f64_to_ibm(value: f64) -> u32 {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }
    let sign: u32 = if value < 0.0 { 1 << 31 } else { 0 };
    let mut fraction = value.abs();
    let mut exponent: i32 = 64;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 1.0 / 16.0 {
        fraction *= 16.0;
        exponent -= 1;
    }
    let mut mantissa = (fraction * (1u32 << 24) as f64).round() as u32;
    if mantissa >= 1 << 24 {
        mantissa >>= 4;
        exponent += 1;
    }
    if exponent <= 0 {
        return sign;
    }
    if exponent > 127 {
        return sign | 0x7fff_ffff;
    }
    sign | ((exponent as u32) << 24) | mantissa
}

// ---------------------------------------------------------------------------
// BinaryHeader – the fields of the 400-byte file header we care about
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    /// Sample interval in microseconds.
    pub sample_interval_us: u16,
    /// Samples per trace as declared by the file (0 = "see trace headers").
    pub samples_per_trace: u16,
    pub format: SampleFormat,
    /// Number of 3200-byte extended textual headers following the binary header.
    pub extended_headers: u16,
}

// ---------------------------------------------------------------------------
// TraceGrid – traces × samples, row-major
// ---------------------------------------------------------------------------

/// Rectangular grid of decoded amplitudes: one row per trace, one column per
/// sample position (the depth/time proxy).
#[derive(Debug, Clone, PartialEq)]
pub struct TraceGrid {
    trace_count: usize,
    sample_count: usize,
    data: Vec<f64>,
}

impl TraceGrid {
    /// Wrap a row-major buffer. Returns `None` if the buffer does not hold
    /// exactly `trace_count * sample_count` values.
    pub fn new(trace_count: usize, sample_count: usize, data: Vec<f64>) -> Option<Self> {
        if trace_count.checked_mul(sample_count)? != data.len() {
            return None;
        }
        Some(TraceGrid {
            trace_count,
            sample_count,
            data,
        })
    }

    /// Build a grid from individual traces. Returns `None` for ragged input.
    pub fn from_traces(traces: Vec<Vec<f64>>) -> Option<Self> {
        let sample_count = traces.first().map_or(0, Vec::len);
        if traces.iter().any(|t| t.len() != sample_count) {
            return None;
        }
        let trace_count = traces.len();
        let data = traces.into_iter().flatten().collect();
        TraceGrid::new(trace_count, sample_count, data)
    }

    pub fn trace_count(&self) -> usize {
        self.trace_count
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Whether the grid has no traces or no samples.
    pub fn is_empty(&self) -> bool {
        self.trace_count == 0 || self.sample_count == 0
    }

    /// Samples of trace `index`.
    pub fn trace(&self, index: usize) -> &[f64] {
        let start = index * self.sample_count;
        &self.data[start..start + self.sample_count]
    }

    pub fn traces(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.trace_count).map(move |i| self.trace(i))
    }
}
