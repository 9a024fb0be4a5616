use std::path::Path;

use crate::error::{ExtractError, Result};

use super::loader::{
    BIN_EXTENDED_HEADERS, BIN_FORMAT_CODE, BIN_SAMPLES_PER_TRACE, BIN_SAMPLE_INTERVAL,
    BINARY_HEADER_LEN, TEXTUAL_HEADER_LEN, TRACE_HEADER_LEN, TRACE_SAMPLE_COUNT,
    TRACE_SAMPLE_INTERVAL,
};
use super::model::{SampleFormat, TraceGrid};

/// Everything besides the samples themselves that ends up in a written file.
#[derive(Debug, Clone)]
pub struct SurveyLayout {
    pub format: SampleFormat,
    pub sample_interval_us: u16,
    pub extended_headers: u16,
    /// Free text for the first card of the textual header.
    pub description: String,
}

impl SurveyLayout {
    pub fn new(format: SampleFormat) -> Self {
        SurveyLayout {
            format,
            ..SurveyLayout::default()
        }
    }
}

impl Default for SurveyLayout {
    fn default() -> Self {
        SurveyLayout {
            format: SampleFormat::IeeeFloat32,
            sample_interval_us: 4000,
            extended_headers: 0,
            description: "SYNTHETIC SURVEY".to_string(),
        }
    }
}

/// Serialize a grid as a big-endian SEG-Y image.
///
/// The textual header is written as ASCII cards rather than EBCDIC; readers
/// that only look at the binary header do not care.
pub fn encode(grid: &TraceGrid, layout: &SurveyLayout) -> Vec<u8> {
    let sample_width = layout.format.bytes_per_sample();
    let mut out = Vec::with_capacity(
        TEXTUAL_HEADER_LEN * (1 + layout.extended_headers as usize)
            + BINARY_HEADER_LEN
            + grid.trace_count() * (TRACE_HEADER_LEN + grid.sample_count() * sample_width),
    );

    out.extend_from_slice(&textual_header(&layout.description));

    let mut binary = [0u8; BINARY_HEADER_LEN];
    let base = TEXTUAL_HEADER_LEN;
    put_u16(&mut binary, BIN_SAMPLE_INTERVAL - base, layout.sample_interval_us);
    put_u16(&mut binary, BIN_SAMPLES_PER_TRACE - base, grid.sample_count() as u16);
    put_u16(&mut binary, BIN_FORMAT_CODE - base, layout.format.code());
    put_u16(&mut binary, BIN_EXTENDED_HEADERS - base, layout.extended_headers);
    out.extend_from_slice(&binary);

    for _ in 0..layout.extended_headers {
        out.extend_from_slice(&textual_header("EXTENDED TEXTUAL HEADER"));
    }

    for (index, trace) in grid.traces().enumerate() {
        let mut header = [0u8; TRACE_HEADER_LEN];
        // Trace sequence number within line, 1-based.
        header[0..4].copy_from_slice(&(index as u32 + 1).to_be_bytes());
        put_u16(&mut header, TRACE_SAMPLE_COUNT, trace.len() as u16);
        put_u16(&mut header, TRACE_SAMPLE_INTERVAL, layout.sample_interval_us);
        out.extend_from_slice(&header);

        for &sample in trace {
            layout.format.encode(sample, &mut out);
        }
    }

    out
}

pub fn write_file(path: &Path, grid: &TraceGrid, layout: &SurveyLayout) -> Result<()> {
    std::fs::write(path, encode(grid, layout)).map_err(|e| ExtractError::io(path, e))
}

/// 40 cards of 80 columns, `C 1` through `C40`.
fn textual_header(description: &str) -> [u8; TEXTUAL_HEADER_LEN] {
    let mut header = [b' '; TEXTUAL_HEADER_LEN];
    for (i, card) in header.chunks_exact_mut(80).enumerate() {
        let text = match i {
            0 => format!("C{:>2} {description}", i + 1),
            _ => format!("C{:>2}", i + 1),
        };
        let len = text.len().min(80);
        card[..len].copy_from_slice(&text.as_bytes()[..len]);
    }
    header
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}
