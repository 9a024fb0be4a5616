use std::path::Path;

use crate::error::{ExtractError, Result};

use super::model::{BinaryHeader, SampleFormat, TraceGrid};

// ---------------------------------------------------------------------------
// SEG-Y layout constants (byte offsets are 0-based)
// ---------------------------------------------------------------------------

pub const TEXTUAL_HEADER_LEN: usize = 3200;
pub const BINARY_HEADER_LEN: usize = 400;
pub const TRACE_HEADER_LEN: usize = 240;
/// Where trace data (or the extended textual headers) begin.
pub const FILE_HEADER_LEN: usize = TEXTUAL_HEADER_LEN + BINARY_HEADER_LEN;

pub(crate) const BIN_SAMPLE_INTERVAL: usize = 3216;
pub(crate) const BIN_SAMPLES_PER_TRACE: usize = 3220;
pub(crate) const BIN_FORMAT_CODE: usize = 3224;
pub(crate) const BIN_EXTENDED_HEADERS: usize = 3504;
pub(crate) const TRACE_SAMPLE_COUNT: usize = 114;
pub(crate) const TRACE_SAMPLE_INTERVAL: usize = 116;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a SEG-Y file fully into memory and decode every trace.
///
/// Geometry (inline / crossline numbering) is ignored: the file is treated as
/// a flat sequence of equally sized traces.
pub fn load_file(path: &Path) -> Result<TraceGrid> {
    let bytes = std::fs::read(path)
        .map_err(|e| ExtractError::decode(path, format!("unreadable: {e}")))?;
    decode(path, &bytes)
}

/// Decode an in-memory SEG-Y image. `path` is only used for error messages.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<TraceGrid> {
    let header = read_binary_header(path, bytes)?;

    let data_start = FILE_HEADER_LEN + header.extended_headers as usize * TEXTUAL_HEADER_LEN;
    if bytes.len() < data_start {
        return Err(ExtractError::decode(
            path,
            format!(
                "truncated: {} extended textual headers declared but file is {} bytes",
                header.extended_headers,
                bytes.len()
            ),
        ));
    }
    let trace_data = &bytes[data_start..];

    let sample_count = match header.samples_per_trace {
        0 => first_trace_sample_count(path, trace_data)?,
        n => n as usize,
    };

    let sample_width = header.format.bytes_per_sample();
    let trace_len = TRACE_HEADER_LEN + sample_count * sample_width;
    if trace_data.len() % trace_len != 0 {
        return Err(ExtractError::decode(
            path,
            format!(
                "truncated: {} bytes of trace data is not a whole number of {}-byte traces",
                trace_data.len(),
                trace_len
            ),
        ));
    }
    let trace_count = trace_data.len() / trace_len;

    log::debug!(
        "{}: {trace_count} traces x {sample_count} samples, format {}, interval {} us",
        path.display(),
        header.format,
        header.sample_interval_us
    );

    let mut samples = Vec::with_capacity(trace_count * sample_count);
    for trace in trace_data.chunks_exact(trace_len) {
        samples.extend(
            trace[TRACE_HEADER_LEN..]
                .chunks_exact(sample_width)
                .map(|raw| header.format.decode(raw)),
        );
    }

    TraceGrid::new(trace_count, sample_count, samples)
        .ok_or_else(|| ExtractError::decode(path, "decoded sample count mismatch"))
}

// ---------------------------------------------------------------------------
// Header parsing
// ---------------------------------------------------------------------------

pub fn read_binary_header(path: &Path, bytes: &[u8]) -> Result<BinaryHeader> {
    if bytes.len() < FILE_HEADER_LEN {
        return Err(ExtractError::decode(
            path,
            format!(
                "truncated: {} bytes is shorter than the {FILE_HEADER_LEN}-byte file header",
                bytes.len()
            ),
        ));
    }

    let code = read_u16(bytes, BIN_FORMAT_CODE);
    let format = SampleFormat::from_code(code)
        .ok_or_else(|| ExtractError::decode(path, format!("unsupported sample format code {code}")))?;

    let extended = read_i16(bytes, BIN_EXTENDED_HEADERS);
    if extended < 0 {
        return Err(ExtractError::decode(
            path,
            "variable number of extended textual headers is not supported",
        ));
    }

    Ok(BinaryHeader {
        sample_interval_us: read_u16(bytes, BIN_SAMPLE_INTERVAL),
        samples_per_trace: read_u16(bytes, BIN_SAMPLES_PER_TRACE),
        format,
        extended_headers: extended as u16,
    })
}

/// Fallback for files whose binary header leaves samples-per-trace at zero.
fn first_trace_sample_count(path: &Path, trace_data: &[u8]) -> Result<usize> {
    if trace_data.is_empty() {
        return Ok(0);
    }
    if trace_data.len() < TRACE_HEADER_LEN {
        return Err(ExtractError::decode(path, "truncated: incomplete first trace header"));
    }
    Ok(read_u16(trace_data, TRACE_SAMPLE_COUNT) as usize)
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_i16(bytes: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::writer::{encode, SurveyLayout};

    fn grid(traces: Vec<Vec<f64>>) -> TraceGrid {
        TraceGrid::from_traces(traces).unwrap()
    }

    fn path() -> PathBuf {
        PathBuf::from("test.sgy")
    }

    #[test]
    fn decodes_every_supported_format() {
        let source = grid(vec![vec![1.0, -2.0, 3.0, -4.0], vec![0.0, 5.0, -6.0, 7.0]]);
        for format in [
            SampleFormat::IbmFloat32,
            SampleFormat::Int32,
            SampleFormat::Int16,
            SampleFormat::IeeeFloat32,
            SampleFormat::Int8,
        ] {
            let bytes = encode(&source, &SurveyLayout::new(format));
            let decoded = decode(&path(), &bytes).unwrap();
            assert_eq!(decoded, source, "format {format}");
        }
    }

    #[test]
    fn reads_binary_header_fields() {
        let layout = SurveyLayout {
            format: SampleFormat::Int16,
            sample_interval_us: 2000,
            ..SurveyLayout::default()
        };
        let bytes = encode(&grid(vec![vec![0.0; 7]]), &layout);
        let header = read_binary_header(&path(), &bytes).unwrap();
        assert_eq!(header.sample_interval_us, 2000);
        assert_eq!(header.samples_per_trace, 7);
        assert_eq!(header.format, SampleFormat::Int16);
        assert_eq!(header.extended_headers, 0);
    }

    #[test]
    fn skips_extended_textual_headers() {
        let source = grid(vec![vec![1.5, 2.5], vec![3.5, 4.5], vec![5.5, 6.5]]);
        let layout = SurveyLayout {
            extended_headers: 2,
            ..SurveyLayout::default()
        };
        let decoded = decode(&path(), &encode(&source, &layout)).unwrap();
        assert_eq!(decoded, source);
    }

    #[test]
    fn falls_back_to_trace_header_sample_count() {
        let source = grid(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let mut bytes = encode(&source, &SurveyLayout::default());
        bytes[BIN_SAMPLES_PER_TRACE] = 0;
        bytes[BIN_SAMPLES_PER_TRACE + 1] = 0;
        let decoded = decode(&path(), &bytes).unwrap();
        assert_eq!(decoded, source);
    }

    #[test]
    fn header_only_file_has_no_traces() {
        let bytes = encode(&grid(vec![]), &SurveyLayout::default());
        let decoded = decode(&path(), &bytes).unwrap();
        assert_eq!(decoded.trace_count(), 0);
        assert!(decoded.is_empty());
    }

    #[test]
    fn rejects_truncated_file() {
        let source = grid(vec![vec![1.0; 16], vec![2.0; 16]]);
        let bytes = encode(&source, &SurveyLayout::default());
        let err = decode(&path(), &bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }), "{err}");

        let err = decode(&path(), &bytes[..100]).unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }), "{err}");
    }

    #[test]
    fn rejects_unknown_format_code() {
        let mut bytes = encode(&grid(vec![vec![1.0]]), &SurveyLayout::default());
        bytes[BIN_FORMAT_CODE] = 0;
        bytes[BIN_FORMAT_CODE + 1] = 4;
        let err = decode(&path(), &bytes).unwrap_err();
        assert!(err.to_string().contains("unsupported sample format code 4"));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.sgy")).unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }), "{err}");
        assert!(err.to_string().contains("unreadable"));
    }
}
