use std::path::{Path, PathBuf};

use crate::data::loader;
use crate::error::{ExtractError, Result};
use crate::export;
use crate::features::FeatureTable;

/// What one successful extraction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub output: PathBuf,
    pub trace_count: usize,
    pub sample_count: usize,
    pub rows: usize,
}

/// Decode `input`, compute its feature table and write it to
/// `out_dir/seismic_features_<output_key>.csv`.
///
/// Nothing is written unless decoding succeeds and the file holds at least
/// one trace with at least one sample.
pub fn extract(input: &Path, output_key: &str, out_dir: &Path) -> Result<Extraction> {
    let grid = loader::load_file(input)?;
    if grid.is_empty() {
        return Err(ExtractError::EmptyInput {
            path: input.to_path_buf(),
            traces: grid.trace_count(),
            samples: grid.sample_count(),
        });
    }

    let table = FeatureTable::from_grid(&grid);
    if grid.trace_count() != grid.sample_count() {
        log::warn!(
            "{}: {} traces vs {} samples, shorter columns padded to {} rows",
            input.display(),
            grid.trace_count(),
            grid.sample_count(),
            table.len()
        );
    }

    let output = export::output_path(out_dir, output_key);
    export::write_table(&table, &output)?;
    log::info!("Wrote {} rows to {}", table.len(), output.display());

    Ok(Extraction {
        output,
        trace_count: grid.trace_count(),
        sample_count: grid.sample_count(),
        rows: table.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SampleFormat, TraceGrid};
    use crate::data::writer::{write_file, SurveyLayout};

    fn survey(dir: &Path, name: &str, traces: Vec<Vec<f64>>) -> PathBuf {
        let path = dir.join(name);
        let grid = TraceGrid::from_traces(traces).unwrap();
        write_file(&path, &grid, &SurveyLayout::default()).unwrap();
        path
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn three_identical_traces() {
        let dir = tempfile::tempdir().unwrap();
        let input = survey(dir.path(), "a.sgy", vec![vec![1.0, -2.0, 3.0, -4.0]; 3]);

        let result = extract(&input, "well_a", dir.path()).unwrap();
        assert_eq!(result.output, dir.path().join("seismic_features_well_a.csv"));
        assert_eq!((result.trace_count, result.sample_count, result.rows), (3, 4, 4));

        let rows = read_rows(&result.output);
        let depth: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        let avg: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
        let max: Vec<&str> = rows.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(depth, ["0.0", "1.0", "2.0", "3.0"]);
        assert_eq!(avg, ["1.0", "2.0", "3.0", "4.0"]);
        assert_eq!(max, avg);
    }

    #[test]
    fn single_zero_trace() {
        let dir = tempfile::tempdir().unwrap();
        let input = survey(dir.path(), "z.sgy", vec![vec![0.0; 6]]);

        let result = extract(&input, "zero", dir.path()).unwrap();
        let rows = read_rows(&result.output);
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r[1] == "0.0" && r[2] == "0.0"));
        assert_eq!(rows[0][3], "0.0");
        assert!(rows[1..].iter().all(|r| r[3] == "NaN"));
    }

    #[test]
    fn row_count_is_longest_axis() {
        let dir = tempfile::tempdir().unwrap();
        let input = survey(dir.path(), "wide.sgy", vec![vec![1.0, 2.0, 3.0]; 7]);

        let result = extract(&input, "wide", dir.path()).unwrap();
        assert_eq!(result.rows, 7);
        let rows = read_rows(&result.output);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[2][0], "2.0");
        assert_eq!(rows[3][0], "NaN");
        assert!(rows.iter().all(|r| r[3] != "NaN"));
    }

    #[test]
    fn truncated_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = survey(dir.path(), "bad.sgy", vec![vec![1.0; 32]; 4]);
        let bytes = std::fs::read(&input).unwrap();
        std::fs::write(&input, &bytes[..bytes.len() - 10]).unwrap();

        let err = extract(&input, "bad", dir.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Decode { .. }), "{err}");
        assert!(!dir.path().join("seismic_features_bad.csv").exists());
    }

    #[test]
    fn empty_survey_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = survey(dir.path(), "empty.sgy", vec![]);

        let err = extract(&input, "empty", dir.path()).unwrap_err();
        assert!(matches!(err, ExtractError::EmptyInput { traces: 0, .. }), "{err}");
        assert!(!dir.path().join("seismic_features_empty.csv").exists());
    }

    #[test]
    fn traces_without_samples_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = survey(dir.path(), "hollow.sgy", vec![vec![]; 3]);

        let err = extract(&input, "hollow", dir.path()).unwrap_err();
        assert!(
            matches!(err, ExtractError::EmptyInput { traces: 3, samples: 0, .. }),
            "{err}"
        );
        assert!(!dir.path().join("seismic_features_hollow.csv").exists());
    }

    #[test]
    fn unreadable_input_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract(&dir.path().join("absent.sgy"), "absent", dir.path()).unwrap_err();
        assert_eq!(err.kind(), "decode");
        assert!(!dir.path().join("seismic_features_absent.csv").exists());
    }

    #[test]
    fn repeated_extraction_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let traces = (0..5)
            .map(|t| (0..9).map(|s| ((t * 9 + s) as f64 * 0.37).sin() * 100.0).collect::<Vec<f64>>())
            .collect();
        let input = survey(dir.path(), "s.sgy", traces);

        let first = extract(&input, "s", dir.path()).unwrap();
        let first_bytes = std::fs::read(&first.output).unwrap();
        let second = extract(&input, "s", dir.path()).unwrap();
        assert_eq!(first_bytes, std::fs::read(&second.output).unwrap());
    }

    #[test]
    fn independent_files_do_not_mix() {
        let dir = tempfile::tempdir().unwrap();
        let a = survey(dir.path(), "a.sgy", vec![vec![1.0, 1.0]; 2]);
        let path_b = dir.path().join("b.sgy");
        let grid_b = TraceGrid::from_traces(vec![vec![-8.0, 0.0, 8.0]; 4]).unwrap();
        write_file(&path_b, &grid_b, &SurveyLayout::new(SampleFormat::Int16)).unwrap();

        let ra = extract(&a, "a", dir.path()).unwrap();
        let rb = extract(&path_b, "b", dir.path()).unwrap();
        assert_ne!(ra.output, rb.output);

        let rows_a = read_rows(&ra.output);
        let rows_b = read_rows(&rb.output);
        assert_eq!(rows_a.len(), 2);
        assert_eq!(rows_b.len(), 4);
        assert!(rows_a.iter().all(|r| r[2] == "1.0"));
        assert_eq!(rows_b[0][2], "8.0");
        assert_eq!(rows_b[1][2], "0.0");
    }
}
