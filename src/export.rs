use std::path::{Path, PathBuf};

use crate::error::{ExtractError, Result};
use crate::features::FeatureTable;

/// Column headers, in output order.
pub const HEADER: [&str; 4] = ["Depth", "AvgAmplitude", "MaxAmplitude", "Dominant Frequency"];

pub fn output_file_name(output_key: &str) -> String {
    format!("seismic_features_{output_key}.csv")
}

pub fn output_path(out_dir: &Path, output_key: &str) -> PathBuf {
    out_dir.join(output_file_name(output_key))
}

/// Write `table` as CSV to `path`, replacing whatever is there.
///
/// Rows go to a hidden sibling first and are renamed into place once flushed,
/// so `path` either keeps its old content or receives the complete table.
pub fn write_table(table: &FeatureTable, path: &Path) -> Result<()> {
    let tmp = temp_sibling(path);
    let written = write_csv(table, &tmp).and_then(|()| {
        std::fs::rename(&tmp, path).map_err(|e| ExtractError::io(path, e))
    });
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}

fn write_csv(table: &FeatureTable, path: &Path) -> Result<()> {
    let csv_err = |source| ExtractError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(HEADER).map_err(csv_err)?;
    for row in table.rows() {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| ExtractError::io(path, e))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TraceGrid;

    fn table(traces: Vec<Vec<f64>>) -> FeatureTable {
        FeatureTable::from_grid(&TraceGrid::from_traces(traces).unwrap())
    }

    #[test]
    fn file_name_from_key() {
        assert_eq!(output_file_name("LINE_A_01"), "seismic_features_LINE_A_01.csv");
        assert_eq!(
            output_path(Path::new("out"), "k"),
            Path::new("out").join("seismic_features_k.csv")
        );
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        write_table(&table(vec![vec![1.0, -2.0, 3.0, -4.0]; 3]), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Depth,AvgAmplitude,MaxAmplitude,Dominant Frequency",
                "0.0,1.0,1.0,2.0",
                "1.0,2.0,2.0,2.0",
                "2.0,3.0,3.0,2.0",
                "3.0,4.0,4.0,NaN",
            ]
        );
        assert!(!dir.path().join(".t.csv.tmp").exists());
    }

    #[test]
    fn missing_cells_are_nan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        write_table(&table(vec![vec![5.0]; 3]), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "0.0");
        for row in &rows[1..] {
            assert_eq!(&row[0], "NaN");
            assert_eq!(&row[1], "NaN");
            assert_eq!(&row[2], "NaN");
            assert_eq!(&row[3], "0.0");
        }
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "stale").unwrap();
        write_table(&table(vec![vec![1.0]]), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Depth,"));
    }

    #[test]
    fn unwritable_directory_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("t.csv");
        let err = write_table(&table(vec![vec![1.0]]), &path).unwrap_err();
        assert!(matches!(err, ExtractError::Csv { .. } | ExtractError::Io { .. }));
        assert!(!path.exists());
    }
}
