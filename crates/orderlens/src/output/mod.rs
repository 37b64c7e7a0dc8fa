//! Writing tables back to bytes.

mod columnar;
mod format;
mod spreadsheet;
mod text;

pub use format::ExportFormat;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{OrderlensError, Result};
use crate::table::Table;

/// Serialize a table in the requested format.
pub fn export(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Csv => text::write_delimited(table, b',')?,
        ExportFormat::Tsv => text::write_delimited(table, b'\t')?,
        ExportFormat::Json => text::write_json(table)?,
        ExportFormat::NdJson => text::write_ndjson(table)?,
        ExportFormat::Parquet => columnar::write_parquet(table)?,
        ExportFormat::Xlsx => spreadsheet::write_xlsx(table)?,
    };
    debug!(%format, rows = table.row_count(), bytes = bytes.len(), "exported table");
    Ok(bytes)
}

/// Serialize a table and write it to `path`.
pub fn export_to_path(table: &Table, format: ExportFormat, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = export(table, format)?;
    fs::write(path, bytes).map_err(|e| OrderlensError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ingest;
    use crate::table::Value;

    fn orders() -> Table {
        Table::from_rows(
            vec!["order_id".into(), "item".into(), "minutes".into()],
            vec![
                vec![Value::from("O1"), Value::from("pizza"), Value::Float(31.5)],
                vec![Value::from("O2"), Value::from("soda"), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_every_format_reads_back() {
        let formats = [
            ExportFormat::Csv,
            ExportFormat::Tsv,
            ExportFormat::Json,
            ExportFormat::NdJson,
            ExportFormat::Parquet,
            ExportFormat::Xlsx,
        ];
        for format in formats {
            let bytes = export(&orders(), format).unwrap();
            let back = ingest(&bytes, format.extension()).unwrap();
            assert_eq!(back.column_names(), vec!["order_id", "item", "minutes"], "{}", format);
            assert_eq!(back.row_count(), 2, "{}", format);
            assert_eq!(back.get(0, 2), Some(&Value::Float(31.5)), "{}", format);
            assert_eq!(back.get(1, 2), Some(&Value::Null), "{}", format);
        }
    }

    #[test]
    fn test_export_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        export_to_path(&orders(), ExportFormat::Csv, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("order_id,item,minutes\n"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("orders.csv");
        assert!(matches!(
            export_to_path(&orders(), ExportFormat::Csv, &path),
            Err(OrderlensError::Io { .. })
        ));
    }
}
