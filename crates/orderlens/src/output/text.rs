//! Delimited text and JSON writers.

use std::io::Write;

use crate::error::{OrderlensError, Result};
use crate::table::Table;

fn export_error(format: &str, e: impl std::fmt::Display) -> OrderlensError {
    OrderlensError::ExportFailure(format!("{}: {}", format, e))
}

/// Header row then one record per row; nulls become empty fields.
pub(crate) fn write_delimited(table: &Table, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer
        .write_record(table.column_names())
        .map_err(|e| export_error("csv", e))?;
    for row in 0..table.row_count() {
        let fields: Vec<String> = table.row(row).iter().map(|v| v.to_string()).collect();
        writer
            .write_record(&fields)
            .map_err(|e| export_error("csv", e))?;
    }

    writer
        .into_inner()
        .map_err(|e| export_error("csv", e.error()))
}

/// A JSON array with one object per row, keys in column order.
pub(crate) fn write_json(table: &Table) -> Result<Vec<u8>> {
    serde_json::to_vec(&table.records()).map_err(|e| export_error("json", e))
}

/// One JSON object per line.
pub(crate) fn write_ndjson(table: &Table) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    for record in table.records() {
        serde_json::to_writer(&mut buffer, &record).map_err(|e| export_error("ndjson", e))?;
        buffer
            .write_all(b"\n")
            .map_err(|e| export_error("ndjson", e))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn table() -> Table {
        Table::from_rows(
            vec!["item".into(), "qty".into()],
            vec![
                vec![Value::from("pizza, large"), Value::Integer(2)],
                vec![Value::from("soda"), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_quotes_and_nulls() {
        let text = String::from_utf8(write_delimited(&table(), b',').unwrap()).unwrap();
        assert_eq!(text, "item,qty\n\"pizza, large\",2\nsoda,\n");
    }

    #[test]
    fn test_tsv() {
        let text = String::from_utf8(write_delimited(&table(), b'\t').unwrap()).unwrap();
        assert_eq!(text, "item\tqty\npizza, large\t2\nsoda\t\n");
    }

    #[test]
    fn test_json_records() {
        let text = String::from_utf8(write_json(&table()).unwrap()).unwrap();
        assert_eq!(
            text,
            r#"[{"item":"pizza, large","qty":2},{"item":"soda","qty":null}]"#
        );
    }

    #[test]
    fn test_ndjson_lines() {
        let text = String::from_utf8(write_ndjson(&table()).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], r#"{"item":"soda","qty":null}"#);
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let table = Table::from_rows(vec!["a".into(), "b".into()], vec![]).unwrap();
        let text = String::from_utf8(write_delimited(&table, b',').unwrap()).unwrap();
        assert_eq!(text, "a,b\n");
        assert_eq!(write_json(&table).unwrap(), b"[]");
    }
}
