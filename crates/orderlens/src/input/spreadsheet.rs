//! Workbook reading (xlsx, xls, ods) through calamine.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{OrderlensError, Result};
use crate::table::{Column, TIMESTAMP_FORMAT, Table, Value};

fn sheet_error(e: impl std::fmt::Display) -> OrderlensError {
    OrderlensError::malformed("spreadsheet", e)
}

/// Read one worksheet; the first row holds the column names.
///
/// With no `sheet_name` the first sheet in the workbook is read.
pub(crate) fn read_spreadsheet(bytes: &[u8], sheet_name: Option<&str>) -> Result<Table> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(sheet_error)?;

    let names = workbook.sheet_names();
    let sheet = match sheet_name {
        Some(name) if names.iter().any(|n| n == name) => name.to_string(),
        Some(name) => return Err(sheet_error(format!("no sheet named '{}'", name))),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| sheet_error("workbook has no sheets"))?,
    };

    let range = workbook.worksheet_range(&sheet).map_err(sheet_error)?;
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(header_name).collect(),
        None => return Err(sheet_error(format!("sheet '{}' is empty", sheet))),
    };
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(sheet_error("missing header row"));
    }

    let mut buffers: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, buffer) in buffers.iter_mut().enumerate() {
            buffer.push(row.get(idx).map(cell_value).unwrap_or_default());
        }
    }

    debug!(sheet = %sheet, rows = buffers.first().map_or(0, Vec::len), "read worksheet");

    let columns = headers
        .into_iter()
        .zip(buffers)
        .map(|(name, values)| Column::new(name, integral_floats_to_integers(values)))
        .collect();

    Table::new(columns).map_err(sheet_error)
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => cell_value(other).to_string(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => Value::Float(*f),
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Boolean(*b),
        Data::DateTime(dt) => dt.as_datetime().map(Value::Timestamp).unwrap_or_default(),
        Data::DateTimeIso(s) => parse_iso(s)
            .map(Value::Timestamp)
            .unwrap_or_else(|| Value::String(s.clone())),
        Data::DurationIso(s) => Value::String(s.clone()),
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT))
        .ok()
}

/// Workbooks store every number as a float; a column of whole numbers is
/// read back as integers.
fn integral_floats_to_integers(values: Vec<Value>) -> Vec<Value> {
    let mut saw_number = false;
    for value in &values {
        match value {
            Value::Null => {}
            Value::Integer(_) => saw_number = true,
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => saw_number = true,
            _ => return values,
        }
    }
    if !saw_number {
        return values;
    }

    values
        .into_iter()
        .map(|v| match v {
            Value::Float(f) => Value::Integer(f as i64),
            other => other,
        })
        .collect()
}
