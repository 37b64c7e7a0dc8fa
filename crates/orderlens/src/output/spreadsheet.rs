//! Excel workbook writing through rust_xlsxwriter.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::{OrderlensError, Result};
use crate::table::{Table, Value};

const SHEET_NAME: &str = "data";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn export_error(e: impl std::fmt::Display) -> OrderlensError {
    OrderlensError::ExportFailure(format!("xlsx: {}", e))
}

/// A single-sheet workbook: header row in bold, one row per table row.
/// Null cells are left blank.
pub(crate) fn write_xlsx(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(export_error)?;

    let header = Format::new().set_bold();
    let datetime = Format::new().set_num_format(DATETIME_FORMAT);

    for (c, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(c).map_err(|_| export_error("too many columns"))?;
        sheet
            .write_string_with_format(0, col, column.name(), &header)
            .map_err(export_error)?;

        for (r, value) in column.iter().enumerate() {
            let row = u32::try_from(r + 1).map_err(|_| export_error("too many rows"))?;
            write_cell(sheet, row, col, value, &datetime).map_err(export_error)?;
        }
    }

    workbook.save_to_buffer().map_err(export_error)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    datetime: &Format,
) -> std::result::Result<(), XlsxError> {
    match value {
        Value::Null => return Ok(()),
        Value::String(s) => sheet.write_string(row, col, s)?,
        Value::Integer(i) => sheet.write_number(row, col, *i as f64)?,
        Value::Float(f) => sheet.write_number(row, col, *f)?,
        Value::Boolean(b) => sheet.write_boolean(row, col, *b)?,
        Value::Timestamp(ts) => sheet.write_datetime_with_format(row, col, ts, datetime)?,
    };
    Ok(())
}
