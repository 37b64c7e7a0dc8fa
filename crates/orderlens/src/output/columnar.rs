//! Parquet writing through an arrow record batch.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::{OrderlensError, Result};
use crate::table::{Column, ColumnType, Table, Value};

const MAX_ROW_GROUP_SIZE: usize = 8192;

fn export_error(context: &str, e: impl std::fmt::Display) -> OrderlensError {
    OrderlensError::ExportFailure(format!("parquet: {}: {}", context, e))
}

/// The arrow type a column is stored as. All-null columns are stored as
/// nullable strings.
fn arrow_type(dtype: ColumnType) -> DataType {
    match dtype {
        ColumnType::String | ColumnType::Null => DataType::Utf8,
        ColumnType::Integer => DataType::Int64,
        ColumnType::Float => DataType::Float64,
        ColumnType::Boolean => DataType::Boolean,
        ColumnType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
    }
}

fn to_array(column: &Column) -> ArrayRef {
    let values = column.values();
    match column.dtype() {
        ColumnType::String | ColumnType::Null => Arc::new(
            values
                .iter()
                .map(|v| v.as_str().map(str::to_owned))
                .collect::<StringArray>(),
        ),
        ColumnType::Integer => Arc::new(
            values
                .iter()
                .map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Int64Array>(),
        ),
        ColumnType::Float => Arc::new(values.iter().map(Value::as_f64).collect::<Float64Array>()),
        ColumnType::Boolean => {
            Arc::new(values.iter().map(Value::as_bool).collect::<BooleanArray>())
        }
        ColumnType::Timestamp => Arc::new(
            values
                .iter()
                .map(|v| v.as_timestamp().map(|ts| ts.and_utc().timestamp_micros()))
                .collect::<TimestampMicrosecondArray>(),
        ),
    }
}

/// Convert a table to a single arrow record batch.
pub(crate) fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|c| Field::new(c.name(), arrow_type(c.dtype()), true))
        .collect();
    let arrays: Vec<ArrayRef> = table.columns().iter().map(to_array).collect();

    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
        .map_err(|e| export_error("failed to build record batch", e))
}

/// Write a table to an in-memory Parquet file.
pub(crate) fn write_parquet(table: &Table) -> Result<Vec<u8>> {
    let batch = to_record_batch(table)?;
    let mut buffer = Vec::new();

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(MAX_ROW_GROUP_SIZE)
        .build();

    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props))
        .map_err(|e| export_error("failed to create writer", e))?;
    writer
        .write(&batch)
        .map_err(|e| export_error("failed to write record batch", e))?;
    writer
        .close()
        .map_err(|e| export_error("failed to close writer", e))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use chrono::NaiveDate;

    #[test]
    fn test_record_batch_types() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let table = Table::new(vec![
            Column::new("item", vec![Value::from("pizza"), Value::Null]),
            Column::new("qty", vec![Value::Integer(2), Value::Integer(3)]),
            Column::new("price", vec![Value::Float(9.5), Value::Null]),
            Column::new("late", vec![Value::Boolean(true), Value::Boolean(false)]),
            Column::new("at", vec![Value::Timestamp(ts), Value::Null]),
            Column::nulls("notes", 2),
        ])
        .unwrap();

        let batch = to_record_batch(&table).unwrap();
        assert_eq!(batch.num_rows(), 2);
        let schema = batch.schema();
        let types: Vec<&DataType> = schema.fields().iter().map(|f| f.data_type()).collect();
        assert_eq!(
            types,
            vec![
                &DataType::Utf8,
                &DataType::Int64,
                &DataType::Float64,
                &DataType::Boolean,
                &DataType::Timestamp(TimeUnit::Microsecond, None),
                &DataType::Utf8,
            ]
        );
        assert_eq!(batch.column(0).null_count(), 1);
        assert_eq!(batch.column(5).null_count(), 2);
    }

    #[test]
    fn test_write_parquet_magic() {
        let table = Table::from_rows(
            vec!["id".into()],
            vec![vec![Value::Integer(1)], vec![Value::Integer(2)]],
        )
        .unwrap();
        let bytes = write_parquet(&table).unwrap();
        assert_eq!(&bytes[0..4], b"PAR1");
    }

    #[test]
    fn test_zero_row_table() {
        let table = Table::from_rows(vec!["id".into()], vec![]).unwrap();
        let batch = to_record_batch(&table).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 1);
    }
}
