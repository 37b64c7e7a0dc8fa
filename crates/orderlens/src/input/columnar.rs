//! Parquet reading through arrow record batches.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, TimeUnit, TimestampMicrosecondType};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{OrderlensError, Result};
use crate::table::{Column, Table, Value};

fn parquet_error(e: impl std::fmt::Display) -> OrderlensError {
    OrderlensError::malformed("parquet", e)
}

/// Read an in-memory Parquet file.
pub(crate) fn read_parquet(bytes: &[u8]) -> Result<Table> {
    let bytes = Bytes::copy_from_slice(bytes);

    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)
        .map_err(|e| parquet_error(format!("failed to create reader: {}", e)))?;
    let schema = builder.schema().clone();

    let reader = builder
        .build()
        .map_err(|e| parquet_error(format!("failed to build reader: {}", e)))?;

    let mut buffers: Vec<Vec<Value>> = vec![Vec::new(); schema.fields().len()];
    for batch_result in reader {
        let batch =
            batch_result.map_err(|e| parquet_error(format!("failed to read batch: {}", e)))?;
        for (buffer, array) in buffers.iter_mut().zip(batch.columns()) {
            append_values(array, buffer)?;
        }
    }

    let columns = schema
        .fields()
        .iter()
        .zip(buffers)
        .map(|(field, values)| Column::new(field.name().clone(), values))
        .collect();

    Table::new(columns).map_err(parquet_error)
}

/// Convert one arrow array to values, widening to the five cell types.
fn append_values(array: &ArrayRef, out: &mut Vec<Value>) -> Result<()> {
    let data_type = array.data_type().clone();
    match data_type {
        DataType::Null => out.extend(std::iter::repeat_n(Value::Null, array.len())),
        DataType::Boolean => {
            let arr = array.as_boolean();
            out.extend((0..arr.len()).map(|i| {
                if arr.is_null(i) {
                    Value::Null
                } else {
                    Value::Boolean(arr.value(i))
                }
            }));
        }
        t if t.is_integer() => {
            let converted = cast(array.as_ref(), &DataType::Int64).map_err(parquet_error)?;
            let arr = converted.as_primitive::<Int64Type>();
            out.extend(arr.iter().map(|v| v.map(Value::Integer).unwrap_or_default()));
        }
        t if t.is_floating() || matches!(t, DataType::Decimal128(..) | DataType::Decimal256(..)) =>
        {
            let converted = cast(array.as_ref(), &DataType::Float64).map_err(parquet_error)?;
            let arr = converted.as_primitive::<Float64Type>();
            out.extend(arr.iter().map(|v| v.map(Value::Float).unwrap_or_default()));
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(..) => {
            let target = DataType::Timestamp(TimeUnit::Microsecond, None);
            let converted = cast(array.as_ref(), &target).map_err(parquet_error)?;
            let arr = converted.as_primitive::<TimestampMicrosecondType>();
            out.extend((0..arr.len()).map(|i| {
                if arr.is_null(i) {
                    Value::Null
                } else {
                    arr.value_as_datetime(i).map(Value::Timestamp).unwrap_or_default()
                }
            }));
        }
        _ => {
            // Everything else is read through its string form
            let converted = cast(array.as_ref(), &DataType::Utf8).map_err(parquet_error)?;
            let arr = converted.as_string::<i32>();
            out.extend(
                arr.iter()
                    .map(|v| v.map(|s| Value::String(s.to_string())).unwrap_or_default()),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;
    use arrow::array::{BooleanArray, Float32Array, Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    fn write_batch(batch: &RecordBatch) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        buffer
    }

    #[test]
    fn test_read_parquet_widens_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("score", DataType::Float32, true),
            Field::new("item", DataType::Utf8, true),
            Field::new("late", DataType::Boolean, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(vec![1, 2])),
                Arc::new(Float32Array::from(vec![Some(0.5), None])),
                Arc::new(StringArray::from(vec![Some("pizza"), None])),
                Arc::new(BooleanArray::from(vec![Some(true), Some(false)])),
            ],
        )
        .unwrap();

        let table = read_parquet(&write_batch(&batch)).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("id").unwrap().dtype(), ColumnType::Integer);
        assert_eq!(table.column("score").unwrap().dtype(), ColumnType::Float);
        assert_eq!(table.get(1, 1), Some(&Value::Null));
        assert_eq!(table.get(0, 2), Some(&Value::from("pizza")));
        assert_eq!(table.get(0, 3), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            read_parquet(b"not a parquet file"),
            Err(OrderlensError::MalformedInput { .. })
        ));
    }
}
