//! Parquet file parser

use arrow::array::{Array, ArrayRef, ArrowPrimitiveType, AsArray, PrimitiveArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType as ArrowType, Date32Type, Date64Type, Field, Float32Type, Float64Type, Int16Type,
    Int32Type, Int64Type, Int8Type, Time32MillisecondType, Time32SecondType,
    Time64MicrosecondType, Time64NanosecondType, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::debug;

use crate::config::Config;
use crate::error::LoadError;
use crate::model::{CellType, CellValue, Column, Table};
use crate::source::SourceBlob;

use super::{Parser, PARQUET_MAGIC};

/// Parser for Parquet files
pub struct ParquetParser;

impl Parser for ParquetParser {
    fn parse(&self, blob: &SourceBlob, _config: &Config) -> Result<Table, LoadError> {
        let bytes = blob.bytes();
        // Header and footer magic; the footer length sits between them
        if bytes.len() < 2 * PARQUET_MAGIC.len() + 4
            || !bytes.starts_with(PARQUET_MAGIC)
            || !bytes.ends_with(PARQUET_MAGIC)
        {
            return Err(LoadError::NotParquet);
        }

        let builder = ParquetRecordBatchReaderBuilder::try_new(bytes.clone())?;
        debug!(
            row_groups = builder.metadata().num_row_groups(),
            rows = builder.metadata().file_metadata().num_rows(),
            "read parquet footer"
        );

        let schema = builder.schema().clone();
        let reader = builder.build()?;

        let columns: Vec<Column> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| column_for_field(field, i))
            .collect();

        let mut table = Table::new(columns);

        let mut source_line = 0usize;
        for batch_result in reader {
            let batch = batch_result?;
            debug!(rows = batch.num_rows(), "decoding record batch");

            let decoded = batch
                .columns()
                .iter()
                .map(column_values)
                .collect::<Result<Vec<_>, _>>()?;
            let mut columns: Vec<_> = decoded.into_iter().map(Vec::into_iter).collect();

            for _ in 0..batch.num_rows() {
                source_line += 1;
                let cells: Vec<CellValue> = columns
                    .iter_mut()
                    .map(|values| values.next().unwrap_or(CellValue::Null))
                    .collect();
                table.add_row(cells, source_line);
            }
        }

        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "parquet" | "pq")
    }
}

fn column_for_field(field: &Field, index: usize) -> Column {
    let data_type = field.data_type();
    let timezone = match data_type {
        ArrowType::Timestamp(_, Some(tz)) => Some(tz.to_string()),
        _ => None,
    };
    Column::with_type(
        field.name().clone(),
        index,
        arrow_type_to_cell_type(data_type),
        data_type.to_string(),
    )
    .with_timezone(timezone)
}

fn arrow_type_to_cell_type(arrow_type: &ArrowType) -> CellType {
    match arrow_type {
        ArrowType::Null => CellType::Null,
        ArrowType::Boolean => CellType::Bool,
        ArrowType::Int8
        | ArrowType::Int16
        | ArrowType::Int32
        | ArrowType::Int64
        | ArrowType::UInt8
        | ArrowType::UInt16
        | ArrowType::UInt32
        | ArrowType::UInt64 => CellType::Int,
        ArrowType::Float16
        | ArrowType::Float32
        | ArrowType::Float64
        | ArrowType::Decimal128(_, _)
        | ArrowType::Decimal256(_, _) => CellType::Float,
        ArrowType::Utf8 | ArrowType::LargeUtf8 | ArrowType::Utf8View => CellType::String,
        ArrowType::Date32 | ArrowType::Date64 => CellType::Date,
        ArrowType::Time32(_) | ArrowType::Time64(_) => CellType::Time,
        ArrowType::Timestamp(_, _) => CellType::DateTime,
        ArrowType::Dictionary(_, value_type) => arrow_type_to_cell_type(value_type),
        _ => CellType::Complex,
    }
}

/// Decode one Arrow column into cell values, preserving row order
fn column_values(array: &ArrayRef) -> Result<Vec<CellValue>, LoadError> {
    let values = match array.data_type() {
        ArrowType::Null => vec![CellValue::Null; array.len()],
        ArrowType::Boolean => from_options(array.as_boolean().iter(), CellValue::Bool),
        ArrowType::Int8 => ints::<Int8Type>(array),
        ArrowType::Int16 => ints::<Int16Type>(array),
        ArrowType::Int32 => ints::<Int32Type>(array),
        ArrowType::Int64 => ints::<Int64Type>(array),
        ArrowType::UInt8 => ints::<UInt8Type>(array),
        ArrowType::UInt16 => ints::<UInt16Type>(array),
        ArrowType::UInt32 => ints::<UInt32Type>(array),
        ArrowType::UInt64 => from_options(array.as_primitive::<UInt64Type>().iter(), |v| {
            i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Int)
        }),
        ArrowType::Float32 => from_options(array.as_primitive::<Float32Type>().iter(), |v| {
            CellValue::Float(f64::from(v))
        }),
        ArrowType::Float64 => {
            from_options(array.as_primitive::<Float64Type>().iter(), CellValue::Float)
        }
        ArrowType::Float16 | ArrowType::Decimal128(_, _) | ArrowType::Decimal256(_, _) => {
            column_values(&cast(array, &ArrowType::Float64)?)?
        }
        ArrowType::Utf8 => strings(array.as_string::<i32>().iter()),
        ArrowType::LargeUtf8 => strings(array.as_string::<i64>().iter()),
        ArrowType::Utf8View => strings(array.as_string_view().iter()),
        ArrowType::Date32 => {
            temporal::<Date32Type>(array, |a, i| a.value_as_date(i).map(CellValue::Date))
        }
        ArrowType::Date64 => {
            temporal::<Date64Type>(array, |a, i| a.value_as_date(i).map(CellValue::Date))
        }
        ArrowType::Time32(TimeUnit::Second) => {
            temporal::<Time32SecondType>(array, |a, i| a.value_as_time(i).map(CellValue::Time))
        }
        ArrowType::Time32(TimeUnit::Millisecond) => {
            temporal::<Time32MillisecondType>(array, |a, i| {
                a.value_as_time(i).map(CellValue::Time)
            })
        }
        ArrowType::Time64(TimeUnit::Microsecond) => {
            temporal::<Time64MicrosecondType>(array, |a, i| {
                a.value_as_time(i).map(CellValue::Time)
            })
        }
        ArrowType::Time64(TimeUnit::Nanosecond) => {
            temporal::<Time64NanosecondType>(array, |a, i| {
                a.value_as_time(i).map(CellValue::Time)
            })
        }
        // Timezone-aware values decode to UTC wall-clock time
        ArrowType::Timestamp(unit, _) => match unit {
            TimeUnit::Second => temporal::<TimestampSecondType>(array, |a, i| {
                a.value_as_datetime(i).map(CellValue::DateTime)
            }),
            TimeUnit::Millisecond => temporal::<TimestampMillisecondType>(array, |a, i| {
                a.value_as_datetime(i).map(CellValue::DateTime)
            }),
            TimeUnit::Microsecond => temporal::<TimestampMicrosecondType>(array, |a, i| {
                a.value_as_datetime(i).map(CellValue::DateTime)
            }),
            TimeUnit::Nanosecond => temporal::<TimestampNanosecondType>(array, |a, i| {
                a.value_as_datetime(i).map(CellValue::DateTime)
            }),
        },
        ArrowType::Dictionary(_, value_type) => column_values(&cast(array, value_type)?)?,
        _ => complex(array)?,
    };
    Ok(values)
}

fn from_options<T>(
    values: impl Iterator<Item = Option<T>>,
    convert: impl Fn(T) -> CellValue,
) -> Vec<CellValue> {
    values
        .map(|v| v.map_or(CellValue::Null, &convert))
        .collect()
}

fn ints<T>(array: &ArrayRef) -> Vec<CellValue>
where
    T: ArrowPrimitiveType,
    i64: From<T::Native>,
{
    from_options(array.as_primitive::<T>().iter(), |v| {
        CellValue::Int(i64::from(v))
    })
}

fn strings<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<CellValue> {
    from_options(values, |s| CellValue::String(s.to_string()))
}

/// Decode a temporal column; values outside chrono's range keep their raw integer
fn temporal<T>(
    array: &ArrayRef,
    convert: impl Fn(&PrimitiveArray<T>, usize) -> Option<CellValue>,
) -> Vec<CellValue>
where
    T: ArrowPrimitiveType,
    i64: From<T::Native>,
{
    let arr = array.as_primitive::<T>();
    (0..arr.len())
        .map(|i| {
            if arr.is_null(i) {
                CellValue::Null
            } else {
                convert(arr, i).unwrap_or_else(|| CellValue::Int(i64::from(arr.value(i))))
            }
        })
        .collect()
}

/// Nested and binary values are kept as their canonical display text
fn complex(array: &ArrayRef) -> Result<Vec<CellValue>, LoadError> {
    let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default())?;
    Ok((0..array.len())
        .map(|i| {
            if array.is_null(i) {
                CellValue::Null
            } else {
                CellValue::Complex(formatter.value(i).to_string())
            }
        })
        .collect())
}
