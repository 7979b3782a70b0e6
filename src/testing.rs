//! Fixture builders shared by unit tests

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::source::SourceBlob;

/// Encode record batches as an in-memory Parquet upload
pub(crate) fn parquet_blob(name: &str, batches: &[RecordBatch]) -> SourceBlob {
    let schema = batches[0].schema();
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema, None).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.close().unwrap();
    SourceBlob::new(name, buf)
}

/// Five rows, three columns, one null in `b`
pub(crate) fn five_by_three() -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("a", Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5])) as ArrayRef),
        (
            "b",
            Arc::new(StringArray::from(vec![
                Some("v"),
                Some("w"),
                None,
                Some("y"),
                Some("z"),
            ])) as ArrayRef,
        ),
        (
            "c",
            Arc::new(Float64Array::from(vec![0.5, 1.5, 2.5, 3.5, 4.5])) as ArrayRef,
        ),
    ])
    .unwrap()
}
