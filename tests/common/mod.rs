#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

pub fn parquet_bytes(batches: &[RecordBatch]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batches[0].schema(), None).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.close().unwrap();
    buf
}

pub fn write_parquet(dir: &Path, name: &str, batches: &[RecordBatch]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, parquet_bytes(batches)).unwrap();
    path
}

/// Five rows, three columns, one null in `b`
pub fn five_by_three() -> RecordBatch {
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

/// `rows` rows of increasing ids with a flag column
pub fn numbered(rows: i64) -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("id", Arc::new(Int64Array::from_iter_values(0..rows)) as ArrayRef),
        (
            "even",
            Arc::new(BooleanArray::from_iter((0..rows).map(|i| Some(i % 2 == 0)))) as ArrayRef,
        ),
    ])
    .unwrap()
}

/// Zero rows, two columns
pub fn empty() -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("a", Arc::new(Int64Array::from(Vec::<i64>::new())) as ArrayRef),
        ("b", Arc::new(StringArray::from(Vec::<&str>::new())) as ArrayRef),
    ])
    .unwrap()
}
