mod common;

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use pqxl::download::XLSX_CONTENT_TYPE;
use pqxl::export::{Exporter, SHEET_NAME};
use pqxl::parser::{ParquetParser, Parser};
use pqxl::preview::{preview, DEFAULT_PREVIEW_ROWS};
use pqxl::summary::summarize;
use pqxl::{Config, Event, Session, SourceBlob, Stage};

use common::{empty, five_by_three, numbered, parquet_bytes};

fn load(name: &str, bytes: Vec<u8>) -> pqxl::Table {
    let blob = SourceBlob::upload(name, bytes, &Config::default()).unwrap();
    ParquetParser.parse(&blob, &Config::default()).unwrap()
}

fn sheet(bytes: &[u8]) -> calamine::Range<Data> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
    workbook.worksheet_range(SHEET_NAME).unwrap()
}

#[test]
fn summary_of_five_by_three() {
    let table = load("t.parquet", parquet_bytes(&[five_by_three()]));
    let summary = summarize(&table);

    assert_eq!(summary.rows, 5);
    assert_eq!(summary.columns, 3);
    let b = summary.column_details.iter().find(|c| c.name == "b").unwrap();
    assert_eq!((b.non_null, b.null), (4, 1));
    for column in &summary.column_details {
        assert_eq!(column.non_null + column.null, summary.rows);
    }
}

#[test]
fn export_round_trips_through_a_spreadsheet_reader() {
    let table = load("t.parquet", parquet_bytes(&[five_by_three()]));
    let blob = Exporter::default().export(&table).unwrap();
    let range = sheet(blob.bytes());

    let header: Vec<_> = range.rows().next().unwrap().to_vec();
    assert_eq!(
        header,
        vec![
            Data::String("a".into()),
            Data::String("b".into()),
            Data::String("c".into())
        ]
    );
    assert_eq!(range.height(), 1 + table.row_count());

    let rows: Vec<_> = range.rows().skip(1).collect();
    // Integers come back as spreadsheet numbers
    assert_eq!(rows[0][0], Data::Float(1.0));
    assert_eq!(rows[0][1], Data::String("v".into()));
    assert_eq!(rows[2][1], Data::Empty);
    assert_eq!(rows[4][2], Data::Float(4.5));
}

#[test]
fn export_is_byte_identical_across_runs() {
    let table = load("t.parquet", parquet_bytes(&[numbered(50)]));
    let first = Exporter::default().export(&table).unwrap();
    let second = Exporter::default().export(&table).unwrap();
    assert_eq!(first.bytes(), second.bytes());
}

#[test]
fn preview_returns_at_most_one_hundred_rows_in_order() {
    let table = load("t.parquet", parquet_bytes(&[numbered(250)]));
    let p = preview(&table, DEFAULT_PREVIEW_ROWS);
    assert_eq!(p.len(), 100);
    for (i, row) in p.rows.iter().enumerate() {
        assert_eq!(row[0], pqxl::model::CellValue::Int(i as i64));
    }

    let table = load("t.parquet", parquet_bytes(&[numbered(30)]));
    assert_eq!(preview(&table, DEFAULT_PREVIEW_ROWS).len(), 30);
}

#[test]
fn empty_table_exports_header_only() {
    let table = load("t.parquet", parquet_bytes(&[empty()]));
    let summary = summarize(&table);
    assert_eq!(summary.rows, 0);
    assert_eq!(summary.columns, 2);
    assert!(summary.column_details.iter().all(|c| c.non_null == 0 && c.null == 0));
    assert!(preview(&table, DEFAULT_PREVIEW_ROWS).is_empty());

    let blob = Exporter::default().export(&table).unwrap();
    let range = sheet(blob.bytes());
    assert_eq!(range.get_size(), (1, 2));
}

#[test]
fn bad_upload_then_good_upload() {
    let mut session = Session::default();

    let fake = SourceBlob::upload("notes.parquet", b"hello, world\n".to_vec(), &Config::default())
        .unwrap();
    session.handle(Event::FileSelected(fake));
    assert_eq!(session.stage(), Stage::Failed);
    assert!(session.failure().unwrap().message.contains("could not be processed"));

    let good = SourceBlob::upload(
        "sales_data.parquet",
        parquet_bytes(&[five_by_three()]),
        &Config::default(),
    )
    .unwrap();
    session.handle(Event::FileSelected(good));
    assert_eq!(session.stage(), Stage::Exported);

    let download = session.handle(Event::DownloadRequested).unwrap();
    assert_eq!(download.file_name, "sales_data.xlsx");
    assert_eq!(download.content_type, XLSX_CONTENT_TYPE);
    assert_eq!(sheet(&download.bytes).height(), 6);
}
