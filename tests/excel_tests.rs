//! Workbook load/save tests

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use sheet_filter::excel::{ExcelExporter, ExcelImporter};
use sheet_filter::{CellValue, Column, FilterError, Table};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_import_pandas_style_workbook() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("pandas.xlsx");

    // Index column with blank header, a duplicated header and a short row
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 1, "name").unwrap();
    sheet.write_string(0, 2, "score").unwrap();
    sheet.write_string(0, 3, "score").unwrap();
    sheet.write_number(1, 0, 0.0).unwrap();
    sheet.write_string(1, 1, "Ann").unwrap();
    sheet.write_number(1, 2, 7.0).unwrap();
    sheet.write_number(1, 3, 8.0).unwrap();
    sheet.write_number(2, 0, 1.0).unwrap();
    sheet.write_string(2, 1, "Bo").unwrap();
    sheet.write_boolean(2, 2, true).unwrap();
    workbook.save(&path).unwrap();

    let table = ExcelImporter::new(&path).import().unwrap();

    assert_eq!(
        table.column_names(),
        vec!["Unnamed: 0", "name", "score", "score.1"]
    );
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.index, vec![0, 1]);
    assert_eq!(
        table.column("score").unwrap().values,
        vec![CellValue::Number(7.0), CellValue::Bool(true)]
    );
    assert_eq!(
        table.column("score.1").unwrap().values,
        vec![CellValue::Number(8.0), CellValue::Empty]
    );
}

#[test]
fn test_export_overwrites_existing_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("out.xlsx");

    let first = Table::from_columns(vec![Column::new(
        "a",
        vec![CellValue::Number(1.0), CellValue::Number(2.0)],
    )])
    .unwrap();
    let second = Table::from_columns(vec![Column::new(
        "b",
        vec![CellValue::Text("x".to_string())],
    )])
    .unwrap();

    ExcelExporter::new(&first).export(&path).unwrap();
    ExcelExporter::new(&second).export(&path).unwrap();

    let loaded = ExcelImporter::new(&path).import().unwrap();
    assert_eq!(loaded.column_names(), vec!["Unnamed: 0", "b"]);
    assert_eq!(loaded.row_count(), 1);
}

#[test]
fn test_reexport_keeps_index_column_as_data() {
    let tmp = TempDir::new().unwrap();
    let first_path = tmp.path().join("first.xlsx");
    let second_path = tmp.path().join("second.xlsx");

    let table = Table::from_columns(vec![Column::new(
        "age",
        vec![CellValue::Number(20.0)],
    )])
    .unwrap();
    ExcelExporter::new(&table).export(&first_path).unwrap();

    let reloaded = ExcelImporter::new(&first_path).import().unwrap();
    ExcelExporter::new(&reloaded).export(&second_path).unwrap();
    let twice = ExcelImporter::new(&second_path).import().unwrap();

    // The fresh index column claims "Unnamed: 0"; the old one shifts right
    assert_eq!(twice.column_names(), vec!["Unnamed: 0", "Unnamed: 0.1", "age"]);
}

#[test]
fn test_import_garbage_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.xlsx");
    fs::write(&path, b"not a workbook").unwrap();

    let result = ExcelImporter::new(&path).import();
    assert!(matches!(result, Err(FilterError::UnparsableFile(_))));
}

#[test]
fn test_import_empty_sheet() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.xlsx");
    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(&path).unwrap();

    let table = ExcelImporter::new(&path).import().unwrap();
    assert_eq!(table.row_count(), 0);
    assert!(table.columns.is_empty());
}
