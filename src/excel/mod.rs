//! Spreadsheet load/save for tables
//!
//! - Import: workbook (.xlsx, .xls, .ods) → `Table`, first worksheet only
//! - Export: `Table` → .xlsx, row index in the first column

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;
