//! Excel exporter implementation

use crate::error::{FilterError, FilterResult};
use crate::types::{CellValue, Table};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Excel exporter for tables
///
/// Writes a single worksheet. By default column A holds the row index under
/// a blank header, so re-importing the file yields an `Unnamed: 0` column.
pub struct ExcelExporter<'a> {
    table: &'a Table,
    include_index: bool,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            include_index: true,
        }
    }

    /// Toggle the leading row-index column
    pub fn with_index(mut self, include_index: bool) -> Self {
        self.include_index = include_index;
        self
    }

    /// Export the table to an Excel .xlsx file, overwriting any existing file
    pub fn export(&self, output_path: &Path) -> FilterResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        self.write_table(worksheet)?;

        workbook
            .save(output_path)
            .map_err(|e| FilterError::Export(format!("Failed to save Excel file: {}", e)))?;

        Ok(())
    }

    fn write_table(&self, worksheet: &mut Worksheet) -> FilterResult<()> {
        let offset: u16 = if self.include_index { 1 } else { 0 };

        // Header row (row 0); the index column header stays blank
        for (col_idx, column) in self.table.columns.iter().enumerate() {
            let col = Self::excel_col(col_idx, offset)?;
            worksheet
                .write_string(0, col, &column.name)
                .map_err(|e| FilterError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, source_row) in self.table.index.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32; // +1 for header row

            if self.include_index {
                worksheet
                    .write_number(excel_row, 0, *source_row as f64)
                    .map_err(|e| FilterError::Export(format!("Failed to write index: {}", e)))?;
            }

            for (col_idx, column) in self.table.columns.iter().enumerate() {
                if let Some(value) = column.values.get(row_idx) {
                    let col = Self::excel_col(col_idx, offset)?;
                    Self::write_cell_value(worksheet, excel_row, col, value)?;
                }
            }
        }

        Ok(())
    }

    fn excel_col(col_idx: usize, offset: u16) -> FilterResult<u16> {
        u16::try_from(col_idx)
            .ok()
            .and_then(|col| col.checked_add(offset))
            .ok_or_else(|| FilterError::Export(format!("Too many columns: {}", col_idx)))
    }

    /// Write a single cell; `Empty` cells stay blank
    fn write_cell_value(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        value: &CellValue,
    ) -> FilterResult<()> {
        match value {
            CellValue::Empty => {}
            CellValue::Number(n) => {
                worksheet
                    .write_number(row, col, *n)
                    .map_err(|e| FilterError::Export(format!("Failed to write number: {}", e)))?;
            }
            CellValue::Text(s) => {
                worksheet
                    .write_string(row, col, s)
                    .map_err(|e| FilterError::Export(format!("Failed to write text: {}", e)))?;
            }
            CellValue::Bool(b) => {
                worksheet.write_boolean(row, col, *b).map_err(|e| {
                    FilterError::Export(format!("Failed to write boolean: {}", e))
                })?;
            }
        }
        Ok(())
    }
}
