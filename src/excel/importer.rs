//! Excel importer implementation - workbook → Table

use crate::error::{FilterError, FilterResult};
use crate::types::{CellValue, Column, Table};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Excel importer for loading the first worksheet of a workbook into a `Table`
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the whole first worksheet. Row 0 is the header.
    pub fn import(&self) -> FilterResult<Table> {
        if !self.path.exists() {
            return Err(FilterError::FileNotFound(self.path.display().to_string()));
        }

        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            FilterError::UnparsableFile(format!(
                "Failed to open Excel file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
            FilterError::UnparsableFile(format!("{} has no worksheets", self.path.display()))
        })?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            FilterError::UnparsableFile(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        self.range_to_table(&range)
    }

    /// Convert a worksheet range into a table
    fn range_to_table(&self, range: &Range<Data>) -> FilterResult<Table> {
        if range.is_empty() {
            return Ok(Table::new());
        }

        let (height, width) = range.get_size();
        let mut columns: Vec<Column> = self
            .header_names(range, width)
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(height.saturating_sub(1))))
            .collect();

        // Skip header row; short rows are padded with Empty
        for row in 1..height {
            for (col, column) in columns.iter_mut().enumerate() {
                let cell = range
                    .get((row, col))
                    .map(Self::convert_cell)
                    .unwrap_or_default();
                column.values.push(cell);
            }
        }

        Table::from_columns(columns)
    }

    /// Read header row, naming blanks `Unnamed: <col>` and suffixing repeats
    fn header_names(&self, range: &Range<Data>, width: usize) -> Vec<String> {
        let names: Vec<String> = (0..width)
            .map(|col| match range.get((0, col)) {
                Some(Data::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(Data::Int(i)) => i.to_string(),
                Some(Data::Float(f)) => f.to_string(),
                Some(Data::Bool(b)) => b.to_string(),
                _ => format!("Unnamed: {}", col),
            })
            .collect();

        Self::dedupe_names(names)
    }

    /// `a, a, a` → `a, a.1, a.2`; a suffixed name that is already taken is
    /// suffixed again (`a, a, a.1` → `a, a.1, a.1.1`)
    fn dedupe_names(names: Vec<String>) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        names
            .into_iter()
            .map(|mut name| {
                let mut count = seen.get(&name).copied().unwrap_or(0);
                while count > 0 {
                    seen.insert(name.clone(), count + 1);
                    name = format!("{}.{}", name, count);
                    count = seen.get(&name).copied().unwrap_or(0);
                }
                seen.insert(name.clone(), count + 1);
                name
            })
            .collect()
    }

    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            _ => CellValue::Empty,
        }
    }
}
