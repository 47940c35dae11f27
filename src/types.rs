use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FilterError, FilterResult};

//==============================================================================
// Cell Values
//==============================================================================

/// A single spreadsheet cell
///
/// Also the wire form of category values in request payloads, so `null`,
/// numbers, strings and booleans all deserialize into it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric view of the cell. Only `Number` cells take part in comparisons.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Category membership equality. `Empty` never matches, not even itself.
    pub fn matches(&self, other: &CellValue) -> bool {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

//==============================================================================
// Columns and Tables
//==============================================================================

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column of `len` copies of `value`
    pub fn filled(name: impl Into<String>, len: usize, value: CellValue) -> Self {
        Self::new(name, vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// In-memory dataset: ordered columns aligned by row position
///
/// `index` holds the source row number of each row. It starts as `0..n` and
/// is carried through filtering, so an exported table shows which source rows
/// survived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub index: Vec<usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, checking they all have the same length
    pub fn from_columns(columns: Vec<Column>) -> FilterResult<Self> {
        let row_count = columns.first().map_or(0, |col| col.len());
        let table = Self {
            columns,
            index: (0..row_count).collect(),
        };
        table.validate_lengths()?;
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|col| col.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|col| col.name == name)
    }

    /// Look up a column that the caller requires to exist
    pub fn require_column(&self, name: &str) -> FilterResult<&Column> {
        self.column(name)
            .ok_or_else(|| FilterError::UnknownColumn(name.to_string()))
    }

    /// Insert a column, replacing any column with the same name in place
    pub fn set_column(&mut self, column: Column) -> FilterResult<()> {
        if self.columns.is_empty() && self.index.is_empty() {
            self.index = (0..column.len()).collect();
        }
        if column.len() != self.row_count() {
            return Err(FilterError::InvalidPayload(format!(
                "Column '{}' has {} rows, expected {} rows",
                column.name,
                column.len(),
                self.row_count()
            )));
        }
        match self.column_mut(&column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Keep only the rows whose mask entry is `true`, preserving order
    pub fn retain_rows(&mut self, mask: &[bool]) {
        debug_assert_eq!(mask.len(), self.row_count());
        let keep = |i: usize| mask.get(i).copied().unwrap_or(false);
        for column in &mut self.columns {
            let mut i = 0;
            column.values.retain(|_| {
                let kept = keep(i);
                i += 1;
                kept
            });
        }
        let mut i = 0;
        self.index.retain(|_| {
            let kept = keep(i);
            i += 1;
            kept
        });
    }

    /// Validate all columns have the same length
    pub fn validate_lengths(&self) -> FilterResult<()> {
        let row_count = self.row_count();
        for column in &self.columns {
            if column.len() != row_count {
                return Err(FilterError::UnparsableFile(format!(
                    "Column '{}' has {} rows, expected {} rows",
                    column.name,
                    column.len(),
                    row_count
                )));
            }
        }
        Ok(())
    }
}
