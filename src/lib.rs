//! Sheet Filter - eligibility filtering and rule scoring for spreadsheets
//!
//! This library loads a workbook into an in-memory table, applies category
//! and numeric predicates (eligibility) or rubric subscores (rules), and
//! writes the result back out as `.xlsx`.
//!
//! # Features
//!
//! - Category membership and single/range numeric filters
//! - Range operators that accept reversed comparators (`=<` for `<=`)
//! - Per-variable subscores summed into a `rule_score` column
//! - Reporting of requested variables missing from the workbook
//! - HTTP API (axum) and CLI front ends
//!
//! # Example
//!
//! ```no_run
//! use sheet_filter::filter::{run_rules, RuleRequest};
//! use sheet_filter::store::TableStore;
//! use std::path::Path;
//!
//! let store = TableStore::new("storage");
//! let request: RuleRequest = serde_json::from_str(
//!     r#"{"numerical": [{"variable": "age", "description": ["<30", ">60"], "subscore": [1, 3]}]}"#,
//! )?;
//! let summary = run_rules(&store, Path::new("storage/Car loan.xlsx"), request)?;
//!
//! println!("Saved {}", summary.file_name);
//! println!("Missing: {:?}", summary.missing_in_excel);
//! # Ok::<(), sheet_filter::error::FilterError>(())
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod filter;
pub mod operators;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{FilterError, FilterResult};
pub use types::{CellValue, Column, Table};
