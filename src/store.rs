//! Flat-file table storage
//!
//! Sources are read from wherever their path points; results always land in
//! the storage directory as `<name>.xlsx`. There is no locking: two requests
//! writing the same name race and the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::FilterResult;
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::Table;

/// Default storage directory, relative to the working directory
pub const DEFAULT_STORAGE_DIR: &str = "storage";

/// Load/save helper shared by both filters
#[derive(Debug, Clone)]
pub struct TableStore {
    dir: PathBuf,
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_DIR)
    }
}

impl TableStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if missing. Returns `true` when created.
    pub fn ensure_dir(&self) -> FilterResult<bool> {
        if self.dir.is_dir() {
            info!("Directory '{}' already exists.", self.dir.display());
            return Ok(false);
        }
        fs::create_dir_all(&self.dir)?;
        info!("Directory '{}' created successfully!", self.dir.display());
        Ok(true)
    }

    /// Read a source workbook fresh from disk
    pub fn load<P: AsRef<Path>>(&self, source: P) -> FilterResult<Table> {
        let source = source.as_ref();
        let table = ExcelImporter::new(source).import()?;
        debug!(
            source = %source.display(),
            rows = table.row_count(),
            columns = table.columns.len(),
            "Loaded table"
        );
        Ok(table)
    }

    /// Write `table` as `<name>.xlsx` in the storage directory and return
    /// that file name. The suffix is always appended.
    pub fn save(&self, table: &Table, name: &str) -> FilterResult<String> {
        let file_name = Self::output_file_name(name);
        let path = self.dir.join(&file_name);
        ExcelExporter::new(table).export(&path)?;
        debug!(path = %path.display(), rows = table.row_count(), "Saved table");
        Ok(file_name)
    }

    pub fn output_file_name(name: &str) -> String {
        format!("{}.xlsx", name)
    }

    /// Path of a stored file. The name is joined as-is, without checking
    /// that the result stays inside the storage directory.
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// File stem of a source path, used when a request names no output
    pub fn source_stem<P: AsRef<Path>>(source: P) -> String {
        source
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    }
}
