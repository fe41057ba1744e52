//! CSV Data Loader Module
//! Reads the crime CSV with Polars and memoizes the result per file path.

use crate::data::RecordTable;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// A loaded table plus the file modification time it was read at.
struct CachedTable {
    table: Arc<RecordTable>,
    modified: Option<SystemTime>,
}

/// Loads CSV files and keeps one immutable table per path.
///
/// A cached entry is reused until the file's modification time changes.
#[derive(Default)]
pub struct DataLoader {
    cache: HashMap<PathBuf, CachedTable>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a CSV file, returning the cached table when the file is unchanged.
    pub fn load(&mut self, path: &Path) -> Result<Arc<RecordTable>, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let modified = std::fs::metadata(path)
            .map_err(|source| LoaderError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .modified()
            .ok();

        if let Some(cached) = self.cache.get(path) {
            if cached.modified == modified {
                log::debug!("Cache hit for {}", path.display());
                return Ok(Arc::clone(&cached.table));
            }
            log::info!("{} changed on disk, reloading", path.display());
        }

        let table = Arc::new(Self::read_csv(path)?);
        log::info!(
            "Loaded {} rows, {} columns from {}",
            table.height(),
            table.frame().width(),
            path.display()
        );

        self.cache.insert(
            path.to_path_buf(),
            CachedTable {
                table: Arc::clone(&table),
                modified,
            },
        );

        Ok(table)
    }

    /// Read a CSV file with every column kept as text.
    ///
    /// Typing happens afterwards in the schema guard.
    pub fn read_csv(path: &Path) -> Result<RecordTable, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        Ok(RecordTable::new(df))
    }

    /// Drop the cached table for one path.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.cache.remove(path).is_some()
    }

    /// Drop every cached table.
    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[cfg(test)]
    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const CSV: &str = "tipo_crime,estado,ano,registros\n\
                       Roubo,SP,2023,120\n\
                       Furto,RJ,2022,80\n";

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = DataLoader::new();

        let err = loader.load(&dir.path().join("crimes.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[test]
    fn loads_rows_in_file_order_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "crimes.csv", CSV);
        let mut loader = DataLoader::new();

        let table = loader.load(&path).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(
            table.column_names(),
            vec!["tipo_crime", "estado", "ano", "registros"]
        );

        let estados = table.frame().column("estado").unwrap();
        assert_eq!(estados.dtype(), &DataType::String);
        assert_eq!(
            estados.as_materialized_series().str().unwrap().get(1),
            Some("RJ")
        );
    }

    #[test]
    fn second_load_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "crimes.csv", CSV);
        let mut loader = DataLoader::new();

        let first = loader.load(&path).unwrap();
        let second = loader.load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.frame().equals(second.frame()));
    }

    #[test]
    fn invalidate_forces_reread_with_same_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "crimes.csv", CSV);
        let mut loader = DataLoader::new();

        let first = loader.load(&path).unwrap();
        assert!(loader.invalidate(&path));
        assert!(!loader.is_cached(&path));

        let second = loader.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(first.frame().equals(second.frame()));
    }

    #[test]
    fn changed_mtime_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "crimes.csv", CSV);
        let mut loader = DataLoader::new();
        let first = loader.load(&path).unwrap();

        write_csv(
            &dir,
            "crimes.csv",
            "tipo_crime,estado,ano,registros\nRoubo,SP,2024,1\n",
        );
        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + std::time::Duration::from_secs(60))
            .unwrap();

        let second = loader.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.height(), 1);
    }

    #[test]
    fn separate_loaders_do_not_share_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "crimes.csv", CSV);

        let mut a = DataLoader::new();
        a.load(&path).unwrap();

        let b = DataLoader::new();
        assert!(a.is_cached(&path));
        assert!(!b.is_cached(&path));
    }
}
