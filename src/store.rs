use std::fs;
use std::path::{Path, PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::Builder;

use crate::config::Settings;
use crate::domain::Dataset;
use crate::error::EtlError;
use crate::table::Table;

/// Layout of the output directory: CSV exports and the SQLite database.
#[derive(Debug, Clone)]
pub struct Store {
    output_dir: Utf8PathBuf,
    merged_file: String,
    database_file: String,
}

impl Store {
    pub fn new(settings: &Settings) -> Self {
        Self {
            output_dir: settings.output_dir.clone(),
            merged_file: settings.merged_file.clone(),
            database_file: settings.database_file.clone(),
        }
    }

    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    pub fn merged_path(&self) -> Utf8PathBuf {
        self.output_dir.join(&self.merged_file)
    }

    pub fn dataset_path(&self, dataset: Dataset) -> Utf8PathBuf {
        self.output_dir.join(format!("{}.csv", dataset.file_stem()))
    }

    pub fn database_path(&self) -> Utf8PathBuf {
        self.output_dir.join(&self.database_file)
    }

    pub fn ensure_output_dir(&self) -> Result<(), EtlError> {
        fs::create_dir_all(self.output_dir.as_std_path())
            .map_err(|err| EtlError::Filesystem(err.to_string()))
    }
}

/// Writes `table` as comma-separated text with a header row. The file is
/// staged next to `path` and renamed over any existing file.
pub fn write_csv(table: &Table, path: &Utf8Path) -> Result<(), EtlError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| EtlError::Filesystem(err.to_string()))?;
    let temp = Builder::new()
        .prefix("census-etl")
        .suffix(".tmp")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| EtlError::Filesystem(err.to_string()))?;

    {
        let mut writer = csv::Writer::from_writer(temp.as_file());
        writer
            .write_record(table.columns())
            .map_err(|err| EtlError::Csv(err.to_string()))?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))
                .map_err(|err| EtlError::Csv(err.to_string()))?;
        }
        writer
            .flush()
            .map_err(|err| EtlError::Filesystem(err.to_string()))?;
    }

    temp.persist(path.as_std_path())
        .map_err(|err| EtlError::Filesystem(err.to_string()))?;
    Ok(())
}

/// Every `.csv` file under `root`, recursively, sorted by path.
pub fn discover_csv_files(root: &Path) -> Result<Vec<PathBuf>, EtlError> {
    let mut files: Vec<PathBuf> = walk_dir(root)?
        .into_iter()
        .filter(|path| path.is_file() && path.extension().map(|ext| ext == "csv").unwrap_or(false))
        .collect();
    files.sort();
    Ok(files)
}

fn walk_dir(root: &Path) -> Result<Vec<PathBuf>, EtlError> {
    let mut items = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(path) = stack.pop() {
        let entries = fs::read_dir(&path).map_err(|err| EtlError::Filesystem(err.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|err| EtlError::Filesystem(err.to_string()))?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path.clone());
            }
            items.push(path);
        }
    }
    Ok(items)
}
