use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, DropBehavior, ErrorCode, Transaction, ffi, params_from_iter};
use tracing::{debug, info, warn};

use crate::error::EtlError;
use crate::store::discover_csv_files;

const PRIMARY_KEY_MARKER: &str = "geo_id";
const QUOTE_TRIGGERS: [char; 4] = [' ', ',', '&', '.'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub needs_quoting: bool,
}

impl ColumnDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            needs_quoting: name.contains(QUOTE_TRIGGERS),
        }
    }

    pub fn sql_name(&self) -> String {
        quote_if(&self.name, self.needs_quoting)
    }
}

fn quote_if(name: &str, needs_quoting: bool) -> String {
    if needs_quoting {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Table layout inferred from a CSV header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub primary_key: ColumnDescriptor,
    /// Every header column other than the key, in header order.
    pub columns: Vec<ColumnDescriptor>,
    header: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Picks the first header containing `geo_id` (any case) as the key.
    /// Returns `None` when no header qualifies.
    pub fn infer(table: &str, header: &[String]) -> Option<Self> {
        let key_index = header
            .iter()
            .position(|column| column.to_lowercase().contains(PRIMARY_KEY_MARKER))?;
        let header: Vec<ColumnDescriptor> = header
            .iter()
            .map(|column| ColumnDescriptor::new(column))
            .collect();
        let columns = header
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != key_index)
            .map(|(_, column)| column.clone())
            .collect();
        Some(Self {
            table: table.to_string(),
            primary_key: header[key_index].clone(),
            columns,
            header,
        })
    }

    fn table_sql_name(&self) -> String {
        quote_if(&self.table, self.table.contains(QUOTE_TRIGGERS))
    }

    pub fn create_table_sql(&self) -> String {
        let mut definitions = vec![format!("{} INTEGER PRIMARY KEY", self.primary_key.sql_name())];
        definitions.extend(self.columns.iter().map(ColumnDescriptor::sql_name));
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table_sql_name(),
            definitions.join(", ")
        )
    }

    /// Positional insert binding values in header order.
    pub fn insert_sql(&self) -> String {
        let names: Vec<String> = self.header.iter().map(ColumnDescriptor::sql_name).collect();
        let placeholders = vec!["?"; self.header.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table_sql_name(),
            names.join(", "),
            placeholders
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad {
    pub table: String,
    pub file: PathBuf,
    pub inserted: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub tables: Vec<TableLoad>,
    pub skipped: Vec<PathBuf>,
}

impl LoadSummary {
    pub fn inserted(&self) -> usize {
        self.tables.iter().map(|table| table.inserted).sum()
    }

    pub fn rejected(&self) -> usize {
        self.tables.iter().map(|table| table.rejected).sum()
    }
}

/// Loads every CSV file under `directory` into the SQLite database at
/// `database`, one table per file. Everything runs in one transaction that is
/// committed at the end, and also when a fatal error stops the load early.
pub fn load_all(directory: &Path, database: &Path) -> Result<LoadSummary, EtlError> {
    let files = discover_csv_files(directory)?;

    if let Some(parent) = database.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| EtlError::Filesystem(err.to_string()))?;
    }
    let mut connection =
        Connection::open(database).map_err(|err| EtlError::Database(err.to_string()))?;

    let summary = {
        let mut tx = connection
            .transaction()
            .map_err(|err| EtlError::Database(err.to_string()))?;
        tx.set_drop_behavior(DropBehavior::Commit);

        let mut summary = LoadSummary::default();
        for file in files {
            match load_file(&tx, &file)? {
                Some(load) => summary.tables.push(load),
                None => summary.skipped.push(file),
            }
        }
        tx.commit()
            .map_err(|err| EtlError::Database(err.to_string()))?;
        summary
    };

    connection
        .close()
        .map_err(|(_, err)| EtlError::Database(err.to_string()))?;
    Ok(summary)
}

fn load_file(tx: &Transaction<'_>, path: &Path) -> Result<Option<TableLoad>, EtlError> {
    let table = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut reader = csv::Reader::from_path(path).map_err(|err| EtlError::Csv(err.to_string()))?;
    let header: Vec<String> = reader
        .headers()
        .map_err(|err| EtlError::Csv(err.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let Some(schema) = TableSchema::infer(&table, &header) else {
        warn!(file = %path.display(), "skipping file, no geo_id column found");
        return Ok(None);
    };

    tx.execute(&schema.create_table_sql(), [])
        .map_err(|err| EtlError::Database(err.to_string()))?;
    let mut statement = tx
        .prepare(&schema.insert_sql())
        .map_err(|err| EtlError::Database(err.to_string()))?;

    let mut inserted = 0;
    let mut rejected = 0;
    for record in reader.records() {
        let record = record.map_err(|err| EtlError::Csv(err.to_string()))?;
        match statement.execute(params_from_iter(record.iter())) {
            Ok(_) => inserted += 1,
            Err(rusqlite::Error::SqliteFailure(err, _)) if is_key_conflict(&err) => {
                rejected += 1;
                debug!(table = %schema.table, row = ?record, "row rejected, primary key exists");
            }
            Err(err) => return Err(EtlError::Database(err.to_string())),
        }
    }

    if rejected > 0 {
        warn!(
            table = %schema.table,
            rejected,
            "rows dropped on primary key conflict"
        );
    }
    info!(table = %schema.table, file = %path.display(), inserted, "loaded table");

    Ok(Some(TableLoad {
        table: schema.table,
        file: path.to_path_buf(),
        inserted,
        rejected,
    }))
}

fn is_key_conflict(err: &ffi::Error) -> bool {
    err.code == ErrorCode::ConstraintViolation
        && matches!(
            err.extended_code,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
        )
}
