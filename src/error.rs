use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum EtlError {
    #[error("Census API request failed: {0}")]
    CensusHttp(String),

    #[error("Census API returned status {status}: {message}")]
    CensusStatus { status: u16, message: String },

    #[error("malformed Census API response: {0}")]
    MalformedResponse(String),

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("row {row} has {found} fields, expected {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("NAME value does not split into tract; county; state: {0:?}")]
    NameSplit(String),

    #[error("csv error: {0}")]
    Csv(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),
}

impl EtlError {
    /// Process exit status for a fatal error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EtlError::CensusHttp(_)
            | EtlError::CensusStatus { .. }
            | EtlError::MalformedResponse(_) => 3,
            EtlError::Database(_) => 4,
            _ => 1,
        }
    }
}
