//! Error types for roster loading and write-back

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading, validating or rewriting a participant spreadsheet
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("unsupported roster format for {path} (expected .xlsx or .csv)")]
    UnsupportedFormat { path: PathBuf },

    #[error("required column '{column}' not found")]
    MissingColumn { column: &'static str },

    #[error("row {row}: id must be a non-negative whole number")]
    InvalidId { row: usize },

    #[error("id {id} appears more than once")]
    DuplicateId { id: u64 },

    #[error("row {row}: name is empty")]
    EmptyName { row: usize },

    #[error("spreadsheet {path} has no worksheet")]
    NoWorksheet { path: PathBuf },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read spreadsheet {path}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("failed to process csv {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write spreadsheet {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

impl RosterError {
    /// True for problems with the roster's content rather than the file system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RosterError::UnsupportedFormat { .. }
                | RosterError::MissingColumn { .. }
                | RosterError::InvalidId { .. }
                | RosterError::DuplicateId { .. }
                | RosterError::EmptyName { .. }
                | RosterError::NoWorksheet { .. }
        )
    }
}
