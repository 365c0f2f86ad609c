//! Error types for the sync pipeline.
//!
//! One error type per stage, each wrapping the underlying cause. Stages log
//! their own failure once and hand the error back unchanged.

use crate::client::StoreError;
use crate::dataset::DatasetError;
use std::path::PathBuf;
use thiserror::Error;

/// CSV source could not be read or parsed
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no header row", path.display())]
    MissingHeader { path: PathBuf },

    #[error("invalid dataset in {}: {source}", path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },
}

/// Full-table read failed
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("query against {table} failed: {source}")]
    Store {
        table: String,
        #[source]
        source: StoreError,
    },
}

/// Cleaning hit a dataset it cannot transform
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("{0}")]
    Dataset(#[from] DatasetError),
}

/// Table replacement failed
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("writing {table} failed: {source}")]
    Store {
        table: String,
        #[source]
        source: StoreError,
    },
}

/// Main error type for a sync run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to connect to SQL Server: {0}")]
    Connect(#[source] StoreError),

    #[error("Failed to load CSV: {0}")]
    Load(#[from] LoadError),

    #[error("Failed to fetch data from SQL: {0}")]
    Fetch(#[from] FetchError),

    #[error("Data cleaning failed: {0}")]
    Clean(#[from] CleanError),

    #[error("Failed to save data to SQL Server: {0}")]
    Save(#[from] SaveError),
}

impl PipelineError {
    /// Log this error once at ERROR level
    pub(crate) fn log(&self) {
        log::error!("Error: {}", self);
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
