//! datasync
//!
//! A small ETL tool that cleans a SQL Server table in place: fetch every
//! row, drop clutter columns, rename legacy columns, deduplicate, and
//! replace the table with the result.

pub mod cli;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod etl;
pub mod logging;
pub mod storage;
pub mod table;
pub mod transform;

// Re-exports for convenience
pub use client::{OdbcStore, Store, StoreError, WriteOptions};
pub use config::SyncConfig;
pub use dataset::{Dataset, Value};
pub use error::PipelineError;
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use storage::CsvReader;
pub use table::{TableFetcher, TableName, TableWriter};
pub use transform::Cleaner;
