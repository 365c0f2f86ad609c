//! CLI helper functions

use crate::{
    client::{OdbcStore, Store, StoreError},
    config::SyncConfig,
    error::{self, PipelineError},
    etl::{Extractor, Pipeline},
    storage::CsvReader,
    table::{TableFetcher, TableName, TableWriter},
    transform::Cleaner,
};
use eyre::Result;
use odbc_api::Environment;

/// What one run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// `(rows, columns)` of the CSV, when one was loaded
    pub csv_shape: Option<(usize, usize)>,
    /// Rows written back to the table
    pub rows_written: usize,
}

/// Run a full sync from configuration
///
/// Pipeline: CsvReader (optional) → connect → TableFetcher → Cleaner → TableWriter
///
/// The connection is closed when this returns, whether or not a stage failed.
pub fn run_sync(config: &SyncConfig) -> Result<SyncSummary> {
    let csv_shape = match &config.csv_path {
        Some(path) => {
            let source = CsvReader::new(path).extract()?;
            log::warn!(
                "CSV data ({} rows, {} columns) is loaded for reference only and is not merged into {}",
                source.num_rows(),
                source.num_columns(),
                config.table
            );
            Some(source.shape())
        }
        None => None,
    };

    log::info!("Connecting to SQL Server...");
    let env = Environment::new()
        .map_err(StoreError::from)
        .map_err(PipelineError::Connect)
        .inspect_err(PipelineError::log)?;
    let store = OdbcStore::connect(&env, &config.connection)
        .map_err(PipelineError::Connect)
        .inspect_err(PipelineError::log)?;

    let rows_written = sync_table(&store, &config.table)?;
    log::info!(
        "✓ Synced {} row(s) into {} on {}/{}",
        rows_written,
        config.table,
        store.server(),
        store.database()
    );

    Ok(SyncSummary {
        csv_shape,
        rows_written,
    })
}

/// Read `table`, clean it, and replace it with the cleaned rows
///
/// Pipeline: TableFetcher → Cleaner → TableWriter, all over the same store
pub fn sync_table<S: Store>(store: &S, table: &TableName) -> error::Result<usize> {
    Pipeline::new(
        TableFetcher::new(store, table.clone()),
        Cleaner::default(),
        TableWriter::new(store, table.clone()),
    )
    .run()
}
