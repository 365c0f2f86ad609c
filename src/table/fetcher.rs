//! Table fetcher
//!
//! Reads every row and column of one table.

use crate::client::Store;
use crate::dataset::Dataset;
use crate::error::{FetchError, PipelineError, Result};
use crate::etl::Extractor;
use crate::table::TableName;

/// Extractor that materializes a whole table as a [`Dataset`]
///
/// Column kinds follow the types the store reports for the table.
pub struct TableFetcher<S> {
    store: S,
    table: TableName,
}

impl<S: Store> TableFetcher<S> {
    /// Create a fetcher for `table`. Pass `&store` to keep using the store
    /// afterwards.
    pub fn new(store: S, table: TableName) -> Self {
        Self { store, table }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Query text issued for the table
    pub fn query(&self) -> String {
        format!("SELECT * FROM {}", self.table.quoted())
    }

    fn fetch(&self) -> std::result::Result<Dataset, FetchError> {
        let sql = self.query();
        log::debug!("Fetching with: {}", sql);
        self.store.query(&sql).map_err(|source| FetchError::Store {
            table: self.table.to_string(),
            source,
        })
    }
}

impl<S: Store> Extractor for TableFetcher<S> {
    type Item = Dataset;

    fn extract(&self) -> Result<Self::Item> {
        let data = self
            .fetch()
            .map_err(PipelineError::from)
            .inspect_err(PipelineError::log)?;

        log::info!("Data fetched from {} successfully.", self.table);
        Ok(data)
    }
}
