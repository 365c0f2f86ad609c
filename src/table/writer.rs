//! Table writer
//!
//! Replaces a table's entire contents with a dataset.

use crate::client::{Store, WriteOptions};
use crate::dataset::Dataset;
use crate::error::{PipelineError, Result, SaveError};
use crate::etl::Loader;
use crate::table::TableName;

/// Loader that replaces `table` with the incoming dataset, writing no
/// index column
pub struct TableWriter<S> {
    store: S,
    table: TableName,
    options: WriteOptions,
}

impl<S: Store> TableWriter<S> {
    pub fn new(store: S, table: TableName) -> Self {
        Self {
            store,
            table,
            options: WriteOptions::replace(),
        }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    fn save(&self, data: &Dataset) -> std::result::Result<u64, SaveError> {
        self.store
            .write_table(&self.table, data, &self.options)
            .map_err(|source| SaveError::Store {
                table: self.table.to_string(),
                source,
            })
    }
}

impl<S: Store> Loader for TableWriter<S> {
    type Item = Dataset;

    fn load(&self, item: Self::Item) -> Result<usize> {
        let written = self
            .save(&item)
            .map_err(PipelineError::from)
            .inspect_err(PipelineError::log)?;

        log::info!("Data saved back to {} successfully.", self.table);
        Ok(written as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StoreError;

    #[test]
    fn test_defaults_to_replace_without_index() {
        struct NullStore;
        impl Store for NullStore {
            fn query(&self, _sql: &str) -> std::result::Result<Dataset, StoreError> {
                Ok(Dataset::default())
            }
            fn write_table(
                &self,
                _table: &TableName,
                data: &Dataset,
                options: &WriteOptions,
            ) -> std::result::Result<u64, StoreError> {
                assert!(!options.index);
                Ok(data.num_rows() as u64)
            }
        }

        let writer = TableWriter::new(NullStore, TableName::parse("dbo.Diwali").unwrap());
        assert_eq!(writer.options(), &WriteOptions::replace());
        assert_eq!(writer.load(Dataset::default()).unwrap(), 0);
    }
}
