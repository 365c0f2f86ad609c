//! SQL Server client and the store seam used by the table stages.
//!
//! [`Store`] is what the fetch and save stages talk to. [`OdbcStore`] is
//! the production implementation over the Microsoft ODBC driver; tests
//! substitute recording fakes.

mod auth;
mod guard;
mod odbc;

pub use auth::{AuthType, DbAuth};
pub use guard::ConnectionGuard;
pub use odbc::{ConnectionSettings, DEFAULT_DRIVER, OdbcStore};
pub(crate) use odbc::quote_ident;

use crate::dataset::Dataset;
use crate::table::TableName;
use thiserror::Error;

/// Errors raised by a [`Store`]
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("ODBC error: {0}")]
    Odbc(#[from] odbc_api::Error),

    #[error("value in column '{column}' is longer than the {limit}-byte fetch buffer")]
    Truncated { column: String, limit: usize },

    #[error("{0}")]
    Rejected(String),
}

/// Options for [`Store::write_table`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write row labels as a leading `index` column
    pub index: bool,
}

impl WriteOptions {
    /// Replace the whole table and write no index column
    pub fn replace() -> Self {
        Self { index: false }
    }
}

/// A relational store that can run a query and write a dataset to a table
pub trait Store {
    /// Run a query and materialize its result set
    fn query(&self, sql: &str) -> Result<Dataset, StoreError>;

    /// Replace `table` with `data`, dropping any existing table first.
    /// Returns the number of rows inserted.
    fn write_table(
        &self,
        table: &TableName,
        data: &Dataset,
        options: &WriteOptions,
    ) -> Result<u64, StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn query(&self, sql: &str) -> Result<Dataset, StoreError> {
        (**self).query(sql)
    }

    fn write_table(
        &self,
        table: &TableName,
        data: &Dataset,
        options: &WriteOptions,
    ) -> Result<u64, StoreError> {
        (**self).write_table(table, data, options)
    }
}
