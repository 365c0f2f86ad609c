//! Full-table read and replacement against a [`Store`](crate::client::Store)

mod fetcher;
mod name;
mod writer;

pub use fetcher::TableFetcher;
pub use name::{TableName, TableNameError};
pub use writer::TableWriter;
