//! File system sources
//!
//! Sources read from local files, currently delimited text.

mod csv_reader;

pub use csv_reader::CsvReader;
