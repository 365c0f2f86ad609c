//! Extractor trait for reading data from a source

use crate::error::Result;

/// Extractor trait for extracting data from a source
///
/// Implementors define how to read a dataset from sources like:
/// - CSV files
/// - Database tables
///
/// # Example
/// ```no_run
/// use datasync::dataset::Dataset;
/// use datasync::error::Result;
/// use datasync::etl::Extractor;
///
/// struct EmptySource;
///
/// impl Extractor for EmptySource {
///     type Item = Dataset;
///
///     fn extract(&self) -> Result<Self::Item> {
///         Ok(Dataset::default())
///     }
/// }
/// ```
pub trait Extractor {
    /// The type extracted
    type Item;

    /// Extract from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, parsing, query, etc.)
    fn extract(&self) -> Result<Self::Item>;
}
