//! Loader trait for writing data to destinations

use crate::error::Result;

/// Loader trait for loading data to a destination
///
/// # Example
/// ```no_run
/// use datasync::dataset::Dataset;
/// use datasync::error::Result;
/// use datasync::etl::Loader;
///
/// struct CountingLoader;
///
/// impl Loader for CountingLoader {
///     type Item = Dataset;
///
///     fn load(&self, item: Self::Item) -> Result<usize> {
///         Ok(item.num_rows())
///     }
/// }
/// ```
pub trait Loader {
    /// The type loaded
    type Item;

    /// Load to the destination, consuming the item
    ///
    /// Returns the number of rows written
    ///
    /// # Errors
    /// Returns an error if loading fails (connectivity, permissions, schema, etc.)
    fn load(&self, item: Self::Item) -> Result<usize>;
}
