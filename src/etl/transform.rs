//! Transformer trait for data transformation

use crate::error::Result;

/// Transformer trait for transforming data
///
/// Implementors define one structural edit, such as:
/// - Removing columns
/// - Renaming columns
/// - Removing duplicate rows
///
/// # Example
/// ```
/// use datasync::dataset::{Dataset, Value};
/// use datasync::error::Result;
/// use datasync::etl::Transformer;
///
/// struct FirstRowOnly;
///
/// impl Transformer for FirstRowOnly {
///     type Input = Dataset;
///     type Output = usize;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.num_rows().min(1))
///     }
/// }
///
/// let data = Dataset::from_columns(vec![("a", vec![Value::from(1i64), Value::from(2i64)])]).unwrap();
/// assert_eq!(FirstRowOnly.transform(data).unwrap(), 1);
/// ```
pub trait Transformer {
    /// Input type
    type Input;

    /// Output type after transformation
    type Output;

    /// Transform the input, taking ownership of it
    ///
    /// # Errors
    /// Returns an error if transformation fails
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;
}
