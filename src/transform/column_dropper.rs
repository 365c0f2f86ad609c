//! Column dropper transformer
//!
//! Removes named columns, typically export artifacts and workflow state
//! that should not be stored with the data.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::etl::Transformer;

/// Transformer that drops the named columns that are present
///
/// Missing columns are ignored.
///
/// # Example
/// ```
/// use datasync::dataset::{Dataset, Value};
/// use datasync::etl::Transformer;
/// use datasync::transform::ColumnDropper;
///
/// let dropper = ColumnDropper::new(vec!["Status"]);
/// let input = Dataset::from_columns(vec![
///     ("Status", vec![Value::from("Delivered")]),
///     ("User_ID", vec![Value::from(1i64)]),
/// ])
/// .unwrap();
///
/// let output = dropper.transform(input).unwrap();
/// assert_eq!(output.column_names(), vec!["User_ID"]);
/// ```
pub struct ColumnDropper {
    columns: Vec<String>,
}

impl ColumnDropper {
    /// Create a new column dropper with the specified columns to remove
    pub fn new(columns: Vec<&str>) -> Self {
        Self {
            columns: columns.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Drops: Unnamed, Status
    pub fn default_columns() -> Self {
        Self::new(vec!["Unnamed", "Status"])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Transformer for ColumnDropper {
    type Input = Dataset;
    type Output = Dataset;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        let names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let dropped = input.drop_columns(&names);
        log::debug!("Dropped {} column(s)", dropped);
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    #[test]
    fn test_drop_default_columns() {
        let dropper = ColumnDropper::default_columns();
        let input = Dataset::from_columns(vec![
            ("Unnamed", vec![Value::Null]),
            ("Status", vec![Value::from("Pending")]),
            ("Cust_name", vec![Value::from("Bob")]),
        ])
        .unwrap();

        let output = dropper.transform(input).unwrap();
        assert_eq!(output.column_names(), vec!["Cust_name"]);
        assert_eq!(output.get(0, "Cust_name"), Some(&Value::from("Bob")));
    }

    #[test]
    fn test_missing_columns_are_ignored() {
        let dropper = ColumnDropper::default_columns();
        let input = Dataset::from_columns(vec![("unnamed1", vec![Value::Null])]).unwrap();

        let output = dropper.transform(input.clone()).unwrap();
        assert_eq!(output, input);
    }
}
