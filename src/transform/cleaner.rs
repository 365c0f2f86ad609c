//! Cleaning sequence applied before a table is written back

use super::{ColumnDropper, ColumnRenamer, DuplicateDropper, IndexResetter};
use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::etl::Transformer;

/// Fixed cleaning pipeline
///
/// Steps, in order:
/// 1. Drop `Unnamed` and `Status` when present
/// 2. Rename `nage` to `age_group` when present
/// 3. Drop rows identical to an earlier row
/// 4. Relabel rows `0..len`
///
/// The result has none of the dropped columns, no duplicate rows and
/// contiguous labels, and cleaning it again changes nothing.
///
/// # Example
/// ```
/// use datasync::dataset::{Dataset, Value};
/// use datasync::etl::Transformer;
/// use datasync::transform::Cleaner;
///
/// let input = Dataset::from_columns(vec![
///     ("Unnamed", vec![Value::Null, Value::Null]),
///     ("Status", vec![Value::from("Delivered"), Value::from("Pending")]),
///     ("Age Group", vec![Value::from("18-25"), Value::from("26-35")]),
/// ])
/// .unwrap();
///
/// let cleaned = Cleaner::default().transform(input).unwrap();
/// assert_eq!(cleaned.column_names(), vec!["Age Group"]);
/// assert_eq!(cleaned.index(), &[0, 1]);
/// ```
pub struct Cleaner {
    dropper: ColumnDropper,
    renamer: ColumnRenamer,
    duplicates: DuplicateDropper,
    reindex: IndexResetter,
}

impl Cleaner {
    pub fn new(dropper: ColumnDropper, renamer: ColumnRenamer) -> Self {
        Self {
            dropper,
            renamer,
            duplicates: DuplicateDropper::new(),
            reindex: IndexResetter::new(),
        }
    }

    fn clean(&self, input: Dataset) -> Result<Dataset> {
        let data = self.dropper.transform(input)?;
        let data = self.renamer.transform(data)?;
        let data = self.duplicates.transform(data)?;
        self.reindex.transform(data)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(
            ColumnDropper::default_columns(),
            ColumnRenamer::default_renames(),
        )
    }
}

impl Transformer for Cleaner {
    type Input = Dataset;
    type Output = Dataset;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let cleaned = self.clean(input).inspect_err(PipelineError::log)?;
        log::info!("Data cleaning and transformation completed successfully.");
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;
    use std::collections::HashSet;

    fn texts(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_clean_data() {
        let input = Dataset::from_columns(vec![
            ("Unnamed", vec![Value::Null, Value::Null]),
            ("Status", texts(&["Delivered", "Pending"])),
            ("Age Group", texts(&["18-25", "26-35"])),
            ("User_ID", ints(&[1, 2])),
            ("Cust_name", texts(&["Alice", "Bob"])),
        ])
        .unwrap();

        let cleaned = Cleaner::default().transform(input).unwrap();

        assert_eq!(cleaned.column_names(), vec!["Age Group", "User_ID", "Cust_name"]);
        assert_eq!(cleaned.num_rows(), 2);
        assert_eq!(cleaned.get(0, "Age Group"), Some(&Value::from("18-25")));
        assert_eq!(cleaned.get(1, "Age Group"), Some(&Value::from("26-35")));
        assert_eq!(cleaned.index(), &[0, 1]);
    }

    #[test]
    fn test_duplicates_found_after_dropping_columns() {
        // Rows differ only in Status, so they collapse once it is gone
        let input = Dataset::from_columns(vec![
            ("Status", texts(&["Delivered", "Pending", "Pending"])),
            ("nage", texts(&["26-35", "26-35", "18-25"])),
            ("User_ID", ints(&[7, 7, 8])),
        ])
        .unwrap();

        let cleaned = Cleaner::default().transform(input).unwrap();

        assert_eq!(cleaned.column_names(), vec!["age_group", "User_ID"]);
        assert_eq!(cleaned.num_rows(), 2);
        assert_eq!(cleaned.values("User_ID").unwrap(), vec![&Value::from(7i64), &Value::from(8i64)]);
        assert_eq!(cleaned.index(), &[0, 1]);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let input = Dataset::from_columns(vec![
            ("Unnamed", vec![Value::Null, Value::Null, Value::Null]),
            ("nage", texts(&["a", "a", "b"])),
            ("Orders", ints(&[1, 1, 3])),
        ])
        .unwrap();

        let cleaner = Cleaner::default();
        let once = cleaner.transform(input).unwrap();
        let twice = cleaner.transform(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_policy() {
        let cleaner = Cleaner::new(
            ColumnDropper::new(vec!["tmp"]),
            ColumnRenamer::new(vec![("nm", "name")]),
        );
        let input = Dataset::from_columns(vec![
            ("tmp", ints(&[1])),
            ("Status", texts(&["kept"])),
            ("nm", texts(&["Zoe"])),
        ])
        .unwrap();

        let cleaned = cleaner.transform(input).unwrap();
        assert_eq!(cleaned.column_names(), vec!["Status", "name"]);
    }

    #[test]
    fn test_cleaned_shape_invariants() {
        let cases: Vec<(&str, Dataset)> = vec![
            ("no columns", Dataset::default()),
            (
                "no rows",
                Dataset::from_columns(vec![("Status", Vec::new()), ("User_ID", Vec::new())]).unwrap(),
            ),
            (
                "all duplicates",
                Dataset::from_columns(vec![
                    ("nage", texts(&["a", "a", "a", "a"])),
                    ("Orders", ints(&[2, 2, 2, 2])),
                ])
                .unwrap(),
            ),
            (
                "no target columns",
                Dataset::from_columns(vec![
                    ("User_ID", ints(&[3, 1, 3, 2])),
                    ("Cust_name", texts(&["Cy", "Al", "Cy", "Bo"])),
                ])
                .unwrap(),
            ),
            (
                "nan and null rows",
                Dataset::from_columns(vec![
                    (
                        "Amount",
                        vec![
                            Value::from(f64::NAN),
                            Value::from(f64::NAN),
                            Value::Null,
                            Value::Null,
                            Value::from(-0.0),
                            Value::from(0.0),
                        ],
                    ),
                    ("Unnamed", vec![Value::Null; 6]),
                ])
                .unwrap(),
            ),
        ];

        let cleaner = Cleaner::default();
        for (name, input) in cases {
            let rows_before = input.num_rows();
            let cleaned = cleaner.transform(input).unwrap();

            for dropped in ["Unnamed", "Status", "nage"] {
                assert!(!cleaned.contains_column(dropped), "{}: {} kept", name, dropped);
            }
            assert!(cleaned.num_rows() <= rows_before, "{}", name);

            let distinct: HashSet<&[Value]> =
                cleaned.rows().iter().map(Vec::as_slice).collect();
            assert_eq!(distinct.len(), cleaned.num_rows(), "{}: duplicate rows", name);

            let expected: Vec<usize> = (0..cleaned.num_rows()).collect();
            assert_eq!(cleaned.index(), expected.as_slice(), "{}", name);

            let again = cleaner.transform(cleaned.clone()).unwrap();
            assert_eq!(again, cleaned, "{}: not idempotent", name);
        }
    }
}
