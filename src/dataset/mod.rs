//! In-memory tabular dataset
//!
//! A [`Dataset`] is an ordered set of uniquely named columns with rows
//! aligned by position. Every row has exactly one value per column, and
//! each row carries a label (its `index`) that starts out as its position.

mod value;

pub use value::{ColumnKind, Value};

use std::collections::HashSet;
use thiserror::Error;

/// Structural problems that make a dataset invalid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("row {row} has {found} values but the dataset has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Column metadata
///
/// `sql_type` is the declared type reported by a store, kept so a table
/// can be recreated with the schema it was read with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub sql_type: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sql_type: None,
        }
    }

    pub fn with_sql_type(mut self, sql_type: impl Into<String>) -> Self {
        self.sql_type = Some(sql_type.into());
        self
    }

    /// Declared type when known, else the type implied by `kind`
    pub fn declared_type(&self) -> &str {
        self.sql_type.as_deref().unwrap_or(self.kind.sql_type())
    }
}

pub type Row = Vec<Value>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Row>,
    index: Vec<usize>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate column names and ragged rows
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self, DatasetError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DatasetError::DuplicateColumn(column.name.clone()));
            }
        }

        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(DatasetError::RaggedRow {
                row,
                expected: columns.len(),
                found: values.len(),
            });
        }

        let index = (0..rows.len()).collect();
        Ok(Self {
            columns,
            rows,
            index,
        })
    }

    /// Build a dataset from named columns of values, inferring each kind
    /// from the first non-null value (text when the column is all null)
    ///
    /// # Example
    /// ```
    /// use datasync::dataset::{Dataset, Value};
    ///
    /// let data = Dataset::from_columns(vec![
    ///     ("User_ID", vec![Value::from(1i64), Value::from(2i64)]),
    ///     ("Cust_name", vec![Value::from("Alice"), Value::from("Bob")]),
    /// ])
    /// .unwrap();
    /// assert_eq!(data.shape(), (2, 2));
    /// ```
    pub fn from_columns(
        columns: Vec<(impl Into<String>, Vec<Value>)>,
    ) -> Result<Self, DatasetError> {
        let num_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut meta = Vec::with_capacity(columns.len());
        let mut rows: Vec<Row> = (0..num_rows)
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();

        for (name, values) in columns {
            let name = name.into();
            if values.len() != num_rows {
                return Err(DatasetError::RaggedRow {
                    row: values.len().min(num_rows),
                    expected: num_rows,
                    found: values.len(),
                });
            }
            let kind = values
                .iter()
                .find_map(|v| match v {
                    Value::Integer(_) => Some(ColumnKind::Integer),
                    Value::Float(_) => Some(ColumnKind::Float),
                    Value::Text(_) => Some(ColumnKind::Text),
                    Value::Null => None,
                })
                .unwrap_or(ColumnKind::Text);
            meta.push(Column::new(name, kind));
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
        }

        Self::new(meta, rows)
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// All values of one column, in row order
    pub fn values(&self, name: &str) -> Option<Vec<&Value>> {
        let position = self.position(name)?;
        Some(self.rows.iter().map(|row| &row[position]).collect())
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let position = self.position(name)?;
        self.rows.get(row).map(|r| &r[position])
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row labels, parallel to `rows()`
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Remove the named columns that exist, ignoring the rest
    ///
    /// Returns the number of columns removed.
    pub fn drop_columns(&mut self, names: &[&str]) -> usize {
        let targets: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| names.contains(&c.name.as_str()))
            .map(|(i, _)| i)
            .collect();

        if targets.is_empty() {
            return 0;
        }

        for row in &mut self.rows {
            let mut position = 0;
            row.retain(|_| {
                let keep = !targets.contains(&position);
                position += 1;
                keep
            });
        }

        let mut position = 0;
        self.columns.retain(|_| {
            let keep = !targets.contains(&position);
            position += 1;
            keep
        });

        targets.len()
    }

    /// Rename a column in place, keeping its position and values
    ///
    /// Returns `Ok(false)` when `from` does not exist. Renaming onto a name
    /// that another column already uses is an error.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<bool, DatasetError> {
        let Some(position) = self.position(from) else {
            return Ok(false);
        };
        if from != to && self.contains_column(to) {
            return Err(DatasetError::DuplicateColumn(to.to_string()));
        }
        self.columns[position].name = to.to_string();
        Ok(true)
    }

    /// Drop rows identical to an earlier row across all columns
    ///
    /// The first occurrence survives and keeps its label. Returns the
    /// number of rows removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let keep: Vec<bool> = {
            let mut seen: HashSet<&[Value]> = HashSet::with_capacity(before);
            self.rows
                .iter()
                .map(|row| seen.insert(row.as_slice()))
                .collect()
        };

        let mut flags = keep.iter();
        self.rows.retain(|_| *flags.next().unwrap_or(&true));
        let mut flags = keep.iter();
        self.index.retain(|_| *flags.next().unwrap_or(&true));

        before - self.rows.len()
    }

    /// Relabel rows as `0..len`
    pub fn reset_index(&mut self) {
        self.index = (0..self.rows.len()).collect();
    }
}
