//! Column renamer transformer

use crate::dataset::Dataset;
use crate::error::{CleanError, Result};
use crate::etl::Transformer;

/// Transformer that renames columns in place
///
/// A rename whose source column is absent is skipped. Renaming onto a name
/// another column already holds fails, since column names stay unique.
pub struct ColumnRenamer {
    renames: Vec<(String, String)>,
}

impl ColumnRenamer {
    pub fn new(renames: Vec<(&str, &str)>) -> Self {
        Self {
            renames: renames
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Renames: nage → age_group
    pub fn default_renames() -> Self {
        Self::new(vec![("nage", "age_group")])
    }
}

impl Transformer for ColumnRenamer {
    type Input = Dataset;
    type Output = Dataset;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        for (from, to) in &self.renames {
            if input.rename_column(from, to).map_err(CleanError::from)? {
                log::debug!("Renamed column {} to {}", from, to);
            }
        }
        Ok(input)
    }
}
