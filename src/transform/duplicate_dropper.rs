//! Duplicate row dropper transformer

use crate::dataset::Dataset;
use crate::error::Result;
use crate::etl::Transformer;

/// Transformer that removes rows identical to an earlier row
///
/// All columns are compared. Survivors keep their order and labels.
#[derive(Default)]
pub struct DuplicateDropper;

impl DuplicateDropper {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for DuplicateDropper {
    type Input = Dataset;
    type Output = Dataset;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        let removed = input.drop_duplicates();
        log::debug!("Dropped {} duplicate row(s)", removed);
        Ok(input)
    }
}
