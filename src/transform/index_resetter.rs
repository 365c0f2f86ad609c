//! Index resetter transformer

use crate::dataset::Dataset;
use crate::error::Result;
use crate::etl::Transformer;

/// Transformer that relabels rows `0..len` in their current order
#[derive(Default)]
pub struct IndexResetter;

impl IndexResetter {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for IndexResetter {
    type Input = Dataset;
    type Output = Dataset;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        input.reset_index();
        Ok(input)
    }
}
