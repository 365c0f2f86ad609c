//! Pipeline orchestration for sync runs

use super::{Extractor, Loader, Transformer};
use crate::dataset::Dataset;
use crate::error::Result;

/// Pipeline that runs Extract, Transform, and Load once, in order
///
/// # Type Parameters
/// - `E`: Extractor producing a dataset
/// - `T`: Transformer from dataset to dataset
/// - `L`: Loader consuming the transformed dataset
///
/// Stages log their own failures; the pipeline only reports progress and
/// stops at the first error.
///
/// # Example
/// ```no_run
/// use datasync::client::OdbcStore;
/// use datasync::table::{TableFetcher, TableName, TableWriter};
/// use datasync::transform::Cleaner;
/// use datasync::etl::Pipeline;
/// # fn example(store: &OdbcStore<'_>) -> eyre::Result<()> {
/// let table = TableName::parse("dbo.Diwali")?;
/// let pipeline = Pipeline::new(
///     TableFetcher::new(store, table.clone()),
///     Cleaner::default(),
///     TableWriter::new(store, table),
/// );
///
/// let count = pipeline.run()?;
/// println!("Wrote {} rows", count);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor<Item = Dataset>,
    T: Transformer<Input = Dataset, Output = Dataset>,
    L: Loader<Item = Dataset>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete pipeline
    ///
    /// Steps:
    /// 1. Extract a dataset from the source
    /// 2. Transform it
    /// 3. Load the result to the destination
    ///
    /// Returns the number of rows written
    ///
    /// # Errors
    /// Returns the first stage error unchanged
    pub fn run(&self) -> Result<usize> {
        log::info!("Starting sync pipeline");

        log::debug!("Extracting from source...");
        let data = self.extractor.extract()?;
        let (rows, columns) = data.shape();
        log::info!("Extracted {} rows across {} columns", rows, columns);

        if data.is_empty() {
            log::warn!("No rows extracted, destination will be replaced with an empty table");
        }

        log::debug!("Transforming dataset...");
        let transformed = self.transformer.transform(data)?;
        log::info!("Transformed dataset has {} rows", transformed.num_rows());

        log::debug!("Loading to destination...");
        let count = self.loader.load(transformed)?;
        log::info!("Loaded {} rows", count);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetError, Value};
    use crate::error::{CleanError, PipelineError};
    use std::cell::{Cell, RefCell};

    struct MockExtractor(Dataset);

    impl Extractor for MockExtractor {
        type Item = Dataset;
        fn extract(&self) -> Result<Self::Item> {
            Ok(self.0.clone())
        }
    }

    struct DedupTransformer;

    impl Transformer for DedupTransformer {
        type Input = Dataset;
        type Output = Dataset;
        fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
            input.drop_duplicates();
            Ok(input)
        }
    }

    struct FailingTransformer;

    impl Transformer for FailingTransformer {
        type Input = Dataset;
        type Output = Dataset;
        fn transform(&self, _input: Self::Input) -> Result<Self::Output> {
            Err(CleanError::from(DatasetError::DuplicateColumn("x".into())).into())
        }
    }

    #[derive(Default)]
    struct RecordingLoader {
        calls: Cell<usize>,
        last: RefCell<Option<Dataset>>,
    }

    impl Loader for &RecordingLoader {
        type Item = Dataset;
        fn load(&self, item: Self::Item) -> Result<usize> {
            self.calls.set(self.calls.get() + 1);
            let count = item.num_rows();
            *self.last.borrow_mut() = Some(item);
            Ok(count)
        }
    }

    fn data() -> Dataset {
        Dataset::from_columns(vec![(
            "a",
            vec![Value::from(1i64), Value::from(1i64), Value::from(3i64)],
        )])
        .unwrap()
    }

    #[test]
    fn test_pipeline() {
        let loader = RecordingLoader::default();
        let pipeline = Pipeline::new(MockExtractor(data()), DedupTransformer, &loader);

        let count = pipeline.run().unwrap();
        assert_eq!(count, 2);
        assert_eq!(loader.calls.get(), 1);
        assert_eq!(loader.last.borrow().as_ref().map(|d| d.num_rows()), Some(2));
    }

    #[test]
    fn test_empty_pipeline_still_loads() {
        let loader = RecordingLoader::default();
        let pipeline = Pipeline::new(
            MockExtractor(Dataset::default()),
            DedupTransformer,
            &loader,
        );

        let count = pipeline.run().unwrap();
        assert_eq!(count, 0);
        assert_eq!(loader.calls.get(), 1);
    }

    #[test]
    fn test_stage_failure_skips_loader() {
        let loader = RecordingLoader::default();
        let pipeline = Pipeline::new(MockExtractor(data()), FailingTransformer, &loader);

        let err = pipeline.run().unwrap_err();
        assert!(matches!(err, PipelineError::Clean(_)));
        assert_eq!(loader.calls.get(), 0);
    }
}
