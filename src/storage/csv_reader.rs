//! CSV source loading

use crate::dataset::{Column, ColumnKind, Dataset, Row};
use crate::error::{LoadError, PipelineError, Result};
use crate::etl::Extractor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Cell texts read as missing values
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read a delimited file with a header row into a [`Dataset`]
///
/// Bytes that are not valid UTF-8 are decoded as Latin-1, so no byte
/// sequence fails the load. Rows with a different field count than the
/// header are rejected.
///
/// # Example
/// ```no_run
/// use datasync::etl::Extractor;
/// use datasync::storage::CsvReader;
///
/// # fn example() -> datasync::error::Result<()> {
/// let data = CsvReader::new("Diwali.csv").extract()?;
/// println!("{:?}", data.shape());
/// # Ok(())
/// # }
/// ```
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file
    pub fn read(&self) -> std::result::Result<Dataset, LoadError> {
        let file = std::fs::File::open(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(file);

        let csv_error = |source: csv::Error| LoadError::Csv {
            path: self.path.clone(),
            source,
        };

        let header = reader.byte_headers().map_err(csv_error)?.clone();
        if header.is_empty() {
            return Err(LoadError::MissingHeader {
                path: self.path.clone(),
            });
        }
        let names = column_names(header.iter().map(decode_field));

        let mut cells: Vec<Vec<Option<String>>> = Vec::new();
        for record in reader.byte_records() {
            let record = record.map_err(csv_error)?;
            cells.push(
                record
                    .iter()
                    .map(|field| {
                        let text = decode_field(field);
                        (!NA_VALUES.contains(&text.as_str())).then_some(text)
                    })
                    .collect(),
            );
        }

        let columns: Vec<Column> = names
            .into_iter()
            .enumerate()
            .map(|(position, name)| {
                let kind = ColumnKind::infer(cells.iter().map(|row| row[position].as_deref()));
                Column::new(name, kind)
            })
            .collect();

        let rows: Vec<Row> = cells
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .zip(row)
                    .map(|(column, text)| column.kind.parse(text.as_deref()))
                    .collect()
            })
            .collect();

        Dataset::new(columns, rows).map_err(|source| LoadError::Dataset {
            path: self.path.clone(),
            source,
        })
    }
}

impl Extractor for CsvReader {
    type Item = Dataset;

    fn extract(&self) -> Result<Self::Item> {
        let data = self
            .read()
            .map_err(PipelineError::from)
            .inspect_err(PipelineError::log)?;

        log::info!("CSV file loaded successfully.");
        log::debug!(
            "{}: {} rows, {} columns",
            self.path.display(),
            data.num_rows(),
            data.num_columns()
        );
        Ok(data)
    }
}

/// Decode UTF-8, falling back to Latin-1 for invalid sequences
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Name blank header cells `Unnamed: <position>` and suffix repeats with
/// `.1`, `.2`, ...
fn column_names(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names: Vec<String> = Vec::new();

    for (position, name) in raw.enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", position)
        } else {
            name
        };

        let mut candidate = base.clone();
        while names.contains(&candidate) {
            let count = counts.entry(base.clone()).or_insert(0);
            *count += 1;
            candidate = format!("{}.{}", base, count);
        }
        names.push(candidate);
    }

    names
}
