//! Every failing stage logs exactly one ERROR entry carrying the cause
//!
//! Installs a capturing logger once for this test binary. Tests are
//! serialized because they share it.

use datasync::cli::sync_table;
use datasync::client::{ConnectionGuard, Store, StoreError, WriteOptions};
use datasync::dataset::{Dataset, Value};
use datasync::error::PipelineError;
use datasync::etl::Extractor;
use datasync::storage::CsvReader;
use datasync::table::TableName;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};

struct CaptureLogger;

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn start_capture() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Debug);
    });
    RECORDS.lock().unwrap().clear();
}

fn entries_matching(text: &str) -> usize {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, message)| message == text)
        .count()
}

fn error_entries() -> Vec<String> {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(level, _)| *level == Level::Error)
        .map(|(_, message)| message.clone())
        .collect()
}

/// Store whose read and write outcomes are fixed up front
struct ScriptedStore {
    fetch: Result<Dataset, &'static str>,
    save: Result<(), &'static str>,
}

impl Store for ScriptedStore {
    fn query(&self, _sql: &str) -> Result<Dataset, StoreError> {
        self.fetch
            .clone()
            .map_err(|cause| StoreError::Rejected(cause.to_string()))
    }

    fn write_table(
        &self,
        _table: &TableName,
        data: &Dataset,
        _options: &WriteOptions,
    ) -> Result<u64, StoreError> {
        self.save
            .map(|_| data.num_rows() as u64)
            .map_err(|cause| StoreError::Rejected(cause.to_string()))
    }
}

fn sample() -> Dataset {
    Dataset::from_columns(vec![
        ("User_ID", vec![Value::from(1i64), Value::from(2i64)]),
        ("Status", vec![Value::from("Delivered"), Value::Null]),
    ])
    .unwrap()
}

fn table() -> TableName {
    TableName::parse("dbo.Diwali").unwrap()
}

#[test]
#[serial_test::serial]
fn test_fetch_failure_logs_once() {
    start_capture();
    let store = ScriptedStore {
        fetch: Err("Invalid object name 'dbo.Diwali'"),
        save: Ok(()),
    };

    let err = sync_table(&store, &table()).unwrap_err();

    assert!(matches!(err, PipelineError::Fetch(_)));
    let errors = error_entries();
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(errors[0].contains("Failed to fetch data from SQL"));
    assert!(errors[0].contains("Invalid object name 'dbo.Diwali'"));
}

#[test]
#[serial_test::serial]
fn test_clean_failure_logs_once() {
    start_capture();
    let data = Dataset::from_columns(vec![
        ("nage", vec![Value::from("18-25")]),
        ("age_group", vec![Value::from("18-25")]),
    ])
    .unwrap();
    let store = ScriptedStore {
        fetch: Ok(data),
        save: Ok(()),
    };

    let err = sync_table(&store, &table()).unwrap_err();

    assert!(matches!(err, PipelineError::Clean(_)));
    let errors = error_entries();
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(errors[0].contains("Data cleaning failed"));
    assert!(errors[0].contains("age_group"));
}

#[test]
#[serial_test::serial]
fn test_save_failure_logs_once() {
    start_capture();
    let store = ScriptedStore {
        fetch: Ok(sample()),
        save: Err("deadlock victim"),
    };

    let err = sync_table(&store, &table()).unwrap_err();

    assert!(matches!(err, PipelineError::Save(_)));
    let errors = error_entries();
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(errors[0].contains("Failed to save data to SQL Server"));
    assert!(errors[0].contains("deadlock victim"));
}

#[test]
#[serial_test::serial]
fn test_missing_csv_logs_once() {
    start_capture();

    let err = CsvReader::new("does/not/exist/Diwali.csv")
        .extract()
        .unwrap_err();

    assert!(matches!(err, PipelineError::Load(_)));
    let errors = error_entries();
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(errors[0].contains("Failed to load CSV"));
    assert!(errors[0].contains("Diwali.csv"));
}

#[test]
#[serial_test::serial]
fn test_successful_sync_logs_no_errors() {
    start_capture();
    let store = ScriptedStore {
        fetch: Ok(sample()),
        save: Ok(()),
    };

    assert_eq!(sync_table(&store, &table()).unwrap(), 2);
    assert!(error_entries().is_empty());

    let records = RECORDS.lock().unwrap();
    let messages: Vec<&str> = records.iter().map(|(_, m)| m.as_str()).collect();
    assert!(messages.contains(&"Data fetched from dbo.Diwali successfully."));
    assert!(messages.contains(&"Data cleaning and transformation completed successfully."));
    assert!(messages.contains(&"Data saved back to dbo.Diwali successfully."));
}

#[test]
#[serial_test::serial]
fn test_connection_released_after_failed_stage() {
    start_capture();
    let guard = ConnectionGuard::new(ScriptedStore {
        fetch: Ok(sample()),
        save: Err("permission denied on dbo.Diwali"),
    });

    let result = guard
        .get()
        .ok_or("connection is closed")
        .map(|store| sync_table(store, &table()));
    drop(guard);

    assert!(matches!(result, Ok(Err(PipelineError::Save(_)))));
    assert_eq!(error_entries().len(), 1);
    assert_eq!(entries_matching("Database connection closed."), 1);
}

#[test]
#[serial_test::serial]
fn test_connection_released_after_success() {
    start_capture();
    let mut guard = ConnectionGuard::new(ScriptedStore {
        fetch: Ok(sample()),
        save: Ok(()),
    });

    let count = sync_table(guard.get().unwrap(), &table()).unwrap();
    guard.release();
    drop(guard);

    assert_eq!(count, 2);
    assert_eq!(entries_matching("Database connection closed."), 1);
}
