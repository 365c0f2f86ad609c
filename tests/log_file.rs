//! The file logger appends `<timestamp> - <LEVEL> - <message>` lines

use regex::Regex;
use tempfile::TempDir;

#[test]
fn test_init_appends_formatted_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data_processing.log");
    std::fs::write(&path, "earlier run\n").unwrap();

    let guard = datasync::logging::init(&path, false).unwrap();
    log::info!("CSV file loaded successfully.");
    log::warn!("No rows extracted");
    log::debug!("hidden at info level");

    // Written through before the guard is dropped
    let before_drop = std::fs::read_to_string(&path).unwrap();
    assert!(before_drop.contains("No rows extracted"));
    drop(guard);

    // Only one global logger per process
    assert!(datasync::logging::init(&path, true).is_err());

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "earlier run");

    let line = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z - (INFO|WARN) - .+$").unwrap();
    let entries: Vec<&str> = lines[1..]
        .iter()
        .copied()
        .filter(|l| l.contains("CSV file loaded") || l.contains("No rows extracted"))
        .collect();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|l| line.is_match(l)), "{:?}", entries);
    assert!(entries[0].ends_with(" - INFO - CSV file loaded successfully."));
    assert!(entries[1].ends_with(" - WARN - No rows extracted"));
    assert!(!content.contains("hidden at info level"));
}
