use fcm_logger::{LevelFilter, Logger};
use serde_json::Value;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_receives_structured_fields() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("nested").join("logs");

    let logger = Logger::builder()
        .name("fcm-file-logging")
        .console(false)
        .level(LevelFilter::INFO)
        .path(&log_dir)
        .json()
        .init()?;
    assert!(logger.writes_file());

    tracing::info!(unit = "AttachmentSupport", change_id = "a8ae56e0", "Migration applied");
    tracing::debug!("filtered out");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(log_file)?;
    let lines: Vec<Value> = contents.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
    assert_eq!(lines.len(), 1, "{contents}");
    assert_eq!(lines[0]["level"], "INFO");
    assert_eq!(lines[0]["fields"]["unit"], "AttachmentSupport");
    assert_eq!(lines[0]["fields"]["message"], "Migration applied");

    Ok(())
}
