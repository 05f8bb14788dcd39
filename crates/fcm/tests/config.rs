use fcm::Compression;
use fcm::config::{MigratorConfig, load_config};
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn file_values_fill_the_config() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "migrate.toml", r#"
        [logging]
        level = "debug"
        directory = "logs"
        json = true

        [migrations]
        root = "units/freecad_1_0"

        [export]
        compression = "stored"
    "#);

    let config: MigratorConfig = load_config(Some(&path)).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.directory, Some(PathBuf::from("logs")));
    assert!(config.logging.json);
    assert_eq!(config.logging.max_files, 5);
    assert_eq!(config.migrations.root, PathBuf::from("units/freecad_1_0"));
    assert_eq!(config.export.compression, Compression::Stored);
}

#[test]
fn explicit_file_must_exist() {
    let temp = TempDir::new().unwrap();
    let err = load_config::<MigratorConfig>(Some(temp.path().join("absent.toml"))).unwrap_err();
    assert_eq!(err.kind(), "Config");
}

#[test]
fn mistyped_values_are_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "migrate.toml", "[export]\ncompression = \"zstd\"\n");

    let err = load_config::<MigratorConfig>(Some(&path)).unwrap_err();
    assert_eq!(err.kind(), "Config");
    assert!(err.to_string().contains("Deserializing configuration"));
}
