// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use mollycam::config::ConfigError;
use mollycam::{Config, Facing};
use std::io::Write;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(config.initial_facing, Facing::Front);
    assert!(config.jpeg_quality() >= 90);
    assert!(config.download_dir.is_none());
}

#[test]
fn test_config_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
initial_facing = "rear"
jpeg_quality = 95
download_dir = "/tmp/mollycam"
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.initial_facing, Facing::Rear);
    assert_eq!(config.jpeg_quality(), 95);
    assert_eq!(config.download_dir(), std::path::PathBuf::from("/tmp/mollycam"));
    // Unset keys keep their defaults
    assert_eq!(config.preferred_width, Config::default().preferred_width);
}

#[test]
fn test_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_config_parse_error_names_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "initial_facing = \"sideways\"").unwrap();

    match Config::load(file.path()) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path.as_deref(), Some(file.path())),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_config_low_quality_is_raised() {
    // Quality below the floor is accepted but clamped when used
    let config = Config::from_toml("jpeg_quality = 40").unwrap();
    assert_eq!(config.jpeg_quality(), 90);
}
