/*!
 * Tests for application configuration
 */

use anyhow::Result;

use lrckit::app_config::{Config, LogLevel};
use lrckit::errors::AppError;
use crate::common;

/// Test default values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.converter.tail_ms, 3_000);
    assert_eq!(config.converter.min_duration_ms, 100);
    assert!(config.converter.split_duplicates);
    assert_eq!(config.converter.duplicate_separator, "\n");
    assert!(config.srt_to_lrc.add_metadata);
    assert_eq!(config.merge.tolerance_ms, 500);
    assert_eq!(config.split.lines_per_file, 300);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that zero values are rejected
#[test]
fn test_validate_withZeroValues_shouldFail() {
    let mut config = Config::default();
    config.converter.tail_ms = 0;
    assert!(matches!(config.validate(), Err(AppError::Config(_))));

    let mut config = Config::default();
    config.converter.min_duration_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.split.lines_per_file = 0;
    assert!(config.validate().is_err());
}

/// Test that a missing file is created with the defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("lrckit.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.converter.tail_ms, 3_000);

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(written["converter"]["tail_ms"], 3_000);
    assert_eq!(written["log_level"], "info");

    Ok(())
}

/// Test that a partial file is completed from the defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillMissingFields() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "partial.json",
        r#"{ "converter": { "tail_ms": 5000, "split_duplicates": false }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;
    assert_eq!(config.converter.tail_ms, 5_000);
    assert!(!config.converter.split_duplicates);
    assert_eq!(config.converter.min_duration_ms, 100);
    assert_eq!(config.merge.tolerance_ms, 500);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);

    Ok(())
}

/// Test that broken JSON is an error, not silently replaced
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(std::fs::read_to_string(&path)?, "{ not json");

    Ok(())
}
