use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// LRC -> SRT conversion settings
    #[serde(default)]
    pub converter: ConverterConfig,

    /// SRT -> LRC conversion settings
    #[serde(default)]
    pub srt_to_lrc: SrtToLrcConfig,

    /// LRC merge settings
    #[serde(default)]
    pub merge: MergeConfig,

    /// LRC line splitting settings
    #[serde(default)]
    pub split: SplitConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the LRC -> SRT converter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConverterConfig {
    /// Display duration of the last block of each lane, in milliseconds
    #[serde(default = "default_tail_ms")]
    pub tail_ms: u64,

    /// Minimum display duration of any block, in milliseconds
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    /// Split same-timestamp lines into separate output files.
    ///
    /// When disabled, lines sharing a timestamp are joined into a single
    /// block using `duplicate_separator` and exactly one file is written.
    #[serde(default = "default_true")]
    pub split_duplicates: bool,

    /// Separator used to join same-timestamp lines when not splitting
    #[serde(default = "default_duplicate_separator")]
    pub duplicate_separator: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            tail_ms: default_tail_ms(),
            min_duration_ms: default_min_duration_ms(),
            split_duplicates: true,
            duplicate_separator: default_duplicate_separator(),
        }
    }
}

/// Settings for the SRT -> LRC converter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SrtToLrcConfig {
    /// Write an `[ar:]`/`[ti:]`/... header before the lyric lines
    #[serde(default = "default_true")]
    pub add_metadata: bool,

    #[serde(default = "default_artist")]
    pub artist: String,

    #[serde(default = "default_album")]
    pub album: String,

    /// Value of the `[by:]` tag
    #[serde(default = "default_creator")]
    pub creator: String,
}

impl Default for SrtToLrcConfig {
    fn default() -> Self {
        Self {
            add_metadata: true,
            artist: default_artist(),
            album: default_album(),
            creator: default_creator(),
        }
    }
}

/// Settings for merging two LRC files
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MergeConfig {
    /// Two lines closer than this (in milliseconds) are paired
    #[serde(default = "default_merge_tolerance_ms")]
    pub tolerance_ms: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            tolerance_ms: default_merge_tolerance_ms(),
        }
    }
}

/// Settings for splitting long LRC files
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SplitConfig {
    #[serde(default = "default_lines_per_file")]
    pub lines_per_file: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            lines_per_file: default_lines_per_file(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_tail_ms() -> u64 {
    crate::converter::DEFAULT_TAIL_MS
}

fn default_min_duration_ms() -> u64 {
    crate::converter::MIN_DURATION_MS
}

fn default_duplicate_separator() -> String {
    "\n".to_string()
}

fn default_true() -> bool {
    true
}

fn default_artist() -> String {
    "Unknown Artist".to_string()
}

fn default_album() -> String {
    "Unknown Album".to_string()
}

fn default_creator() -> String {
    "lrckit".to_string()
}

fn default_merge_tolerance_ms() -> u64 {
    500
}

fn default_lines_per_file() -> usize {
    300
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.converter.tail_ms == 0 {
            return Err(AppError::Config("converter.tail_ms must be greater than 0".to_string()));
        }

        if self.converter.min_duration_ms == 0 {
            return Err(AppError::Config(
                "converter.min_duration_ms must be greater than 0".to_string(),
            ));
        }

        if self.split.lines_per_file == 0 {
            return Err(AppError::Config("split.lines_per_file must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// Load the configuration at `path`, writing the defaults there first if
    /// the file does not exist yet.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}
