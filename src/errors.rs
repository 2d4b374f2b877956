/*!
 * Error types for the lrckit application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting between lyric and subtitle formats
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The source file does not exist
    #[error("Input file not found: {}", .path.display())]
    InputNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The source file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A time tag could not be parsed
    #[error("Parse error at line {line}: invalid time tag [{tag}] ({reason})")]
    Parse {
        /// 1-based line number in the source document
        line: usize,
        /// Tag content without the surrounding brackets
        tag: String,
        /// What was wrong with it
        reason: String,
    },

    /// An output file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Path that was being written
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SRT input contained no usable subtitle block
    #[error("No valid subtitle blocks found in {0}")]
    InvalidSrt(String),
}

impl ConversionError {
    /// Shorthand for building a parse error
    pub fn parse(line: usize, tag: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a conversion, merge or split
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}
