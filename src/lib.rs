/*!
 * # lrckit - LRC lyric and SRT subtitle conversion toolkit
 *
 * A Rust library for turning timed lyrics into subtitles and back.
 *
 * ## Features
 *
 * - Convert LRC lyrics to SRT subtitles:
 *   - `[mm:ss.ff]` and `[mm:ss.fff]` time tags, several per line
 *   - Strict time tag parsing with line-accurate errors
 *   - Lines sharing a timestamp split into parallel output files ("lanes"),
 *     or joined into one block when splitting is disabled
 * - Convert SRT subtitles to LRC lyrics with an optional metadata header
 * - Merge two LRC files (e.g. original + translation) into one
 * - Split long lyric files into fixed-size parts
 * - Batch conversion of whole directories
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `lyric_parser`: LRC parsing into timestamp-sorted entries
 * - `lanes`: Distribution of same-timestamp lines into lanes
 * - `intervals`: Start/end synthesis for subtitle blocks
 * - `subtitle_processor`: SRT model, parsing and serialization
 * - `converter`: The LRC -> SRT pipeline and output naming
 * - `srt_to_lrc`: The SRT -> LRC direction
 * - `lrc_merge`, `lrc_split`: Merging and splitting lyric files
 * - `app_config`: Configuration management
 * - `app_controller`: Single-file and folder workflows
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod converter;
pub mod errors;
pub mod file_utils;
pub mod intervals;
pub mod lanes;
pub mod lrc_merge;
pub mod lrc_split;
pub mod lyric_parser;
pub mod srt_to_lrc;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::{Config, ConverterConfig};
pub use converter::{DEFAULT_TAIL_MS, LrcConverter, convert};
pub use errors::{AppError, ConversionError};
pub use lyric_parser::{LyricEntry, ParsedDocument};
pub use subtitle_processor::{SrtDocument, SubtitleBlock};
