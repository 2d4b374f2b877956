/*!
 * LRC to SRT conversion pipeline.
 *
 * Parse -> sort -> group -> distribute -> synthesize -> serialize. The whole
 * document is converted in memory before anything touches the disk, so a
 * parse failure never leaves partial output behind.
 */

use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::app_config::ConverterConfig;
use crate::errors::ConversionError;
use crate::file_utils::FileManager;
use crate::intervals;
use crate::lanes::{self, Lane};
use crate::lyric_parser::ParsedDocument;
use crate::subtitle_processor::SrtDocument;

/// Display duration of the last block in a lane when nothing else is configured
pub const DEFAULT_TAIL_MS: u64 = 3_000;

/// Shortest duration any block is given
pub const MIN_DURATION_MS: u64 = 100;

/// Stateless LRC -> SRT converter; build one per call or share freely.
#[derive(Debug, Clone, Default)]
pub struct LrcConverter {
    config: ConverterConfig,
}

impl LrcConverter {
    pub fn new(config: ConverterConfig) -> Self {
        LrcConverter { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert LRC text into one SRT document per lane
    pub fn convert_str(&self, content: &str) -> Result<Vec<SrtDocument>, ConversionError> {
        let document = ParsedDocument::parse(content)?;
        debug!(
            "Parsed {} lyric entries ({} header tags)",
            document.len(),
            document.metadata().len()
        );

        if document.is_empty() {
            warn!("No timed lyric lines found");
        }

        let lanes: Vec<Lane> = if self.config.split_duplicates {
            lanes::distribute(&document)
        } else {
            vec![lanes::collapse(&document, &self.config.duplicate_separator)]
        };

        if lanes.len() > 1 {
            info!(
                "Found up to {} lines per timestamp, splitting into {} files",
                lanes.len(),
                lanes.len()
            );
        }

        Ok(lanes
            .iter()
            .map(|lane| SrtDocument::new(intervals::synthesize(&lane.entries, &self.config)))
            .collect())
    }

    /// Convert the LRC file at `input_path`, writing `<base>.srt` or
    /// `<base>_<lane>.srt` files. Returns the written paths in lane order.
    pub fn convert<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input_path: P1,
        output_base_path: P2,
    ) -> Result<Vec<PathBuf>, ConversionError> {
        let content = read_input(input_path.as_ref())?;
        let documents = self.convert_str(&content)?;
        write_outputs(&documents, output_base_path.as_ref())
    }
}

/// Convert with the default settings.
///
/// See [`LrcConverter::convert`].
pub fn convert<P1: AsRef<Path>, P2: AsRef<Path>>(
    input_path: P1,
    output_base_path: P2,
) -> Result<Vec<PathBuf>, ConversionError> {
    LrcConverter::default().convert(input_path, output_base_path)
}

/// Read and decode a source file, distinguishing a missing file from other I/O failures
pub fn read_input(path: &Path) -> Result<String, ConversionError> {
    if !FileManager::file_exists(path) {
        return Err(ConversionError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    FileManager::read_to_string(path).map_err(|source| ConversionError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Output base for an input file: the same path with its extension removed
pub fn default_output_base(input_path: &Path) -> PathBuf {
    input_path.with_extension("")
}

/// Paths for `lane_count` outputs: `<base>.srt` for one lane, otherwise
/// `<base>_1.srt`, `<base>_2.srt`, ...
pub fn output_paths(output_base_path: &Path, lane_count: usize) -> Vec<PathBuf> {
    let with_suffix = |suffix: String| {
        let mut name: OsString = output_base_path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };

    if lane_count <= 1 {
        return vec![with_suffix(".srt".to_string())];
    }

    (1..=lane_count)
        .map(|lane| with_suffix(format!("_{}.srt", lane)))
        .collect()
}

/// Write every document to its path under `output_base_path`.
///
/// If one write fails, files already written by this call are removed
/// before the error is returned.
pub fn write_outputs(
    documents: &[SrtDocument],
    output_base_path: &Path,
) -> Result<Vec<PathBuf>, ConversionError> {
    let paths = output_paths(output_base_path, documents.len());
    let mut written: Vec<PathBuf> = Vec::with_capacity(paths.len());

    for (document, path) in documents.iter().zip(&paths) {
        if let Err(e) = document.write_to_srt(path) {
            for done in &written {
                if let Err(remove_err) = std::fs::remove_file(done) {
                    warn!("Failed to remove partial output {}: {}", done.display(), remove_err);
                }
            }
            return Err(e);
        }
        written.push(path.clone());
    }

    Ok(written)
}
