use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use log::{warn, debug};

use crate::errors::ConversionError;
use crate::file_utils::FileManager;

// @module: SRT subtitle model, parsing and serialization

// @const: SRT time range line; accepts ',', '.' or ':' before the fraction
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+:\d{1,2}:\d{1,2}[,.:]\d{1,3})\s*-->\s*(\d+:\d{1,2}:\d{1,2}[,.:]\d{1,3})").unwrap()
});

// @struct: Single subtitle block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    // @field: 1-based sequence number
    pub index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleBlock {
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: String) -> Self {
        SubtitleBlock {
            index,
            start_ms,
            end_ms,
            text,
        }
    }

    // @creates: Validated subtitle block
    // @validates: Time range and non-empty text
    pub fn new_validated(index: usize, start_ms: u64, end_ms: u64, text: String) -> Result<Self, String> {
        if end_ms <= start_ms {
            return Err(format!(
                "Invalid time range: end time {} <= start time {}",
                end_ms, start_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(format!("Empty subtitle text for block {}", index));
        }

        Ok(SubtitleBlock {
            index,
            start_ms,
            end_ms,
            text: trimmed_text.to_string(),
        })
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm).
    ///
    /// Hours are derived from the total and are not capped at two digits.
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`, `.` or `:` also accepted) to milliseconds.
    ///
    /// Returns `None` for out-of-range fields or a value that does not fit in a `u64`.
    pub fn parse_timestamp(timestamp: &str) -> Option<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return None;
        }

        let hours: u64 = parts[0].parse().ok()?;
        let minutes: u64 = parts[1].parse().ok()?;
        let seconds: u64 = parts[2].parse().ok()?;
        let millis = fraction_to_ms(parts[3])?;

        if minutes >= 60 || seconds >= 60 {
            return None;
        }

        hours
            .checked_mul(3_600_000)?
            .checked_add(minutes * 60_000 + seconds * 1_000 + millis)
    }
}

/// Scale a 1-3 digit fraction of a second to milliseconds by its digit count
fn fraction_to_ms(fraction: &str) -> Option<u64> {
    let value: u64 = fraction.parse().ok()?;
    match fraction.len() {
        1 => Some(value * 100),
        2 => Some(value * 10),
        3 => Some(value),
        _ => None,
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// The blocks of one SRT file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SrtDocument {
    pub blocks: Vec<SubtitleBlock>,
}

impl SrtDocument {
    pub fn new(blocks: Vec<SubtitleBlock>) -> Self {
        SrtDocument { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render the canonical SRT text
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write subtitles to an SRT file, creating the parent directory if needed
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<(), ConversionError> {
        let path = path.as_ref();
        let write_error = |source| ConversionError::Write {
            path: path.to_path_buf(),
            source,
        };

        FileManager::write_to_file(path, &self.render()).map_err(write_error)?;
        debug!("Wrote {} subtitle blocks to {}", self.blocks.len(), path.display());

        Ok(())
    }

    /// Parse SRT format string into subtitle blocks.
    ///
    /// Malformed blocks are skipped with a warning; only input without any
    /// usable block is an error. Blocks are returned sorted and renumbered.
    pub fn parse_srt_string(content: &str) -> Result<Self, ConversionError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut blocks = Vec::new();

        let mut current_index: Option<usize> = None;
        let mut current_range: Option<(u64, u64)> = None;
        let mut current_text = String::new();
        let mut ranges_seen = 0;

        let mut finish_block = |index: Option<usize>, range: Option<(u64, u64)>, text: &mut String| {
            if let (Some(index), Some((start_ms, end_ms))) = (index, range) {
                match SubtitleBlock::new_validated(index, start_ms, end_ms, text.clone()) {
                    Ok(block) => blocks.push(block),
                    Err(e) => warn!("Skipping invalid subtitle block {}: {}", index, e),
                }
            }
            text.clear();
        };

        for (line_index, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if current_range.is_some() {
                    finish_block(current_index, current_range, &mut current_text);
                    current_range = None;
                }
                // An index line without a usable time range is dropped with its block
                current_index = None;
                continue;
            }

            if current_index.is_none() && current_range.is_none() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_index = Some(num);
                    continue;
                }
            }

            if current_range.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    match (captured_ms(&caps, 1), captured_ms(&caps, 2)) {
                        (Some(start_ms), Some(end_ms)) => {
                            current_range = Some((start_ms, end_ms));
                            ranges_seen += 1;
                            // Tolerate a missing index line
                            current_index.get_or_insert(ranges_seen);
                            continue;
                        }
                        _ => warn!("Invalid timestamp format at line {}: {}", line_index + 1, trimmed),
                    }
                }
            }

            if current_range.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text at line {} before a timestamp: {}", line_index + 1, trimmed);
            }
        }

        finish_block(current_index, current_range, &mut current_text);

        if blocks.is_empty() {
            return Err(ConversionError::InvalidSrt(
                "content has no block with a time range and text".to_string(),
            ));
        }

        blocks.sort_by_key(|block| block.start_ms);
        for (i, block) in blocks.iter_mut().enumerate() {
            block.index = i + 1;
        }

        Ok(SrtDocument { blocks })
    }
}

fn captured_ms(caps: &regex::Captures, group: usize) -> Option<u64> {
    caps.get(group)
        .and_then(|m| SubtitleBlock::parse_timestamp(m.as_str()))
}

impl fmt::Display for SrtDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}
