use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::app_config::SrtToLrcConfig;
use crate::converter::read_input;
use crate::errors::ConversionError;
use crate::file_utils::FileManager;
use crate::lyric_parser::format_lrc_timestamp;
use crate::subtitle_processor::SrtDocument;

// @module: SRT subtitles to LRC lyrics

// @const: Inline markup such as <i>, </font> or <b>
static MARKUP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

// @const: Runs of whitespace, including the newlines of multi-line blocks
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Result of rendering subtitles as lyrics
#[derive(Debug, Clone, PartialEq)]
pub struct LrcOutput {
    /// Complete LRC text
    pub content: String,

    /// Number of timed lyric lines written
    pub line_count: usize,
}

/// Converts SRT subtitles into LRC lyric lines keyed by block start time
#[derive(Debug, Clone, Default)]
pub struct SrtToLrcConverter {
    config: SrtToLrcConfig,
}

impl SrtToLrcConverter {
    pub fn new(config: SrtToLrcConfig) -> Self {
        SrtToLrcConverter { config }
    }

    /// Convert SRT text; `title` fills the `[ti:]` header tag
    pub fn convert_str(&self, content: &str, title: &str) -> Result<LrcOutput, ConversionError> {
        let document = SrtDocument::parse_srt_string(content)?;

        let mut lines: Vec<(u64, String)> = document
            .blocks
            .iter()
            .filter_map(|block| {
                let text = clean_text(&block.text);
                (!text.is_empty()).then_some((block.start_ms, text))
            })
            .collect();
        lines.sort_by_key(|(start_ms, _)| *start_ms);

        debug!(
            "Kept {} of {} subtitle blocks as lyric lines",
            lines.len(),
            document.len()
        );

        let mut output = Vec::with_capacity(lines.len() + 7);
        if self.config.add_metadata {
            output.push(format!("[ar:{}]", self.config.artist));
            output.push(format!("[ti:{}]", title));
            output.push(format!("[al:{}]", self.config.album));
            output.push(format!("[by:{}]", self.config.creator));
            output.push(format!("[re:{}]", env!("CARGO_PKG_NAME")));
            output.push(format!("[ve:{}]", env!("CARGO_PKG_VERSION")));
            output.push(String::new());
        }

        for (start_ms, text) in &lines {
            output.push(format!("{}{}", format_lrc_timestamp(*start_ms), text));
        }

        let mut content = output.join("\n");
        content.push('\n');

        Ok(LrcOutput {
            content,
            line_count: lines.len(),
        })
    }

    /// Convert the SRT file at `input_path` into `output_path`.
    /// Returns the number of lyric lines written.
    pub fn convert<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        input_path: P1,
        output_path: P2,
    ) -> Result<usize, ConversionError> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        let content = read_input(input_path)?;
        let title = input_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        let output = self.convert_str(&content, &title).map_err(|e| match e {
            ConversionError::InvalidSrt(_) => ConversionError::InvalidSrt(input_path.display().to_string()),
            other => other,
        })?;

        let write_error = |source| ConversionError::Write {
            path: output_path.to_path_buf(),
            source,
        };
        FileManager::write_to_file(output_path, &output.content).map_err(write_error)?;

        info!("Wrote {} lyric lines to {}", output.line_count, output_path.display());
        Ok(output.line_count)
    }
}

/// Strip markup and collapse whitespace so a block fits on one lyric line
pub fn clean_text(text: &str) -> String {
    let without_markup = MARKUP_REGEX.replace_all(text, "");
    WHITESPACE_REGEX
        .replace_all(&without_markup, " ")
        .trim()
        .to_string()
}
