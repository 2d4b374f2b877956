/*!
 * Merging of two LRC files into a single bilingual one.
 *
 * Lines from the primary and secondary file that start within the configured
 * tolerance of each other are paired and written back to back under the
 * primary timestamp. The result is the duplicate-timestamp layout that the
 * LRC -> SRT converter splits into one file per language.
 */

use log::{info, warn};
use std::path::Path;

use crate::converter::read_input;
use crate::errors::ConversionError;
use crate::file_utils::FileManager;
use crate::lyric_parser::{LyricEntry, ParsedDocument, format_lrc_timestamp};

/// Statistics about a merge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Number of timed lines in the merged output
    pub total_lines: usize,

    /// Number of primary/secondary pairs
    pub matched_pairs: usize,

    /// Primary lines with no partner
    pub unmatched_primary: Vec<LyricEntry>,

    /// Secondary lines with no partner
    pub unmatched_secondary: Vec<LyricEntry>,
}

/// Merge two parsed documents. Returns the LRC text and a report.
pub fn merge_documents(
    primary: &ParsedDocument,
    secondary: &ParsedDocument,
    tolerance_ms: u64,
    header: &str,
) -> (String, MergeReport) {
    let primary_entries = primary.entries();
    let secondary_entries = secondary.entries();

    let mut report = MergeReport::default();
    let mut lines: Vec<String> = Vec::with_capacity(primary_entries.len() + secondary_entries.len());

    let mut p = 0;
    let mut s = 0;

    while p < primary_entries.len() || s < secondary_entries.len() {
        match (primary_entries.get(p), secondary_entries.get(s)) {
            (Some(first), Some(second)) if first.timestamp_ms.abs_diff(second.timestamp_ms) <= tolerance_ms => {
                let tag = format_lrc_timestamp(first.timestamp_ms);
                lines.push(format!("{}{}", tag, first.text));
                lines.push(format!("{}{}", tag, second.text));
                report.matched_pairs += 1;
                p += 1;
                s += 1;
            }
            (Some(first), second) if second.is_none_or(|second| first.timestamp_ms < second.timestamp_ms) => {
                lines.push(first.to_string());
                report.unmatched_primary.push(first.clone());
                p += 1;
            }
            (_, Some(second)) => {
                lines.push(second.to_string());
                report.unmatched_secondary.push(second.clone());
                s += 1;
            }
            (_, None) => break,
        }
    }

    report.total_lines = lines.len();

    let mut content = format!("[merged:{}]\n\n", header);
    for line in &lines {
        content.push_str(line);
        content.push('\n');
    }

    (content, report)
}

/// Merge two LRC files and write the result to `output_path`
pub fn merge_files<P1: AsRef<Path>, P2: AsRef<Path>, P3: AsRef<Path>>(
    primary_path: P1,
    secondary_path: P2,
    output_path: P3,
    tolerance_ms: u64,
) -> Result<MergeReport, ConversionError> {
    let (primary_path, secondary_path, output_path) =
        (primary_path.as_ref(), secondary_path.as_ref(), output_path.as_ref());

    let primary = ParsedDocument::parse(&read_input(primary_path)?)?;
    let secondary = ParsedDocument::parse(&read_input(secondary_path)?)?;
    info!("Primary lines: {}, secondary lines: {}", primary.len(), secondary.len());

    let header = format!(
        "{} + {}",
        file_name(primary_path),
        file_name(secondary_path)
    );
    let (content, report) = merge_documents(&primary, &secondary, tolerance_ms, &header);

    FileManager::write_to_file(output_path, &content).map_err(|source| ConversionError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    for entry in &report.unmatched_primary {
        warn!("Unmatched primary line: {}", entry);
    }
    for entry in &report.unmatched_secondary {
        warn!("Unmatched secondary line: {}", entry);
    }
    info!(
        "Merged {} pairs into {} lines ({} primary, {} secondary unmatched): {}",
        report.matched_pairs,
        report.total_lines,
        report.unmatched_primary.len(),
        report.unmatched_secondary.len(),
        output_path.display()
    );

    Ok(report)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
