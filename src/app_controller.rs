use anyhow::{Result, Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::converter::{self, LrcConverter};
use crate::errors::AppError;
use crate::file_utils::{FileManager, FileType};
use crate::lrc_merge::{self, MergeReport};
use crate::lrc_split;
use crate::srt_to_lrc::SrtToLrcConverter;

// @module: Application controller for lyric and subtitle conversion

/// What happened to one input file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Files that were written
    Converted(Vec<PathBuf>),
    /// Outputs already existed and overwriting was not requested
    Skipped(Vec<PathBuf>),
}

/// Counts from a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    pub config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Convert one file, choosing the direction from its type.
    ///
    /// LRC input becomes SRT (`output` is the output base, extension-less);
    /// SRT input becomes LRC (`output` is the output file).
    pub fn run(&self, input_file: &Path, output: Option<PathBuf>, force_overwrite: bool) -> Result<FileOutcome> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        match FileManager::detect_file_type(input_file)? {
            FileType::Lyrics => self.lrc_to_srt(input_file, output, force_overwrite),
            FileType::Subtitle => Ok(self.srt_to_lrc(input_file, output, force_overwrite)?),
            FileType::Unknown => Err(anyhow!(
                "Unrecognized input (expected LRC or SRT): {}",
                input_file.display()
            )),
        }
    }

    /// Convert an LRC file to one or more SRT files
    pub fn lrc_to_srt(&self, input_file: &Path, output_base: Option<PathBuf>, force_overwrite: bool) -> Result<FileOutcome> {
        let start_time = Instant::now();
        let output_base = output_base.unwrap_or_else(|| converter::default_output_base(input_file));

        let converter = LrcConverter::new(self.config.converter.clone());
        let content = converter::read_input(input_file)?;
        let documents = converter
            .convert_str(&content)
            .with_context(|| format!("Failed to convert {}", input_file.display()))?;

        let planned = converter::output_paths(&output_base, documents.len());
        let existing: Vec<PathBuf> = planned.iter().filter(|p| p.exists()).cloned().collect();
        if !existing.is_empty() && !force_overwrite {
            warn!("Skipping {}, output already exists (use -f to force overwrite)", input_file.display());
            return Ok(FileOutcome::Skipped(existing));
        }

        let written = converter::write_outputs(&documents, &output_base)?;
        for path in &written {
            info!("Success: {}", path.display());
        }
        debug!("Converted {} in {}", input_file.display(), Self::format_duration(start_time.elapsed()));

        Ok(FileOutcome::Converted(written))
    }

    /// Convert an SRT file to LRC
    pub fn srt_to_lrc(&self, input_file: &Path, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<FileOutcome, AppError> {
        let output_file = output_file.unwrap_or_else(|| FileManager::generate_output_path(input_file, "", "lrc"));

        if output_file.exists() && !force_overwrite {
            warn!("Skipping {}, output already exists (use -f to force overwrite)", input_file.display());
            return Ok(FileOutcome::Skipped(vec![output_file]));
        }

        let converter = SrtToLrcConverter::new(self.config.srt_to_lrc.clone());
        converter.convert(input_file, &output_file)?;

        Ok(FileOutcome::Converted(vec![output_file]))
    }

    /// Merge two LRC files; the default output is `<primary stem>_merged.lrc`
    pub fn merge(&self, primary: &Path, secondary: &Path, output_file: Option<PathBuf>) -> Result<MergeReport, AppError> {
        let output_file = output_file.unwrap_or_else(|| FileManager::generate_output_path(primary, "_merged", "lrc"));
        let report = lrc_merge::merge_files(primary, secondary, &output_file, self.config.merge.tolerance_ms)?;
        Ok(report)
    }

    /// Split a lyric file into parts of `split.lines_per_file` lines
    pub fn split(&self, input_file: &Path) -> Result<Vec<PathBuf>, AppError> {
        let parts = lrc_split::split_file(input_file, self.config.split.lines_per_file)?;
        Ok(parts)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Convert every LRC file under `input_dir` (recursive).
    /// A failing file is logged and counted; the run continues.
    pub fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let lyric_files = FileManager::find_files(input_dir, "lrc")?;
        if lyric_files.is_empty() {
            return Err(anyhow!("No LRC files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(lyric_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for lyric_file in &lyric_files {
            let file_name = lyric_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match folder_pb.suspend(|| self.lrc_to_srt(lyric_file, None, force_overwrite)) {
                Ok(FileOutcome::Converted(_)) => summary.processed += 1,
                Ok(FileOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    folder_pb.suspend(|| error!("Error processing file {}: {:#}", file_name, e));
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors ({})",
            summary.processed,
            summary.skipped,
            summary.errors,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }
}
