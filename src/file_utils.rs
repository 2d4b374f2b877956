use anyhow::{Result, Context};
use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Start of an SRT block (index line followed by a time range)
static SRT_SNIFF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\s*\r?\n\d+:\d{2}:\d{2}[,.]\d{1,3}\s+-->\s+\d+:\d{2}:\d{2}[,.]\d{1,3}").unwrap()
});

// @const: An LRC time tag at the start of a line
static LRC_SNIFF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\[\d+:\d{1,2}\.\d{2,3}\]").unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Sibling output path `<stem><suffix>.<extension>`
    pub fn generate_output_path<P: AsRef<Path>>(
        input_file: P,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        match input_file.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }

    /// Find files with a specific extension in a directory (recursive, sorted)
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read a text file whatever its encoding; see [`FileManager::decode_text`]
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let (content, encoding) = Self::decode_text(&bytes);

        if encoding != UTF_8 {
            debug!("Decoded {} as {}", path.display(), encoding.name());
        }

        Ok(content)
    }

    /// Decode raw file content.
    ///
    /// A byte order mark (UTF-8, UTF-16LE/BE) decides the encoding and is
    /// removed. Without one, valid UTF-8 is taken as is, then GBK is tried,
    /// and Windows-1252 is the last resort since it accepts any byte.
    pub fn decode_text(bytes: &[u8]) -> (String, &'static Encoding) {
        if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
            let (content, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
            return (content.into_owned(), encoding);
        }

        if let Ok(content) = std::str::from_utf8(bytes) {
            return (content.to_string(), UTF_8);
        }

        if let Some(content) = GBK.decode_without_bom_handling_and_without_replacement(bytes) {
            return (content.into_owned(), GBK);
        }

        let (content, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
        (content.into_owned(), WINDOWS_1252)
    }

    /// Write a string to a file, creating its parent directory if needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(path, content)
    }

    /// Detect whether a file holds LRC lyrics or SRT subtitles
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "lrc" => return Ok(FileType::Lyrics),
                "srt" => return Ok(FileType::Subtitle),
                _ => {}
            }
        }

        // Fall back to examining file contents
        if let Ok(content) = Self::read_to_string(path) {
            if content.contains("-->") && SRT_SNIFF_REGEX.is_match(&content) {
                return Ok(FileType::Subtitle);
            }
            if LRC_SNIFF_REGEX.is_match(&content) {
                return Ok(FileType::Lyrics);
            }
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Timed lyrics (LRC)
    Lyrics,
    /// Subtitle file (SRT)
    Subtitle,
    /// Unknown file type
    Unknown,
}
