use log::info;
use std::path::{Path, PathBuf};

use crate::converter::read_input;
use crate::errors::ConversionError;
use crate::file_utils::FileManager;

// @module: Splitting long lyric files into fixed-size parts

/// Split `input_path` into parts of at most `lines_per_file` lines, named
/// `<stem>_part<N>.<ext>` next to the input. Returns the written paths.
pub fn split_file<P: AsRef<Path>>(input_path: P, lines_per_file: usize) -> Result<Vec<PathBuf>, ConversionError> {
    let input_path = input_path.as_ref();
    let content = read_input(input_path)?;

    let extension = input_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_else(|| "txt".to_string());

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut written = Vec::new();

    for (i, chunk) in lines.chunks(lines_per_file.max(1)).enumerate() {
        let part_path = FileManager::generate_output_path(input_path, &format!("_part{}", i + 1), &extension);

        FileManager::write_to_file(&part_path, &chunk.concat()).map_err(|source| ConversionError::Write {
            path: part_path.clone(),
            source,
        })?;

        info!("Created: {}", part_path.display());
        written.push(part_path);
    }

    Ok(written)
}
