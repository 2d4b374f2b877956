/*!
 * Tests for file and directory utilities
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use lrckit::file_utils::{FileManager, FileType};
use crate::common;

/// Test sibling output path generation
#[test]
fn test_generate_output_path_withSuffix_shouldKeepDirectory() {
    let path = FileManager::generate_output_path("/music/album/song.lrc", "_merged", "lrc");
    assert_eq!(path, PathBuf::from("/music/album/song_merged.lrc"));

    let path = FileManager::generate_output_path("song.srt", "", ".lrc");
    assert_eq!(path, PathBuf::from("song.lrc"));
}

/// Test recursive search with case-insensitive extensions
#[test]
fn test_find_files_withNestedDirectories_shouldFindAllMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("disc2");
    fs::create_dir_all(&nested)?;

    common::create_test_file(temp_dir.path(), "b.lrc", "")?;
    common::create_test_file(temp_dir.path(), "a.LRC", "")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;
    common::create_test_file(&nested, "c.lrc", "")?;

    let found = FileManager::find_files(temp_dir.path(), ".lrc")?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names, vec!["a.LRC", "b.lrc", "c.lrc"]);

    Ok(())
}

/// Test type detection by extension and by content
#[test]
fn test_detect_file_type_withVariousFiles_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let lrc = common::create_test_lyrics(dir, "song.lrc")?;
    let srt = common::create_test_subtitle(dir, "song.srt")?;
    let lrc_txt = common::create_test_file(dir, "lyrics.txt", "[00:01.00]hidden lyrics\n")?;
    let srt_txt = common::create_test_file(dir, "subs.txt", "1\n00:00:01,000 --> 00:00:02,000\nhi\n")?;
    let other = common::create_test_file(dir, "readme.txt", "nothing to see")?;

    assert_eq!(FileManager::detect_file_type(&lrc)?, FileType::Lyrics);
    assert_eq!(FileManager::detect_file_type(&srt)?, FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&lrc_txt)?, FileType::Lyrics);
    assert_eq!(FileManager::detect_file_type(&srt_txt)?, FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    assert!(FileManager::detect_file_type(dir.join("missing.lrc")).is_err());

    Ok(())
}

/// Test decoding of the supported encodings
#[test]
fn test_decode_text_withVariousEncodings_shouldPickTheRightOne() {
    let (text, encoding) = FileManager::decode_text("[00:01.00]héllo".as_bytes());
    assert_eq!(text, "[00:01.00]héllo");
    assert_eq!(encoding, encoding_rs::UTF_8);

    let (text, encoding) = FileManager::decode_text(b"\xef\xbb\xbf[ti:x]");
    assert_eq!(text, "[ti:x]");
    assert_eq!(encoding, encoding_rs::UTF_8);

    let mut utf16 = vec![0xff, 0xfe];
    utf16.extend("歌词".encode_utf16().flat_map(|unit| unit.to_le_bytes()));
    let (text, encoding) = FileManager::decode_text(&utf16);
    assert_eq!(text, "歌词");
    assert_eq!(encoding, encoding_rs::UTF_16LE);

    let (text, encoding) = FileManager::decode_text(common::GBK_LRC_BYTES);
    assert_eq!(text, "[00:01.00]你好\n");
    assert_eq!(encoding, encoding_rs::GBK);
}

/// Test that bytes invalid in every multi-byte encoding still decode
#[test]
fn test_decode_text_withStrayBytes_shouldFallBackToWindows1252() {
    let (text, encoding) = FileManager::decode_text(b"caf\xe9\xff");
    assert_eq!(encoding, encoding_rs::WINDOWS_1252);
    assert_eq!(text, "café\u{ff}");
}

/// Test reading with a byte order mark and writing into a new directory
#[test]
fn test_read_and_write_withBomAndNewDirectory_shouldWork() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("new").join("file.lrc");

    FileManager::write_to_file(&path, "\u{feff}[00:01.00]x")?;
    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(temp_dir.path().join("new")));
    assert_eq!(FileManager::read_to_string(&path)?, "[00:01.00]x");

    Ok(())
}
