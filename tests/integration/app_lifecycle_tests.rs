/*!
 * Integration tests for the application controller
 */

use anyhow::Result;
use std::fs;

use lrckit::app_config::Config;
use lrckit::app_controller::{Controller, FileOutcome, FolderSummary};
use lrckit::errors::{AppError, ConversionError};
use lrckit::lyric_parser::ParsedDocument;
use crate::common;

fn controller() -> Controller {
    Controller::with_config(Config::default()).unwrap()
}

/// Test that an invalid configuration is refused
#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.converter.tail_ms = 0;
    assert!(matches!(Controller::with_config(config), Err(AppError::Config(_))));
}

/// Test that library errors reach the caller typed
#[test]
fn test_split_withMissingInput_shouldReturnInputNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing.lrc");

    match controller().split(&missing) {
        Err(AppError::Conversion(ConversionError::InputNotFound { path })) => assert_eq!(path, missing),
        other => panic!("Expected InputNotFound, got {:?}", other),
    }

    Ok(())
}

/// Test a GBK-encoded subtitle file going through the SRT -> LRC path
#[test]
fn test_srt_to_lrc_withGbkInput_shouldWriteUtf8Lyrics() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("chinese.srt");
    fs::write(&input, common::GBK_SRT_BYTES)?;

    let mut config = Config::default();
    config.srt_to_lrc.add_metadata = false;
    let outcome = Controller::with_config(config)?.srt_to_lrc(&input, None, false)?;

    let output = temp_dir.path().join("chinese.lrc");
    assert_eq!(outcome, FileOutcome::Converted(vec![output.clone()]));
    assert_eq!(fs::read_to_string(&output)?, "[00:02.50]中文\n");

    Ok(())
}

/// Test direction detection and the skip/force behaviour for LRC input
#[test]
fn test_run_withExistingOutputs_shouldSkipUnlessForced() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_lyrics(temp_dir.path(), "song.lrc")?;
    let controller = controller();

    let first = controller.run(&input, None, false)?;
    let expected = vec![temp_dir.path().join("song_1.srt"), temp_dir.path().join("song_2.srt")];
    assert_eq!(first, FileOutcome::Converted(expected.clone()));

    fs::write(&expected[0], "stale")?;
    let second = controller.run(&input, None, false)?;
    assert_eq!(second, FileOutcome::Skipped(expected.clone()));
    assert_eq!(fs::read_to_string(&expected[0])?, "stale");

    let third = controller.run(&input, None, true)?;
    assert_eq!(third, FileOutcome::Converted(expected.clone()));
    assert!(fs::read_to_string(&expected[0])?.starts_with("1\n00:00:01,000 --> 00:00:04,500\nHello\n"));

    Ok(())
}

/// Test SRT input going the other way
#[test]
fn test_run_withSrtInput_shouldWriteLrc() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let outcome = controller().run(&input, None, false)?;
    let output = temp_dir.path().join("movie.lrc");
    assert_eq!(outcome, FileOutcome::Converted(vec![output.clone()]));

    let lyrics = ParsedDocument::parse(&fs::read_to_string(&output)?)?;
    assert_eq!(lyrics.len(), 3);
    assert_eq!(lyrics.metadata_value("ti"), Some("movie"));

    Ok(())
}

/// Test that unrecognised files are rejected
#[test]
fn test_run_withUnknownFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.txt", "plain text")?;

    assert!(controller().run(&input, None, false).is_err());
    assert!(controller().run(&temp_dir.path().join("missing.lrc"), None, false).is_err());

    Ok(())
}

/// Test a folder run with a failing file, an already converted file and new files
#[test]
fn test_run_folder_withMixedFiles_shouldCountOutcomes() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let sub = dir.join("sub");
    fs::create_dir_all(&sub)?;

    common::create_test_lyrics(dir, "a.lrc")?;
    common::create_test_file(dir, "b.lrc", "[00:01.00]single\n")?;
    common::create_test_file(dir, "b.srt", "already here")?;
    common::create_test_file(&sub, "c.lrc", "[01:6x.00]broken\n")?;
    common::create_test_file(dir, "ignored.txt", "[00:01.00]not picked up\n")?;

    let summary = controller().run_folder(dir, false)?;
    assert_eq!(summary, FolderSummary { processed: 1, skipped: 1, errors: 1 });
    assert!(dir.join("a_1.srt").exists());
    assert!(dir.join("a_2.srt").exists());
    assert_eq!(fs::read_to_string(dir.join("b.srt"))?, "already here");

    let forced = controller().run_folder(dir, true)?;
    assert_eq!(forced, FolderSummary { processed: 2, skipped: 0, errors: 1 });
    assert!(fs::read_to_string(dir.join("b.srt"))?.contains("single"));

    Ok(())
}

/// Test folder runs on an empty or missing directory
#[test]
fn test_run_folder_withoutLyrics_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(controller().run_folder(temp_dir.path(), false).is_err());
    assert!(controller().run_folder(&temp_dir.path().join("missing"), false).is_err());

    Ok(())
}

/// Test merging two single-language files and converting the result
#[test]
fn test_merge_thenConvert_shouldRestoreBothLanguages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let original = common::create_test_file(dir, "jp.lrc", "[00:01.00]ichi\n[00:03.00]ni\n[00:05.00]san\n")?;
    let translation = common::create_test_file(dir, "en.lrc", "[00:01.20]one\n[00:02.90]two\n[00:05.40]three\n")?;

    let controller = controller();
    let report = controller.merge(&original, &translation, None)?;
    assert_eq!(report.matched_pairs, 3);
    assert_eq!(report.total_lines, 6);
    assert!(report.unmatched_primary.is_empty());

    let merged = dir.join("jp_merged.lrc");
    let content = fs::read_to_string(&merged)?;
    assert!(content.starts_with("[merged:jp.lrc + en.lrc]\n\n[00:01.00]ichi\n[00:01.00]one\n"));

    let outcome = controller.run(&merged, None, false)?;
    let expected = vec![dir.join("jp_merged_1.srt"), dir.join("jp_merged_2.srt")];
    assert_eq!(outcome, FileOutcome::Converted(expected.clone()));
    assert!(fs::read_to_string(&expected[1])?.contains("00:00:03,000 --> 00:00:05,000\ntwo\n"));

    Ok(())
}

/// Test that a tight tolerance leaves lines unpaired
#[test]
fn test_merge_withTightTolerance_shouldReportUnmatched() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let original = common::create_test_file(dir, "a.lrc", "[00:01.00]a\n")?;
    let translation = common::create_test_file(dir, "b.lrc", "[00:01.20]b\n")?;

    let mut config = Config::default();
    config.merge.tolerance_ms = 100;
    let controller = Controller::with_config(config)?;

    let output = dir.join("out.lrc");
    let report = controller.merge(&original, &translation, Some(output.clone()))?;
    assert_eq!(report.matched_pairs, 0);
    assert_eq!(report.unmatched_primary.len(), 1);
    assert_eq!(report.unmatched_secondary.len(), 1);
    assert!(fs::read_to_string(&output)?.ends_with("[00:01.00]a\n[00:01.20]b\n"));

    Ok(())
}

/// Test splitting a file into fixed-size parts
#[test]
fn test_split_withSmallPartSize_shouldWriteNumberedParts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_lyrics(temp_dir.path(), "long.lrc")?;

    let mut config = Config::default();
    config.split.lines_per_file = 3;
    let parts = Controller::with_config(config)?.split(&input)?;

    let expected: Vec<_> = (1..=3)
        .map(|n| temp_dir.path().join(format!("long_part{}.lrc", n)))
        .collect();
    assert_eq!(parts, expected);

    assert_eq!(fs::read_to_string(&parts[0])?, "[ti:Test Song]\n[ar:Test Artist]\n[00:01.00]Hello\n");
    assert_eq!(fs::read_to_string(&parts[2])?, "[00:09.00]Bye\n[00:09.00]Au revoir\n");

    let rejoined: String = parts
        .iter()
        .map(fs::read_to_string)
        .collect::<std::io::Result<Vec<_>>>()?
        .concat();
    assert_eq!(rejoined, common::BILINGUAL_LRC);

    Ok(())
}
