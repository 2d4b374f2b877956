/*!
 * Tests for error types
 */

use std::error::Error;
use std::io;
use std::path::PathBuf;

use lrckit::errors::{AppError, ConversionError};

/// Test that messages carry the useful details
#[test]
fn test_conversion_error_display_shouldIncludeDetails() {
    let not_found = ConversionError::InputNotFound {
        path: PathBuf::from("missing.lrc"),
    };
    assert_eq!(not_found.to_string(), "Input file not found: missing.lrc");

    let parse = ConversionError::parse(7, "0a:01.00", "minutes '0a' are not numeric");
    assert_eq!(
        parse.to_string(),
        "Parse error at line 7: invalid time tag [0a:01.00] (minutes '0a' are not numeric)"
    );

    let write = ConversionError::Write {
        path: PathBuf::from("/ro/out.srt"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert!(write.to_string().contains("/ro/out.srt"));
    assert!(write.source().is_some());
}

/// Test conversions into the application error
#[test]
fn test_app_error_from_shouldWrapConversionError() {
    let app: AppError = ConversionError::InvalidSrt("x.srt".to_string()).into();
    assert!(matches!(app, AppError::Conversion(ConversionError::InvalidSrt(_))));
    assert_eq!(app.to_string(), "Conversion error: No valid subtitle blocks found in x.srt");
    assert!(app.source().is_some());
}
