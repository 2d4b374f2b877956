use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::errors::ConversionError;

// @module: LRC lyric parsing and timestamp handling

// @const: Any bracketed segment without nested brackets
static BRACKET_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[\]]*)\]").unwrap()
});

// @const: Header metadata tag such as [ar:Artist] or [offset:+200]
static METADATA_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_-]*)\s*:(.*)$").unwrap()
});

const MILLISECONDS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;

/// A single timed lyric line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricEntry {
    /// Cue point in milliseconds
    pub timestamp_ms: u64,

    /// Trimmed lyric text
    pub text: String,

    /// Position in which the tag was encountered in the source
    pub order: usize,
}

impl LyricEntry {
    pub fn new(timestamp_ms: u64, text: impl Into<String>, order: usize) -> Self {
        LyricEntry {
            timestamp_ms,
            text: text.into(),
            order,
        }
    }
}

impl fmt::Display for LyricEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", format_lrc_timestamp(self.timestamp_ms), self.text)
    }
}

/// Classification of one bracketed segment on a lyric line
#[derive(Debug, PartialEq)]
enum Tag<'a> {
    Time(u64),
    Metadata(&'a str, &'a str),
    Literal,
}

/// An LRC document with its entries sorted by timestamp.
///
/// Entries sharing a timestamp keep the order in which they appeared in the
/// source, which is what lane distribution relies on.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    entries: Vec<LyricEntry>,
    metadata: Vec<(String, String)>,
}

impl ParsedDocument {
    /// Parse LRC text.
    ///
    /// Fails on the first time tag that does not read as `mm:ss.ff` or
    /// `mm:ss.fff`; nothing is guessed.
    pub fn parse(content: &str) -> Result<Self, ConversionError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut entries = Vec::new();
        let mut metadata = Vec::new();

        for (line_index, line) in content.lines().enumerate() {
            let line_number = line_index + 1;

            // (tag start, tag end, timestamp) for every tag that delimits text
            let mut markers: Vec<(usize, usize, Option<u64>)> = Vec::new();

            for caps in BRACKET_TAG_REGEX.captures_iter(line) {
                let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                match classify_tag(inner.as_str(), line_number)? {
                    Tag::Time(ms) => markers.push((whole.start(), whole.end(), Some(ms))),
                    Tag::Metadata(key, value) => {
                        metadata.push((key.to_string(), value.trim().to_string()));
                        markers.push((whole.start(), whole.end(), None));
                    }
                    Tag::Literal => {}
                }
            }

            for (i, &(_, tag_end, timestamp)) in markers.iter().enumerate() {
                let Some(timestamp_ms) = timestamp else {
                    continue;
                };

                let text_end = markers.get(i + 1).map_or(line.len(), |next| next.0);
                let text = line[tag_end..text_end].trim();
                if text.is_empty() {
                    continue;
                }

                let order = entries.len();
                entries.push(LyricEntry::new(timestamp_ms, text, order));
            }
        }

        // Stable: ties stay in encounter order
        entries.sort_by_key(|entry| entry.timestamp_ms);

        Ok(ParsedDocument { entries, metadata })
    }

    /// Entries sorted by timestamp
    pub fn entries(&self) -> &[LyricEntry] {
        &self.entries
    }

    /// Header tags in source order; they take no part in conversion
    pub fn metadata(&self) -> &[(String, String)] {
        &self.metadata
    }

    /// Look up a header tag value, e.g. `ti` or `ar`
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Groups of entries sharing one timestamp, in timestamp order
    pub fn timestamp_groups(&self) -> impl Iterator<Item = &[LyricEntry]> {
        self.entries
            .chunk_by(|a, b| a.timestamp_ms == b.timestamp_ms)
    }

    /// Largest number of entries found at a single timestamp (at least 1)
    pub fn duplication_degree(&self) -> usize {
        self.timestamp_groups()
            .map(|group| group.len())
            .max()
            .unwrap_or(1)
    }
}

fn classify_tag(inner: &str, line_number: usize) -> Result<Tag<'_>, ConversionError> {
    if let Some(caps) = METADATA_TAG_REGEX.captures(inner) {
        if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
            return Ok(Tag::Metadata(key.as_str(), value.as_str()));
        }
    }

    let looks_like_time = inner.starts_with(|c: char| c.is_ascii_digit()) && inner.contains(':');
    if !looks_like_time {
        return Ok(Tag::Literal);
    }

    parse_time_tag(inner)
        .map(Tag::Time)
        .map_err(|reason| ConversionError::parse(line_number, inner, reason))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse the inside of a `[mm:ss.ff]` / `[mm:ss.fff]` tag to milliseconds.
///
/// A two-digit fraction is hundredths of a second, a three-digit one is
/// milliseconds. Anything else is rejected with a description of the problem.
pub fn parse_time_tag(tag: &str) -> Result<u64, String> {
    let (minutes, rest) = tag
        .split_once(':')
        .ok_or_else(|| "missing ':' separator".to_string())?;
    let (seconds, fraction) = rest
        .split_once('.')
        .ok_or_else(|| "missing fractional seconds".to_string())?;

    if !is_digits(minutes) {
        return Err(format!("minutes '{}' are not numeric", minutes));
    }
    if !is_digits(seconds) || seconds.len() > 2 {
        return Err(format!("seconds '{}' are not a 1-2 digit number", seconds));
    }
    if !is_digits(fraction) {
        return Err(format!("fraction '{}' is not numeric", fraction));
    }

    let fraction_ms: u64 = match fraction.len() {
        2 => fraction.parse::<u64>().map_err(|e| e.to_string())? * 10,
        3 => fraction.parse::<u64>().map_err(|e| e.to_string())?,
        n => return Err(format!("fraction must have 2 or 3 digits, found {}", n)),
    };

    let minutes: u64 = minutes
        .parse()
        .map_err(|_| format!("minutes '{}' out of range", minutes))?;
    let seconds: u64 = seconds.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    if seconds >= SECONDS_PER_MINUTE {
        return Err(format!("seconds value {} must be below 60", seconds));
    }

    minutes
        .checked_mul(SECONDS_PER_MINUTE)
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(MILLISECONDS_PER_SECOND))
        .and_then(|ms| ms.checked_add(fraction_ms))
        .ok_or_else(|| "timestamp out of range".to_string())
}

/// Format milliseconds as an LRC tag `[mm:ss.xx]`, rounded to hundredths
pub fn format_lrc_timestamp(ms: u64) -> String {
    let total_centis = (ms + 5) / 10;
    let minutes = total_centis / 6_000;
    let seconds = (total_centis % 6_000) / 100;
    let centis = total_centis % 100;

    format!("[{:02}:{:02}.{:02}]", minutes, seconds, centis)
}
