use log::debug;

use crate::lyric_parser::{LyricEntry, ParsedDocument};

// @module: Distribution of same-timestamp lyric lines into parallel lanes

/// One independent, timestamp-sorted sequence of lyric entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lane {
    /// 1-based lane number
    pub number: usize,

    pub entries: Vec<LyricEntry>,
}

impl Lane {
    fn new(number: usize) -> Self {
        Lane {
            number,
            entries: Vec::new(),
        }
    }
}

/// Assign every entry to a lane.
///
/// Within one timestamp group the first line encountered in the source goes
/// to lane 1, the second to lane 2, and so on. The number of lanes is the
/// document's duplication degree; lanes that have nothing at a given
/// timestamp simply skip it.
pub fn distribute(document: &ParsedDocument) -> Vec<Lane> {
    let degree = document.duplication_degree();
    let mut lanes: Vec<Lane> = (1..=degree).map(Lane::new).collect();

    for group in document.timestamp_groups() {
        // Groups come out of a stable sort, so slice order is encounter order
        for (position, entry) in group.iter().enumerate() {
            lanes[position].entries.push(entry.clone());
        }
    }

    if degree > 1 {
        debug!(
            "Distributed {} entries into {} lanes ({})",
            document.len(),
            degree,
            lanes
                .iter()
                .map(|lane| lane.entries.len().to_string())
                .collect::<Vec<_>>()
                .join("/")
        );
    }

    lanes
}

/// Keep everything in a single lane, joining lines that share a timestamp
/// with `separator`.
pub fn collapse(document: &ParsedDocument, separator: &str) -> Lane {
    let mut lane = Lane::new(1);

    for group in document.timestamp_groups() {
        let first = &group[0];
        let text = group
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join(separator);

        lane.entries.push(LyricEntry::new(first.timestamp_ms, text, first.order));
    }

    lane
}
