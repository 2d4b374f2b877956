use crate::app_config::ConverterConfig;
use crate::lyric_parser::LyricEntry;
use crate::subtitle_processor::SubtitleBlock;

// @module: Start/end interval synthesis for one lane

/// Turn one lane's sorted entries into numbered subtitle blocks.
///
/// Each block ends where the next one starts, but never sooner than
/// `min_duration_ms` after its own start. The last block lasts `tail_ms`
/// (also floored at `min_duration_ms`). Indices restart at 1 for every lane.
pub fn synthesize(entries: &[LyricEntry], config: &ConverterConfig) -> Vec<SubtitleBlock> {
    let floor = |start: u64| start.saturating_add(config.min_duration_ms);

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let start_ms = entry.timestamp_ms;
            let end_ms = match entries.get(i + 1) {
                Some(next) => next.timestamp_ms.max(floor(start_ms)),
                None => start_ms.saturating_add(config.tail_ms).max(floor(start_ms)),
            };

            SubtitleBlock::new(i + 1, start_ms, end_ms, entry.text.clone())
        })
        .collect()
}
