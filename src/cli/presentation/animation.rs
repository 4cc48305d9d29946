//! Animation presentation: metadata listing and replace summaries.

use crate::error::SyncError;
use crate::metadata::{Metadata, Playback};
use crate::sync::ReplaceSummary;
use crate::transfer::encode_metadata_response;
use comfy_table::Table;

pub fn format_metadata_text(metadata: &[Metadata], sentinel: Option<u32>) -> String {
    if metadata.is_empty() {
        return "No animations stored.\n\nUse 'ledframe replace <file>' to upload some.".to_string();
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Animation", "Frames", "Frame (ms)", "Repeat", "Cycle (ms)", "First frame"]);
    for entry in metadata {
        let repeat = match entry.playback(sentinel) {
            Playback::Forever => "forever".to_string(),
            Playback::Times(n) => n.to_string(),
        };
        let first = entry
            .frame_order
            .first()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            entry.animation_id.clone(),
            entry.total_frames.to_string(),
            entry.frame_duration.to_string(),
            repeat,
            entry.cycle_duration_ms().to_string(),
            first,
        ]);
    }
    format!("{}\n\nTotal: {} animation(s)", table, metadata.len())
}

/// The metadata read document, as a client receives it.
pub fn format_metadata_json(metadata: &[Metadata]) -> Result<String, SyncError> {
    Ok(encode_metadata_response(metadata)?)
}

pub fn format_replace_summary(summary: &ReplaceSummary) -> String {
    format!(
        "Replaced animations: {} animation(s), {} frame(s) stored",
        summary.animations, summary.frames
    )
}
