//! CLI presentation: text and json formatters per command family.

mod animation;
mod frame;

pub use animation::{format_metadata_json, format_metadata_text, format_replace_summary};
pub use frame::{format_frame_hex, format_frame_preview};
