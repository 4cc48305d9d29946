//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the animation cache.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{exit_code, map_error, CommandOutput};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_frame_hex, format_frame_preview, format_metadata_json, format_metadata_text,
    format_replace_summary,
};
pub use route::{RunContext, StoreOptions};
