//! CLI parse: clap types for Ledframe. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ledframe CLI - Pixel-matrix animation cache
#[derive(Parser)]
#[command(name = "ledframe")]
#[command(about = "Store, inspect and replace 16x16 LED matrix animations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides storage.store_path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Keep everything in memory; nothing is read from or written to disk
    #[arg(long)]
    pub ephemeral: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every animation in display order
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Preview one frame
    Show {
        /// Frame identifier
        frame_id: String,
        /// Show the frame in serpentine hardware order
        #[arg(long)]
        hardware: bool,
        /// Print hex colours instead of a coloured preview
        #[arg(long)]
        hex: bool,
    },
    /// Replace every animation with the contents of a metadata JSON document
    Replace {
        /// Path to the upload document
        file: PathBuf,
    },
    /// Write the current cache as a multipart upload
    Export {
        /// Multipart boundary (random when omitted)
        #[arg(long)]
        boundary: Option<String>,
    },
    /// Write the raw bytes of one frame to stdout
    Frame {
        /// Frame identifier
        frame_id: String,
    },
}
