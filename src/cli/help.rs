//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string recorded in log lines (e.g. "list", "replace").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List { .. } => "list",
        Commands::Show { .. } => "show",
        Commands::Replace { .. } => "replace",
        Commands::Export { .. } => "export",
        Commands::Frame { .. } => "frame",
    }
}

/// Commands that change the store.
pub fn is_mutating(command: &Commands) -> bool {
    matches!(command, Commands::Replace { .. })
}
