//! Workspace config files, layered over the global file.
//!
//! `config/config.toml` holds the animation cache settings shared by every
//! deployment of a workspace; `config/{LEDFRAME_ENV}.toml` (default
//! `development`) adjusts them per deployment, e.g. a longer `frames.id_length`
//! on a device with many animations. Environment variables still win over both.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_VAR: &str = "LEDFRAME_ENV";
const DEFAULT_ENV: &str = "development";

/// Candidate files in the order they are applied. They may not exist.
pub fn workspace_config_paths(workspace_root: &Path) -> [PathBuf; 2] {
    let dir = workspace_root.join("config");
    let env = std::env::var(ENV_VAR)
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string());
    [dir.join("config.toml"), dir.join(format!("{}.toml", env))]
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(workspace_config_paths(workspace_root)
        .into_iter()
        .filter(|path| path.is_file())
        .fold(builder, |builder, path| {
            debug!(config_path = %path.display(), "Layering workspace configuration");
            builder.add_source(File::from(path.as_path()).required(false))
        }))
}
