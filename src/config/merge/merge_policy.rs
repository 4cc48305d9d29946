//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("storage.store_path", ".ledframe/store")?
        .set_default("frames.id_length", crate::types::DEFAULT_FRAME_ID_LENGTH as i64)?
        .set_default("seed.enabled", true)
}
