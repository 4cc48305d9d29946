//! Environment source: `LEDFRAME__SECTION__KEY=value`, e.g. `LEDFRAME__FRAMES__ID_LENGTH=8`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("LEDFRAME")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
