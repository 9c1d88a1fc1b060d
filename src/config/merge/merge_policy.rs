//! Merge rules: defaults, override order, environment overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};

/// Prefix for environment overrides, e.g. `STYLEMIX__PROVIDER__IMAGE_MODEL`
pub const ENV_PREFIX: &str = "STYLEMIX";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("pipeline.default_image_count", 1)?
        .set_default("pipeline.default_aspect_ratio", "square")?
        .set_default("logging.level", "info")
}

/// Environment variables override every file source.
pub fn environment_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
