//! Workspace config file source.
//!
//! A workspace's `config/` directory holds the per-project model choices,
//! image count defaults and log settings: `config.toml` for the shared values
//! and `{STYLEMIX_ENV}.toml` (default `development`) for environment tweaks,
//! e.g. a cheaper image model in `development.toml`. Keep API keys out of
//! these files; use `STYLEMIX_API_KEY` instead.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;
use tracing::debug;

/// Environment selecting the second workspace file
pub const ENV_VAR: &str = "STYLEMIX_ENV";

const DEFAULT_ENV: &str = "development";

/// Layer the workspace files over the global file. Missing files are skipped.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
    let config_dir = workspace_root.join("config");

    for name in ["config".to_string(), env_name] {
        let path = config_dir.join(format!("{}.toml", name));
        if path.exists() {
            debug!(config_path = %path.display(), "Workspace configuration file");
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    Ok(builder)
}
