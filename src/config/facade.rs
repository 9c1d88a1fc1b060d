//! Configuration loading facade.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::StylemixConfig;
use crate::error::ApiError;
use config::File;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace: defaults, global file, workspace
    /// files, then environment overrides.
    pub fn load(workspace_root: &Path) -> Result<StylemixConfig, ApiError> {
        Self::load_with(workspace_root, None)
    }

    /// Load from a single explicit file plus defaults and environment overrides.
    pub fn load_from_file(path: &Path) -> Result<StylemixConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(merge_policy::environment_source());
        Ok(builder.build()?.try_deserialize()?)
    }

    /// Load all layers; an explicit file sits above the workspace files.
    pub fn load_with(
        workspace_root: &Path,
        explicit: Option<&Path>,
    ) -> Result<StylemixConfig, ApiError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        builder = workspace_file::add_to_builder(builder, workspace_root)?;
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(merge_policy::environment_source());

        let config: StylemixConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }
}
