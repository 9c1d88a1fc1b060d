//! CLI route: run context and command dispatch.

use crate::cli::parse::Commands;
use crate::config::{ConfigLoader, StylemixConfig};
use crate::credentials::{CredentialResolver, CredentialSource};
use crate::error::ApiError;
use crate::pipeline::{PipelineEvent, PipelineOrchestrator, PipelineRequest};
use crate::provider::GeminiClientFactory;
use crate::store::ProjectStore;
use crate::types::{AspectRatio, GeneratedImage, ImagePayload, ReferenceImage};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Runtime context for CLI execution: workspace and effective configuration.
pub struct RunContext {
    config: StylemixConfig,
    workspace_root: PathBuf,
}

impl RunContext {
    /// Load configuration for the workspace, with an optional explicit file on top.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_with(&workspace_root, config_path.as_deref())?;
        Ok(Self::from_config(workspace_root, config))
    }

    pub fn from_config(workspace_root: PathBuf, config: StylemixConfig) -> Self {
        Self {
            config,
            workspace_root,
        }
    }

    pub fn config(&self) -> &StylemixConfig {
        &self.config
    }

    pub async fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Generate {
                images,
                prompt,
                count,
                aspect,
                out,
                rounds,
            } => {
                self.generate(images, prompt, *count, *aspect, out, *rounds)
                    .await
            }
            Commands::Config => self.show_config(),
        }
    }

    async fn generate(
        &self,
        image_paths: &[PathBuf],
        prompt: &str,
        count: Option<usize>,
        aspect: Option<AspectRatio>,
        out: &Path,
        rounds: usize,
    ) -> Result<String> {
        let references = image_paths
            .iter()
            .map(|path| {
                ImagePayload::from_path(path)
                    .map(ReferenceImage::new)
                    .with_context(|| format!("Failed to load reference image {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        let store = ProjectStore::with_default_project();
        let project_id = store.active_id().context("No active project")?;
        store.add_reference_images(&project_id, references)?;
        store.set_prompt(&project_id, prompt)?;

        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<PipelineEvent>();
        let printer = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                eprintln!("{}", event.message());
            }
        });

        let orchestrator = PipelineOrchestrator::new(
            Arc::new(GeminiClientFactory::new(self.config.provider.clone())),
            CredentialResolver::new(self.config.provider.api_key.clone()),
        )
        .with_max_image_count(self.config.pipeline.max_image_count)
        .with_progress(Arc::new(events_tx));

        let request = PipelineRequest::new(
            count.unwrap_or(self.config.pipeline.default_image_count),
            aspect.unwrap_or(self.config.pipeline.default_aspect_ratio),
        );

        std::fs::create_dir_all(out)
            .with_context(|| format!("Failed to create output directory {}", out.display()))?;

        let mut written = Vec::new();
        let mut outcome = Ok(());
        for round in 1..=rounds.max(1) {
            info!(round, "Generation round");
            let saved = match orchestrator.run_pipeline(&store, request).await {
                Ok(images) => write_images(out, &images, &mut written),
                Err(err) => Err(err.into()),
            };
            if let Err(err) = saved {
                outcome = Err(err);
                break;
            }
        }

        // Closing the channel lets the printer drain and stop.
        drop(orchestrator);
        let _ = printer.await;
        outcome?;

        let mut lines = vec![format!("Wrote {} image(s):", written.len())];
        lines.extend(written.iter().map(|path| format!("  {}", path.display())));
        if let Some(style) = store.active_project().and_then(|p| p.cached_style) {
            lines.push(format!("Style: {}", style.description));
        }
        Ok(lines.join("\n"))
    }

    fn show_config(&self) -> Result<String> {
        let mut output = format!("# workspace: {}\n", self.workspace_root.display());
        output.push_str(&self.config.to_redacted_toml()?);

        let resolver = CredentialResolver::new(self.config.provider.api_key.clone());
        let credential = match resolver.resolve_with_source() {
            Some((_, CredentialSource::Environment(var))) => format!("API key: from {}", var),
            Some((_, CredentialSource::Configured)) => "API key: from configuration".to_string(),
            None => "API key: not configured".to_string(),
        };
        output.push('\n');
        output.push_str(&credential);

        match self.config.validate() {
            Ok(()) => output.push_str("\nConfiguration is valid"),
            Err(errors) => {
                output.push_str("\nConfiguration errors:");
                for error in errors {
                    output.push_str(&format!("\n  - {}", error));
                }
            }
        }
        Ok(output)
    }
}

/// Save decoded images under `out`, recording each written path.
fn write_images(out: &Path, images: &[GeneratedImage], written: &mut Vec<PathBuf>) -> Result<()> {
    for image in images {
        let path = out.join(image.file_name());
        let bytes = image.payload.decode()?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write image {}", path.display()))?;
        written.push(path);
    }
    Ok(())
}
