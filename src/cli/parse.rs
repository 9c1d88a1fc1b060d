//! CLI parse: clap types for stylemix. No behavior; definitions only.

use crate::types::AspectRatio;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stylemix CLI - generate images in the synthesized style of reference images
#[derive(Parser)]
#[command(name = "stylemix")]
#[command(about = "Generate images in a style synthesized from reference images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for config/config.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (layered above workspace config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize a style from reference images and generate new images with it
    Generate {
        /// Reference image files (png, jpg, gif, webp)
        #[arg(long = "image", short = 'i', required = true, num_args = 1..)]
        images: Vec<PathBuf>,

        /// Content prompt
        #[arg(long, short = 'p')]
        prompt: String,

        /// Images per round (defaults to pipeline.default_image_count)
        #[arg(long, short = 'n')]
        count: Option<usize>,

        /// Aspect ratio (defaults to pipeline.default_aspect_ratio)
        #[arg(long, value_enum)]
        aspect: Option<AspectRatio>,

        /// Output directory for generated images
        #[arg(long, short = 'o', default_value = ".")]
        out: PathBuf,

        /// Number of generation rounds; later rounds reuse the synthesized style
        #[arg(long, default_value = "1")]
        rounds: usize,
    },
    /// Show the effective configuration and validate it
    Config,
}
