//! Stylemix: Style Synthesis Pipeline
//!
//! Distills the visual style shared by a set of reference images into a
//! single description, then generates new images in that style. The
//! synthesized style is cached per project and reused until the set of
//! reference images changes.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod encoding;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod pipeline;
pub mod project;
pub mod prompt;
pub mod provider;
pub mod store;
pub mod types;
