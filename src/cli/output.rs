//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::PipelineError;

/// Map command errors to a string for CLI output.
/// Pipeline failures show their user-facing message; the cause is in the logs.
pub fn map_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<PipelineError>() {
        Some(pipeline_error) => pipeline_error.user_message(),
        None => format!("{:#}", e),
    }
}
