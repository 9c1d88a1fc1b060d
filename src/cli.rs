//! CLI domain: parse, route and output only.
//! No pipeline logic lives here; commands dispatch to the orchestrator.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::RunContext;
