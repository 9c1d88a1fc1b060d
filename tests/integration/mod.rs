//! Integration tests for the stylemix pipeline

mod config_loading;
mod pipeline_failures;
