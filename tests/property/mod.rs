//! Property-based tests for fingerprint and history invariants

mod fingerprint;
mod history;
