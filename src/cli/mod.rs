//! Release workflow driven by the `release` command

pub mod orchestration;

pub use orchestration::{ReleaseOutcome, ReleaseWorkflow};
