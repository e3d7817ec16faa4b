//! # AUR helper dispatch
//!
//! One invocation flows through these modules in order:
//!
//! - `detector`: resolve `auto` or a helper name to a registry entry
//! - `builder`: validate the request against that entry and expand the argv
//! - `runner`: execute it as a child process and capture its output
//! - `classifier`: decide changed / unchanged / failed from exit code and text
//! - `report`: map the outcome onto the caller's result contract
//!
//! `registry` holds the per-helper data every other step reads.

pub mod builder;
pub mod classifier;
pub mod detector;
pub mod registry;
pub mod report;
pub mod runner;

pub use builder::{CommandBuilder, ResolvedCommand};
pub use classifier::{OutcomeReport, classify};
pub use detector::{HelperDetector, PathProber, WhichProber};
pub use registry::HelperSpec;
pub use report::TaskResult;
pub use runner::{CommandRunner, ExecutionResult, ProcessRunner};
