//! Harvest module - runs the category workflows
//!
//! Ties the retrying fetcher to the report pipeline. Targets are processed
//! sequentially; a failed target is logged and skipped, a shutdown stops the
//! current category and everything after it.

mod workflow;

pub use workflow::{CategoryRun, FailedTarget, Harvester};
