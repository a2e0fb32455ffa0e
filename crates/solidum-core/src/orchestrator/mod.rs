//! Layered job orchestration
//!
//! This module provides:
//! - The plan data model (`Job`, `Layer`, `Plan`) and job outcomes
//! - A runner that executes every job of a layer concurrently, waits for the
//!   whole layer, and only moves on when the layer fully succeeded

pub mod job;
pub mod runner;

pub use job::{Job, JobFailure, JobFuture, JobResult, Layer, Plan};
pub use runner::{
    run_plan, run_plan_with, NoopObserver, OverallResult, PlanObserver, RunOptions,
};
