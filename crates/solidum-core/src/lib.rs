//! Solidum Core - Shared library for the Solidum workflow CLI
//!
//! This library provides everything the `solidum` binary does apart from
//! argument parsing. Every command either forwards to the package manager
//! (`pnpm`) with stdio streamed through, or, for monorepo builds, runs the
//! packages through the layered build orchestrator.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Orchestration** - `Plan`/`Layer`/`Job` and `run_plan`, a generic
//!   runner that executes each layer concurrently with a barrier between layers
//! - **Layer 2: Workflow** - per-command argument assembly and execution
//!   (`build`, `test`, `lint`, `typecheck`, `format`, `dev`, `clean`, `publish`)
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage
//!
//! ```ignore
//! use solidum_core::orchestrator::{run_plan, Job, Layer, Plan};
//!
//! let plan = Plan::new(vec![
//!     Layer::new(vec![Job::new("utils", || async { Ok(()) })])?,
//!     Layer::new(vec![Job::new("core", || async { Ok(()) })])?,
//! ]);
//! assert!(run_plan(&plan).await.is_success());
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod runtime;
pub mod workflow;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{BuildLayers, ProjectContext, ProjectKind};
pub use error::{ConfigError, PlanAborted, PlanError, ProcessError};
pub use orchestrator::{
    run_plan, run_plan_with, Job, JobFailure, JobResult, Layer, NoopObserver, OverallResult, Plan,
    PlanObserver, RunOptions,
};
pub use runtime::CommandSpec;

/// Package manager every workflow command forwards to
pub const PACKAGE_MANAGER: &str = "pnpm";
