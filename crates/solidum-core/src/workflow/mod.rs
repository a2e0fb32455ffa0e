//! Workflow commands
//!
//! Each command is split into a pure function that assembles the package
//! manager invocation from its options and the project kind, and an async
//! `run_*` function that prints status and executes it.

pub mod build;
pub mod clean;
pub mod dev;
pub mod format;
pub mod lint;
pub mod publish;
pub mod report;
pub mod typecheck;

pub use build::{build_strategy, run_build, BuildOptions, BuildStrategy};
pub use clean::{clean_steps, run_clean, CleanOptions, CleanStep};
pub use dev::{dev_command, run_dev, DevOptions};
pub use format::{format_command, run_format, FormatOptions};
pub use lint::{lint_command, run_lint, LintOptions};
pub use publish::{publish_command, run_publish, PublishOptions};
pub use report::ConsoleReporter;
pub use test::{run_test, test_command, TestOptions};
pub use typecheck::{run_typecheck, typecheck_command, TypecheckOptions};

use crate::config::ProjectContext;
use crate::error::ProcessError;
use crate::runtime::{run_interactive, tool_for, CommandSpec};
use anyhow::{Context, Result};
use colored::Colorize;

/// Replace "program not found" with the tool's install hint
fn missing_tool_hint(err: ProcessError) -> anyhow::Error {
    if let ProcessError::Spawn { program, .. } = &err {
        if let Some(tool) = tool_for(program).filter(|_| err.is_not_found()) {
            return anyhow::anyhow!(tool.missing_message());
        }
    }
    err.into()
}

/// `--filter <package> <script>`
fn filtered(package: &str, script: &str) -> CommandSpec {
    CommandSpec::package_manager(["--filter", package, script])
}

/// Run a command with stdio streamed through, labelling failures with `what`
async fn forward(ctx: &ProjectContext, spec: &CommandSpec, what: &str) -> Result<()> {
    println!("{} {}", "Running:".dimmed(), spec.to_string().yellow());
    println!();
    run_interactive(spec, &ctx.root)
        .await
        .map_err(missing_tool_hint)
        .with_context(|| format!("{} failed", what))
}

fn announce_package(verb: &str, package: Option<&str>) {
    if let Some(package) = package {
        println!();
        println!("{}", format!("{} package: {}", verb, package).cyan().bold());
    }
}
