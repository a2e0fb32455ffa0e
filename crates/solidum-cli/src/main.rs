//! Solidum CLI - development workflow for Solidum projects

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solidum_core::workflow::{
    self, BuildOptions, CleanOptions, ConsoleReporter, DevOptions, FormatOptions, LintOptions,
    PublishOptions, TestOptions, TypecheckOptions,
};
use solidum_core::ProjectContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "solidum")]
#[command(about = "Solidum - Fine-grained reactive framework CLI")]
#[command(version)]
pub struct Args {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "cwd", global = true)]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start development server
    Dev(CliDevArgs),
    /// Build the project or specific packages
    Build(CliBuildArgs),
    /// Run tests for the project
    Test(CliTestArgs),
    /// Run TypeScript type checking
    Typecheck(CliTypecheckArgs),
    /// Run ESLint on the project
    Lint(CliLintArgs),
    /// Format code with Prettier
    Format(CliFormatArgs),
    /// Clean build artifacts and dependencies
    Clean(CliCleanArgs),
    /// Build, test, and publish packages to npm
    Publish(CliPublishArgs),
}

#[derive(Parser, Debug)]
pub struct CliDevArgs {
    /// Port to run dev server on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Run dev server for specific package
    #[arg(short = 'f', long)]
    pub package: Option<String>,

    /// Run dev servers for all packages in parallel
    #[arg(short, long)]
    pub all: bool,
}

impl From<CliDevArgs> for DevOptions {
    fn from(args: CliDevArgs) -> Self {
        DevOptions {
            port: args.port,
            package: args.package,
            all: args.all,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliBuildArgs {
    /// Watch mode - rebuild on changes
    #[arg(short, long)]
    pub watch: bool,

    /// Build packages in parallel, layer by layer (monorepo)
    #[arg(
        short,
        long,
        default_value_t = true,
        default_missing_value = "true",
        num_args = 0..=1,
        require_equals = true,
        action = clap::ArgAction::Set
    )]
    pub parallel: bool,

    /// Build specific package (e.g., @sldm/core)
    #[arg(short = 'f', long)]
    pub package: Option<String>,

    /// Fail a package build that runs longer than this many seconds
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl From<CliBuildArgs> for BuildOptions {
    fn from(args: CliBuildArgs) -> Self {
        BuildOptions {
            watch: args.watch,
            parallel: args.parallel,
            package: args.package,
            job_timeout: args.timeout.map(Duration::from_secs),
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliTestArgs {
    /// Watch mode - rerun tests on changes
    #[arg(short, long)]
    pub watch: bool,

    /// Generate coverage report
    #[arg(short, long)]
    pub coverage: bool,

    /// Open Vitest UI
    #[arg(short, long)]
    pub ui: bool,

    /// Test specific package
    #[arg(short = 'f', long)]
    pub package: Option<String>,

    /// Run in CI mode with verbose output
    #[arg(long)]
    pub ci: bool,

    /// Run tests in parallel (monorepo)
    #[arg(short, long)]
    pub parallel: bool,

    /// Extra arguments passed to the test runner
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl From<CliTestArgs> for TestOptions {
    fn from(args: CliTestArgs) -> Self {
        TestOptions {
            watch: args.watch,
            coverage: args.coverage,
            ui: args.ui,
            package: args.package,
            ci: args.ci,
            parallel: args.parallel,
            extra_args: args.args,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliTypecheckArgs {
    /// Watch mode - recheck on changes
    #[arg(short, long)]
    pub watch: bool,

    /// Typecheck specific package
    #[arg(short = 'f', long)]
    pub package: Option<String>,
}

impl From<CliTypecheckArgs> for TypecheckOptions {
    fn from(args: CliTypecheckArgs) -> Self {
        TypecheckOptions {
            watch: args.watch,
            package: args.package,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliLintArgs {
    /// Automatically fix problems
    #[arg(short, long)]
    pub fix: bool,

    /// Lint specific package
    #[arg(short, long)]
    pub package: Option<String>,
}

impl From<CliLintArgs> for LintOptions {
    fn from(args: CliLintArgs) -> Self {
        LintOptions {
            fix: args.fix,
            package: args.package,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliFormatArgs {
    /// Check formatting without modifying files
    #[arg(short, long)]
    pub check: bool,
}

impl From<CliFormatArgs> for FormatOptions {
    fn from(args: CliFormatArgs) -> Self {
        FormatOptions { check: args.check }
    }
}

#[derive(Parser, Debug)]
pub struct CliCleanArgs {
    /// Clean everything (dist, node_modules, cache)
    #[arg(short, long)]
    pub all: bool,

    /// Clean dist folders only
    #[arg(short, long)]
    pub dist: bool,

    /// Clean node_modules
    #[arg(short, long)]
    pub modules: bool,

    /// Clean package manager cache
    #[arg(short, long)]
    pub cache: bool,
}

impl From<CliCleanArgs> for CleanOptions {
    fn from(args: CliCleanArgs) -> Self {
        CleanOptions {
            all: args.all,
            dist: args.dist,
            modules: args.modules,
            cache: args.cache,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliPublishArgs {
    /// Simulate publish without actually publishing
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// npm dist-tag (latest, next, beta, etc.)
    #[arg(short, long, default_value = "latest")]
    pub tag: String,

    /// Package access (public or restricted)
    #[arg(long, default_value = "public")]
    pub access: String,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub force: bool,
}

impl From<CliPublishArgs> for PublishOptions {
    fn from(args: CliPublishArgs) -> Self {
        PublishOptions {
            dry_run: args.dry_run,
            tag: args.tag,
            access: args.access,
            force: args.force,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let root = match args.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let ctx = ProjectContext::detect(root);
    tracing::debug!(root = %ctx.root.display(), kind = ?ctx.kind, "detected project");

    match args.command {
        Command::Dev(dev_args) => workflow::run_dev(&ctx, &dev_args.into()).await,
        Command::Build(build_args) => {
            workflow::run_build(&ctx, &build_args.into(), Arc::new(ConsoleReporter)).await
        }
        Command::Test(test_args) => workflow::run_test(&ctx, &test_args.into()).await,
        Command::Typecheck(check_args) => {
            workflow::run_typecheck(&ctx, &check_args.into()).await
        }
        Command::Lint(lint_args) => workflow::run_lint(&ctx, &lint_args.into()).await,
        Command::Format(format_args) => workflow::run_format(&ctx, &format_args.into()).await,
        Command::Clean(clean_args) => workflow::run_clean(&ctx, &clean_args.into()).await,
        Command::Publish(publish_args) => {
            let result =
                workflow::run_publish(&ctx, &publish_args.into(), solidum_core::tui::confirm)
                    .await;

            // Ensure cursor is visible after the confirmation prompt
            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
