//! `build` - whole project, one package, or the layered parallel monorepo build

use crate::config::{BuildLayers, ProjectContext, ProjectKind};
use crate::orchestrator::{run_plan_with, Job, Plan, PlanObserver, RunOptions};
use crate::runtime::{run_captured, CommandSpec};
use crate::workflow::{announce_package, filtered, forward};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Rebuild on changes
    pub watch: bool,
    /// Build monorepo packages layer by layer in parallel
    pub parallel: bool,
    /// Build a single package
    pub package: Option<String>,
    /// Per-package time limit for the parallel build
    pub job_timeout: Option<Duration>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            watch: false,
            parallel: true,
            package: None,
            job_timeout: None,
        }
    }
}

/// How a build is carried out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStrategy {
    /// A single package manager invocation
    Command(CommandSpec),
    /// The layered parallel build over every workspace package
    Layered,
}

/// Decide how to build. Watch mode never uses the layered build since
/// watchers do not terminate.
pub fn build_strategy(opts: &BuildOptions, kind: ProjectKind) -> BuildStrategy {
    match kind {
        ProjectKind::Monorepo => {
            let spec = if let Some(package) = &opts.package {
                filtered(package, "build")
            } else if opts.parallel && !opts.watch {
                return BuildStrategy::Layered;
            } else {
                CommandSpec::package_manager(["run", "build"])
            };

            if opts.watch {
                BuildStrategy::Command(spec.arg("--watch"))
            } else {
                BuildStrategy::Command(spec)
            }
        }
        ProjectKind::Single => {
            let script = if opts.watch { "dev" } else { "build" };
            BuildStrategy::Command(CommandSpec::package_manager(["run", script]))
        }
    }
}

/// Job that builds one workspace package with captured output
pub fn package_build_job(package: &str, root: &Path) -> Job {
    let spec = filtered(package, "build");
    let root: PathBuf = root.to_path_buf();
    Job::new(package, move || {
        let spec = spec.clone();
        let root = root.clone();
        async move {
            let output = run_captured(&spec, &root)
                .await
                .map_err(|e| e.to_string())?;
            if output.success() {
                Ok(())
            } else {
                Err(format!(
                    "'{}' failed ({})\n{}",
                    spec,
                    output.status,
                    output.combined()
                ))
            }
        }
    })
}

/// Plan for the layered build: the project's layer table, one job per package
pub fn build_plan(ctx: &ProjectContext) -> Result<Plan> {
    let layers = BuildLayers::load(&ctx.root)?;
    let plan = layers.to_plan(|package| package_build_job(package, &ctx.root))?;
    Ok(plan)
}

pub async fn run_build(
    ctx: &ProjectContext,
    opts: &BuildOptions,
    observer: Arc<dyn PlanObserver>,
) -> Result<()> {
    if opts.watch {
        println!();
        println!("{}", "Running in watch mode...".yellow());
    }
    println!();
    println!("{}", "Building project...".cyan().bold());

    match build_strategy(opts, ctx.kind) {
        BuildStrategy::Layered => run_layered_build(ctx, opts, observer).await,
        BuildStrategy::Command(spec) => {
            announce_package("Building", opts.package.as_deref());
            forward(ctx, &spec, "Build").await?;
            println!();
            println!("{}", "Build completed successfully!".green().bold());
            Ok(())
        }
    }
}

async fn run_layered_build(
    ctx: &ProjectContext,
    opts: &BuildOptions,
    observer: Arc<dyn PlanObserver>,
) -> Result<()> {
    let plan = build_plan(ctx).context("Failed to prepare the parallel build")?;
    info!(
        layers = plan.len(),
        packages = plan.job_count(),
        "starting parallel build"
    );

    println!();
    println!("{}", "Building all packages in parallel...".cyan().bold());
    println!();

    let options = RunOptions {
        job_timeout: opts.job_timeout,
    };
    run_plan_with(&plan, &options, observer).await.into_result()?;

    println!(
        "{} {} package(s) in {} layer(s)",
        "Built".green().bold(),
        plan.job_count(),
        plan.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pnpm(args: &[&str]) -> BuildStrategy {
        BuildStrategy::Command(CommandSpec::package_manager(args.iter().copied()))
    }

    #[test]
    fn test_monorepo_defaults_to_layered() {
        let opts = BuildOptions::default();
        assert_eq!(
            build_strategy(&opts, ProjectKind::Monorepo),
            BuildStrategy::Layered
        );
    }

    #[test]
    fn test_monorepo_single_package() {
        let opts = BuildOptions {
            package: Some("@sldm/core".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_strategy(&opts, ProjectKind::Monorepo),
            pnpm(&["--filter", "@sldm/core", "build"])
        );
    }

    #[test]
    fn test_monorepo_sequential() {
        let opts = BuildOptions {
            parallel: false,
            ..Default::default()
        };
        assert_eq!(
            build_strategy(&opts, ProjectKind::Monorepo),
            pnpm(&["run", "build"])
        );
    }

    #[test]
    fn test_monorepo_watch_skips_layered_build() {
        let opts = BuildOptions {
            watch: true,
            ..Default::default()
        };
        assert_eq!(
            build_strategy(&opts, ProjectKind::Monorepo),
            pnpm(&["run", "build", "--watch"])
        );

        let opts = BuildOptions {
            watch: true,
            package: Some("@sldm/ui".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_strategy(&opts, ProjectKind::Monorepo),
            pnpm(&["--filter", "@sldm/ui", "build", "--watch"])
        );
    }

    #[test]
    fn test_single_project() {
        let opts = BuildOptions::default();
        assert_eq!(
            build_strategy(&opts, ProjectKind::Single),
            pnpm(&["run", "build"])
        );

        let opts = BuildOptions {
            watch: true,
            ..Default::default()
        };
        assert_eq!(
            build_strategy(&opts, ProjectKind::Single),
            pnpm(&["run", "dev"])
        );
    }

    #[test]
    fn test_build_plan_uses_layer_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::config::LAYERS_FILE),
            "layers:\n  - [a]\n  - [b, c]\n",
        )
        .unwrap();
        let ctx = ProjectContext::detect(dir.path());

        let plan = build_plan(&ctx).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.layers()[1].job_names(), vec!["b", "c"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_package_job_reports_spawn_failure() {
        // A missing working directory makes the spawn fail; that must come
        // back as the job's diagnostic text.
        let dir = tempfile::tempdir().unwrap();
        let job = package_build_job("@sldm/utils", &dir.path().join("missing"));
        let err = job.start().await.unwrap_err();
        assert!(!err.is_empty());
    }
}
