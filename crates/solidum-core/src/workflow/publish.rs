//! `publish` - build, test, prepare and publish packages to the registry

use crate::config::{ProjectContext, ProjectKind};
use crate::runtime::{git_tool, run_captured, CommandSpec};
use crate::workflow::forward;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Script run between testing and publishing when the project defines it
pub const PREPARE_SCRIPT: &str = "publish:prepare";

#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Simulate publish without publishing
    pub dry_run: bool,
    /// Registry dist-tag
    pub tag: String,
    /// Package access level (public or restricted)
    pub access: String,
    /// Skip the git check and the confirmation prompt
    pub force: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            tag: "latest".to_string(),
            access: "public".to_string(),
            force: false,
        }
    }
}

impl PublishOptions {
    fn is_guarded(&self) -> bool {
        !self.force && !self.dry_run
    }
}

pub fn publish_command(opts: &PublishOptions, kind: ProjectKind) -> CommandSpec {
    let spec = match kind {
        ProjectKind::Monorepo => {
            CommandSpec::package_manager(["-r", "--filter", "./packages/*", "publish"])
        }
        ProjectKind::Single => CommandSpec::package_manager(["publish"]),
    };

    let spec = spec
        .args(["--access", opts.access.as_str()])
        .args(["--tag", opts.tag.as_str()])
        .arg("--no-git-checks");

    if opts.dry_run {
        spec.arg("--dry-run")
    } else {
        spec
    }
}

/// `git status --porcelain` output with no entries
pub fn is_clean_status(porcelain: &str) -> bool {
    porcelain.trim().is_empty()
}

async fn git_is_clean(root: &Path) -> bool {
    let spec = CommandSpec::new(git_tool().config().name).args(["status", "--porcelain"]);
    match run_captured(&spec, root).await {
        Ok(output) => output.success() && is_clean_status(&output.stdout),
        Err(e) => {
            debug!(error = %e, "git status failed");
            false
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

/// Whether the project's package.json defines `script`
pub async fn has_script(root: &Path, script: &str) -> bool {
    tokio::fs::read_to_string(root.join("package.json"))
        .await
        .ok()
        .and_then(|content| serde_json::from_str::<PackageManifest>(&content).ok())
        .is_some_and(|manifest| manifest.scripts.contains_key(script))
}

/// Run the publish pipeline. `confirm` is asked before the final step
/// unless `--force` or `--dry-run` was given.
pub async fn run_publish<F>(ctx: &ProjectContext, opts: &PublishOptions, confirm: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<bool>,
{
    if opts.dry_run {
        println!();
        println!(
            "{}",
            "Running in dry-run mode - no packages will be published"
                .yellow()
                .bold()
        );
    }
    println!();
    println!("{}", "Preparing to publish packages...".cyan().bold());
    println!();

    if opts.is_guarded() {
        if !git_is_clean(&ctx.root).await {
            eprintln!("{}", "Git working directory is not clean!".red().bold());
            eprintln!("Please commit or stash your changes before publishing.");
            eprintln!("Use --force to skip this check.");
            anyhow::bail!("Git working directory not clean");
        }
        println!("{} Git working directory is clean", "done".green());
    }

    println!();
    println!("{}", "Step 1/4: Building packages...".cyan().bold());
    forward(ctx, &CommandSpec::package_manager(["run", "build"]), "Build").await?;
    println!("{} Build completed", "done".green());

    println!();
    println!("{}", "Step 2/4: Running tests...".cyan().bold());
    forward(ctx, &CommandSpec::package_manager(["test"]), "Tests").await?;
    println!("{} All tests passed", "done".green());

    println!();
    println!("{}", "Step 3/4: Preparing packages...".cyan().bold());
    if has_script(&ctx.root, PREPARE_SCRIPT).await {
        let prepare = CommandSpec::package_manager(["run", PREPARE_SCRIPT]);
        match forward(ctx, &prepare, "Prepare").await {
            Ok(()) => println!("{} Packages prepared", "done".green()),
            Err(e) => println!(
                "{} {} script failed (continuing anyway): {:#}",
                "Warning:".yellow(),
                PREPARE_SCRIPT,
                e
            ),
        }
    } else {
        println!("No {} script found (skipping)", PREPARE_SCRIPT);
    }

    if opts.is_guarded() {
        println!();
        let proceed = confirm("You are about to publish packages to npm! Continue?")
            .context("Failed to read confirmation")?;
        if !proceed {
            println!();
            println!("Publish cancelled.");
            return Ok(());
        }
    }

    println!();
    println!("{}", "Step 4/4: Publishing packages...".cyan().bold());
    forward(ctx, &publish_command(opts, ctx.kind), "Publish").await?;

    println!();
    if opts.dry_run {
        println!("{}", "Dry-run completed successfully!".green().bold());
    } else {
        println!("{}", "Packages published successfully!".green().bold());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_publish_defaults() {
        let spec = publish_command(&PublishOptions::default(), ProjectKind::Single);
        assert_eq!(
            spec.to_string(),
            "pnpm publish --access public --tag latest --no-git-checks"
        );
    }

    #[test]
    fn test_monorepo_dry_run_with_tag() {
        let opts = PublishOptions {
            dry_run: true,
            tag: "next".to_string(),
            access: "restricted".to_string(),
            force: false,
        };
        assert_eq!(
            publish_command(&opts, ProjectKind::Monorepo).args,
            vec![
                "-r",
                "--filter",
                "./packages/*",
                "publish",
                "--access",
                "restricted",
                "--tag",
                "next",
                "--no-git-checks",
                "--dry-run",
            ]
        );
    }

    #[test]
    fn test_guard_only_without_force_or_dry_run() {
        assert!(PublishOptions::default().is_guarded());
        let forced = PublishOptions {
            force: true,
            ..Default::default()
        };
        assert!(!forced.is_guarded());
        let dry = PublishOptions {
            dry_run: true,
            ..Default::default()
        };
        assert!(!dry.is_guarded());
    }

    #[test]
    fn test_clean_status() {
        assert!(is_clean_status(""));
        assert!(is_clean_status("\n"));
        assert!(!is_clean_status(" M src/index.ts\n"));
    }

    #[tokio::test]
    async fn test_has_script() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_script(dir.path(), PREPARE_SCRIPT).await);

        std::fs::write(
            dir.path().join("package.json"),
            r#"{"name": "solidum", "scripts": {"build": "tsc", "publish:prepare": "node scripts/prepare-publish.js"}}"#,
        )
        .unwrap();
        assert!(has_script(dir.path(), PREPARE_SCRIPT).await);
        assert!(!has_script(dir.path(), "format:check").await);
    }

    #[tokio::test]
    async fn test_has_script_without_scripts_section() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"name": "app"}"#).unwrap();
        assert!(!has_script(dir.path(), "build").await);
    }
}
