//! `clean` - remove build output, installed modules and the package store cache

use crate::config::{ProjectContext, ProjectKind};
use crate::runtime::{pnpm_tool, run_interactive, CommandSpec};
use anyhow::Result;
use colored::Colorize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Everything below
    pub all: bool,
    pub dist: bool,
    pub modules: bool,
    pub cache: bool,
}

/// What a clean run removes after defaults are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanTargets {
    pub dist: bool,
    pub modules: bool,
    pub cache: bool,
}

impl CleanOptions {
    /// `--all` selects every target; nothing selected means dist only
    pub fn targets(&self) -> CleanTargets {
        if self.all {
            return CleanTargets {
                dist: true,
                modules: true,
                cache: true,
            };
        }
        if !self.dist && !self.modules && !self.cache {
            return CleanTargets {
                dist: true,
                modules: false,
                cache: false,
            };
        }
        CleanTargets {
            dist: self.dist,
            modules: self.modules,
            cache: self.cache,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanStep {
    /// Run a command; failure is reported as a warning
    Command { label: &'static str, spec: CommandSpec },
    /// Remove a directory relative to the project root
    RemoveDir { label: &'static str, path: PathBuf },
}

impl CleanStep {
    fn label(&self) -> &'static str {
        match self {
            CleanStep::Command { label, .. } | CleanStep::RemoveDir { label, .. } => *label,
        }
    }
}

fn remove_everywhere(dir: &str) -> CommandSpec {
    CommandSpec::package_manager(["-r", "exec", "rm", "-rf", dir])
}

pub fn clean_steps(
    targets: CleanTargets,
    kind: ProjectKind,
    pnpm_installed: bool,
) -> Vec<CleanStep> {
    let mut steps = Vec::new();

    if targets.dist {
        steps.push(match kind {
            ProjectKind::Monorepo => CleanStep::Command {
                label: "dist folders",
                spec: remove_everywhere("dist"),
            },
            ProjectKind::Single => CleanStep::RemoveDir {
                label: "dist folders",
                path: PathBuf::from("dist"),
            },
        });
    }

    if targets.modules {
        if kind.is_monorepo() {
            steps.push(CleanStep::Command {
                label: "package node_modules",
                spec: remove_everywhere("node_modules"),
            });
        }
        steps.push(CleanStep::RemoveDir {
            label: "node_modules",
            path: PathBuf::from("node_modules"),
        });
    }

    if targets.cache && pnpm_installed {
        steps.push(CleanStep::Command {
            label: "pnpm cache",
            spec: CommandSpec::package_manager(["store", "prune"]),
        });
    }

    steps
}

async fn run_step(ctx: &ProjectContext, step: &CleanStep) -> Result<()> {
    match step {
        CleanStep::Command { spec, .. } => run_interactive(spec, &ctx.root).await?,
        CleanStep::RemoveDir { path, .. } => {
            let path = ctx.path(path);
            match tokio::fs::remove_dir_all(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "nothing to remove");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

pub async fn run_clean(ctx: &ProjectContext, opts: &CleanOptions) -> Result<()> {
    let targets = opts.targets();
    let pnpm_installed = pnpm_tool().is_installed();

    println!();
    println!("{}", "Cleaning project...".cyan().bold());
    println!();

    if targets.cache && !pnpm_installed {
        println!("{} pnpm not found, skipping cache", "Warning:".yellow());
    }

    for step in clean_steps(targets, ctx.kind, pnpm_installed) {
        println!("{} Removing {}...", "->".yellow(), step.label());
        match run_step(ctx, &step).await {
            Ok(()) => println!("  {} {} removed", "done".green(), step.label()),
            Err(e) => eprintln!("  {} {:#}", "Warning:".yellow(), e),
        }
    }

    println!();
    println!("{}", "Clean completed!".green().bold());

    if targets.modules {
        println!("Run 'pnpm install' to reinstall dependencies");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_dist() {
        assert_eq!(
            CleanOptions::default().targets(),
            CleanTargets {
                dist: true,
                modules: false,
                cache: false
            }
        );
    }

    #[test]
    fn test_all_selects_everything() {
        let opts = CleanOptions {
            all: true,
            ..Default::default()
        };
        let targets = opts.targets();
        assert!(targets.dist && targets.modules && targets.cache);
    }

    #[test]
    fn test_explicit_selection_without_dist() {
        let opts = CleanOptions {
            modules: true,
            ..Default::default()
        };
        assert_eq!(
            opts.targets(),
            CleanTargets {
                dist: false,
                modules: true,
                cache: false
            }
        );
    }

    #[test]
    fn test_single_project_steps() {
        let targets = CleanOptions {
            all: true,
            ..Default::default()
        }
        .targets();
        let steps = clean_steps(targets, ProjectKind::Single, true);
        assert_eq!(
            steps,
            vec![
                CleanStep::RemoveDir {
                    label: "dist folders",
                    path: PathBuf::from("dist"),
                },
                CleanStep::RemoveDir {
                    label: "node_modules",
                    path: PathBuf::from("node_modules"),
                },
                CleanStep::Command {
                    label: "pnpm cache",
                    spec: CommandSpec::package_manager(["store", "prune"]),
                },
            ]
        );
    }

    #[test]
    fn test_monorepo_steps_recurse() {
        let targets = CleanOptions {
            dist: true,
            modules: true,
            ..Default::default()
        }
        .targets();
        let steps = clean_steps(targets, ProjectKind::Monorepo, true);
        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps[0],
            CleanStep::Command {
                label: "dist folders",
                spec: remove_everywhere("dist"),
            }
        );
        assert_eq!(
            steps[1],
            CleanStep::Command {
                label: "package node_modules",
                spec: remove_everywhere("node_modules"),
            }
        );
    }

    #[test]
    fn test_cache_skipped_without_pnpm() {
        let targets = CleanOptions {
            cache: true,
            ..Default::default()
        }
        .targets();
        assert!(clean_steps(targets, ProjectKind::Monorepo, false).is_empty());
    }

    #[tokio::test]
    async fn test_remove_dir_step() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("dist/assets")).unwrap();
        std::fs::write(dir.path().join("dist/assets/app.js"), "x").unwrap();
        let ctx = ProjectContext::detect(dir.path());
        let step = CleanStep::RemoveDir {
            label: "dist folders",
            path: PathBuf::from("dist"),
        };

        run_step(&ctx, &step).await.unwrap();
        assert!(!dir.path().join("dist").exists());

        // Removing again is not an error
        run_step(&ctx, &step).await.unwrap();
    }
}
