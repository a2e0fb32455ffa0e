//! `lint` - ESLint through the package manager

use crate::config::{ProjectContext, ProjectKind};
use crate::runtime::CommandSpec;
use crate::workflow::{announce_package, filtered, forward};
use anyhow::Result;
use colored::Colorize;

#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Automatically fix problems
    pub fix: bool,
    pub package: Option<String>,
}

pub fn lint_command(opts: &LintOptions, kind: ProjectKind) -> CommandSpec {
    let spec = match (kind, &opts.package) {
        (ProjectKind::Monorepo, Some(package)) => filtered(package, "lint"),
        (ProjectKind::Monorepo, None) => CommandSpec::package_manager(["-r", "lint"]),
        (ProjectKind::Single, _) => CommandSpec::package_manager(["run", "lint"]),
    };

    if opts.fix {
        spec.args(["--", "--fix"])
    } else {
        spec
    }
}

pub async fn run_lint(ctx: &ProjectContext, opts: &LintOptions) -> Result<()> {
    if opts.fix {
        println!();
        println!("{}", "Auto-fix mode enabled...".yellow());
    }
    println!();
    println!("{}", "Linting code...".cyan().bold());
    if ctx.is_monorepo() {
        announce_package("Linting", opts.package.as_deref());
    }

    forward(ctx, &lint_command(opts, ctx.kind), "Linting").await?;

    println!();
    let done = if opts.fix {
        "Linting completed and issues fixed!"
    } else {
        "No linting errors found!"
    };
    println!("{}", done.green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_commands() {
        let opts = LintOptions::default();
        assert_eq!(lint_command(&opts, ProjectKind::Single).args, vec!["run", "lint"]);
        assert_eq!(lint_command(&opts, ProjectKind::Monorepo).args, vec!["-r", "lint"]);
    }

    #[test]
    fn test_lint_package_with_fix() {
        let opts = LintOptions {
            fix: true,
            package: Some("@sldm/router".to_string()),
        };
        assert_eq!(
            lint_command(&opts, ProjectKind::Monorepo).args,
            vec!["--filter", "@sldm/router", "lint", "--", "--fix"]
        );
    }

    #[test]
    fn test_package_ignored_outside_monorepo() {
        let opts = LintOptions {
            fix: false,
            package: Some("@sldm/router".to_string()),
        };
        assert_eq!(lint_command(&opts, ProjectKind::Single).args, vec!["run", "lint"]);
    }
}
