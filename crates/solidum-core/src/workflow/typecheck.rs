//! `typecheck` - TypeScript checking without emitting files

use crate::config::{ProjectContext, ProjectKind};
use crate::runtime::CommandSpec;
use crate::workflow::{announce_package, filtered, forward};
use anyhow::Result;
use colored::Colorize;

#[derive(Debug, Clone, Default)]
pub struct TypecheckOptions {
    pub watch: bool,
    pub package: Option<String>,
}

pub fn typecheck_command(opts: &TypecheckOptions, kind: ProjectKind) -> CommandSpec {
    let spec = match (kind, &opts.package) {
        (ProjectKind::Monorepo, Some(package)) => filtered(package, "typecheck"),
        (ProjectKind::Monorepo, None) => CommandSpec::package_manager(["-r", "typecheck"]),
        (ProjectKind::Single, _) => CommandSpec::package_manager(["run", "typecheck"]),
    };

    if opts.watch {
        spec.arg("--watch")
    } else {
        spec
    }
}

pub async fn run_typecheck(ctx: &ProjectContext, opts: &TypecheckOptions) -> Result<()> {
    if opts.watch {
        println!();
        println!("{}", "Running in watch mode...".yellow());
    }
    println!();
    println!("{}", "Type checking...".cyan().bold());
    if ctx.is_monorepo() {
        announce_package("Type checking", opts.package.as_deref());
    }

    forward(ctx, &typecheck_command(opts, ctx.kind), "Type checking").await?;

    println!();
    println!("{}", "No type errors found!".green().bold());
    Ok(())
}
