//! `format` - Prettier through the project's format scripts

use crate::config::ProjectContext;
use crate::runtime::CommandSpec;
use crate::workflow::forward;
use anyhow::Result;
use colored::Colorize;

#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Only verify formatting
    pub check: bool,
}

pub fn format_command(opts: &FormatOptions) -> CommandSpec {
    let script = if opts.check { "format:check" } else { "format" };
    CommandSpec::package_manager(["run", script])
}

pub async fn run_format(ctx: &ProjectContext, opts: &FormatOptions) -> Result<()> {
    println!();
    if opts.check {
        println!("{}", "Checking code formatting...".cyan().bold());
    } else {
        println!("{}", "Formatting code...".cyan().bold());
    }

    forward(ctx, &format_command(opts), "Formatting").await?;

    println!();
    if opts.check {
        println!("{}", "All files are properly formatted!".green().bold());
    } else {
        println!("{}", "Code formatted successfully!".green().bold());
    }
    Ok(())
}
