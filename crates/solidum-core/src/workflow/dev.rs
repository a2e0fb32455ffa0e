//! `dev` - start the development server(s)

use crate::config::{ProjectContext, ProjectKind};
use crate::runtime::CommandSpec;
use crate::workflow::{announce_package, filtered, forward};
use anyhow::Result;
use colored::Colorize;

#[derive(Debug, Clone, Default)]
pub struct DevOptions {
    pub port: Option<u16>,
    pub package: Option<String>,
    /// Start every package's dev server in parallel
    pub all: bool,
}

pub fn dev_command(opts: &DevOptions, kind: ProjectKind) -> CommandSpec {
    let spec = match kind {
        ProjectKind::Monorepo => {
            if let Some(package) = &opts.package {
                filtered(package, "dev")
            } else if opts.all {
                CommandSpec::package_manager(["-r", "--parallel", "dev"])
            } else {
                CommandSpec::package_manager(["run", "dev"])
            }
        }
        ProjectKind::Single => CommandSpec::package_manager(["run", "dev"]),
    };

    match opts.port {
        Some(port) if port > 0 => spec.args(["--", "--port"]).arg(port.to_string()),
        _ => spec,
    }
}

pub async fn run_dev(ctx: &ProjectContext, opts: &DevOptions) -> Result<()> {
    println!();
    println!("{}", "Starting development server...".cyan().bold());
    if ctx.is_monorepo() {
        if opts.package.is_some() {
            announce_package("Starting dev server for", opts.package.as_deref());
        } else if opts.all {
            println!("{}", "Starting dev servers for all packages...".cyan());
        }
    }

    println!("{}", "Dev server starting...".green().bold());
    forward(ctx, &dev_command(opts, ctx.kind), "Dev server").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_defaults() {
        let opts = DevOptions::default();
        assert_eq!(dev_command(&opts, ProjectKind::Single).args, vec!["run", "dev"]);
        assert_eq!(dev_command(&opts, ProjectKind::Monorepo).args, vec!["run", "dev"]);
    }

    #[test]
    fn test_dev_all_packages() {
        let opts = DevOptions {
            all: true,
            ..Default::default()
        };
        assert_eq!(
            dev_command(&opts, ProjectKind::Monorepo).args,
            vec!["-r", "--parallel", "dev"]
        );
    }

    #[test]
    fn test_dev_package_with_port() {
        let opts = DevOptions {
            port: Some(5173),
            package: Some("docs".to_string()),
            all: true,
        };
        assert_eq!(
            dev_command(&opts, ProjectKind::Monorepo).args,
            vec!["--filter", "docs", "dev", "--", "--port", "5173"]
        );
    }

    #[test]
    fn test_zero_port_is_ignored() {
        let opts = DevOptions {
            port: Some(0),
            ..Default::default()
        };
        assert_eq!(dev_command(&opts, ProjectKind::Single).args, vec!["run", "dev"]);
    }
}
