//! Generic tool detection for external CLI tools
//!
//! Provides a small abstraction for checking whether tools like pnpm or git
//! are available, and the install hint shown when they are not.

use std::process::{Command, Stdio};

/// Configuration for a CLI tool
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Name of the tool binary (e.g., "pnpm")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// Where to point users when the tool is missing
    pub install_hint: &'static str,
}

/// Checks for a CLI tool on PATH
pub struct ToolManager {
    config: ToolConfig,
}

impl ToolManager {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Check if the tool is installed by asking it for its version
    pub fn is_installed(&self) -> bool {
        Command::new(self.config.name)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Message shown when the tool is required but missing
    pub fn missing_message(&self) -> String {
        format!(
            "{} is not installed (install from {})",
            self.config.display_name, self.config.install_hint
        )
    }
}

/// Pre-configured tool manager for pnpm
pub fn pnpm_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "pnpm",
        display_name: "pnpm",
        install_hint: "https://pnpm.io/installation",
    })
}

/// Pre-configured tool manager for git
pub fn git_tool() -> ToolManager {
    ToolManager::new(ToolConfig {
        name: "git",
        display_name: "Git",
        install_hint: "https://git-scm.com/downloads",
    })
}

/// The pre-configured tool for a program name, if there is one
pub fn tool_for(program: &str) -> Option<ToolManager> {
    [pnpm_tool(), git_tool()]
        .into_iter()
        .find(|tool| tool.config.name == program)
}
