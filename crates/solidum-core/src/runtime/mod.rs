//! External process execution and tool detection
//!
//! This module provides:
//! - `CommandSpec`, a program plus its argument list
//! - Interactive execution with stdio streamed through, and captured execution
//! - Generic tool presence checks for binaries like pnpm and git

pub mod process;
pub mod tool;

pub use process::{run_captured, run_interactive, CapturedOutput, CommandSpec};
pub use tool::{git_tool, pnpm_tool, tool_for, ToolManager};
