//! Running external commands

use crate::error::ProcessError;
use crate::PACKAGE_MANAGER;
use std::fmt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// A program and the arguments to pass it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// A package manager invocation with the given arguments
    pub fn package_manager<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(PACKAGE_MANAGER).args(args)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self, cwd: &Path) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        // Dropping the running future (job timeout, aborted layer) kills the child
        cmd.args(&self.args).current_dir(cwd).kill_on_drop(true);
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Output of a command run with captured stdio
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Stdout followed by stderr, trimmed
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (_, true) => stdout.to_string(),
            _ => format!("{}\n{}", stdout, stderr),
        }
    }
}

/// Run a command with stdin/stdout/stderr inherited from this process
pub async fn run_interactive(spec: &CommandSpec, cwd: &Path) -> Result<(), ProcessError> {
    debug!(command = %spec, cwd = %cwd.display(), "running");

    let status = spec
        .command(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|source| ProcessError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ProcessError::Failed {
            command: spec.to_string(),
            code: status.code(),
        })
    }
}

/// Run a command and capture its output. A non-zero exit is not an error here;
/// check `CapturedOutput::success`.
pub async fn run_captured(spec: &CommandSpec, cwd: &Path) -> Result<CapturedOutput, ProcessError> {
    debug!(command = %spec, cwd = %cwd.display(), "running (captured)");

    let output = spec
        .command(cwd)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| ProcessError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

    Ok(CapturedOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
