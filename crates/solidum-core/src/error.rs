//! Error types for solidum-core

use crate::orchestrator::JobFailure;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling a plan
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Job '{0}' appears more than once in the same layer")]
    DuplicateJob(String),
}

/// A plan stopped at a layer containing one or more failed jobs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Layer {} failed: {}", .layer + 1, failed_names(.failures))]
pub struct PlanAborted {
    /// Zero-based index of the failing layer
    pub layer: usize,
    /// Every failure collected from that layer
    pub failures: Vec<JobFailure>,
}

fn failed_names(failures: &[JobFailure]) -> String {
    failures
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors loading the build layer table
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Package '{0}' is listed in more than one build layer")]
    DuplicatePackage(String),

    #[error("Build layer {0} contains an empty package name")]
    EmptyPackageName(usize),
}

/// Errors running an external command
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {}", exit_label(.code))]
    Failed { command: String, code: Option<i32> },
}

impl ProcessError {
    /// The program could not be started because it does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProcessError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_aborted_lists_every_failure() {
        let err = PlanAborted {
            layer: 1,
            failures: vec![
                JobFailure::new("@sldm/core", "boom"),
                JobFailure::new("@sldm/testing", "bang"),
            ],
        };
        assert_eq!(err.to_string(), "Layer 2 failed: @sldm/core, @sldm/testing");
    }

    #[test]
    fn test_process_failed_message() {
        let err = ProcessError::Failed {
            command: "pnpm run build".to_string(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "'pnpm run build' exited with exit code 1");

        let err = ProcessError::Failed {
            command: "pnpm test".to_string(),
            code: None,
        };
        assert!(err.to_string().ends_with("a signal"));
    }
}
