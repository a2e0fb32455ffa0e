//! Colored console output for the layered build

use crate::orchestrator::{JobFailure, JobResult, PlanObserver};
use colored::Colorize;

/// Prints layer progress and every failure with its captured output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl PlanObserver for ConsoleReporter {
    fn layer_started(&self, index: usize, total: usize, _jobs: &[&str]) {
        println!(
            "{}",
            format!("Building layer {}/{}...", index + 1, total).cyan()
        );
    }

    fn job_started(&self, name: &str) {
        println!("  {} Building {}...", "->".blue(), name);
    }

    fn job_finished(&self, result: &JobResult) {
        match result {
            JobResult::Success { name } => {
                println!("  {} {} built successfully", "ok".green(), name)
            }
            JobResult::Failure(failure) => {
                eprintln!("  {} {} failed", "x".red().bold(), failure.name)
            }
        }
    }

    fn layer_finished(&self, index: usize, failures: &[JobFailure]) {
        if failures.is_empty() {
            println!();
            return;
        }

        eprintln!();
        eprintln!(
            "{}",
            format!("Layer {} failed ({} package(s)):", index + 1, failures.len())
                .red()
                .bold()
        );
        for failure in failures {
            eprintln!();
            eprintln!("{}", format!("{}:", failure.name).red().bold());
            for line in failure.detail.lines() {
                eprintln!("    {}", line);
            }
        }
        eprintln!();
    }
}
