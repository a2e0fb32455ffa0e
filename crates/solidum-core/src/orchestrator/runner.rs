//! Layer-by-layer plan execution
//!
//! Every job of a layer is spawned into a `JoinSet` at once, then the runner
//! awaits all of them before looking at the results. A failing job never
//! cancels its siblings; the plan stops after the layer's barrier if any job
//! in it failed.

use crate::error::PlanAborted;
use crate::orchestrator::job::{Job, JobFailure, JobResult, Layer, Plan};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, debug_span, info, info_span, warn, Instrument};

/// Options for a plan run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Per-job time limit. `None` lets a hung job hang its layer.
    pub job_timeout: Option<Duration>,
}

/// Receives progress callbacks while a plan runs
///
/// `job_started` and `job_finished` are called from the job's own task, so
/// calls for jobs of the same layer may interleave.
pub trait PlanObserver: Send + Sync {
    fn layer_started(&self, _index: usize, _total: usize, _jobs: &[&str]) {}

    fn job_started(&self, _name: &str) {}

    fn job_finished(&self, _result: &JobResult) {}

    fn layer_finished(&self, _index: usize, _failures: &[JobFailure]) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PlanObserver for NoopObserver {}

/// Outcome of a whole plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverallResult {
    AllSucceeded,
    /// Stopped after the layer at `layer` (zero-based) reported failures
    Aborted {
        layer: usize,
        failures: Vec<JobFailure>,
    },
}

impl OverallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OverallResult::AllSucceeded)
    }

    pub fn into_result(self) -> Result<(), PlanAborted> {
        match self {
            OverallResult::AllSucceeded => Ok(()),
            OverallResult::Aborted { layer, failures } => Err(PlanAborted { layer, failures }),
        }
    }
}

/// Run a plan with default options and no observer
pub async fn run_plan(plan: &Plan) -> OverallResult {
    run_plan_with(plan, &RunOptions::default(), Arc::new(NoopObserver)).await
}

/// Run a plan, reporting progress to `observer`
pub async fn run_plan_with(
    plan: &Plan,
    options: &RunOptions,
    observer: Arc<dyn PlanObserver>,
) -> OverallResult {
    let total = plan.len();
    info!(layers = total, jobs = plan.job_count(), "running plan");

    for (index, layer) in plan.layers().iter().enumerate() {
        observer.layer_started(index, total, &layer.job_names());

        let span = info_span!("layer", number = index + 1, total, jobs = layer.len());
        let results = run_layer(layer, options.job_timeout, &observer)
            .instrument(span)
            .await;

        let failures: Vec<JobFailure> = results
            .into_iter()
            .filter_map(|result| match result {
                JobResult::Failure(failure) => Some(failure),
                JobResult::Success { .. } => None,
            })
            .collect();

        observer.layer_finished(index, &failures);

        if !failures.is_empty() {
            warn!(
                layer = index + 1,
                failed = failures.len(),
                "layer failed, skipping remaining layers"
            );
            return OverallResult::Aborted {
                layer: index,
                failures,
            };
        }
    }

    info!("plan completed");
    OverallResult::AllSucceeded
}

/// Spawn every job of the layer and wait for all of them.
/// Results come back in the layer's declaration order. Dropping the returned
/// future aborts every job still running.
async fn run_layer(
    layer: &Layer,
    job_timeout: Option<Duration>,
    observer: &Arc<dyn PlanObserver>,
) -> Vec<JobResult> {
    let jobs = layer.jobs();
    let mut tasks = JoinSet::new();
    for (index, job) in jobs.iter().enumerate() {
        let span = debug_span!("job", name = %job.name());
        let run = run_job(job.clone(), job_timeout, Arc::clone(observer));
        tasks.spawn(async move { (index, run.await) }.instrument(span));
    }

    let mut slots: Vec<Option<JobResult>> = jobs.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => warn!(error = %e, "job task did not complete"),
        }
    }

    // An empty slot belongs to a job whose task panicked
    jobs.iter()
        .zip(slots)
        .map(|(job, slot)| {
            slot.unwrap_or_else(|| {
                let result = JobResult::Failure(JobFailure::new(job.name(), "job panicked"));
                observer.job_finished(&result);
                result
            })
        })
        .collect()
}

async fn run_job(
    job: Job,
    job_timeout: Option<Duration>,
    observer: Arc<dyn PlanObserver>,
) -> JobResult {
    observer.job_started(job.name());
    debug!("job started");

    let outcome = match job_timeout {
        Some(limit) => match tokio::time::timeout(limit, job.start()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(format!("timed out after {:?}", limit)),
        },
        None => job.start().await,
    };

    let result = match outcome {
        Ok(()) => {
            debug!("job succeeded");
            JobResult::Success {
                name: job.name().to_string(),
            }
        }
        Err(detail) => {
            debug!("job failed");
            JobResult::Failure(JobFailure::new(job.name(), detail))
        }
    };

    observer.job_finished(&result);
    result
}
