//! Plan data model: jobs, layers and outcomes

use crate::error::PlanError;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Future returned by a job action. `Err` carries the captured diagnostic text.
pub type JobFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'static>>;

type Action = Arc<dyn Fn() -> JobFuture + Send + Sync>;

/// A named unit of work
#[derive(Clone)]
pub struct Job {
    name: String,
    action: Action,
}

impl Job {
    /// Create a job from a name and an async action
    pub fn new<F, Fut>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(move || Box::pin(action()) as JobFuture),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the action
    pub(crate) fn start(&self) -> JobFuture {
        (self.action)()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("name", &self.name).finish()
    }
}

/// A job that reported failure, with its diagnostic output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub name: String,
    pub detail: String,
}

impl JobFailure {
    pub fn new(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: detail.into(),
        }
    }
}

/// Outcome of running a single job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    Success { name: String },
    Failure(JobFailure),
}

impl JobResult {
    pub fn name(&self) -> &str {
        match self {
            JobResult::Success { name } => name,
            JobResult::Failure(failure) => &failure.name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobResult::Success { .. })
    }
}

/// A set of mutually independent jobs that may run in parallel
#[derive(Debug, Clone, Default)]
pub struct Layer {
    jobs: Vec<Job>,
}

impl Layer {
    /// Build a layer, rejecting duplicate job names
    pub fn new(jobs: Vec<Job>) -> Result<Self, PlanError> {
        let mut seen = HashSet::new();
        for job in &jobs {
            if !seen.insert(job.name()) {
                return Err(PlanError::DuplicateJob(job.name().to_string()));
            }
        }
        Ok(Self { jobs })
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(Job::name).collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// An ordered sequence of layers. Layer `i` may depend on every layer before it.
///
/// A plan has no mutating API; the runner only borrows it.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    layers: Vec<Layer>,
}

impl Plan {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total number of jobs across all layers
    pub fn job_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> Job {
        Job::new(name, || async { Ok(()) })
    }

    #[test]
    fn test_layer_rejects_duplicate_names() {
        let err = Layer::new(vec![noop("a"), noop("b"), noop("a")]).unwrap_err();
        assert_eq!(err, PlanError::DuplicateJob("a".to_string()));
    }

    #[test]
    fn test_same_name_allowed_across_layers() {
        let plan = Plan::new(vec![
            Layer::new(vec![noop("a")]).unwrap(),
            Layer::new(vec![noop("a")]).unwrap(),
        ]);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.job_count(), 2);
    }

    #[test]
    fn test_job_result_accessors() {
        let ok = JobResult::Success {
            name: "a".to_string(),
        };
        let failed = JobResult::Failure(JobFailure::new("b", "boom"));
        assert!(ok.is_success());
        assert!(!failed.is_success());
        assert_eq!(ok.name(), "a");
        assert_eq!(failed.name(), "b");
    }

    #[test]
    fn test_job_debug_shows_name_only() {
        assert_eq!(format!("{:?}", noop("core")), "Job { name: \"core\" }");
    }
}
