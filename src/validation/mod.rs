//! Workflow validation
//!
//! Runs once per assembled workflow, immediately before emission. A
//! validation failure is fatal for the whole run: partial CI configuration
//! is worse than none.

use crate::workflow::Workflow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("in workflow {workflow}, job {job} has missing runs-on")]
    MissingRunsOn { workflow: String, job: String },

    #[error("in workflow {workflow}, job {job} has zero timeout-minutes")]
    ZeroTimeout { workflow: String, job: String },

    #[error("workflow {0} has no jobs")]
    NoJobs(String),
}

/// Checks the structural invariants every emitted workflow must hold:
/// at least one job, and per job a non-empty runner label and a positive
/// timeout.
pub fn validate_workflow(workflow: &Workflow) -> Result<(), ValidationError> {
    if workflow.jobs.is_empty() {
        return Err(ValidationError::NoJobs(workflow.name.clone()));
    }

    for (key, job) in &workflow.jobs {
        if job.runs_on.is_empty() {
            return Err(ValidationError::MissingRunsOn {
                workflow: workflow.name.clone(),
                job: key.clone(),
            });
        }
        if job.timeout_minutes == 0 {
            return Err(ValidationError::ZeroTimeout {
                workflow: workflow.name.clone(),
                job: key.clone(),
            });
        }
    }

    Ok(())
}
