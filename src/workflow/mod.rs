//! GitHub Actions workflow document model
//!
//! These structures mirror the subset of the workflow schema this tool
//! emits. They carry no behavior beyond serialization: construction never
//! fails, and structural invariants (non-empty `runs-on`, positive timeout)
//! are checked separately by [`crate::validation`] so that jobs can be
//! built up incrementally during assembly.

use serde::Serialize;
use std::collections::BTreeMap;

/// Runner label shared by every generated job.
pub const UBUNTU_RUNNER: &str = "ubuntu-20.04";

/// One generated workflow document.
///
/// The `jobs` map is a `BTreeMap` on purpose: serialization order must be
/// deterministic (re-running the generator on an unchanged repository has
/// to produce byte-identical files), and inserting under an existing key
/// gives the documented last-write-wins behavior on job name collisions.
#[derive(Debug, Clone, Serialize)]
pub struct Workflow {
    pub name: String,
    pub on: Trigger,
    pub jobs: BTreeMap<String, Job>,
}

/// Events that cause a workflow to run.
#[derive(Debug, Clone, Serialize)]
pub struct Trigger {
    pub pull_request: PullRequestTrigger,
    pub push: PushTrigger,
}

/// Present-or-absent arm with no parameters; serializes as `{}`.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestTrigger {}

#[derive(Debug, Clone, Serialize)]
pub struct PushTrigger {
    pub branches: Vec<String>,
}

impl Trigger {
    /// Standard trigger for all generated workflows: every pull request,
    /// plus pushes to the bors staging branches and the default branch.
    pub fn on_pull_request_and_bors_branches() -> Self {
        Self {
            pull_request: PullRequestTrigger {},
            push: PushTrigger {
                branches: vec![
                    "staging".to_string(),
                    "trying".to_string(),
                    "master".to_string(),
                ],
            },
        }
    }
}

/// One schedulable unit of work within a workflow.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Job {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub r#if: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(rename = "runs-on")]
    pub runs_on: String,
    #[serde(rename = "timeout-minutes")]
    pub timeout_minutes: u32,
    pub steps: Vec<Step>,
}

/// One action within a job's step sequence.
///
/// Exactly one of `uses` and `run` is set in practice; this is a schema
/// convention, not a type-level guarantee.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Step {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub r#if: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with: Option<BTreeMap<String, String>>,
}

impl Step {
    /// Step invoking a published action, optionally with parameters.
    pub fn uses(name: &str, action: &str, with: &[(&str, &str)]) -> Self {
        Self {
            name: Some(name.to_string()),
            uses: Some(action.to_string()),
            with: if with.is_empty() {
                None
            } else {
                Some(
                    with.iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                )
            },
            ..Default::default()
        }
    }

    /// Step running an inline shell script.
    pub fn run(name: &str, script: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            run: Some(script.to_string()),
            ..Default::default()
        }
    }
}

/// The checkout step every job starts with.
pub fn checkout_step() -> Step {
    Step::uses("Fetch sources", "actions/checkout@v2", &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_serialization_shape() {
        let trigger = Trigger::on_pull_request_and_bors_branches();
        let yaml = serde_yaml::to_string(&trigger).unwrap();
        assert!(yaml.contains("pull_request: {}"));
        assert!(yaml.contains("- staging"));
        assert!(yaml.contains("- trying"));
        assert!(yaml.contains("- master"));
    }

    #[test]
    fn test_job_serde_renames() {
        let job = Job {
            runs_on: UBUNTU_RUNNER.to_string(),
            timeout_minutes: 30,
            r#if: Some("github.event_name == 'push'".to_string()),
            steps: vec![checkout_step()],
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&job).unwrap();
        assert!(yaml.contains("runs-on: ubuntu-20.04"));
        assert!(yaml.contains("timeout-minutes: 30"));
        assert!(yaml.contains("if:"));
        assert!(yaml.contains("github.event_name"));
        // unset optionals never serialized
        assert!(!yaml.contains("needs"));
        assert!(!yaml.contains("env"));
    }

    #[test]
    fn test_step_empty_with_omitted() {
        let step = checkout_step();
        assert!(step.with.is_none());
        let yaml = serde_yaml::to_string(&step).unwrap();
        assert!(yaml.contains("uses: actions/checkout@v2"));
        assert!(!yaml.contains("with"));
    }

    #[test]
    fn test_job_map_is_sorted_for_determinism() {
        let mut workflow = Workflow {
            name: "ci".to_string(),
            on: Trigger::on_pull_request_and_bors_branches(),
            jobs: BTreeMap::new(),
        };
        let job = Job {
            runs_on: UBUNTU_RUNNER.to_string(),
            timeout_minutes: 10,
            steps: vec![checkout_step()],
            ..Default::default()
        };
        workflow.jobs.insert("zeta".to_string(), job.clone());
        workflow.jobs.insert("alpha".to_string(), job);

        let yaml = serde_yaml::to_string(&workflow).unwrap();
        let alpha = yaml.find("alpha").unwrap();
        let zeta = yaml.find("zeta").unwrap();
        assert!(alpha < zeta);
    }
}
