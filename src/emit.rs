//! Emission boundary
//!
//! Persists validated assembly output: workflow documents under
//! `.github/workflows/`, the bors configuration at the repository root, and
//! any auxiliary generated files. Every emitted document carries a
//! machine-generated banner so nobody hand-edits it.

use crate::assembly::AssemblyOutput;
use crate::workflow::Workflow;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const GENERATED_BANNER: &str = "# GENERATED FILE DO NOT EDIT\n";

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to serialize workflow {0}: {1}")]
    SerializeWorkflow(String, #[source] serde_yaml::Error),

    #[error("failed to serialize bors config: {0}")]
    SerializeBors(#[from] toml::ser::Error),

    #[error("failed to write {0}: {1}")]
    Write(String, #[source] std::io::Error),
}

/// Renders a workflow document with the generated-file banner.
pub fn render_workflow(workflow: &Workflow) -> Result<Vec<u8>, EmitError> {
    let yaml = serde_yaml::to_string(workflow)
        .map_err(|e| EmitError::SerializeWorkflow(workflow.name.clone(), e))?;
    let mut data = GENERATED_BANNER.as_bytes().to_vec();
    data.extend_from_slice(yaml.as_bytes());
    Ok(data)
}

fn emit_file(out: &Path, rel_name: &Path, data: &[u8]) -> Result<(), EmitError> {
    let full_path = out.join(rel_name);
    let to_err = |e| EmitError::Write(rel_name.display().to_string(), e);
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }
    std::fs::write(&full_path, data).map_err(to_err)?;
    debug!(path = %full_path.display(), "wrote generated file");
    Ok(())
}

/// Writes one run's complete output under `out`.
pub fn write_output(out: &Path, output: &AssemblyOutput) -> Result<(), EmitError> {
    for workflow in &output.workflows {
        let data = render_workflow(workflow)?;
        let rel = format!(".github/workflows/{}.yaml", workflow.name);
        emit_file(out, Path::new(&rel), &data)?;
    }

    emit_file(out, Path::new("bors.toml"), &output.bors.serialize()?)?;

    for file in &output.extra_files {
        emit_file(out, &file.rel_path, &file.data)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{checkout_step, Job, Trigger, UBUNTU_RUNNER};
    use std::collections::BTreeMap;

    fn sample_workflow() -> Workflow {
        let mut jobs = BTreeMap::new();
        jobs.insert(
            "misspell".to_string(),
            Job {
                runs_on: UBUNTU_RUNNER.to_string(),
                timeout_minutes: 30,
                steps: vec![checkout_step()],
                ..Default::default()
            },
        );
        Workflow {
            name: "ci".to_string(),
            on: Trigger::on_pull_request_and_bors_branches(),
            jobs,
        }
    }

    #[test]
    fn test_rendered_workflow_starts_with_banner() {
        let data = render_workflow(&sample_workflow()).unwrap();
        let text = String::from_utf8(data).unwrap();
        assert!(text.starts_with("# GENERATED FILE DO NOT EDIT\n"));
        assert!(text.contains("runs-on: ubuntu-20.04"));
    }

    #[test]
    fn test_emit_file_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        emit_file(
            dir.path(),
            Path::new(".github/workflows/ci.yaml"),
            b"payload",
        )
        .unwrap();
        let written = std::fs::read(dir.path().join(".github/workflows/ci.yaml")).unwrap();
        assert_eq!(written, b"payload");
    }
}
