//! Go ecosystem definition

use super::{path_exists, Ecosystem, JobSet};
use crate::config::CiConfig;
use crate::workflow::{checkout_step, Job, Step, UBUNTU_RUNNER};
use std::path::Path;

pub struct GoEcosystem;

pub fn setup_go_step() -> Step {
    Step::uses(
        "Install golang",
        "actions/setup-go@v2",
        &[("go-version", "1.16.4")],
    )
}

impl Ecosystem for GoEcosystem {
    fn name(&self) -> &'static str {
        "golang"
    }

    fn used(&self, repo_root: &Path) -> bool {
        path_exists(&repo_root.join("go.mod"))
    }

    fn make(&self, _repo_root: &Path, config: &CiConfig) -> JobSet {
        JobSet {
            ci: vec![
                Job {
                    name: Some("go-lint".to_string()),
                    runs_on: UBUNTU_RUNNER.to_string(),
                    timeout_minutes: config.job_timeout_minutes,
                    steps: vec![
                        checkout_step(),
                        setup_go_step(),
                        Step::uses(
                            "Run linter",
                            "golangci/golangci-lint-action@v2",
                            &[
                                ("version", "latest"),
                                ("args", "--enable=gofmt"),
                                ("skip-go-installation", "false"),
                            ],
                        ),
                    ],
                    ..Default::default()
                },
                Job {
                    name: Some("go-test".to_string()),
                    runs_on: UBUNTU_RUNNER.to_string(),
                    timeout_minutes: config.job_timeout_minutes,
                    steps: vec![
                        checkout_step(),
                        setup_go_step(),
                        Step::run("Run tests", "go test ."),
                    ],
                    ..Default::default()
                },
            ],
        }
    }
}
