//! Workflow assembly engine
//!
//! Builds the meta, ci, and (optionally) publish workflows for one
//! repository and derives the merge-gate configuration from them. The
//! individual `make_*_workflow` constructors are pure; [`Assembler::assemble`]
//! is the single place where job keys are folded into the bors status list
//! and where validation runs, so nothing downstream ever sees a malformed
//! workflow.

use crate::bors::BorsConfig;
use crate::config::CiConfig;
use crate::ecosystems::EcosystemRegistry;
use crate::publish::{generate_publish_image_script, make_publish_workflow};
use crate::validation::{validate_workflow, ValidationError};
use crate::workflow::{checkout_step, Job, Step, Trigger, Workflow, UBUNTU_RUNNER};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// An auxiliary document produced during assembly, written by the emission
/// boundary relative to the output directory.
#[derive(Debug)]
pub struct GeneratedFile {
    pub rel_path: PathBuf,
    pub data: Vec<u8>,
}

/// Everything one generator run produces.
#[derive(Debug)]
pub struct AssemblyOutput {
    pub workflows: Vec<Workflow>,
    pub bors: BorsConfig,
    pub extra_files: Vec<GeneratedFile>,
}

pub struct Assembler<'a> {
    repo_root: &'a Path,
    config: &'a CiConfig,
    registry: EcosystemRegistry,
}

impl<'a> Assembler<'a> {
    pub fn new(repo_root: &'a Path, config: &'a CiConfig) -> Self {
        Self::with_registry(repo_root, config, EcosystemRegistry::with_defaults())
    }

    pub fn with_registry(
        repo_root: &'a Path,
        config: &'a CiConfig,
        registry: EcosystemRegistry,
    ) -> Self {
        Self {
            repo_root,
            config,
            registry,
        }
    }

    /// Builds and validates every workflow, then derives the bors status
    /// list from the validated set. Auxiliary ecosystem files are written
    /// best-effort along the way; their failures are logged and do not
    /// affect the assembled output.
    pub fn assemble(&self) -> Result<AssemblyOutput, ValidationError> {
        let mut workflows = vec![
            make_meta_workflow(self.config),
            self.make_ci_workflow(),
        ];
        if !self.config.no_publish {
            info!("generating publish workflow");
            workflows.push(make_publish_workflow(self.config));
        }

        for workflow in &workflows {
            validate_workflow(workflow)?;
        }

        let mut bors = BorsConfig::default();
        bors.apply_defaults();
        bors.timeout_sec = u64::from(self.config.build_timeout_minutes) * 60;
        for workflow in &workflows {
            for key in workflow.jobs.keys() {
                bors.add_job(key);
            }
        }

        for ecosystem in self.registry.used_in(self.repo_root) {
            if let Err(e) = ecosystem.write_additional_files(self.repo_root) {
                warn!(
                    ecosystem = ecosystem.name(),
                    error = %e,
                    "failed to write auxiliary files"
                );
            }
        }

        let mut extra_files = Vec::new();
        if !self.config.no_publish {
            extra_files.push(GeneratedFile {
                rel_path: PathBuf::from("ci/publish-images.sh"),
                data: generate_publish_image_script(self.config).into_bytes(),
            });
        }

        Ok(AssemblyOutput {
            workflows,
            bors,
            extra_files,
        })
    }

    fn make_ci_workflow(&self) -> Workflow {
        let mut jobs = BTreeMap::new();
        jobs.insert("misspell".to_string(), make_misspell_job(self.config));

        if !self.config.no_e2e {
            let (build, run) = self.make_e2e_job_pair();
            jobs.insert("e2e-build".to_string(), build);
            jobs.insert("e2e-run".to_string(), run);
        }

        for ecosystem in self.registry.used_in(self.repo_root) {
            info!(ecosystem = ecosystem.name(), "generating jobs");
            let set = ecosystem.make(self.repo_root, self.config);
            for job in set.ci {
                let Some(key) = job.name.clone() else {
                    warn!(ecosystem = ecosystem.name(), "dropping job with no name");
                    continue;
                };
                if jobs.insert(key.clone(), job).is_some() {
                    // known sharp edge: keys collide silently, last one wins
                    warn!(
                        ecosystem = ecosystem.name(),
                        job = %key,
                        "job key collision, earlier definition replaced"
                    );
                }
            }
        }

        Workflow {
            name: "ci".to_string(),
            on: Trigger::on_pull_request_and_bors_branches(),
            jobs,
        }
    }

    /// Artifact-producing build job and the test job consuming it. Cache
    /// steps contributed by detected ecosystems go before the build step,
    /// in registry order.
    fn make_e2e_job_pair(&self) -> (Job, Job) {
        let mut build_steps = vec![checkout_step()];
        for ecosystem in self.registry.used_in(self.repo_root) {
            if let Some(step) = ecosystem.e2e_cache_step() {
                build_steps.push(step);
            }
        }
        build_steps.push(Step::run("Build e2e artifacts", "bash ci/e2e-build.sh"));
        build_steps.push(Step::uses(
            "Upload e2e artifacts",
            "actions/upload-artifact@v2",
            &[
                ("name", "e2e-artifacts"),
                ("path", "e2e-artifacts"),
                ("retention-days", "2"),
            ],
        ));

        let mut build_env = BTreeMap::new();
        build_env.insert("DOCKER_BUILDKIT".to_string(), "1".to_string());

        let build = Job {
            runs_on: UBUNTU_RUNNER.to_string(),
            timeout_minutes: self.config.build_timeout_minutes,
            env: Some(build_env),
            steps: build_steps,
            ..Default::default()
        };

        let run = Job {
            runs_on: UBUNTU_RUNNER.to_string(),
            needs: Some("e2e-build".to_string()),
            timeout_minutes: self.config.job_timeout_minutes,
            steps: vec![
                checkout_step(),
                Step::uses(
                    "Download e2e artifacts",
                    "actions/download-artifact@v2",
                    &[("name", "e2e-artifacts"), ("path", "e2e-artifacts")],
                ),
                Step::run("Execute tests", "bash ci/e2e-run.sh"),
                Step::uses(
                    "Upload logs",
                    "actions/upload-artifact@v2",
                    &[
                        ("name", "e2e-logs"),
                        ("path", "e2e-logs"),
                        ("retention-days", "2"),
                    ],
                ),
            ],
            ..Default::default()
        };

        (build, run)
    }
}

/// Workflow with the single self-check job: re-run the generator against
/// the repository and fail if committed configuration is stale.
pub fn make_meta_workflow(config: &CiConfig) -> Workflow {
    let install_step = if config.internal_hack_for_generator {
        Step::run(
            "Install ci-config-gen",
            "cargo install --path . --locked",
        )
    } else {
        Step::run(
            "Install ci-config-gen",
            "cargo install ci-config-gen --git https://github.com/jjs-dev/ci-config-gen --locked",
        )
    };

    let check_job = Job {
        runs_on: UBUNTU_RUNNER.to_string(),
        timeout_minutes: config.job_timeout_minutes,
        steps: vec![
            checkout_step(),
            Step::uses(
                "Install stable toolchain",
                "actions-rs/toolchain@v1",
                &[("toolchain", "stable"), ("override", "true")],
            ),
            install_step,
            Step::run("Run ci-config-gen", "ci-config-gen --repo-root ."),
            Step::run(
                "Verify CI configuration is up-to-date",
                "git diff --exit-code",
            ),
        ],
        ..Default::default()
    };

    let mut jobs = BTreeMap::new();
    jobs.insert("check-ci-config".to_string(), check_job);

    Workflow {
        name: "meta".to_string(),
        on: Trigger::on_pull_request_and_bors_branches(),
        jobs,
    }
}

fn make_misspell_job(config: &CiConfig) -> Job {
    Job {
        runs_on: UBUNTU_RUNNER.to_string(),
        timeout_minutes: config.job_timeout_minutes,
        steps: vec![
            checkout_step(),
            Step::uses(
                "run spellcheck",
                "reviewdog/action-misspell@v1",
                &[
                    ("github_token", "${{ secrets.GITHUB_TOKEN }}"),
                    ("locale", "US"),
                ],
            ),
        ],
        ..Default::default()
    }
}
