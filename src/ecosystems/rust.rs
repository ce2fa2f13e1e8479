//! Rust ecosystem definition

use super::{path_exists, Ecosystem, JobSet};
use crate::config::CiConfig;
use crate::workflow::{checkout_step, Job, Step, UBUNTU_RUNNER};
use std::path::Path;

/// cargo-udeps takes minutes to compile, so its binary is cached in the
/// workflow; bump this to invalidate that cache.
const CARGO_UDEPS_VERSION: &str = "0.1.21";

pub struct RustEcosystem;

fn cache_step() -> Step {
    Step::uses("Setup cache", "Swatinem/rust-cache@v1", &[])
}

fn install_toolchain_step(channel: &str) -> Step {
    Step::uses(
        &format!("Install {channel} toolchain"),
        "actions-rs/toolchain@v1",
        &[
            ("toolchain", channel),
            ("components", "clippy,rustfmt"),
            ("override", "true"),
        ],
    )
}

impl Ecosystem for RustEcosystem {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn used(&self, repo_root: &Path) -> bool {
        path_exists(&repo_root.join("Cargo.toml"))
    }

    fn e2e_cache_step(&self) -> Option<Step> {
        Some(cache_step())
    }

    fn make(&self, _repo_root: &Path, config: &CiConfig) -> JobSet {
        let compile_cargo_udeps = format!(
            "\ncargo install cargo-udeps --locked --version {CARGO_UDEPS_VERSION}\n\
             mkdir -p ~/udeps\n\
             cp $( which cargo-udeps ) ~/udeps"
        );

        let run_cargo_udeps = "\nexport PATH=~/udeps:$PATH\n\
                               export RUSTC_BOOTSTRAP=1\n\
                               cargo udeps\n";

        let jobs = vec![
            Job {
                name: Some("rustfmt".to_string()),
                runs_on: UBUNTU_RUNNER.to_string(),
                timeout_minutes: config.job_timeout_minutes,
                steps: vec![
                    checkout_step(),
                    install_toolchain_step("nightly"),
                    Step::uses(
                        "Check formatting",
                        "actions-rs/cargo@v1",
                        &[("command", "fmt"), ("args", "-- --check")],
                    ),
                ],
                ..Default::default()
            },
            Job {
                name: Some("rust-unit-tests".to_string()),
                runs_on: UBUNTU_RUNNER.to_string(),
                timeout_minutes: config.job_timeout_minutes,
                steps: vec![
                    checkout_step(),
                    cache_step(),
                    Step::uses("Run unit tests", "actions-rs/cargo@v1", &[("command", "test")]),
                ],
                ..Default::default()
            },
            Job {
                name: Some("rust-unused-deps".to_string()),
                runs_on: UBUNTU_RUNNER.to_string(),
                timeout_minutes: config.job_timeout_minutes,
                steps: vec![
                    checkout_step(),
                    install_toolchain_step("stable"),
                    cache_step(),
                    Step {
                        id: Some("cargo_udeps".to_string()),
                        ..Step::uses(
                            "Fetch prebuilt cargo-udeps",
                            "actions/cache@v2",
                            &[
                                ("path", "~/udeps"),
                                (
                                    "key",
                                    &format!(
                                        "udeps-bin-${{{{ runner.os }}}}-v{CARGO_UDEPS_VERSION}"
                                    ),
                                ),
                            ],
                        )
                    },
                    Step {
                        r#if: Some("steps.cargo_udeps.outputs.cache-hit != 'true'".to_string()),
                        ..Step::run("Install cargo-udeps", &compile_cargo_udeps)
                    },
                    Step::run("Run cargo-udeps", run_cargo_udeps),
                ],
                ..Default::default()
            },
            Job {
                name: Some("rust-cargo-deny".to_string()),
                runs_on: UBUNTU_RUNNER.to_string(),
                timeout_minutes: config.job_timeout_minutes,
                steps: vec![
                    checkout_step(),
                    Step::uses(
                        "Run cargo-deny",
                        "EmbarkStudios/cargo-deny-action@v1",
                        &[("command", "check all")],
                    ),
                ],
                ..Default::default()
            },
            Job {
                name: Some("rust-lint".to_string()),
                runs_on: UBUNTU_RUNNER.to_string(),
                timeout_minutes: config.job_timeout_minutes,
                steps: vec![
                    checkout_step(),
                    Step::uses(
                        "Run clippy",
                        "actions-rs/cargo@v1",
                        &[("command", "clippy"), ("args", "--workspace -- -Dwarnings")],
                    ),
                ],
                ..Default::default()
            },
        ];

        JobSet { ci: jobs }
    }

    fn write_additional_files(&self, repo_root: &Path) -> std::io::Result<()> {
        let rustfmt_config = "\
# GENERATED FILE

imports_granularity = \"Crate\"
force_explicit_abi = true
reorder_imports = true
reorder_modules = true
reorder_impl_items = true
use_field_init_shorthand = true
format_code_in_doc_comments = true
edition = \"2018\"
merge_derives = true
newline_style = \"Unix\"
report_fixme = \"Unnumbered\"
unstable_features = true
version = \"Two\"
";

        std::fs::write(repo_root.join("rustfmt.toml"), rustfmt_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config() -> CiConfig {
        CiConfig {
            job_timeout_minutes: 30,
            build_timeout_minutes: 30,
            ..Default::default()
        }
    }

    #[test]
    fn test_used_requires_cargo_toml() {
        let dir = TempDir::new().unwrap();
        assert!(!RustEcosystem.used(dir.path()));

        fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        assert!(RustEcosystem.used(dir.path()));
    }

    #[test]
    fn test_job_names() {
        let dir = TempDir::new().unwrap();
        let jobs = RustEcosystem.make(dir.path(), &test_config());
        let names: Vec<&str> = jobs.ci.iter().filter_map(|j| j.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![
                "rustfmt",
                "rust-unit-tests",
                "rust-unused-deps",
                "rust-cargo-deny",
                "rust-lint"
            ]
        );
    }

    #[test]
    fn test_jobs_carry_configured_timeout() {
        let dir = TempDir::new().unwrap();
        let jobs = RustEcosystem.make(dir.path(), &test_config());
        assert!(jobs.ci.iter().all(|j| j.timeout_minutes == 30));
    }

    #[test]
    fn test_udeps_cache_key_pins_version() {
        let dir = TempDir::new().unwrap();
        let jobs = RustEcosystem.make(dir.path(), &test_config());
        let udeps = jobs
            .ci
            .iter()
            .find(|j| j.name.as_deref() == Some("rust-unused-deps"))
            .unwrap();
        let cache = udeps
            .steps
            .iter()
            .find(|s| s.id.as_deref() == Some("cargo_udeps"))
            .unwrap();
        let key = &cache.with.as_ref().unwrap()["key"];
        assert!(key.ends_with(&format!("v{CARGO_UDEPS_VERSION}")));
    }

    #[test]
    fn test_contributes_e2e_cache_step() {
        let step = RustEcosystem.e2e_cache_step().unwrap();
        assert_eq!(step.uses.as_deref(), Some("Swatinem/rust-cache@v1"));
    }

    #[test]
    fn test_writes_rustfmt_config() {
        let dir = TempDir::new().unwrap();
        RustEcosystem.write_additional_files(dir.path()).unwrap();
        let content = fs::read_to_string(dir.path().join("rustfmt.toml")).unwrap();
        assert!(content.starts_with("# GENERATED FILE"));
        assert!(content.contains("newline_style = \"Unix\""));
    }
}
