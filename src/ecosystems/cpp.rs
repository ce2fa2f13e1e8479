//! C++ ecosystem definition
//!
//! Detection differs from the other ecosystems: there is no single root
//! manifest, so presence means at least one `<subdir>/CMakeLists.txt`
//! directly under the repository root. Each matched directory gets its own
//! configure + analyze step pair inside one shared lint job.

use super::{Ecosystem, JobSet};
use crate::config::CiConfig;
use crate::workflow::{checkout_step, Job, Step, UBUNTU_RUNNER};
use std::path::Path;
use tracing::warn;

pub struct CppEcosystem;

/// Relative names of direct subdirectories containing a CMakeLists.txt.
/// An unreadable root directory yields no matches; scanning must never
/// abort the run.
fn find_cmake_dirs(root: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "failed to scan for CMakeLists.txt");
            return Vec::new();
        }
    };

    let mut dirs: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().join("CMakeLists.txt").is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    dirs.sort();
    dirs
}

impl Ecosystem for CppEcosystem {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn used(&self, repo_root: &Path) -> bool {
        !find_cmake_dirs(repo_root).is_empty()
    }

    fn make(&self, repo_root: &Path, config: &CiConfig) -> JobSet {
        let dirs = find_cmake_dirs(repo_root);

        let mut steps = vec![
            checkout_step(),
            Step::run("Install dependencies", "sudo apt-get install -y clang-tools"),
            Step::run("Prepare report directory", "mkdir analyzer-report"),
        ];
        for dir in &dirs {
            steps.push(Step::run(
                &format!("Configure {dir}"),
                &format!("cmake -S {dir} -B {dir}/cmake-build -DCMAKE_EXPORT_COMPILE_COMMANDS=On"),
            ));
            steps.push(Step::run(
                &format!("Lint {dir}"),
                &format!("scan-build -o analyzer-report make -C {dir}/cmake-build -j4"),
            ));
        }
        // TODO: upload the analyzer report as a workflow artifact
        steps.push(Step::run(
            "Check that report is empty",
            "[ -z \"$(ls -A analyzer-report)\" ]",
        ));

        JobSet {
            ci: vec![Job {
                name: Some("cpp-lint".to_string()),
                runs_on: UBUNTU_RUNNER.to_string(),
                timeout_minutes: config.job_timeout_minutes,
                steps,
                ..Default::default()
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn add_cmake_project(dir: &TempDir, name: &str) {
        let project = dir.path().join(name);
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("CMakeLists.txt"), "project(x)\n").unwrap();
    }

    #[test]
    fn test_not_used_in_empty_repo() {
        let dir = TempDir::new().unwrap();
        assert!(!CppEcosystem.used(dir.path()));
    }

    #[test]
    fn test_used_with_nested_cmakelists() {
        let dir = TempDir::new().unwrap();
        add_cmake_project(&dir, "invoker");
        assert!(CppEcosystem.used(dir.path()));
    }

    #[test]
    fn test_root_level_cmakelists_not_matched() {
        // only */CMakeLists.txt counts, same as the glob it replaces
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CMakeLists.txt"), "project(x)\n").unwrap();
        assert!(!CppEcosystem.used(dir.path()));
    }

    #[test]
    fn test_lint_job_has_step_pair_per_project() {
        let dir = TempDir::new().unwrap();
        add_cmake_project(&dir, "beta");
        add_cmake_project(&dir, "alpha");

        let config = CiConfig {
            job_timeout_minutes: 30,
            ..Default::default()
        };
        let jobs = CppEcosystem.make(dir.path(), &config);
        assert_eq!(jobs.ci.len(), 1);

        let lint = &jobs.ci[0];
        assert_eq!(lint.name.as_deref(), Some("cpp-lint"));
        let step_names: Vec<&str> = lint.steps.iter().filter_map(|s| s.name.as_deref()).collect();
        // directory order is sorted for determinism
        assert_eq!(
            step_names,
            vec![
                "Fetch sources",
                "Install dependencies",
                "Prepare report directory",
                "Configure alpha",
                "Lint alpha",
                "Configure beta",
                "Lint beta",
                "Check that report is empty",
            ]
        );
    }
}
