//! Ecosystem definitions and registry
//!
//! An [`Ecosystem`] detects one software ecosystem (by its canonical
//! manifest at the repository root) and contributes that ecosystem's CI
//! jobs. Implementations are stateless unit structs; all inputs arrive
//! through method arguments, so detection and job generation stay
//! deterministic for a given repository state.

mod cpp;
mod go;
mod registry;
mod rust;

pub use cpp::CppEcosystem;
pub use go::GoEcosystem;
pub use registry::EcosystemRegistry;
pub use rust::RustEcosystem;

use crate::config::CiConfig;
use crate::workflow::{Job, Step};
use std::path::Path;

/// One ecosystem's jobs for a single generator run.
///
/// Intentionally not yet keyed: the assembly engine merges these into the
/// ci workflow's job map using each job's declared name.
#[derive(Debug, Default)]
pub struct JobSet {
    pub ci: Vec<Job>,
}

/// A pluggable detector/generator for one software ecosystem.
pub trait Ecosystem {
    /// Stable ecosystem name, unique across the registry.
    fn name(&self) -> &'static str;

    /// Whether this ecosystem is present at `repo_root`. A failed
    /// filesystem check counts as absent; it must never abort the run.
    fn used(&self, repo_root: &Path) -> bool;

    /// Produces this ecosystem's CI jobs. Must be deterministic for a
    /// given repository state and configuration.
    fn make(&self, repo_root: &Path, config: &CiConfig) -> JobSet;

    /// Cache-priming step for the shared e2e build job, if this ecosystem
    /// has one.
    fn e2e_cache_step(&self) -> Option<Step> {
        None
    }

    /// Emits ecosystem-specific auxiliary files into the repository.
    /// Best-effort: a failure is reported by the caller but does not
    /// invalidate assembled workflows.
    fn write_additional_files(&self, _repo_root: &Path) -> std::io::Result<()> {
        Ok(())
    }
}

/// Existence check tolerating unreadable paths.
fn path_exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}
