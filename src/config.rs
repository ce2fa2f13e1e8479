//! Per-repository generator configuration
//!
//! Loaded from `ci/config.yaml` at the repository root. Field names on disk
//! are camelCase for compatibility with existing repositories.
//!
//! Configuration problems are fatal by design: they are reported before any
//! workflow is assembled, so a bad config never produces partial output.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found at {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("publish enabled, but no images listed")]
    NoImages,

    #[error("build timeout not specified")]
    NoBuildTimeout,
}

/// Resolved generator configuration for one repository.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiConfig {
    /// Suppress the publish workflow and image script.
    #[serde(default)]
    pub no_publish: bool,

    /// Suppress the e2e build/run job pair in the ci workflow.
    #[serde(default)]
    pub no_e2e: bool,

    /// Images built by `ci/publish-build.sh`, pushed by the generated
    /// publish script. Required non-empty when publishing is enabled.
    #[serde(default)]
    pub docker_images: Vec<String>,

    /// Overall merge-gate timeout, also the publish job timeout source.
    #[serde(default)]
    pub build_timeout_minutes: u32,

    /// Per-job timeout; defaults to `build_timeout_minutes` when unset.
    #[serde(default)]
    pub job_timeout_minutes: u32,

    /// Make the meta self-check install the generator from the in-repo
    /// sources instead of the upstream repository. Only useful inside the
    /// generator's own repository.
    #[serde(default)]
    pub internal_hack_for_generator: bool,
}

impl CiConfig {
    /// Loads and validates `ci/config.yaml` under `repo_root`.
    pub fn load(repo_root: &Path) -> Result<Self, ConfigError> {
        let config_path = repo_root.join("ci/config.yaml");
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path.display().to_string()));
        }

        let data = std::fs::read_to_string(&config_path)?;
        let mut config: CiConfig = serde_yaml::from_str(&data)?;
        debug!(path = %config_path.display(), "loaded config");

        if !config.no_publish && config.docker_images.is_empty() {
            return Err(ConfigError::NoImages);
        }
        if config.build_timeout_minutes == 0 {
            return Err(ConfigError::NoBuildTimeout);
        }
        if config.job_timeout_minutes == 0 {
            config.job_timeout_minutes = config.build_timeout_minutes;
        }

        Ok(config)
    }
}
