//! ci-config-gen - generates CI configuration from repository contents
//!
//! This library inspects a repository root for known software ecosystems
//! and composes per-ecosystem CI jobs into GitHub Actions workflow
//! documents plus a bors merge-gate configuration.
//!
//! # Core Concepts
//!
//! - **Ecosystem**: a pluggable detector/generator for one software
//!   ecosystem (Rust, Go, C++), consulted once per run in registry order
//! - **Assembly**: merging built-in and ecosystem-contributed jobs into
//!   named workflows while keeping output deterministic
//! - **Merge gate**: the bors status list derived from every assembled
//!   job, serialized into `bors.toml`
//!
//! # Example Usage
//!
//! ```no_run
//! use ci_config_gen::assembly::Assembler;
//! use ci_config_gen::config::CiConfig;
//! use ci_config_gen::emit;
//! use std::path::Path;
//!
//! fn generate(repo_root: &Path) -> anyhow::Result<()> {
//!     let config = CiConfig::load(repo_root)?;
//!     let output = Assembler::new(repo_root, &config).assemble()?;
//!     emit::write_output(repo_root, &output)?;
//!     Ok(())
//! }
//! ```

pub mod assembly;
pub mod bors;
pub mod cli;
pub mod config;
pub mod ecosystems;
pub mod emit;
pub mod publish;
pub mod validation;
pub mod workflow;

pub use assembly::{Assembler, AssemblyOutput};
pub use bors::BorsConfig;
pub use config::{CiConfig, ConfigError};
pub use ecosystems::{Ecosystem, EcosystemRegistry, JobSet};
pub use validation::{validate_workflow, ValidationError};
pub use workflow::{Job, Step, Trigger, Workflow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
