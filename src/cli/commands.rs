use clap::Parser;
use std::path::PathBuf;

/// Generates GitHub Actions workflows and bors configuration
#[derive(Parser, Debug)]
#[command(
    name = "ci-config-gen",
    about = "Generates GitHub Actions workflows and bors configuration from repository contents",
    version,
    long_about = "ci-config-gen inspects a repository root for known software ecosystems \
                  (Rust, Go, C++) and composes their lint/test/build jobs, together with \
                  built-in meta and publish jobs, into generated workflow documents and a \
                  matching bors merge-gate configuration."
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Path to root directory of the repository to generate config for"
    )]
    pub repo_root: PathBuf,

    #[arg(
        long,
        value_name = "PATH",
        help = "Directory which will contain generated files. Defaults to repo-root"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}
