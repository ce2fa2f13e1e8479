use ci_config_gen::assembly::Assembler;
use ci_config_gen::cli::CliArgs;
use ci_config_gen::config::CiConfig;
use ci_config_gen::{emit, VERSION};

use anyhow::Context;
use clap::Parser;
use std::env;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("ci-config-gen v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> anyhow::Result<()> {
    let out = args.output.as_deref().unwrap_or(&args.repo_root);

    let config = CiConfig::load(&args.repo_root).context("failed to load config")?;
    debug!(?config, "loaded config");

    let assembler = Assembler::new(&args.repo_root, &config);
    let output = assembler.assemble().context("assembly failed")?;

    emit::write_output(out, &output).context("failed to write generated files")?;
    info!(
        workflows = output.workflows.len(),
        out = %out.display(),
        "generated CI configuration"
    );

    Ok(())
}

fn init_logging_from_args(args: &CliArgs) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = if let Some(level_str) = &args.log_level {
            parse_level(level_str)
        } else if args.verbose {
            Level::DEBUG
        } else if args.quiet {
            Level::ERROR
        } else {
            let level_str =
                env::var("CI_CONFIG_GEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            parse_level(&level_str)
        };

        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter.add_directive(format!("ci_config_gen={}", level).parse().unwrap());
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}
