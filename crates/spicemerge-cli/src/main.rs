//! spicemerge command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use spicemerge::{MergeOptions, MergePipeline, ScanOptions, TracingSink};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "spicemerge")]
#[command(about = "Merge a source SPICE model library tree into a destination tree", long_about = None)]
#[command(version)]
struct Cli {
    /// Library tree to merge from
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Library tree whose matching files are rewritten
    #[arg(value_name = "DESTINATION")]
    destination: PathBuf,

    /// Library file extension to include (repeatable; default: bjt, dio, jft, mos)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Merge independent files in parallel
    #[arg(long)]
    parallel: bool,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = load_options(&cli)?;
    debug!("Options: {:?}", options);

    let report = MergePipeline::new(options)
        .run(&cli.source, &cli.destination, &TracingSink)
        .with_context(|| {
            format!(
                "Failed to merge {} into {}",
                cli.source.display(),
                cli.destination.display()
            )
        })?;

    println!("{}", report.to_text());

    if report.is_success() {
        info!("Merge finished");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();
}

/// Configuration file first, then command-line overrides.
fn load_options(cli: &Cli) -> Result<MergeOptions> {
    let mut options = match &cli.config {
        Some(path) => MergeOptions::from_toml_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => MergeOptions::default(),
    };

    if !cli.extensions.is_empty() {
        options.scan = ScanOptions::with_extensions(&cli.extensions);
    }
    if cli.parallel {
        options.parallel = true;
    }

    Ok(options)
}
