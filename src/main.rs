use std::io::Read;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docprep::cli::commands::{Cli, Command};
use docprep::cli::output;
use docprep::config::PipelineConfig;
use docprep::error::{DocprepError, Result};
use docprep::ingest::{self, PdfExtractPartitioner};
use docprep::pipeline;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Log to stderr; stdout carries the output rows.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.global.config.as_deref();
    match cli.command {
        Command::Clean { text } => cmd_clean(text),
        Command::Load { source, output } => {
            let mut config = load_config(config_path)?;
            source.apply(&mut config);
            output.apply(&mut config);
            cmd_load(&config)
        }
        Command::Split {
            source,
            split,
            output,
        } => {
            let mut config = load_config(config_path)?;
            source.apply(&mut config);
            split.apply(&mut config);
            output.apply(&mut config);
            cmd_split(&config)
        }
        Command::Config {
            source,
            split,
            output,
        } => {
            let mut config = load_config(config_path)?;
            source.apply(&mut config);
            split.apply(&mut config);
            output.apply(&mut config);
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&std::path::Path>) -> Result<PipelineConfig> {
    let cwd = std::env::current_dir()
        .map_err(|e| DocprepError::Config(format!("cannot get cwd: {e}")))?;
    PipelineConfig::load(explicit, &cwd)
}

fn cmd_clean(text: Option<String>) -> Result<()> {
    let raw = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    println!("{}", ingest::clean(&raw));
    Ok(())
}

fn cmd_load(config: &PipelineConfig) -> Result<()> {
    let loaded = ingest::load_and_clean(config, &PdfExtractPartitioner::new())?;
    output::write_rows(&loaded.documents, &config.output)
}

fn cmd_split(config: &PipelineConfig) -> Result<()> {
    let result = pipeline::run(config, &PdfExtractPartitioner::new())?;
    output::write_rows(&result.chunks, &config.output)
}
