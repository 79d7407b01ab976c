use anyhow::Result;
use clap::{Parser, Subcommand};
use phishguard::{Config, PredictionEngine};
use phishguard_cli::cli::{features_cmd, model_cmd, output, scan_cmd};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "phishguard",
    version,
    about = "Classify URLs as phishing or legitimate"
)]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Suppress headers and notices
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Show rule signals and debug logs
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Classifier artifact [default: $PHISHGUARD_MODEL_PATH, else
    /// ~/.phishguard/model/phishing_model.json]
    #[arg(long, global = true, value_name = "PATH")]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify one or more URLs
    Scan {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Show the features extracted from a URL
    Features { url: String },
    /// Show classifier artifact status
    Model,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    for (enabled, var) in [
        (cli.json, output::JSON_ENV),
        (cli.quiet, output::QUIET_ENV),
        (cli.verbose, output::VERBOSE_ENV),
        (cli.no_color, output::NO_COLOR_ENV),
    ] {
        if enabled {
            std::env::set_var(var, "1");
        }
    }

    let default_directive = if cli.verbose {
        "phishguard=debug"
    } else {
        "phishguard=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .init();

    let config = Config::resolve(cli.model);
    debug!(model_path = %config.model_path.display(), "resolved config");

    match cli.command {
        Command::Scan { urls } => {
            let engine = PredictionEngine::from_config(&config);
            scan_cmd::run(&engine, &urls)
        }
        Command::Features { url } => features_cmd::run(&url),
        Command::Model => model_cmd::run(&config),
    }
}
