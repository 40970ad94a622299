use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{debug, error, info};

use uncaptcha::config::{self as cfg, Config};

/// uncaptcha configuration checker
#[derive(Debug, Parser)]
#[command(
    name = uncaptcha::PKG_NAME,
    version = uncaptcha::PKG_VERSION,
    about = "Load and validate the uncaptcha configuration"
)]
struct Args {
    /// Candidate INI file; repeat to layer several (later files win).
    /// Defaults to /etc/uncaptcha/uncaptcha.ini then ./uncaptcha.ini
    #[arg(short = 'c', long = "config")]
    config: Vec<PathBuf>,

    /// Report every violation instead of stopping at the first one
    #[arg(long = "all")]
    all: bool,

    /// Print the validated settings as JSON
    #[arg(long = "show")]
    show: bool,

    /// Set log level (e.g., trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Print the JSON Schema for the typed settings and exit
    #[arg(long = "print-schema")]
    print_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    uncaptcha::init_tracing(args.log_level.as_deref());

    if args.print_schema {
        let json = serde_json::to_string_pretty(&cfg::generate_schema())?;
        println!("{json}");
        return Ok(());
    }

    let candidates: Vec<PathBuf> = if args.config.is_empty() {
        cfg::DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect()
    } else {
        args.config
    };
    info!(
        version = uncaptcha::PKG_VERSION,
        candidates = ?candidates,
        "Loading configuration"
    );

    let config = Config::load_async(&candidates)
        .await
        .context("Failed to load configuration")?;
    debug!(loaded_from = ?config.loaded_from(), "Configuration loaded");

    if args.all {
        let violations = config.violations();
        if !violations.is_empty() {
            for violation in &violations {
                error!("{violation}");
            }
            bail!("{} configuration problem(s) found", violations.len());
        }
    }

    let settings = config.settings().context("Invalid configuration")?;
    info!("Configuration is valid");

    if args.show {
        let json = serde_json::to_string_pretty(&settings)?;
        println!("{json}");
    }
    Ok(())
}
