//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use vtdex_core::pipeline::{self, ProgressReporter, StageResult};
use vtdex_shared::{AppConfig, init_config, load_config, load_config_from, resolve_api_key};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// vtdex — scrape the hololist VTuber directory into JSON.
#[derive(Parser)]
#[command(
    name = "vtdex",
    version,
    about = "Scrape the hololist VTuber directory and enrich it with YouTube channel data.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.vtdex/vtdex.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Collect every ranking page into the basic records file.
    Basic,

    /// Fetch each profile page listed in the basic records file.
    Detailed,

    /// Attach YouTube channel metadata to the detailed records file.
    Youtube,

    /// Run the basic, detailed, and youtube stages in order.
    All,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "vtdex=info",
        1 => "vtdex=debug",
        _ => "vtdex=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Basic => {
            let config = resolve_config(cli.config.as_ref())?;
            let reporter = CliProgress::new();
            pipeline::run_basic(&config, &reporter).await?;
            Ok(())
        }
        Command::Detailed => {
            let config = resolve_config(cli.config.as_ref())?;
            let reporter = CliProgress::new();
            pipeline::run_detailed(&config, &reporter).await?;
            Ok(())
        }
        Command::Youtube => {
            let config = resolve_config(cli.config.as_ref())?;
            let api_key = resolve_api_key(&config.youtube)?;
            let reporter = CliProgress::new();
            pipeline::run_youtube(&config, &api_key, &reporter).await?;
            Ok(())
        }
        Command::All => cmd_all(cli.config.as_ref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_ref()),
        },
    }
}

fn resolve_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

async fn cmd_all(config_path: Option<&PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    // Fail before the long-running stages if the key is missing.
    let api_key = resolve_api_key(&config.youtube)?;

    info!(output_dir = %config.output.dir, "running all stages");

    let reporter = CliProgress::new();
    let results = pipeline::run_all(&config, &api_key, &reporter).await?;
    drop(reporter);

    let total: Duration = results.iter().map(|r| r.elapsed).sum();
    println!();
    println!("  All stages complete in {:.1}s", total.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&PathBuf>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_fetched(&self, page: u32, records: usize) {
        self.spinner
            .set_message(format!("Listing page {page}: {records} entries"));
    }

    fn item_progress(&self, current: usize, total: usize, detail: &str) {
        self.spinner
            .set_message(format!("Fetching details [{current}/{total}] {detail}"));
    }

    fn done(&self, result: &StageResult) {
        let matched = result
            .matched
            .map(|m| format!(", {m} with channel data"))
            .unwrap_or_default();
        self.spinner.println(format!(
            "  {} stage: {} records{matched} -> {} ({:.1}s)",
            result.stage,
            result.records,
            result.output.display(),
            result.elapsed.as_secs_f64()
        ));
    }
}
