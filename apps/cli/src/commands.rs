//! CLI definition, tracing setup, and the download command.

use std::path::PathBuf;
use std::time::Duration;

use bookgrab_core::{BookSummary, ProgressReporter, StealBookConfig, steal_a_book};
use bookgrab_shared::{AppConfig, load_config, load_config_from};
use clap::Parser;
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// bookgrab: save an online OFPS book as one HTML file.
#[derive(Parser)]
#[command(
    name = "bookgrab",
    version,
    about = "Download an online OFPS book and save it as a single HTML file.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Book root URL, e.g. http://ofps.oreilly.com/titles/9780596155957
    pub book_url: String,

    /// Output path. Defaults to <book title>.html in the save directory.
    pub output_file: Option<PathBuf>,

    /// Index page relative to the book root (default: index.html).
    #[arg(long)]
    pub index_page: Option<String>,

    /// Directory for the title-derived output file (default: current directory).
    #[arg(long)]
    pub save_to: Option<PathBuf>,

    /// Config file to use instead of ~/.bookgrab/bookgrab.toml.
    #[arg(long, env = "BOOKGRAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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

/// Log directive for a verbosity count, scoped to bookgrab's own crates.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "bookgrab=info",
        1 => "bookgrab=debug",
        _ => "bookgrab=trace",
    }
}

// ---------------------------------------------------------------------------
// Download command
// ---------------------------------------------------------------------------

/// Run the download described by `cli`.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let app_config: AppConfig = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let config = build_config(&cli, &app_config);

    info!(
        url = %config.root_url,
        index_page = %config.index_page,
        save_path = ?config.save_path,
        "stealing a book"
    );

    let reporter = CliProgress::new();
    let summary = steal_a_book(&config, &reporter).await?;

    println!();
    println!("  Book saved!");
    println!("  Title:    {}", summary.title);
    println!("  Chapters: {}", summary.chapter_count);
    println!("  Size:     {} bytes", summary.bytes_written);
    println!("  Path:     {}", summary.path.display());
    println!("  Time:     {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Merge CLI flags over the loaded config.
fn build_config(cli: &Cli, app_config: &AppConfig) -> StealBookConfig {
    let mut config =
        StealBookConfig::from_app_config(app_config, cli.book_url.clone(), cli.output_file.clone());

    if let Some(index_page) = &cli.index_page {
        config.index_page = index_page.clone();
    }
    if let Some(save_to) = &cli.save_to {
        config.save_to = save_to.clone();
    }

    config
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
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn title_found(&self, title: &str) {
        self.spinner.println(format!("Title: \"{title}\""));
    }

    fn chapter_fetched(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Extracting [{current}/{total}] {url}"));
    }

    fn done(&self, _summary: &BookSummary) {
        self.spinner.finish_and_clear();
    }
}
