//! tdharvest - Disclosure listing ingestion pipeline
//!
//! Scrapes the daily disclosure listing, reconciles it against the
//! historical store, assigns sequence numbers to what is new, and
//! exports the delta in the store's column layout.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;
use tdharvest_core::shutdown_flag;

#[derive(Parser)]
#[command(name = "tdharvest")]
#[command(about = "Disclosure listing ingestion pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./tdharvest.toml or ~/.config/tdharvest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Catch up: scan from the last stored date through today and export the delta
    Catchup(cmd::catchup::CatchupArgs),
    /// Scrape a single day without touching the store
    Scan(cmd::scan::ScanArgs),
    /// Classify titles (one-off or over the stored corpus)
    Classify(cmd::classify::ClassifyArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(tdharvest_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug  — progress lines show activity
    //   non-TTY: info unless --debug          — logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    tdharvest_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Catchup(args) => {
            setup_signal_handler();
            cmd::catchup::run(args, &config, &progress)
        }
        Command::Scan(args) => {
            setup_signal_handler();
            cmd::scan::run(args, &config, &progress)
        }
        Command::Classify(args) => cmd::classify::run(args, &config),
        Command::Config => {
            cmd::print_summary(
                "Setting",
                &[
                    ("Base URL", config.source.base_url.clone()),
                    ("Store", config.store.db_path.display().to_string()),
                    ("Output directory", config.output.dir.display().to_string()),
                    ("Request timeout", format!("{}s", config.http.timeout_secs)),
                    ("Max attempts", config.http.max_attempts.to_string()),
                    (
                        "Workers",
                        format!("{} (max: {})", config.workers.scan, config.workers.max),
                    ),
                ],
            );
            Ok(())
        }
    }
}

fn setup_signal_handler() {
    // First signal: set graceful shutdown flag
    // Second signal: force exit (default SIGINT behavior restored)
    // SAFETY: AtomicBool::swap and process::exit are async-signal-safe
    unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGTERM, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("Failed to register SIGTERM handler");
        signal_hook::low_level::register(signal_hook::consts::SIGINT, || {
            if shutdown_flag().swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
        })
        .expect("Failed to register SIGINT handler");
    }
}
