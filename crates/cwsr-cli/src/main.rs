mod inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cwsr-cli")]
#[command(about = "Chrome Web Store reviews scraper command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the live store page and print the payload the server would serve.
    Fetch {
        /// Recency window in days (defaults to `CWSR_TOP_REVIEWS_WINDOW_DAYS`).
        #[arg(long)]
        window_days: Option<u32>,
        /// Number of reviews to select (defaults to `CWSR_TOP_REVIEWS_COUNT`).
        #[arg(long)]
        count: Option<usize>,
        /// Print every parsed review instead of the selection.
        #[arg(long)]
        all: bool,
    },
    /// Parse a saved store page and print metrics and selected reviews.
    Parse {
        /// Path to an HTML file.
        file: PathBuf,
        #[arg(long)]
        window_days: Option<u32>,
        #[arg(long)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch {
            window_days,
            count,
            all,
        } => {
            let config = cwsr_core::load_app_config()?;
            let selection = inspect::selection_from(
                inspect::configured_selection(&config),
                window_days,
                count,
            );
            inspect::run_fetch(&config, selection, all).await?;
        }
        Commands::Parse {
            file,
            window_days,
            count,
        } => {
            let selection = inspect::selection_from(
                cwsr_scraper::SelectionSettings::default(),
                window_days,
                count,
            );
            inspect::run_parse(&file, selection)?;
        }
    }

    Ok(())
}
