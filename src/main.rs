mod config;
mod error;
mod photo;
mod search;
mod search_clients;
mod sensor;
mod session;
mod tui;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::search::PhotoSearcher;
use crate::search_clients::pexels::PexelsSearcher;
use crate::tui::app::App;
use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;

/// Search stock photos from the terminal.
///
/// Results arrive in a card grid; further pages load automatically as you
/// scroll toward the end of the grid.
#[derive(Parser)]
#[command(name = "image-finder")]
#[command(version)]
#[command(about = "Incremental stock-photo search in the terminal", long_about = None)]
struct Cli {
    /// Run this search immediately on startup
    query: Option<String>,

    /// Photos fetched per page
    #[arg(long)]
    per_page: Option<u32>,
}

// The TUI owns the terminal, so log output goes to a file instead of stderr.
fn init_logging(config: &AppConfig) -> Result<(), AppError> {
    let log_file = std::fs::File::create(&config.log_file)?;
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::new()?;
    if let Some(per_page) = cli.per_page {
        config.per_page = per_page;
    }

    init_logging(&config)?;
    info!("Starting image-finder");

    let searcher: Arc<dyn PhotoSearcher> = Arc::new(PexelsSearcher::new(&config)?);

    let mut app = App::new(searcher, cli.query);
    app.run()?;

    info!("image-finder finished");
    Ok(())
}
