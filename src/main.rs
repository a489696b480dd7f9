use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use atlas::api::client::RestCountriesClient;
use atlas::console::TerminalConsole;
use atlas::core::config;
use atlas::core::engine::NavigationEngine;

#[derive(Parser)]
#[command(name = "atlas", about = "Menu-driven console browser for world country data")]
struct Args {
    /// Override the REST API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Override the cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to atlas.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("atlas.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Atlas starting up");

    let file_config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("atlas: {e}");
            return ExitCode::FAILURE;
        }
    };
    let resolved = config::resolve(&file_config, args.api_url.as_deref(), args.cache_dir.as_ref());
    log::debug!("resolved config: {resolved:?}");

    let provider = match RestCountriesClient::new(&resolved) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("atlas: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut engine = NavigationEngine::new(provider, TerminalConsole::new());
    match engine.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("run loop ended with an error: {e}");
            eprintln!("atlas: {e}");
            ExitCode::FAILURE
        }
    }
}
