use anyhow::Result;
use clap::Parser;

use geocoder_cli::cli::commands::{handle_geocode_command, handle_session_command};
use geocoder_cli::cli::{self, Cli, Commands, SessionArgs};
use geocoder_cli::config::GeocoderConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; variables may come from the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = GeocoderConfig::from_env();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Session(SessionArgs::default()));

    let result = match command {
        Commands::Session(args) => handle_session_command(args, config).await,
        Commands::Geocode(args) => handle_geocode_command(args, config).await,
    };

    if let Err(ref e) = result {
        log::error!("{:#}", e);
        cli::display::error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warn, `-v` info, `-vv` debug
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();

    log::debug!("Logging initialised at '{}'", default_filter);
}
