//! One-shot geocode command: authenticate, load, process, write

use anyhow::{Context, Result, bail};
use colored::*;
use dialoguer::Password;

use crate::api::GeocodingClient;
use crate::auth::SharedSecretGate;
use crate::cli::GeocodeArgs;
use crate::cli::display::{self, ProgressReporter};
use crate::config::GeocoderConfig;
use crate::shell::Session;

pub async fn handle_geocode_command(args: GeocodeArgs, config: GeocoderConfig) -> Result<()> {
    let mut session = Session::new(SharedSecretGate::new(config.access_secret.clone()));

    let secret = match args.secret {
        Some(secret) => secret,
        None => Password::new()
            .with_prompt("Enter access secret")
            .allow_empty_password(true)
            .interact()
            .context("Failed to read access secret")?,
    };

    if !session.authenticate(&secret) {
        bail!("Invalid secret. Access denied.");
    }

    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let rows = session.load_file(&args.input)?;
    display::success(&format!(
        "File uploaded successfully! Found {} addresses to process.",
        rows
    ));
    if !args.quiet {
        super::session::show_preview(&session);
    }

    let progress = ProgressReporter::new(rows);
    let api_url = config.api_url.clone();
    let processed = session
        .start_processing(
            &config,
            |api_key| GeocodingClient::new(api_url, api_key),
            |done, total| progress.update(done, total),
        )
        .await;

    let result = match processed {
        Ok(result) => {
            progress.finish();
            result
        }
        Err(e) => {
            progress.abandon();
            return Err(e.into());
        }
    };

    if args.quiet {
        display::print_summary(result);
    } else {
        display::print_results(result);
    }

    let artifact = session.export(chrono::Local::now().naive_local())?;
    let path = artifact.save_in(&args.output_dir)?;

    println!(
        "Geocoded file written to: {}",
        path.display().to_string().bright_green()
    );

    Ok(())
}
