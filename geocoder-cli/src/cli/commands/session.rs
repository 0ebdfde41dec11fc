//! Interactive session command

use std::path::PathBuf;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};

use crate::api::GeocodingClient;
use crate::auth::{AccessGate, SharedSecretGate};
use crate::cli::SessionArgs;
use crate::cli::display::{self, ProgressReporter};
use crate::config::GeocoderConfig;
use crate::geocode::REQUIRED_COLUMNS;
use crate::shell::{Session, ShellError};

/// Menu entries; which ones are offered depends on the session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Authenticate,
    LoadFile,
    StartGeocoding,
    Download,
    Logout,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Authenticate => "🔐 Authenticate",
            Action::LoadFile => "📂 Choose an Excel file",
            Action::StartGeocoding => "🚀 Start Geocoding",
            Action::Download => "📥 Download Geocoded File",
            Action::Logout => "🚪 Logout",
            Action::Quit => "Quit",
        }
    }
}

fn available_actions<A: AccessGate>(session: &Session<A>) -> Vec<Action> {
    if !session.is_authenticated() {
        return vec![Action::Authenticate, Action::Quit];
    }

    let mut actions = vec![Action::LoadFile];
    if session.loaded_file().is_some() {
        actions.push(Action::StartGeocoding);
    }
    if session.results().is_some() {
        actions.push(Action::Download);
    }
    actions.push(Action::Logout);
    actions.push(Action::Quit);
    actions
}

/// Run the interactive session until the user quits
pub async fn handle_session_command(args: SessionArgs, config: GeocoderConfig) -> Result<()> {
    let mut session = Session::new(SharedSecretGate::new(config.access_secret.clone()));
    let theme = ColorfulTheme::default();

    display::banner();

    loop {
        if !session.is_authenticated() {
            display::heading("🔐 Access Required");
            display::info("Please enter the access secret to use the geocoding service.");
        }

        let actions = available_actions(&session);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            Action::Authenticate => {
                let secret = Password::with_theme(&theme)
                    .with_prompt("Enter access secret")
                    .allow_empty_password(true)
                    .interact()?;

                if session.authenticate(&secret) {
                    display::success("Authentication successful!");
                } else {
                    display::error("Invalid secret. Access denied.");
                }
            }
            Action::LoadFile => {
                let path: String = Input::with_theme(&theme)
                    .with_prompt("Excel file (.xlsx or .xls) with columns address1, city, sta, zip")
                    .interact_text()?;
                load_file(&mut session, &clean_path(&path));
            }
            Action::StartGeocoding => start_geocoding(&mut session, &config).await,
            Action::Download => download(&session, &args),
            Action::Logout => {
                session.logout();
                display::info("Logged out.");
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Strip the quotes terminals add when a file is dragged in
fn clean_path(input: &str) -> PathBuf {
    PathBuf::from(input.trim().trim_matches(|c| c == '"' || c == '\''))
}

fn load_file<A: AccessGate>(session: &mut Session<A>, path: &std::path::Path) {
    match session.load_file(path) {
        Ok(rows) => {
            display::success(&format!(
                "File uploaded successfully! Found {} addresses to process.",
                rows
            ));
            show_preview(session);
        }
        Err(e) => {
            display::error(&e.to_string());
            if matches!(e, ShellError::MissingColumns(_)) {
                display::info(&format!(
                    "Your file should contain columns: {}",
                    REQUIRED_COLUMNS.join(", ")
                ));
            }
        }
    }
}

pub(super) fn show_preview<A: AccessGate>(session: &Session<A>) {
    if let (Some(file), Some(rows)) = (session.loaded_file(), session.preview()) {
        display::heading("Data Preview");
        display::print_cells(&file.sheet.table().headers, rows);
    }
}

async fn start_geocoding<A: AccessGate>(session: &mut Session<A>, config: &GeocoderConfig) {
    let total = session.loaded_file().map(|f| f.sheet.len()).unwrap_or(0);
    let progress = ProgressReporter::new(total);
    let api_url = config.api_url.clone();

    let outcome = session
        .start_processing(
            config,
            |api_key| GeocodingClient::new(api_url, api_key),
            |done, total| progress.update(done, total),
        )
        .await;

    match outcome {
        Ok(result) => {
            progress.finish();
            display::print_results(result);
        }
        Err(e) => {
            progress.abandon();
            display::error(&e.to_string());
        }
    }
}

fn download<A: AccessGate>(session: &Session<A>, args: &SessionArgs) {
    let timestamp = chrono::Local::now().naive_local();

    let saved = session
        .export(timestamp)
        .map_err(anyhow::Error::from)
        .and_then(|artifact| artifact.save_in(&args.output_dir));

    match saved {
        Ok(path) => display::success(&format!("Saved {}", path.display())),
        Err(e) => display::error(&format!("{:#}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::{CellValue, Table};

    #[test]
    fn test_locked_session_offers_only_authenticate() {
        let session = Session::new(SharedSecretGate::new("s"));
        assert_eq!(
            available_actions(&session),
            vec![Action::Authenticate, Action::Quit]
        );
    }

    #[test]
    fn test_menu_follows_session_stage() {
        let mut session = Session::new(SharedSecretGate::new("s"));
        session.authenticate("s");
        assert_eq!(
            available_actions(&session),
            vec![Action::LoadFile, Action::Logout, Action::Quit]
        );

        let headers = ["address1", "city", "sta", "zip"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = vec![CellValue::String("x".to_string()); 4];
        session
            .load_table("a.xlsx", Table::new(headers, vec![row]))
            .unwrap();

        assert_eq!(
            available_actions(&session),
            vec![
                Action::LoadFile,
                Action::StartGeocoding,
                Action::Logout,
                Action::Quit
            ]
        );
    }

    #[test]
    fn test_clean_path_strips_quotes() {
        assert_eq!(
            clean_path("  '/tmp/my addresses.xlsx' "),
            PathBuf::from("/tmp/my addresses.xlsx")
        );
        assert_eq!(clean_path("\"a.xlsx\""), PathBuf::from("a.xlsx"));
    }
}
