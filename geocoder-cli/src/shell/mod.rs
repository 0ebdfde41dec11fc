//! Interaction session: access gate, file intake, processing and export
//!
//! A [`Session`] is created per user session and owned by whatever front end
//! drives it. Nothing here is global, so two sessions never share state.
//!
//! ```text
//! Unauthenticated ──authenticate──▶ Authenticated(Idle)
//!        ▲                               │ load file
//!        │ logout                        ▼
//!        └──────────────── FileLoaded ─▶ Processing ─▶ ResultsAvailable
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::api::Geocoder;
use crate::auth::AccessGate;
use crate::config::{ConfigError, GeocoderConfig};
use crate::geocode::{self, AddressSheet, BatchResult, MissingColumns};
use crate::workbook::{self, CellValue, Table};

/// Rows shown before processing starts
pub const PREVIEW_ROWS: usize = 10;

/// MIME type of the output workbook
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Why a session action was refused
#[derive(Debug)]
pub enum ShellError {
    /// Action needs a successful access check first
    NotAuthenticated,
    /// Upload lacks required columns
    MissingColumns(MissingColumns),
    /// Upload could not be read as a workbook
    UnreadableFile { name: String, reason: String },
    /// Processing blocked by configuration
    Configuration(ConfigError),
    /// Processing requested with no file loaded
    NoFileLoaded,
    /// Export requested before any batch finished
    NoResults,
    /// Output workbook could not be built
    Export(String),
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::NotAuthenticated => {
                write!(f, "Please enter the access secret to use the geocoding service.")
            }
            ShellError::MissingColumns(missing) => write!(f, "{}", missing),
            ShellError::UnreadableFile { name, reason } => {
                write!(f, "Error processing file {}: {}", name, reason)
            }
            ShellError::Configuration(e) => write!(f, "{}", e),
            ShellError::NoFileLoaded => write!(f, "No file loaded. Choose an Excel file first."),
            ShellError::NoResults => write!(f, "No results yet. Start geocoding first."),
            ShellError::Export(reason) => write!(f, "Failed to build output file: {}", reason),
        }
    }
}

impl std::error::Error for ShellError {}

/// A validated upload
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    pub sheet: AddressSheet,
}

/// Progress inside an authenticated session
#[derive(Debug, Clone)]
pub enum Stage {
    Idle,
    FileLoaded(LoadedFile),
    Processing,
    ResultsAvailable { file: LoadedFile, result: BatchResult },
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(Stage),
}

/// Downloadable output of a finished batch
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    /// Write the artifact into `dir` under its own file name
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;

        log::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// `geocoded_addresses_<YYYYMMDD_HHMMSS>.xlsx`
pub fn output_file_name(timestamp: NaiveDateTime) -> String {
    format!(
        "geocoded_addresses_{}.xlsx",
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// One user's session
pub struct Session<A: AccessGate> {
    gate: A,
    state: SessionState,
}

impl<A: AccessGate> Session<A> {
    pub fn new(gate: A) -> Self {
        Self {
            gate,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// Check an access attempt. A failed attempt changes nothing and may be
    /// retried without limit.
    pub fn authenticate(&mut self, attempt: &str) -> bool {
        if !self.gate.check(attempt) {
            log::warn!("Rejected access attempt");
            return false;
        }

        if !self.is_authenticated() {
            log::info!("Session authenticated");
            self.state = SessionState::Authenticated(Stage::Idle);
        }
        true
    }

    /// Back to unauthenticated; any loaded file and results are dropped
    pub fn logout(&mut self) {
        log::info!("Session logged out");
        self.state = SessionState::Unauthenticated;
    }

    /// Read and validate a workbook from disk. Returns the number of rows.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ShellError> {
        self.stage()?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let table = workbook::read_table(path).map_err(|e| ShellError::UnreadableFile {
            name: name.clone(),
            reason: format!("{:#}", e),
        })?;

        self.load_table(name, table)
    }

    /// Validate an already-parsed table. On failure the session is left as
    /// it was.
    pub fn load_table(&mut self, name: impl Into<String>, table: Table) -> Result<usize, ShellError> {
        let stage = self.stage_mut()?;
        let name = name.into();

        let sheet = AddressSheet::try_from_table(table).map_err(|missing| {
            log::warn!("Rejected upload '{}': {}", name, missing);
            ShellError::MissingColumns(missing)
        })?;

        let rows = sheet.len();
        log::info!("Loaded '{}' with {} addresses", name, rows);
        *stage = Stage::FileLoaded(LoadedFile { name, sheet });

        Ok(rows)
    }

    /// The current upload, if any
    pub fn loaded_file(&self) -> Option<&LoadedFile> {
        match &self.state {
            SessionState::Authenticated(Stage::FileLoaded(file))
            | SessionState::Authenticated(Stage::ResultsAvailable { file, .. }) => Some(file),
            _ => None,
        }
    }

    /// First [`PREVIEW_ROWS`] rows of the current upload
    pub fn preview(&self) -> Option<&[Vec<CellValue>]> {
        self.loaded_file()
            .map(|file| file.sheet.table().head(PREVIEW_ROWS))
    }

    /// Results of the last finished batch
    pub fn results(&self) -> Option<&BatchResult> {
        match &self.state {
            SessionState::Authenticated(Stage::ResultsAvailable { result, .. }) => Some(result),
            _ => None,
        }
    }

    /// Geocode the loaded file.
    ///
    /// The API key is checked before anything starts; `connect` builds the
    /// geocoder from it.
    pub async fn start_processing<G, C, F>(
        &mut self,
        config: &GeocoderConfig,
        connect: C,
        on_progress: F,
    ) -> Result<&BatchResult, ShellError>
    where
        G: Geocoder,
        C: FnOnce(&str) -> G,
        F: FnMut(usize, usize),
    {
        self.stage()?;
        if self.loaded_file().is_none() {
            return Err(ShellError::NoFileLoaded);
        }

        let api_key = config.require_api_key().map_err(ShellError::Configuration)?;
        let geocoder = connect(api_key);

        let stage = self.stage_mut()?;
        let file = match std::mem::replace(stage, Stage::Processing) {
            Stage::FileLoaded(file) | Stage::ResultsAvailable { file, .. } => file,
            other => {
                *stage = other;
                return Err(ShellError::NoFileLoaded);
            }
        };

        let result = geocode::process(&geocoder, &file.sheet, on_progress).await;
        *stage = Stage::ResultsAvailable { file, result };

        match &*stage {
            Stage::ResultsAvailable { result, .. } => Ok(result),
            _ => Err(ShellError::NoResults),
        }
    }

    /// Build the downloadable workbook for the last batch
    pub fn export(&self, timestamp: NaiveDateTime) -> Result<OutputArtifact, ShellError> {
        self.stage()?;
        let result = self.results().ok_or(ShellError::NoResults)?;

        let bytes = workbook::write_batch_result(result)
            .map_err(|e| ShellError::Export(format!("{:#}", e)))?;

        Ok(OutputArtifact {
            file_name: output_file_name(timestamp),
            mime_type: XLSX_MIME,
            bytes,
        })
    }

    fn stage(&self) -> Result<&Stage, ShellError> {
        match &self.state {
            SessionState::Authenticated(stage) => Ok(stage),
            SessionState::Unauthenticated => Err(ShellError::NotAuthenticated),
        }
    }

    fn stage_mut(&mut self) -> Result<&mut Stage, ShellError> {
        match &mut self.state {
            SessionState::Authenticated(stage) => Ok(stage),
            SessionState::Unauthenticated => Err(ShellError::NotAuthenticated),
        }
    }
}
