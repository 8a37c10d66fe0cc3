use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument};

use crate::auth::{Authenticator, Credentials};
use crate::config::Config;
use crate::fetch_error::FetchError;
use crate::fetcher::EmissionsFetcher;
use crate::http::build_client;
use crate::parser::{self, ParseError};
use crate::profile::ExportProfile;
use crate::query::{DataQuery, QueryError};
use crate::writer::{self, WriteError};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid request parameters: {0}")]
    Query(#[from] QueryError),

    #[error("Portal request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Could not parse portal response: {0}")]
    Parse(#[from] ParseError),

    #[error("Could not write export: {0}")]
    Write(#[from] WriteError),
}

/// Outcome of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub records: usize,
    pub raw_lines: usize,
}

/// Runs login, fetch, parse and write in sequence for one export.
#[derive(Clone)]
pub struct ExportService {
    authenticator: Authenticator,
    fetcher: EmissionsFetcher,
    profile: ExportProfile,
    preview_lines: usize,
}

impl ExportService {
    pub fn new(config: &Config, profile: ExportProfile) -> Result<Self, FetchError> {
        let client = build_client(config)?;
        Ok(Self {
            authenticator: Authenticator::new(client.clone(), config.login_url()),
            fetcher: EmissionsFetcher::new(client, config.emissions_url(), profile),
            profile,
            preview_lines: 5,
        })
    }

    /// Number of raw response lines logged before parsing.
    pub fn with_preview_lines(mut self, lines: usize) -> Self {
        self.preview_lines = lines;
        self
    }

    #[instrument(skip(self, credentials, query), fields(profile = %self.profile, dir = %output_dir.display()))]
    pub async fn run(
        &self,
        credentials: &Credentials,
        query: &DataQuery,
        output_dir: &Path,
        label: Option<&str>,
    ) -> Result<ExportSummary, ExportError> {
        // Fail on a bad label before touching the network
        writer::output_file_name(label, self.profile)?;

        let token = self.authenticator.login(credentials).await?;
        info!("Logged in as {}", credentials.user);

        let raw = self.fetcher.fetch_raw(&token, query).await?;

        let preview = parser::preview(&raw, self.preview_lines);
        for line in &preview.head {
            info!("raw> {}", line);
        }
        info!("Response has {} lines", preview.total_lines);

        let records = parser::parse_measurements(&raw)?;
        let path = writer::write_measurements(&records, output_dir, label, self.profile)?;

        Ok(ExportSummary {
            path,
            records: records.len(),
            raw_lines: preview.total_lines,
        })
    }
}
