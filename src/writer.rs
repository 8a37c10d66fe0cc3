use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use thiserror::Error;
use tracing::{debug, info};

use crate::parser::{MeasurementRecord, COLUMNS};
use crate::profile::ExportProfile;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Label '{0}' must not contain path separators or be '.' or '..'")]
    InvalidLabel(String),

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// File name for an export, e.g. `McFadden_Lab_GFemissions.csv`.
/// A missing or blank label falls back to the profile default.
pub fn output_file_name(label: Option<&str>, profile: ExportProfile) -> Result<String, WriteError> {
    let label = match label.map(str::trim) {
        Some(label) if !label.is_empty() => label,
        _ => profile.default_label(),
    };
    if label.contains(['/', '\\']) || label == "." || label == ".." {
        return Err(WriteError::InvalidLabel(label.to_string()));
    }
    Ok(format!("{}_{}.csv", label, profile.file_suffix()))
}

/// Renders the header row plus one row per record.
pub fn render_csv(records: &[MeasurementRecord]) -> Result<Vec<u8>, WriteError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(vec![]);
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.into_inner()
        .map_err(|e| WriteError::Csv(csv::Error::from(e.into_error())))
}

/// Writes `records` into `dir`, creating it if needed and replacing any
/// existing file of the same name. Returns the path written.
pub fn write_measurements(
    records: &[MeasurementRecord],
    dir: &Path,
    label: Option<&str>,
    profile: ExportProfile,
) -> Result<PathBuf, WriteError> {
    let path = dir.join(output_file_name(label, profile)?);

    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let data = render_csv(records)?;
    fs::write(&path, &data).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    debug!("Wrote {} bytes", data.len());
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}
