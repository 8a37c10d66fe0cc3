//! Parsing of the portal's CSV responses into [`MeasurementRecord`]s.
//!
//! A response starts with two preamble lines that are always discarded,
//! followed by headerless 21-column rows. Rows are read with a quote-aware
//! CSV reader, so a quoted `"Tag1,Tag2"` stays one field.

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Lines the portal puts ahead of the data rows.
pub const PREAMBLE_LINES: usize = 2;

/// Column names in the order the portal sends them.
pub const COLUMNS: [&str; 21] = [
    "FeederID",
    "AnimalName",
    "RFID",
    "StartTime",
    "EndTime",
    "GoodDataDuration",
    "CO2GramsPerDay",
    "CH4GramsPerDay",
    "O2GramsPerDay",
    "H2GramsPerDay",
    "H2SGramsPerDay",
    "AirflowLitersPerSec",
    "AirflowCf",
    "WindSpeedMetersPerSec",
    "WindDirDeg",
    "WindCf",
    "WasInterrupted",
    "InterruptingTags",
    "TempPipeDegreesCelsius",
    "IsPreliminary",
    "RunTime",
];

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Line {line} has {found} columns, expected 21")]
    ColumnCount { line: u64, found: usize },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One feeder visit. Every field is kept as the text the portal sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeasurementRecord {
    #[serde(rename = "FeederID")]
    pub feeder_id: String,
    pub animal_name: String,
    #[serde(rename = "RFID")]
    pub rfid: String,
    pub start_time: String,
    pub end_time: String,
    pub good_data_duration: String,
    #[serde(rename = "CO2GramsPerDay")]
    pub co2_grams_per_day: String,
    #[serde(rename = "CH4GramsPerDay")]
    pub ch4_grams_per_day: String,
    #[serde(rename = "O2GramsPerDay")]
    pub o2_grams_per_day: String,
    #[serde(rename = "H2GramsPerDay")]
    pub h2_grams_per_day: String,
    #[serde(rename = "H2SGramsPerDay")]
    pub h2s_grams_per_day: String,
    pub airflow_liters_per_sec: String,
    pub airflow_cf: String,
    pub wind_speed_meters_per_sec: String,
    pub wind_dir_deg: String,
    pub wind_cf: String,
    pub was_interrupted: String,
    pub interrupting_tags: String,
    pub temp_pipe_degrees_celsius: String,
    pub is_preliminary: String,
    pub run_time: String,
}

/// Gas flux columns that can be read back as numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gas {
    Co2,
    Ch4,
    O2,
    H2,
    H2s,
}

impl MeasurementRecord {
    /// Grams per day for `gas`, or `None` when the cell is blank or not a number.
    pub fn grams_per_day(&self, gas: Gas) -> Option<f64> {
        let cell = match gas {
            Gas::Co2 => &self.co2_grams_per_day,
            Gas::Ch4 => &self.ch4_grams_per_day,
            Gas::O2 => &self.o2_grams_per_day,
            Gas::H2 => &self.h2_grams_per_day,
            Gas::H2s => &self.h2s_grams_per_day,
        };
        cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// First lines of a raw response, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPreview<'a> {
    pub head: Vec<&'a str>,
    pub total_lines: usize,
}

pub fn preview(raw: &str, lines: usize) -> RawPreview<'_> {
    RawPreview {
        head: raw.lines().take(lines).collect(),
        total_lines: raw.lines().count(),
    }
}

/// Parses a full data response. Two or fewer lines yield no records.
#[instrument(skip(raw), fields(raw_size = raw.len()))]
pub fn parse_measurements(raw: &str) -> Result<Vec<MeasurementRecord>, ParseError> {
    let body = strip_preamble(raw);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    while reader.read_record(&mut row)? {
        let line = row
            .position()
            .map(|pos| pos.line() + PREAMBLE_LINES as u64)
            .unwrap_or_default();

        if row.len() != COLUMNS.len() {
            error!("Line {} has {} columns, expected {}", line, row.len(), COLUMNS.len());
            return Err(ParseError::ColumnCount {
                line,
                found: row.len(),
            });
        }

        records.push(row.deserialize::<MeasurementRecord>(None)?);
    }

    debug!("Parsed {} measurement records", records.len());
    Ok(records)
}

fn strip_preamble(raw: &str) -> &str {
    let mut rest = raw;
    for _ in 0..PREAMBLE_LINES {
        match rest.find('\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return "",
        }
    }
    rest
}
