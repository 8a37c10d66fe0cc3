//! Data request parameters: dataset kind, feeder IDs and the time window.
//!
//! Everything here is validated when constructed so a malformed date or
//! feeder list is rejected before the portal is contacted.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::profile::ExportProfile;

const US_DATE_FORMAT: &str = "%m/%d/%Y";
const PORTAL_DATETIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("Date '{0}' is not in mm/dd/yyyy or YYYY-MM-DD_HH:MM:SS format")]
    InvalidDate(String),

    #[error("No feeder IDs given")]
    NoFeederIds,

    #[error("Blank entry in feeder ID list '{0}'")]
    BlankFeederId(String),

    #[error("Invalid feeder ID '{0}'")]
    InvalidFeederId(String),

    #[error("Dataset kind must be a non-empty name of letters, digits, '_' or '-', got '{0}'")]
    InvalidDataset(String),

    #[error("End {end} is before start {start}")]
    EndBeforeStart { start: String, end: String },
}

/// Value of the portal's `d` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatasetKind {
    #[default]
    Visits,
    Meas,
    Other(String),
}

impl DatasetKind {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetKind::Visits => "visits",
            DatasetKind::Meas => "meas",
            DatasetKind::Other(name) => name,
        }
    }
}

impl FromStr for DatasetKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name {
            "visits" => Ok(DatasetKind::Visits),
            "meas" => Ok(DatasetKind::Meas),
            _ if !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
            {
                Ok(DatasetKind::Other(name.to_string()))
            }
            _ => Err(QueryError::InvalidDataset(s.to_string())),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or more feeder IDs, kept in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeederIds(Vec<String>);

impl FeederIds {
    pub fn new<I, S>(ids: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();
        let mut validated = Vec::with_capacity(ids.len());
        for id in &ids {
            let trimmed = id.trim();
            if trimmed.is_empty() {
                return Err(QueryError::BlankFeederId(ids.join(",")));
            }
            if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(QueryError::InvalidFeederId(trimmed.to_string()));
            }
            validated.push(trimmed.to_string());
        }
        if validated.is_empty() {
            return Err(QueryError::NoFeederIds);
        }
        Ok(FeederIds(validated))
    }

    /// Comma-joined form sent as `fids`, e.g. `453,454,560`.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for FeederIds {
    type Err = QueryError;

    /// Parses `"453, 454, 560"` style lists.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(QueryError::NoFeederIds);
        }
        FeederIds::new(s.split(','))
    }
}

/// A start or end timestamp in one of the two formats the portal accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalTimestamp {
    /// `mm/dd/yyyy`
    Date(NaiveDate),
    /// `YYYY-MM-DD_HH:MM:SS`
    DateTime(NaiveDateTime),
}

impl PortalTimestamp {
    pub fn today() -> Self {
        PortalTimestamp::Date(Local::now().date_naive())
    }

    /// Instant the timestamp denotes; a bare date means midnight.
    pub fn instant(&self) -> NaiveDateTime {
        match self {
            PortalTimestamp::Date(date) => date.and_time(NaiveTime::MIN),
            PortalTimestamp::DateTime(datetime) => *datetime,
        }
    }

    pub fn to_query_value(&self) -> String {
        match self {
            PortalTimestamp::Date(date) => date.format(US_DATE_FORMAT).to_string(),
            PortalTimestamp::DateTime(datetime) => {
                datetime.format(PORTAL_DATETIME_FORMAT).to_string()
            }
        }
    }
}

impl FromStr for PortalTimestamp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, US_DATE_FORMAT) {
            return Ok(PortalTimestamp::Date(date));
        }
        NaiveDateTime::parse_from_str(trimmed, PORTAL_DATETIME_FORMAT)
            .map(PortalTimestamp::DateTime)
            .map_err(|_| QueryError::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for PortalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

/// Fully validated parameters for one data request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQuery {
    pub dataset: DatasetKind,
    pub feeders: FeederIds,
    pub start: PortalTimestamp,
    pub end: PortalTimestamp,
}

impl DataQuery {
    pub fn new(
        dataset: DatasetKind,
        feeders: FeederIds,
        start: PortalTimestamp,
        end: PortalTimestamp,
    ) -> Result<Self, QueryError> {
        if end.instant() < start.instant() {
            return Err(QueryError::EndBeforeStart {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DataQuery {
            dataset,
            feeders,
            start,
            end,
        })
    }

    /// Query string pairs for the data endpoint, in the order the portal documents them.
    pub fn query_pairs(&self, profile: ExportProfile) -> Vec<(&'static str, String)> {
        let end = match (self.end, profile.end_date_time_suffix()) {
            (PortalTimestamp::Date(_), Some(time)) => {
                format!("{} {}", self.end.to_query_value(), time)
            }
            _ => self.end.to_query_value(),
        };

        vec![
            ("d", self.dataset.as_str().to_string()),
            ("fids", self.feeders.joined()),
            ("st", self.start.to_query_value()),
            ("et", end),
        ]
    }
}
