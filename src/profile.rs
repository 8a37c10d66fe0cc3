use std::fmt;

/// Naming and end-date conventions of the two historical export variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportProfile {
    /// `{label}_GFemissions.csv`, end timestamp sent as given
    #[default]
    Emissions,
    /// `{label}_GFdata.csv`, date-only end timestamp gets a noon time suffix
    #[value(name = "gfdata")]
    GfData,
}

impl ExportProfile {
    pub fn file_suffix(self) -> &'static str {
        match self {
            ExportProfile::Emissions => "GFemissions",
            ExportProfile::GfData => "GFdata",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            ExportProfile::Emissions => "emissions",
            ExportProfile::GfData => "GFdata",
        }
    }

    /// Time appended to a date-only end timestamp, if this profile uses one.
    pub fn end_date_time_suffix(self) -> Option<&'static str> {
        match self {
            ExportProfile::Emissions => None,
            ExportProfile::GfData => Some("12:00:00"),
        }
    }
}

impl fmt::Display for ExportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportProfile::Emissions => write!(f, "emissions"),
            ExportProfile::GfData => write!(f, "gfdata"),
        }
    }
}
