//! Daily BEHR filenames on the BEHR file server.
//!
//! Files are named
//! `OMI_BEHR-<PROFILE_MODE>_<REGION>_<version>_<YYYYMMDD>.hdf`, where the
//! version is whatever the server currently publishes.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::dates::Days;
use crate::error::{Error, Result};

/// Display name and filename abbreviation of each region. The first entry is the default.
pub const REGIONS: &[(&str, &str)] = &[("United States", "US"), ("Hong Kong", "HK")];

pub(crate) fn region_names() -> String {
    REGIONS
        .iter()
        .map(|(name, abbr)| format!("{abbr} ({name})"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    UnitedStates,
    HongKong,
}

impl Region {
    pub fn all() -> [Region; 2] {
        [Region::UnitedStates, Region::HongKong]
    }

    fn entry(self) -> (&'static str, &'static str) {
        match self {
            Region::UnitedStates => REGIONS[0],
            Region::HongKong => REGIONS[1],
        }
    }

    pub fn name(self) -> &'static str {
        self.entry().0
    }

    /// Abbreviation used in filenames and the server's directory layout.
    pub fn abbreviation(self) -> &'static str {
        self.entry().1
    }
}

impl FromStr for Region {
    type Err = Error;

    /// Accepts the abbreviation or the display name, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Region::all()
            .into_iter()
            .find(|r| r.abbreviation().eq_ignore_ascii_case(s) || r.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownRegion(s.to_string()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Temporal resolution of the a priori NO2 profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileMode {
    #[default]
    Monthly,
    Daily,
}

impl ProfileMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileMode::Monthly => "Monthly",
            ProfileMode::Daily => "Daily",
        }
    }
}

impl FromStr for ProfileMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(ProfileMode::Monthly),
            "daily" => Ok(ProfileMode::Daily),
            _ => Err(Error::UnknownProfileMode(s.to_string())),
        }
    }
}

impl fmt::Display for ProfileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn behr_filename(
    region: Region,
    profile_mode: ProfileMode,
    version: &str,
    date: NaiveDate,
) -> String {
    format!(
        "OMI_BEHR-{}_{}_{}_{}.hdf",
        profile_mode.as_str().to_uppercase(),
        region.abbreviation().to_uppercase(),
        version,
        date.format("%Y%m%d")
    )
}

/// One filename per day of a date range, in ascending date order.
///
/// The sequence is finite, computed lazily, and can be replayed with
/// [`DailyFilenames::restart`] or by cloning before iterating.
#[derive(Debug, Clone)]
pub struct DailyFilenames {
    region: Region,
    profile_mode: ProfileMode,
    version: String,
    start: NaiveDate,
    end: NaiveDate,
    days: Days,
}

impl DailyFilenames {
    /// Builds the sequence for an already known version string.
    pub fn new(
        region: Region,
        profile_mode: ProfileMode,
        version: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            region,
            profile_mode,
            version: version.into(),
            start,
            end,
            days: Days::new(start, end),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn restart(&mut self) {
        self.days = Days::new(self.start, self.end);
    }
}

impl Iterator for DailyFilenames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let date = self.days.next()?;
        Some(behr_filename(
            self.region,
            self.profile_mode,
            &self.version,
            date,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.days.size_hint()
    }
}

impl ExactSizeIterator for DailyFilenames {}
