//! Date/region filtering, summary means and the data loading boundary.

use std::fmt;

use chrono::NaiveDate;
use tracing::{error, warn};

use crate::error::DashError;
use crate::weather::{Region, WeatherRecord};

pub const ALL_REGIONS: &str = "All Regions";
pub const NO_DATA: &str = "No data found for the selected filters.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionFilter {
    #[default]
    All,
    Only(Region),
}

impl RegionFilter {
    /// Selector entries: "All Regions" followed by the sorted regions.
    pub fn choices() -> Vec<RegionFilter> {
        std::iter::once(RegionFilter::All)
            .chain(Region::sorted().into_iter().map(RegionFilter::Only))
            .collect()
    }

    pub fn matches(&self, region: Region) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(r) => *r == region,
        }
    }

    /// Step through [`RegionFilter::choices`], wrapping at both ends.
    pub fn cycle(self, forward: bool) -> RegionFilter {
        let choices = Self::choices();
        let idx = choices.iter().position(|c| *c == self).unwrap_or(0);
        let len = choices.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        choices[next]
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => f.write_str(ALL_REGIONS),
            RegionFilter::Only(r) => f.write_str(r.name()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Filter {
    pub date: NaiveDate,
    pub region: RegionFilter,
}

impl Filter {
    pub fn apply(&self, data: &[WeatherRecord]) -> Vec<WeatherRecord> {
        data.iter()
            .filter(|r| r.date == self.date && self.region.matches(r.region))
            .cloned()
            .collect()
    }
}

/// Means shown on the summary cards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub air_quality_index: f64,
}

impl Summary {
    pub fn of(records: &[WeatherRecord]) -> Option<Summary> {
        if records.is_empty() {
            return None;
        }
        let n = records.len() as f64;
        let mean = |f: fn(&WeatherRecord) -> f64| records.iter().map(f).sum::<f64>() / n;
        Some(Summary {
            temperature: mean(|r| r.temperature),
            humidity: mean(|r| f64::from(r.humidity)),
            wind_speed: mean(|r| r.wind_speed),
            air_quality_index: mean(|r| f64::from(r.air_quality_index)),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

/// Outcome of one load: the filtered rows plus anything worth telling the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Loaded {
    pub records: Vec<WeatherRecord>,
    pub notice: Option<Notice>,
}

impl Loaded {
    pub fn summary(&self) -> Option<Summary> {
        Summary::of(&self.records)
    }
}

/// Fetch and filter. Failures end up in [`Loaded::notice`] with no rows;
/// nothing is propagated to the caller.
pub fn load_weather_data<'a, F>(source: F, filter: &Filter) -> Loaded
where
    F: FnOnce() -> Result<&'a [WeatherRecord], DashError>,
{
    let data = match source() {
        Ok(data) => data,
        Err(e) => {
            error!(error = %e, "failed to load weather data");
            return Loaded {
                records: Vec::new(),
                notice: Some(Notice::Error(format!("An error occurred: {e}"))),
            };
        }
    };

    let records = filter.apply(data);
    if records.is_empty() {
        warn!(date = %filter.date, region = %filter.region, "no records match filter");
        return Loaded {
            records,
            notice: Some(Notice::Warning(NO_DATA.to_string())),
        };
    }
    Loaded {
        records,
        notice: None,
    }
}
