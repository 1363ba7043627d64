use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DashError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "New York")]
    NewYork,
    London,
    Tokyo,
    Mumbai,
    Sydney,
    Paris,
    Dubai,
    Singapore,
}

impl Region {
    /// Generation order.
    pub const ALL: [Region; 8] = [
        Region::NewYork,
        Region::London,
        Region::Tokyo,
        Region::Mumbai,
        Region::Sydney,
        Region::Paris,
        Region::Dubai,
        Region::Singapore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::NewYork => "New York",
            Region::London => "London",
            Region::Tokyo => "Tokyo",
            Region::Mumbai => "Mumbai",
            Region::Sydney => "Sydney",
            Region::Paris => "Paris",
            Region::Dubai => "Dubai",
            Region::Singapore => "Singapore",
        }
    }

    /// Regions ordered by display name, as listed in the region selector.
    pub fn sorted() -> [Region; 8] {
        let mut regions = Self::ALL;
        regions.sort_by_key(|r| r.name());
        regions
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DashError::UnknownRegion {
                name: s.to_string(),
            })
    }
}

/// One synthetic observation for a day and region. Values are metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub region: Region,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: u32,
    /// km/h.
    pub wind_speed: f64,
    pub air_quality_index: u32,
    /// Percent chance.
    pub precipitation: f64,
}
