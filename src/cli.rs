use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

use crate::app::{Settings, DEFAULT_INTERVAL, MAX_INTERVAL, MIN_INTERVAL};
use crate::data;
use crate::error::{DashError, Result};
use crate::filter::RegionFilter;
use crate::units::UnitSystem;
use crate::weather::Region;

const ABOUT: &str = "Global weather intelligence dashboard";

const LONG_ABOUT: &str = "
Terminal dashboard over synthetic weather metrics for eight world cities.

A fresh data set covering the last 30 days is generated on start-up and kept for the whole
session. Pick a date and region to see summary cards, charts and the raw rows, and export the
current selection as CSV. Pass --seed to get the same data set on every run.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| DashError::InvalidDate {
        input: s.to_string(),
    })
}

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(long, value_parser = parse_date, help = "Date to show, YYYY-MM-DD (default: today)")]
    pub date: Option<NaiveDate>,

    #[arg(long, help = "Region to show (default: All Regions)")]
    pub region: Option<Region>,

    #[arg(long, help = "Re-render periodically")]
    pub auto_refresh: bool,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_INTERVAL,
        value_parser = clap::value_parser!(u64).range(MIN_INTERVAL..=MAX_INTERVAL),
        help = "Auto refresh interval in seconds"
    )]
    pub refresh_interval: u64,

    #[arg(long, value_enum, default_value_t = UnitSystem::Metric, help = "Units for the summary cards")]
    pub units: UnitSystem,

    #[arg(long, env = "WXDASH_SEED", help = "Seed for reproducible sample data")]
    pub seed: Option<u64>,

    #[arg(long, default_value = ".", help = "Directory for CSV exports ('-' writes --export output to stdout)")]
    pub out_dir: PathBuf,

    #[arg(long, help = "Write the selection as CSV and exit without starting the dashboard")]
    pub export: bool,

    #[arg(long, env = "WXDASH_LOG", help = "Write logs to this file")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Resolve the options against `today`, rejecting dates outside the window.
    pub fn settings(&self, today: NaiveDate) -> Result<Settings> {
        let date = self.date.unwrap_or(today);
        let window = data::window(today);
        if !window.contains(&date) {
            return Err(DashError::OutOfRange {
                date,
                first: *window.start(),
                last: *window.end(),
            });
        }
        Ok(Settings {
            today,
            date,
            region: self.region.map_or(RegionFilter::All, RegionFilter::Only),
            auto_refresh: self.auto_refresh,
            refresh_interval: self.refresh_interval,
            units: self.units,
            out_dir: self.out_dir.clone(),
        })
    }
}
