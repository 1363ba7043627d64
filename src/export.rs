//! CSV export of the filtered rows.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::{DashError, Result};
use crate::filter::{load_weather_data, Filter, Notice};
use crate::weather::WeatherRecord;

/// What a one-shot export produced.
#[derive(Debug, PartialEq)]
pub enum Exported {
    File(PathBuf),
    Stream,
    /// Nothing matched the filter; holds the warning for the user.
    Nothing(String),
}

pub fn file_name(date: NaiveDate) -> String {
    format!("weather_data_{}.csv", date.format("%Y-%m-%d"))
}

/// Write `records` with a header row to `writer`.
pub fn write_records<W: Write>(writer: W, records: &[WeatherRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `weather_data_<date>.csv` into `dir` and return its path.
pub fn write_csv(dir: &Path, date: NaiveDate, records: &[WeatherRecord]) -> Result<PathBuf> {
    let path = dir.join(file_name(date));
    write_records(File::create(&path)?, records)?;
    info!(path = %path.display(), rows = records.len(), "exported csv");
    Ok(path)
}

/// Load the selection through `source` and export it once.
///
/// An `out_dir` of `-` sends the CSV to `out` instead of a file. A failing
/// source is returned as [`DashError::Load`].
pub fn export_selection<'a, F, W>(
    source: F,
    filter: &Filter,
    out_dir: &Path,
    out: W,
) -> Result<Exported>
where
    F: FnOnce() -> Result<&'a [WeatherRecord]>,
    W: Write,
{
    let loaded = load_weather_data(source, filter);
    match loaded.notice {
        Some(Notice::Error(message)) => Err(DashError::Load { message }),
        Some(Notice::Warning(message)) => Ok(Exported::Nothing(message)),
        None if out_dir.as_os_str() == "-" => {
            write_records(out, &loaded.records)?;
            Ok(Exported::Stream)
        }
        None => write_csv(out_dir, filter.date, &loaded.records).map(Exported::File),
    }
}
