//! Synthetic weather data.
//!
//! Every region gets one record per day for the trailing [`DAYS`] days,
//! each field drawn independently and uniformly from its range. The full
//! set is generated once per process and served from memory afterwards.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::info;

use crate::weather::{Region, WeatherRecord};

pub const DAYS: i64 = 30;

pub const TEMPERATURE: RangeInclusive<f64> = 15.0..=35.0;
pub const HUMIDITY: RangeInclusive<u32> = 30..=90;
pub const WIND_SPEED: RangeInclusive<f64> = 0.0..=30.0;
pub const AIR_QUALITY_INDEX: RangeInclusive<u32> = 20..=150;
pub const PRECIPITATION: RangeInclusive<f64> = 0.0..=100.0;

static SAMPLE: OnceLock<Vec<WeatherRecord>> = OnceLock::new();

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Generate `DAYS * 8` records ending at `today`, newest day first.
pub fn generate_sample_data<R: RngExt + ?Sized>(
    today: NaiveDate,
    rng: &mut R,
) -> Vec<WeatherRecord> {
    let mut data = Vec::with_capacity(DAYS as usize * Region::ALL.len());
    for i in 0..DAYS {
        let date = today - Duration::days(i);
        for region in Region::ALL {
            data.push(WeatherRecord {
                date,
                region,
                temperature: round_to(rng.random_range(TEMPERATURE), 1),
                humidity: rng.random_range(HUMIDITY),
                wind_speed: round_to(rng.random_range(WIND_SPEED), 1),
                air_quality_index: rng.random_range(AIR_QUALITY_INDEX),
                precipitation: round_to(rng.random_range(PRECIPITATION), 2),
            });
        }
    }
    data
}

/// Process-wide sample set. Only the first call generates; later calls get
/// the same records whatever arguments they pass.
pub fn sample_data(today: NaiveDate, seed: Option<u64>) -> &'static [WeatherRecord] {
    SAMPLE.get_or_init(|| {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        info!(seed, %today, "generating sample data");
        generate_sample_data(today, &mut StdRng::seed_from_u64(seed))
    })
}

/// Dates the user may pick. The first day predates the generated data.
pub fn window(today: NaiveDate) -> RangeInclusive<NaiveDate> {
    (today - Duration::days(DAYS))..=today
}
