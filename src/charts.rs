//! Chart data for the analysis tabs.
//!
//! Everything here is plain data: bar values, scatter series, axis bounds and
//! colours. `ui` turns these into ratatui widgets.

use ratatui::style::Color;

use crate::weather::{Region, WeatherRecord};

#[derive(Clone, Debug, PartialEq)]
pub struct BarDatum {
    pub label: &'static str,
    pub value: f64,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarPanel {
    pub title: &'static str,
    pub unit: &'static str,
    pub bars: Vec<BarDatum>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterSeries {
    pub name: String,
    pub color: Color,
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterPanel {
    pub title: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub series: Vec<ScatterSeries>,
}

pub mod palette {
    use ratatui::style::Color;

    type Stop = (u8, u8, u8);

    const RD_YL_BU_R: [Stop; 5] = [
        (49, 54, 149),
        (116, 173, 209),
        (255, 255, 191),
        (244, 109, 67),
        (165, 0, 38),
    ];

    const VIRIDIS: [Stop; 5] = [
        (68, 1, 84),
        (59, 82, 139),
        (33, 145, 140),
        (94, 201, 98),
        (253, 231, 37),
    ];

    const RD_YL_GN_R: [Stop; 5] = [
        (0, 104, 55),
        (102, 189, 99),
        (255, 255, 191),
        (244, 109, 67),
        (165, 0, 38),
    ];

    const REGIONS: [Color; 8] = [
        Color::Rgb(99, 110, 250),
        Color::Rgb(239, 85, 59),
        Color::Rgb(0, 204, 150),
        Color::Rgb(171, 99, 250),
        Color::Rgb(255, 161, 90),
        Color::Rgb(25, 211, 243),
        Color::Rgb(255, 102, 146),
        Color::Rgb(182, 232, 128),
    ];

    fn interpolate(stops: &[Stop], t: f64) -> Color {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - i as f64;
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
        let (a, b) = (stops[i], stops[i + 1]);
        Color::Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Blue (cold) through yellow to red (hot).
    pub fn rd_yl_bu_r(t: f64) -> Color {
        interpolate(&RD_YL_BU_R, t)
    }

    pub fn viridis(t: f64) -> Color {
        interpolate(&VIRIDIS, t)
    }

    /// Green (good) through yellow to red (bad).
    pub fn rd_yl_gn_r(t: f64) -> Color {
        interpolate(&RD_YL_GN_R, t)
    }

    pub fn region(region: super::Region) -> Color {
        let idx = super::Region::ALL
            .iter()
            .position(|r| *r == region)
            .unwrap_or(0);
        REGIONS[idx]
    }

    #[test]
    fn test_scale_endpoints() {
        assert_eq!(rd_yl_bu_r(0.0), Color::Rgb(49, 54, 149));
        assert_eq!(rd_yl_bu_r(1.0), Color::Rgb(165, 0, 38));
        assert_eq!(rd_yl_bu_r(0.5), Color::Rgb(255, 255, 191));
        assert_eq!(viridis(7.0), Color::Rgb(253, 231, 37));
        assert_eq!(rd_yl_gn_r(-1.0), Color::Rgb(0, 104, 55));
    }
}

/// Position of `value` within `[min, max]`; the middle when the range is flat.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (value - min) / (max - min)
    } else {
        0.5
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Data extent padded by 10% of the span (at least 1.0 each side).
pub fn axis_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    match extent(values) {
        Some((lo, hi)) => {
            let pad = ((hi - lo) * 0.1).max(1.0);
            [lo - pad, hi + pad]
        }
        None => [0.0, 1.0],
    }
}

fn bar_panel(
    records: &[WeatherRecord],
    title: &'static str,
    unit: &'static str,
    field: fn(&WeatherRecord) -> f64,
    scale: fn(f64) -> Color,
) -> BarPanel {
    let (lo, hi) = extent(records.iter().map(field)).unwrap_or((0.0, 0.0));
    let bars = records
        .iter()
        .map(|r| {
            let value = field(r);
            BarDatum {
                label: r.region.name(),
                value,
                color: scale(normalize(value, lo, hi)),
            }
        })
        .collect();
    BarPanel { title, unit, bars }
}

pub fn temperature_bars(records: &[WeatherRecord]) -> BarPanel {
    bar_panel(
        records,
        "Temperature Distribution by Region",
        "°C",
        |r| r.temperature,
        palette::rd_yl_bu_r,
    )
}

pub fn wind_bars(records: &[WeatherRecord]) -> BarPanel {
    bar_panel(
        records,
        "Wind Speed by Region",
        "km/h",
        |r| r.wind_speed,
        palette::viridis,
    )
}

/// One series per region. A terminal cannot size markers, so wind speed
/// rides along in the legend instead.
pub fn temperature_vs_humidity(records: &[WeatherRecord]) -> ScatterPanel {
    let series = records
        .iter()
        .map(|r| ScatterSeries {
            name: format!("{} ({:.1} km/h)", r.region, r.wind_speed),
            color: palette::region(r.region),
            points: vec![(r.temperature, f64::from(r.humidity))],
        })
        .collect();
    ScatterPanel {
        title: "Temperature vs Humidity Analysis",
        x_title: "temperature",
        y_title: "humidity",
        x_bounds: axis_bounds(records.iter().map(|r| r.temperature)),
        y_bounds: axis_bounds(records.iter().map(|r| f64::from(r.humidity))),
        series,
    }
}

/// AQI against region position, coloured green (clean) to red.
pub fn air_quality(records: &[WeatherRecord]) -> ScatterPanel {
    let aqi = |r: &WeatherRecord| f64::from(r.air_quality_index);
    let (lo, hi) = extent(records.iter().map(aqi)).unwrap_or((0.0, 0.0));
    let series = records
        .iter()
        .enumerate()
        .map(|(i, r)| ScatterSeries {
            name: format!(
                "{} {} ({:.1}°C)",
                r.region, r.air_quality_index, r.temperature
            ),
            color: palette::rd_yl_gn_r(normalize(aqi(r), lo, hi)),
            points: vec![(i as f64, aqi(r))],
        })
        .collect();
    ScatterPanel {
        title: "Air Quality Index by Region",
        x_title: "region",
        y_title: "air_quality_index",
        x_bounds: [-0.5, records.len().max(1) as f64 - 0.5],
        y_bounds: axis_bounds(records.iter().map(aqi)),
        series,
    }
}
