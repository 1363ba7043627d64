use std::fmt;

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn toggle(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Format a Celsius value in this system.
    pub fn temperature(self, temp_c: f64) -> String {
        match self {
            UnitSystem::Metric => format!("{temp_c:.1}°C"),
            UnitSystem::Imperial => format!("{:.1}°F", temperature::c2f(temp_c)),
        }
    }

    /// Format a km/h value in this system.
    pub fn speed(self, kph: f64) -> String {
        match self {
            UnitSystem::Metric => format!("{kph:.1} km/h"),
            UnitSystem::Imperial => format!("{:.1} mph", speed::kph2mph(kph)),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => f.write_str("Metric"),
            UnitSystem::Imperial => f.write_str("Imperial"),
        }
    }
}

pub mod temperature {
    pub fn c2f(temp_c: f64) -> f64 {
        temp_c * 9.0 / 5.0 + 32.0
    }

    #[test]
    fn test_temperature() {
        assert_eq!(c2f(0.0), 32.0);
        assert_eq!(c2f(100.0), 212.0);
        assert_eq!(c2f(-40.0), -40.0);
    }
}

pub mod speed {
    const MILES_PER_KM: f64 = 0.621371;

    pub fn kph2mph(kph: f64) -> f64 {
        kph * MILES_PER_KM
    }

    #[test]
    fn test_speed() {
        assert_eq!(kph2mph(0.0), 0.0);
        assert!((kph2mph(100.0) - 62.1371).abs() < 1e-9);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(UnitSystem::Metric.temperature(21.34), "21.3°C");
        assert_eq!(UnitSystem::Imperial.temperature(20.0), "68.0°F");
        assert_eq!(UnitSystem::Metric.speed(12.0), "12.0 km/h");
        assert_eq!(UnitSystem::Imperial.speed(10.0), "6.2 mph");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(UnitSystem::Metric.toggle(), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Imperial.toggle(), UnitSystem::Metric);
    }
}
