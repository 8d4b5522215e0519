//! Temperature Units
//!
//! The thermocouple amplifier reports in whichever unit the device is set
//! to, so conversions are only needed for values configured in Celsius
//! (the stabilization band, for instance).
//! - Absolute temperatures: °C → °F with offset
//! - Temperature differences: °C → °F without offset

use serde::{Deserialize, Serialize};

/// Convert an absolute Celsius temperature to Fahrenheit
pub fn celsius_to_fahrenheit_absolute(c: f64) -> f64 {
    c * 1.8 + 32.0
}

/// Convert a Celsius temperature difference to a Fahrenheit difference
pub fn celsius_to_fahrenheit_relative(c: f64) -> f64 {
    c * 1.8
}

/// Convert an absolute Fahrenheit temperature to Celsius
pub fn fahrenheit_to_celsius_absolute(f: f64) -> f64 {
    (f - 32.0) / 1.8
}

/// Unit system the device displays and records in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempUnits {
    /// Degrees Celsius
    Celsius,
    /// Degrees Fahrenheit
    #[default]
    Fahrenheit,
}

impl TempUnits {
    /// Express an absolute Celsius temperature in this unit
    pub fn absolute_from_celsius(self, c: f64) -> f64 {
        match self {
            TempUnits::Celsius => c,
            TempUnits::Fahrenheit => celsius_to_fahrenheit_absolute(c),
        }
    }

    /// Express a Celsius temperature difference in this unit
    pub fn delta_from_celsius(self, c: f64) -> f64 {
        match self {
            TempUnits::Celsius => c,
            TempUnits::Fahrenheit => celsius_to_fahrenheit_relative(c),
        }
    }

    /// Single-letter symbol shown next to values
    pub fn symbol(self) -> &'static str {
        match self {
            TempUnits::Celsius => "C",
            TempUnits::Fahrenheit => "F",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_conversion() {
        assert!((celsius_to_fahrenheit_absolute(0.0) - 32.0).abs() < 0.01);
        assert!((celsius_to_fahrenheit_absolute(100.0) - 212.0).abs() < 0.01);
        assert!((fahrenheit_to_celsius_absolute(212.0) - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_relative_conversion_has_no_offset() {
        assert!((celsius_to_fahrenheit_relative(0.0)).abs() < 0.0001);
        assert!((celsius_to_fahrenheit_relative(0.25) - 0.45).abs() < 0.0001);
    }

    #[test]
    fn test_units_dispatch() {
        assert_eq!(TempUnits::Celsius.delta_from_celsius(0.25), 0.25);
        assert!((TempUnits::Fahrenheit.delta_from_celsius(0.25) - 0.45).abs() < 0.0001);
        assert!((TempUnits::Fahrenheit.absolute_from_celsius(-40.0) + 40.0).abs() < 0.0001);
        assert_eq!(TempUnits::Celsius.symbol(), "C");
        assert_eq!(TempUnits::default(), TempUnits::Fahrenheit);
    }
}
