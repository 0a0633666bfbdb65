//! Temperature units, their valid ranges, and conversions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnitError;

/// Offset between degrees Celsius and Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Unit tag carried by numeric temperature payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "K")]
    Kelvin,
}

impl TemperatureUnit {
    /// All supported units.
    pub const ALL: [Self; 3] = [Self::Celsius, Self::Fahrenheit, Self::Kelvin];

    /// Inclusive `(min, max)` range a sensor reading may take in this unit.
    #[must_use]
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::Celsius => (-40.0, 125.0),
            Self::Fahrenheit => (-40.0, 257.0),
            Self::Kelvin => (233.15, 398.15),
        }
    }

    /// Wire form of [`range`](Self::range): `"<min>,<max>"`.
    #[must_use]
    pub fn range_string(self) -> String {
        let (min, max) = self.range();
        format!("{min},{max}")
    }

    /// Whether `value` falls inside this unit's range.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }

    /// Express a Celsius value in this unit, rounded to two decimals.
    #[must_use]
    pub fn from_celsius(self, celsius: f64) -> f64 {
        let value = match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            Self::Kelvin => celsius + KELVIN_OFFSET,
        };
        round2(value)
    }

    /// Convert a value expressed in this unit back to Celsius (unrounded).
    #[must_use]
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            Self::Kelvin => value - KELVIN_OFFSET,
        }
    }

    /// Short wire tag (`C`, `F` or `K`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
            Self::Kelvin => "K",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(Self::Celsius),
            "F" => Ok(Self::Fahrenheit),
            "K" => Ok(Self::Kelvin),
            other => Err(UnitError {
                unit: other.to_string(),
            }),
        }
    }
}

/// Round to two decimal places, half away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_known_unit_tags() {
        assert_eq!("C".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Celsius));
        assert_eq!("F".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Fahrenheit));
        assert_eq!("K".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Kelvin));
    }

    #[test]
    fn should_reject_unknown_unit_and_echo_it() {
        let err = "c".parse::<TemperatureUnit>().unwrap_err();
        assert_eq!(err.unit, "c");
    }

    #[test]
    fn should_format_ranges_per_unit() {
        assert_eq!(TemperatureUnit::Celsius.range_string(), "-40,125");
        assert_eq!(TemperatureUnit::Fahrenheit.range_string(), "-40,257");
        assert_eq!(TemperatureUnit::Kelvin.range_string(), "233.15,398.15");
    }

    #[test]
    fn should_include_range_bounds() {
        assert!(TemperatureUnit::Celsius.contains(-40.0));
        assert!(TemperatureUnit::Celsius.contains(125.0));
        assert!(!TemperatureUnit::Celsius.contains(125.01));
        assert!(!TemperatureUnit::Kelvin.contains(233.0));
    }

    #[test]
    fn should_convert_thirty_celsius_to_fahrenheit() {
        assert!((TemperatureUnit::Fahrenheit.from_celsius(30.0) - 86.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_convert_celsius_to_kelvin_with_rounding() {
        assert!((TemperatureUnit::Kelvin.from_celsius(21.456) - 294.61).abs() < 1e-9);
    }

    #[test]
    fn should_convert_back_to_celsius() {
        let c = TemperatureUnit::Fahrenheit.to_celsius(86.0);
        assert!((c - 30.0).abs() < 1e-9);
        let c = TemperatureUnit::Kelvin.to_celsius(273.15);
        assert!(c.abs() < 1e-9);
    }

    #[test]
    fn should_serialize_as_single_letter_tag() {
        let json = serde_json::to_string(&TemperatureUnit::Kelvin).unwrap();
        assert_eq!(json, "\"K\"");
        let parsed: TemperatureUnit = serde_json::from_str("\"F\"").unwrap();
        assert_eq!(parsed, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn should_round_to_two_decimals() {
        assert!((round2(1.234_5) - 1.23).abs() < 1e-12);
        assert!((round2(-3.141_59) - -3.14).abs() < 1e-12);
    }
}
