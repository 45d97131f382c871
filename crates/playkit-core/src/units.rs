//! Measurement units for catalog geometry.
//!
//! Catalog parts are published with dimensions in feet or meters; the
//! engine normalizes to feet for all derived computations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FEET_PER_METER: f64 = 3.28084;

/// Unit of length used for part dimensions and positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Feet
    Feet,
    /// Meters
    Meters,
}

impl Default for Unit {
    fn default() -> Self {
        Self::Feet
    }
}

impl Unit {
    /// Convert a length expressed in this unit to feet.
    pub fn to_feet(&self, value: f64) -> f64 {
        match self {
            Self::Feet => value,
            Self::Meters => value * FEET_PER_METER,
        }
    }

    /// Convert a length in feet to this unit.
    pub fn from_feet(&self, value_ft: f64) -> f64 {
        match self {
            Self::Feet => value_ft,
            Self::Meters => value_ft / FEET_PER_METER,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feet => write!(f, "ft"),
            Self::Meters => write!(f, "m"),
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feet" | "ft" => Ok(Self::Feet),
            "meters" | "m" => Ok(Self::Meters),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_round_trip() {
        let ft = Unit::Meters.to_feet(2.0);
        assert!((ft - 6.56168).abs() < 1e-4);
        assert!((Unit::Meters.from_feet(ft) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse() {
        assert_eq!("ft".parse::<Unit>().unwrap(), Unit::Feet);
        assert_eq!("Meters".parse::<Unit>().unwrap(), Unit::Meters);
        assert!("furlongs".parse::<Unit>().is_err());
    }
}
