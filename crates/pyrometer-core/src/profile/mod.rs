//! Vehicle Profiles
//!
//! A profile names a car (or driver) and lists the wheels to measure, the
//! positions across each tread, and each wheel's maximum safe temperature.
//!
//! ## Configuration store
//!
//! Profiles live in a line-oriented text file, one value per line:
//!
//! ```text
//! 1
//! Car 1
//! 4
//! RF
//! Right Front
//! 200.0
//! ...            (one short/long/max triple per wheel)
//! 3
//! O
//! Outside
//! ...            (one short/long pair per position)
//! ==========
//! ```

mod collection;
mod config_file;

pub use collection::{ProfileCollection, CONFIG_FILE};
pub use config_file::{parse_profiles, write_profiles, RECORD_SEPARATOR};

use thiserror::Error;

use crate::storage::StorageError;

/// Most wheels a profile may have
pub const MAX_WHEELS: usize = 6;

/// Most positions per wheel
pub const MAX_POSITIONS: usize = 3;

/// Errors in vehicle profiles and their store
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unexpected end of configuration while reading {0}")]
    Truncated(&'static str),

    #[error("Invalid profile '{name}': {message}")]
    Invalid { name: String, message: String },

    #[error("No vehicle profile with id {0}")]
    UnknownId(u32),

    #[error("Duplicate vehicle profile id {0}")]
    DuplicateId(u32),

    #[error("At least one vehicle profile is required")]
    Empty,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// One wheel slot
#[derive(Debug, Clone, PartialEq)]
pub struct Wheel {
    /// Short label, e.g. `RF`
    pub short_name: String,
    /// Long label, e.g. `Right Front`
    pub long_name: String,
    /// Maximum safe tire temperature, in display units
    pub max_temp: f64,
}

impl Wheel {
    /// Create a wheel
    pub fn new(short_name: &str, long_name: &str, max_temp: f64) -> Self {
        Self {
            short_name: short_name.to_string(),
            long_name: long_name.to_string(),
            max_temp,
        }
    }
}

/// One measurement position across the tread
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Short label, e.g. `O`
    pub short_name: String,
    /// Long label, e.g. `Outside`
    pub long_name: String,
}

impl Position {
    /// Create a position
    pub fn new(short_name: &str, long_name: &str) -> Self {
        Self {
            short_name: short_name.to_string(),
            long_name: long_name.to_string(),
        }
    }
}

/// A named vehicle configuration
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleProfile {
    /// Unique identifier; also selects the result file
    pub id: u32,
    /// Display name
    pub name: String,
    /// Wheels in measuring order
    pub wheels: Vec<Wheel>,
    /// Positions in measuring order
    pub positions: Vec<Position>,
}

impl VehicleProfile {
    /// Create a profile
    pub fn new(id: u32, name: &str, wheels: Vec<Wheel>, positions: Vec<Position>) -> Self {
        Self {
            id,
            name: name.to_string(),
            wheels,
            positions,
        }
    }

    /// Number of wheels
    pub fn wheel_count(&self) -> usize {
        self.wheels.len()
    }

    /// Number of positions per wheel
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Check counts and labels
    pub fn validate(&self) -> Result<(), ProfileError> {
        let invalid = |message: String| ProfileError::Invalid {
            name: self.name.clone(),
            message,
        };

        if !(1..=MAX_WHEELS).contains(&self.wheels.len()) {
            return Err(invalid(format!(
                "{} wheels, expected 1 to {}",
                self.wheels.len(),
                MAX_WHEELS
            )));
        }
        if !(1..=MAX_POSITIONS).contains(&self.positions.len()) {
            return Err(invalid(format!(
                "{} positions, expected 1 to {}",
                self.positions.len(),
                MAX_POSITIONS
            )));
        }
        if !valid_label(&self.name) {
            return Err(invalid("name must be a non-empty single line".into()));
        }

        let labels = self
            .wheels
            .iter()
            .flat_map(|w| [&w.short_name, &w.long_name])
            .chain(
                self.positions
                    .iter()
                    .flat_map(|p| [&p.short_name, &p.long_name]),
            );
        for label in labels {
            if !valid_label(label) {
                return Err(invalid(format!("bad label '{}'", label)));
            }
        }

        if let Some(wheel) = self.wheels.iter().find(|w| !w.max_temp.is_finite()) {
            return Err(invalid(format!(
                "max temp for {} is not a number",
                wheel.short_name
            )));
        }
        Ok(())
    }
}

fn valid_label(label: &str) -> bool {
    !label.trim().is_empty()
        && !label.contains(['\n', '\r'])
        && label.trim() != RECORD_SEPARATOR
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self::new(
            1,
            "Car 1",
            vec![
                Wheel::new("RF", "Right Front", 200.0),
                Wheel::new("LF", "Left Front", 200.0),
                Wheel::new("RR", "Right Rear", 200.0),
                Wheel::new("LR", "Left Rear", 200.0),
            ],
            vec![
                Position::new("O", "Outside"),
                Position::new("M", "Middle"),
                Position::new("I", "Inside"),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = VehicleProfile::default();
        assert_eq!(profile.wheel_count(), 4);
        assert_eq!(profile.position_count(), 3);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_wheel_and_position_bounds() {
        let mut profile = VehicleProfile::default();
        profile.wheels.clear();
        assert!(matches!(profile.validate(), Err(ProfileError::Invalid { .. })));

        let mut profile = VehicleProfile::default();
        profile.wheels = vec![Wheel::new("W", "Wheel", 200.0); 7];
        assert!(profile.validate().is_err());

        let mut profile = VehicleProfile::default();
        profile.positions.push(Position::new("X", "Extra"));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_labels_must_be_single_line() {
        let mut profile = VehicleProfile::default();
        profile.wheels[0].long_name = "Right\nFront".into();
        assert!(profile.validate().is_err());

        let mut profile = VehicleProfile::default();
        profile.positions[1].short_name = "  ".into();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_max_temp_must_be_finite() {
        let mut profile = VehicleProfile::default();
        profile.wheels[2].max_temp = f64::NAN;
        assert!(profile.validate().is_err());
    }
}
