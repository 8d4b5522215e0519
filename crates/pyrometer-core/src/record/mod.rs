//! Result records
//!
//! One completed session, persisted as a single `;`-delimited line:
//!
//! ```text
//! timestamp;name;wheels;positions;<wheels*positions temps>;<wheel names>;<position names>;<wheel max temps>
//! ```

mod codec;

pub(crate) use codec::format_temperature;

use thiserror::Error;

use crate::grid::MeasurementGrid;
use crate::profile::VehicleProfile;

/// Field separator in result lines
pub const DELIMITER: char = ';';

/// Errors decoding a result line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Record has only {0} fields, expected at least 4")]
    Truncated(usize),

    #[error("Invalid {field} count '{value}'")]
    BadCount { field: &'static str, value: String },

    #[error("Field count mismatch: {wheels} wheels x {positions} positions needs {expected} fields, found {found}")]
    CountMismatch {
        wheels: usize,
        positions: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid number '{value}' in field {index}")]
    BadNumber { index: usize, value: String },
}

/// One completed measurement session
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// When the session was stored
    pub timestamp: String,
    /// Vehicle display name
    pub vehicle_name: String,
    /// Number of wheels
    pub wheel_count: usize,
    /// Number of positions per wheel
    pub position_count: usize,
    /// Row-major temperatures (wheel, then position)
    pub temperatures: Vec<f64>,
    /// Wheel short names
    pub wheel_names: Vec<String>,
    /// Position short names
    pub position_names: Vec<String>,
    /// Per-wheel maximum safe temperature
    pub max_temps: Vec<f64>,
}

impl ResultRecord {
    /// Build a record from a profile and its measured grid.
    ///
    /// Unmeasured cells are stored as `0.0`, as on earlier firmware.
    pub fn from_session(
        timestamp: impl Into<String>,
        profile: &VehicleProfile,
        grid: &MeasurementGrid,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            vehicle_name: profile.name.clone(),
            wheel_count: profile.wheels.len(),
            position_count: profile.positions.len(),
            temperatures: grid.flattened(),
            wheel_names: profile.wheels.iter().map(|w| w.short_name.clone()).collect(),
            position_names: profile
                .positions
                .iter()
                .map(|p| p.short_name.clone())
                .collect(),
            max_temps: profile.wheels.iter().map(|w| w.max_temp).collect(),
        }
    }

    /// Temperature at (wheel, position)
    pub fn temperature(&self, wheel: usize, position: usize) -> Option<f64> {
        if wheel >= self.wheel_count || position >= self.position_count {
            return None;
        }
        self.temperatures
            .get(wheel * self.position_count + position)
            .copied()
    }

    /// Whether the value at (wheel, position) is above that wheel's maximum
    pub fn over_threshold(&self, wheel: usize, position: usize) -> bool {
        match (self.temperature(wheel, position), self.max_temps.get(wheel)) {
            (Some(temp), Some(max)) => temp > *max,
            _ => false,
        }
    }

    /// Highest temperature recorded for a wheel
    pub fn wheel_peak(&self, wheel: usize) -> Option<f64> {
        (0..self.position_count)
            .filter_map(|p| self.temperature(wheel, p))
            .reduce(f64::max)
    }

    /// Encode as a result line
    pub fn encode(&self) -> String {
        codec::encode(self)
    }

    /// Decode a result line
    pub fn decode(line: &str) -> Result<Self, RecordError> {
        codec::decode(line)
    }
}
