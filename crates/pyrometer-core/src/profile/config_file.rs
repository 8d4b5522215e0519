//! Vehicle configuration file codec

use std::str::FromStr;

use super::{Position, ProfileError, VehicleProfile, Wheel, MAX_POSITIONS, MAX_WHEELS};
use crate::record::format_temperature;

/// Line terminating each profile
pub const RECORD_SEPARATOR: &str = "==========";

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Lines<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            inner: content.lines().enumerate(),
            line: 0,
        }
    }

    /// Next line, skipping blank lines between profiles
    fn next_record_start(&mut self) -> Option<&'a str> {
        for (i, line) in self.inner.by_ref() {
            self.line = i + 1;
            let line = line.trim();
            if !line.is_empty() {
                return Some(line);
            }
        }
        None
    }

    fn field(&mut self, what: &'static str) -> Result<&'a str, ProfileError> {
        let (i, line) = self.inner.next().ok_or(ProfileError::Truncated(what))?;
        self.line = i + 1;
        Ok(line.trim())
    }

    fn number<T: FromStr>(&mut self, what: &'static str) -> Result<T, ProfileError> {
        let raw = self.field(what)?;
        parse_number(raw, what, self.line)
    }

    fn error(&self, message: String) -> ProfileError {
        ProfileError::Parse {
            line: self.line,
            message,
        }
    }
}

fn parse_number<T: FromStr>(raw: &str, what: &str, line: usize) -> Result<T, ProfileError> {
    raw.parse().map_err(|_| ProfileError::Parse {
        line,
        message: format!("invalid {} '{}'", what, raw),
    })
}

/// Parse every profile in a configuration file
pub fn parse_profiles(content: &str) -> Result<Vec<VehicleProfile>, ProfileError> {
    let mut lines = Lines::new(content);
    let mut profiles = Vec::new();

    while let Some(first) = lines.next_record_start() {
        let id: u32 = parse_number(first, "vehicle id", lines.line)?;
        let name = lines.field("vehicle name")?.to_string();

        let wheel_count: usize = lines.number("wheel count")?;
        if !(1..=MAX_WHEELS).contains(&wheel_count) {
            return Err(lines.error(format!(
                "wheel count {} out of range 1-{}",
                wheel_count, MAX_WHEELS
            )));
        }
        let mut wheels = Vec::with_capacity(wheel_count);
        for _ in 0..wheel_count {
            let short_name = lines.field("wheel short name")?.to_string();
            let long_name = lines.field("wheel long name")?.to_string();
            let max_temp: f64 = lines.number("max temp")?;
            wheels.push(Wheel {
                short_name,
                long_name,
                max_temp,
            });
        }

        let position_count: usize = lines.number("position count")?;
        if !(1..=MAX_POSITIONS).contains(&position_count) {
            return Err(lines.error(format!(
                "position count {} out of range 1-{}",
                position_count, MAX_POSITIONS
            )));
        }
        let mut positions = Vec::with_capacity(position_count);
        for _ in 0..position_count {
            let short_name = lines.field("position short name")?.to_string();
            let long_name = lines.field("position long name")?.to_string();
            positions.push(Position {
                short_name,
                long_name,
            });
        }

        let separator = lines.field("record separator")?;
        if separator != RECORD_SEPARATOR {
            return Err(lines.error(format!(
                "expected '{}', found '{}'",
                RECORD_SEPARATOR, separator
            )));
        }

        let profile = VehicleProfile {
            id,
            name,
            wheels,
            positions,
        };
        profile.validate()?;
        profiles.push(profile);
    }

    Ok(profiles)
}

/// Write profiles in configuration file format
pub fn write_profiles(profiles: &[VehicleProfile]) -> String {
    let mut out = String::new();
    let mut line = |s: &str| {
        out.push_str(s);
        out.push('\n');
    };

    for profile in profiles {
        line(&profile.id.to_string());
        line(&profile.name);
        line(&profile.wheels.len().to_string());
        for wheel in &profile.wheels {
            line(&wheel.short_name);
            line(&wheel.long_name);
            line(&format_temperature(wheel.max_temp));
        }
        line(&profile.positions.len().to_string());
        for position in &profile.positions {
            line(&position.short_name);
            line(&position.long_name);
        }
        line(RECORD_SEPARATOR);
    }

    out
}
