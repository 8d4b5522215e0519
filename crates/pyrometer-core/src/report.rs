//! Session reports
//!
//! After every stored session the vehicle's report is rebuilt from its
//! result file, so the report always reflects everything on storage.

use std::fmt::Write;

use crate::profile::VehicleProfile;
use crate::record::ResultRecord;
use crate::storage::results::{load_results, LoadedResults};
use crate::storage::{Storage, StorageError};

/// Report file for a vehicle
pub fn report_path(vehicle_id: u32) -> String {
    format!("report_{}.txt", vehicle_id)
}

/// Something that rebuilds a vehicle's report from its stored results
pub trait ReportWriter {
    /// Regenerate the report for `profile`
    fn regenerate(
        &mut self,
        storage: &mut dyn Storage,
        profile: &VehicleProfile,
    ) -> Result<(), StorageError>;
}

/// Plain-text table report, newest session first
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReport;

const NAME_WIDTH: usize = 8;
const CELL_WIDTH: usize = 9;

impl TextReport {
    /// Render the report for `profile`. Values above the wheel's maximum
    /// are marked with `!`.
    pub fn render(profile: &VehicleProfile, results: &LoadedResults) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Tire temperatures: {}", profile.name);
        let _ = writeln!(out, "Sessions: {}", results.records.len());
        if !results.rejected.is_empty() {
            let _ = writeln!(out, "Unreadable lines: {}", results.rejected.len());
        }

        for record in results.records.iter().rev() {
            out.push('\n');
            render_record(&mut out, record);
        }
        out
    }
}

fn render_record(out: &mut String, record: &ResultRecord) {
    let _ = writeln!(out, "{}  {}", record.timestamp, record.vehicle_name);

    let _ = write!(out, "{:<w$}", "", w = NAME_WIDTH);
    for name in &record.position_names {
        let _ = write!(out, "{:>w$}", name, w = CELL_WIDTH);
    }
    let _ = writeln!(out, "{:>w$}", "Max", w = CELL_WIDTH);

    for wheel in 0..record.wheel_count {
        let name = record.wheel_names.get(wheel).map_or("", String::as_str);
        let _ = write!(out, "{:<w$}", name, w = NAME_WIDTH);
        for position in 0..record.position_count {
            let value = record.temperature(wheel, position).unwrap_or_default();
            let mark = if record.over_threshold(wheel, position) { "!" } else { " " };
            let _ = write!(out, "{:>w$.1}{}", value, mark, w = CELL_WIDTH - 1);
        }
        let max = record.max_temps.get(wheel).copied().unwrap_or_default();
        let _ = writeln!(out, "{:>w$.1}", max, w = CELL_WIDTH);
    }
}

impl ReportWriter for TextReport {
    fn regenerate(
        &mut self,
        storage: &mut dyn Storage,
        profile: &VehicleProfile,
    ) -> Result<(), StorageError> {
        let results = load_results(storage, profile.id)?;
        let content = Self::render(profile, &results);
        storage.write(&report_path(profile.id), &content)?;
        tracing::debug!(
            "Rebuilt {} from {} sessions",
            report_path(profile.id),
            results.records.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MeasurementGrid;
    use crate::storage::results::append_result;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn record(ts: &str, values: &[(usize, usize, f64)]) -> ResultRecord {
        let profile = VehicleProfile::default();
        let mut grid = MeasurementGrid::new(4, 3);
        for &(w, p, v) in values {
            grid.set(w, p, v);
        }
        ResultRecord::from_session(ts, &profile, &grid)
    }

    #[test]
    fn test_render_marks_over_threshold() {
        let profile = VehicleProfile::default();
        let results = LoadedResults {
            records: vec![record("t1", &[(0, 0, 80.0), (0, 1, 210.5)])],
            rejected: Vec::new(),
        };
        let text = TextReport::render(&profile, &results);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Tire temperatures: Car 1");
        assert_eq!(lines[1], "Sessions: 1");
        assert_eq!(lines[3], "t1  Car 1");
        assert_eq!(lines[4], "                O        M        I      Max");
        assert_eq!(lines[5], "RF          80.0    210.5!     0.0     200.0");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_render_newest_first() {
        let profile = VehicleProfile::default();
        let results = LoadedResults {
            records: vec![record("first", &[]), record("second", &[])],
            rejected: Vec::new(),
        };
        let text = TextReport::render(&profile, &results);
        let first = text.find("first").unwrap();
        let second = text.find("second").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_regenerate_writes_report_file() {
        let profile = VehicleProfile::default();
        let mut storage = MemoryStorage::new();
        append_result(&mut storage, profile.id, &record("t1", &[(2, 2, 99.0)])).unwrap();

        TextReport.regenerate(&mut storage, &profile).unwrap();
        let report = storage.contents(&report_path(profile.id)).unwrap();
        assert!(report.contains("Sessions: 1"));
        assert!(report.contains("99.0"));
    }

    #[test]
    fn test_regenerate_without_results() {
        let profile = VehicleProfile::default();
        let mut storage = MemoryStorage::new();
        TextReport.regenerate(&mut storage, &profile).unwrap();
        assert!(storage
            .contents(&report_path(profile.id))
            .unwrap()
            .contains("Sessions: 0"));
    }
}
