//! Per-vehicle result files

use super::{Storage, StorageError};
use crate::record::{RecordError, ResultRecord};
use crate::report::report_path;

/// Result file for a vehicle
pub fn result_path(vehicle_id: u32) -> String {
    format!("results_{}.txt", vehicle_id)
}

/// Append one completed session to the vehicle's result file
pub fn append_result(
    storage: &mut dyn Storage,
    vehicle_id: u32,
    record: &ResultRecord,
) -> Result<(), StorageError> {
    storage.append_line(&result_path(vehicle_id), &record.encode())
}

/// Records read back from a result file
#[derive(Debug, Clone, Default)]
pub struct LoadedResults {
    /// Lines that decoded cleanly, in file order
    pub records: Vec<ResultRecord>,
    /// 1-based line numbers that did not decode, with the reason
    pub rejected: Vec<(usize, RecordError)>,
}

/// Read every result for a vehicle. A missing file means no results yet.
pub fn load_results(storage: &dyn Storage, vehicle_id: u32) -> Result<LoadedResults, StorageError> {
    let path = result_path(vehicle_id);
    let lines = match storage.read_lines(&path) {
        Ok(lines) => lines,
        Err(StorageError::NotFound(_)) => return Ok(LoadedResults::default()),
        Err(e) => return Err(e),
    };

    let mut loaded = LoadedResults::default();
    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match ResultRecord::decode(line) {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                tracing::warn!("Skipping {} line {}: {}", path, i + 1, e);
                loaded.rejected.push((i + 1, e));
            }
        }
    }
    Ok(loaded)
}

/// Delete a vehicle's result file and report. Files that are already
/// gone count as deleted.
pub fn delete_results(storage: &mut dyn Storage, vehicle_id: u32) -> Result<(), StorageError> {
    for path in [result_path(vehicle_id), report_path(vehicle_id)] {
        match storage.remove(&path) {
            Ok(()) => tracing::info!("Deleted {}", path),
            Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
