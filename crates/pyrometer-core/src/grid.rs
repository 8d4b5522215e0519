//! Measurement grid
//!
//! Temperatures for the selected vehicle, indexed by (wheel, position).

/// Legacy "not measured" value used in result files
pub const UNMEASURED: f64 = 0.0;

/// Dense wheel-major grid of measured temperatures
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementGrid {
    wheel_count: usize,
    position_count: usize,
    cells: Vec<Option<f64>>,
}

impl MeasurementGrid {
    /// Create an empty grid
    pub fn new(wheel_count: usize, position_count: usize) -> Self {
        Self {
            wheel_count,
            position_count,
            cells: vec![None; wheel_count * position_count],
        }
    }

    /// Number of wheels (rows)
    pub fn wheel_count(&self) -> usize {
        self.wheel_count
    }

    /// Number of positions per wheel (columns)
    pub fn position_count(&self) -> usize {
        self.position_count
    }

    fn index(&self, wheel: usize, position: usize) -> Option<usize> {
        (wheel < self.wheel_count && position < self.position_count)
            .then(|| wheel * self.position_count + position)
    }

    /// Measured value of a cell, if any
    pub fn get(&self, wheel: usize, position: usize) -> Option<f64> {
        self.index(wheel, position).and_then(|i| self.cells[i])
    }

    /// Store a measured value. Out-of-range cells are ignored and reported
    /// by the return value.
    pub fn set(&mut self, wheel: usize, position: usize, value: f64) -> bool {
        match self.index(wheel, position) {
            Some(i) => {
                self.cells[i] = Some(value);
                true
            }
            None => false,
        }
    }

    /// Whether a cell holds a measurement
    pub fn is_measured(&self, wheel: usize, position: usize) -> bool {
        self.get(wheel, position).is_some()
    }

    /// Whether measuring of `wheel` has at least recorded its first position
    pub fn wheel_started(&self, wheel: usize) -> bool {
        self.is_measured(wheel, 0)
    }

    /// Whether every cell holds a measurement
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Number of measured cells
    pub fn measured_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Forget every measurement
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Row-major values with unmeasured cells as [`UNMEASURED`]
    pub fn flattened(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.unwrap_or(UNMEASURED)).collect()
    }
}
