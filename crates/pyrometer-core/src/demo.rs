//! Demo Mode - simulated thermocouples for running without hardware
//!
//! [`SimulatedProbe`] behaves like a probe pressed into a warm tire: the
//! reading climbs toward the tread temperature with a first-order lag,
//! jitters a little and is quantized to the amplifier's resolution. Every
//! so often it is "moved" to a new spot with a different temperature.
//!
//! [`ScriptedProbe`] plays back a fixed list of readings for tests.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::hardware::Thermocouple;
use crate::units::TempUnits;

/// MCP9600 hot-junction resolution in °C
const RESOLUTION_C: f64 = 0.0625;

/// Readings to close ~63% of the gap to the target
const SETTLE_READS: f64 = 3.0;

/// Peak-to-peak noise half-width in °C
const NOISE_C: f64 = 0.05;

/// Readings before the probe moves to a new spot
const DWELL_READS: u32 = 60;

const AMBIENT_C: f64 = 25.0;

/// Simulated tire probe
#[derive(Debug, Clone)]
pub struct SimulatedProbe {
    rng: StdRng,
    current_c: f64,
    target_c: f64,
    reads_at_target: u32,
}

impl Default for SimulatedProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedProbe {
    /// Create a probe seeded from entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a reproducible probe
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let target_c = rng.gen_range(60.0..95.0);
        Self {
            rng,
            current_c: AMBIENT_C,
            target_c,
            reads_at_target: 0,
        }
    }

    /// Temperature the probe is currently settling toward, in °C
    pub fn target(&self) -> f64 {
        self.target_c
    }

    fn next_celsius(&mut self) -> f64 {
        if self.reads_at_target >= DWELL_READS {
            self.target_c = self.rng.gen_range(60.0..95.0);
            self.reads_at_target = 0;
        }
        self.reads_at_target += 1;

        self.current_c += (self.target_c - self.current_c) / SETTLE_READS;
        let noisy = self.current_c + self.rng.gen_range(-NOISE_C..=NOISE_C);
        (noisy / RESOLUTION_C).round() * RESOLUTION_C
    }
}

impl Thermocouple for SimulatedProbe {
    fn read_temperature(&mut self, units: TempUnits) -> f64 {
        let celsius = self.next_celsius();
        units.absolute_from_celsius(celsius)
    }
}

/// Plays back readings in order, then repeats the last one forever.
///
/// Readings are returned as given whatever units are requested. An empty
/// script reads as a faulted amplifier.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProbe {
    readings: VecDeque<f64>,
    last: Option<f64>,
    reads: usize,
}

impl ScriptedProbe {
    /// Create a probe from a list of readings
    pub fn new(readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            last: None,
            reads: 0,
        }
    }

    /// Number of readings taken so far
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Thermocouple for ScriptedProbe {
    fn read_temperature(&mut self, _units: TempUnits) -> f64 {
        self.reads += 1;
        if let Some(next) = self.readings.pop_front() {
            self.last = Some(next);
        }
        self.last.unwrap_or(f64::NAN)
    }
}
