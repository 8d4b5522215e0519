//! Stability Sampler
//!
//! Decides when a thermocouple reading has settled enough to be recorded.
//!
//! Each reading goes into a fixed-size window that starts out full of a
//! sentinel far below any tire temperature. After every insert the window
//! mean is recomputed, along with the spread of the slots' deviations from
//! that mean. Once the spread fits in the deviation band the mean is the
//! measurement. An unstable probe keeps the sampler going indefinitely;
//! aborting is up to the caller.

mod window;

pub use window::StabilizationWindow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hardware::Thermocouple;
use crate::units::TempUnits;

/// The thermocouple returned something that is not a temperature
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Thermocouple fault: amplifier returned {reading}")]
pub struct SensorFault {
    /// The offending raw value (NaN or infinite)
    pub reading: f64,
}

/// Errors in a sampler configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerConfigError {
    #[error("Window size must be at least 1")]
    EmptyWindow,

    #[error("Deviation band must be a finite, non-negative number (got {0})")]
    InvalidBand(f64),

    #[error("Interval '{0}' must be greater than zero")]
    ZeroInterval(&'static str),
}

/// Stabilization parameters.
///
/// The deviation band is configured in Celsius and converted once to the
/// active display unit when a [`Sampler`] is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of readings in the window
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Half-width of the stability band in °C
    #[serde(default = "default_deviation_band")]
    pub deviation_band: f64,

    /// Initial value of every window slot
    #[serde(default = "default_sentinel")]
    pub sentinel: f64,

    /// Milliseconds between readings while sampling
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u32,

    /// Milliseconds between button checks while waiting to arm
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u32,
}

fn default_window_size() -> usize {
    15
}

fn default_deviation_band() -> f64 {
    0.25
}

fn default_sentinel() -> f64 {
    -100.0
}

fn default_sample_interval_ms() -> u32 {
    500
}

fn default_poll_interval_ms() -> u32 {
    50
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            deviation_band: default_deviation_band(),
            sentinel: default_sentinel(),
            sample_interval_ms: default_sample_interval_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl SamplerConfig {
    /// Check the configuration for values that would stall or break sampling
    pub fn validate(&self) -> Result<(), SamplerConfigError> {
        if self.window_size == 0 {
            return Err(SamplerConfigError::EmptyWindow);
        }
        if !self.deviation_band.is_finite() || self.deviation_band < 0.0 {
            return Err(SamplerConfigError::InvalidBand(self.deviation_band));
        }
        if self.sample_interval_ms == 0 {
            return Err(SamplerConfigError::ZeroInterval("sample_interval_ms"));
        }
        if self.poll_interval_ms == 0 {
            return Err(SamplerConfigError::ZeroInterval("poll_interval_ms"));
        }
        Ok(())
    }
}

/// Result of a single sampling step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Not yet stable; carries the raw reading for live display
    Settling(f64),
    /// Stable; carries the window mean
    Stable(f64),
}

/// One armed position measurement
#[derive(Debug, Clone)]
pub struct Sampler {
    window: StabilizationWindow,
    units: TempUnits,
}

impl Sampler {
    /// Create a sampler with a fresh, armed window
    pub fn new(config: &SamplerConfig, units: TempUnits) -> Self {
        let band = units.delta_from_celsius(config.deviation_band);
        let mut window = StabilizationWindow::new(config.window_size, config.sentinel, band);
        window.arm();
        Self { window, units }
    }

    /// The underlying window
    pub fn window(&self) -> &StabilizationWindow {
        &self.window
    }

    /// Take one reading and test for stability
    pub fn step(&mut self, probe: &mut dyn Thermocouple) -> Result<Sample, SensorFault> {
        let reading = probe.read_temperature(self.units);
        self.feed(reading)
    }

    /// Test an already-taken reading for stability
    pub fn feed(&mut self, reading: f64) -> Result<Sample, SensorFault> {
        if !reading.is_finite() {
            return Err(SensorFault { reading });
        }
        match self.window.push(reading) {
            Some(mean) => {
                self.window.disarm();
                Ok(Sample::Stable(mean))
            }
            None => Ok(Sample::Settling(reading)),
        }
    }
}

/// Read `probe` until the window is stable and return the stable mean.
///
/// `on_reading` receives every raw reading that did not complete the
/// measurement. A fault ends sampling immediately.
pub fn sample_until_stable<F>(
    probe: &mut dyn Thermocouple,
    units: TempUnits,
    config: &SamplerConfig,
    mut on_reading: F,
) -> Result<f64, SensorFault>
where
    F: FnMut(f64),
{
    let mut sampler = Sampler::new(config, units);
    loop {
        match sampler.step(probe)? {
            Sample::Stable(mean) => return Ok(mean),
            Sample::Settling(raw) => on_reading(raw),
        }
    }
}
