//! Stabilization window
//!
//! Fixed-capacity circular buffer of the most recent raw readings.
//! Capacity comes from `SamplerConfig::window_size` at runtime, so the ring
//! is a `Vec` rather than a const-generic history buffer.

/// Circular buffer of raw readings with a running mean and band test
#[derive(Debug, Clone)]
pub struct StabilizationWindow {
    /// Slots, pre-filled with the sentinel
    slots: Vec<f64>,
    /// Slot the next reading overwrites
    next: usize,
    /// Mean of all slots after the last push
    mean: f64,
    /// Closed half-width of the deviation band, in display units
    band: f64,
    /// Whether the operator has armed this window
    armed: bool,
}

impl StabilizationWindow {
    /// Create a window of `size` slots, each holding `sentinel`
    pub fn new(size: usize, sentinel: f64, band: f64) -> Self {
        let size = size.max(1);
        Self {
            slots: vec![sentinel; size],
            next: 0,
            mean: sentinel,
            band,
            armed: false,
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Mean of all slots, sentinels included
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Band half-width this window tests against
    pub fn band(&self) -> f64 {
        self.band
    }

    /// Mark the window as armed
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Mark the window as disarmed
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Whether the window is armed
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Insert a reading over the oldest slot.
    ///
    /// Returns the mean if the spread of the slots' deviations from the
    /// mean now lies within `[-band, band]`.
    pub fn push(&mut self, reading: f64) -> Option<f64> {
        self.slots[self.next] = reading;
        self.next = (self.next + 1) % self.slots.len();

        let count = self.slots.len() as f64;
        self.mean = self.slots.iter().sum::<f64>() / count;

        if (-self.band..=self.band).contains(&self.spread()) {
            Some(self.mean)
        } else {
            None
        }
    }

    /// Range of `mean - slot` over all slots
    pub fn spread(&self) -> f64 {
        let mut max_dev = f64::MIN;
        let mut min_dev = f64::MAX;
        for slot in &self.slots {
            let dev = self.mean - slot;
            max_dev = max_dev.max(dev);
            min_dev = min_dev.min(dev);
        }
        max_dev - min_dev
    }
}
