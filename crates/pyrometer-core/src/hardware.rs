//! Hardware collaborators
//!
//! The measurement core never talks to the TFT, the buttons, the MCP9600
//! amplifier or the RTC directly. It sees them through these traits, which
//! a board support layer (or a test) implements.

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use chrono::Local;

use crate::units::TempUnits;

/// Display colors the core asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Black
    Black,
    /// White
    White,
    /// Grey, used for placeholders
    Grey,
    /// Yellow, used for live readings
    Yellow,
    /// Green
    Green,
    /// Red, used for faults and over-threshold values
    Red,
    /// Blue, used to highlight the selected row
    Blue,
}

impl Color {
    /// RGB565 value as used by the TFT driver
    pub fn rgb565(self) -> u16 {
        match self {
            Color::Black => 0x0000,
            Color::White => 0xFFFF,
            Color::Grey => 0x8410,
            Color::Yellow => 0xFFE0,
            Color::Green => 0x07E0,
            Color::Red => 0xF800,
            Color::Blue => 0x001F,
        }
    }
}

/// A display that can draw a labeled cell of the measurement grid
pub trait CellDisplay {
    /// Draw `text` in the cell at (`row`, `col`)
    fn draw_cell(&mut self, row: usize, col: usize, text: &str, fg: Color, bg: Color);
}

/// Logical buttons.
///
/// The device has three physical buttons; mapping presses (including long
/// presses) onto these roles is the debouncer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Select / arm
    Primary,
    /// Move to the next tire
    Next,
    /// Move to the previous tire
    Previous,
    /// Abort the session
    Cancel,
}

/// Debounced button releases
pub trait ButtonInput {
    /// Returns true if `button` was released since it was last checked.
    ///
    /// A release is consumed by the call that reports it.
    fn released(&mut self, button: Button) -> bool;
}

/// Thermocouple amplifier
pub trait Thermocouple {
    /// One instantaneous reading in `units`. NaN when the amplifier has no
    /// valid conversion (open thermocouple, bus error).
    fn read_temperature(&mut self, units: TempUnits) -> f64;
}

/// Wall clock
pub trait Clock {
    /// Current date and time as shown to the operator and stored in results
    fn timestamp(&self) -> String;
}

/// Blocking delay
pub trait Delay {
    /// Pause for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// System clock via chrono
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    /// Use a 12-hour clock with am/pm suffix
    pub twelve_hour: bool,
}

impl SystemClock {
    /// Create a clock with the given hour format
    pub fn new(twelve_hour: bool) -> Self {
        Self { twelve_hour }
    }
}

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        let now = Local::now();
        if self.twelve_hour {
            now.format("%m/%d/%Y %I:%M:%S %P").to_string()
        } else {
            now.format("%m/%d/%Y %H:%M:%S").to_string()
        }
    }
}

/// A clock frozen at one timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        self.0.clone()
    }
}

/// Delay backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Delay that returns immediately and counts the time it was asked for
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay {
    /// Total milliseconds requested so far
    pub elapsed_ms: u64,
}

impl Delay for NoDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += u64::from(ms);
    }
}

/// A pre-recorded operator.
///
/// Releases happen in script order: `released(b)` is true only when `b` is
/// the next scripted release, so a check for a button the script has not
/// reached yet leaves the script untouched. Once the script is exhausted
/// the operator is treated as having cancelled.
#[derive(Debug, Clone, Default)]
pub struct ScriptedButtons {
    script: VecDeque<Button>,
}

impl ScriptedButtons {
    /// Create a script from a sequence of releases
    pub fn new(script: impl IntoIterator<Item = Button>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Append a release to the end of the script
    pub fn push(&mut self, button: Button) {
        self.script.push_back(button);
    }

    /// Releases not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ButtonInput for ScriptedButtons {
    fn released(&mut self, button: Button) -> bool {
        match self.script.front() {
            Some(next) if *next == button => {
                self.script.pop_front();
                true
            }
            Some(_) => false,
            None => button == Button::Cancel,
        }
    }
}
