//! Measurement Session
//!
//! Walks the operator through every (wheel, position) cell of the selected
//! vehicle using three buttons, and stores the result row once the
//! operator picks "Done".
//!
//! The session is split in two:
//! - [`MeasurementSession`] holds the grid and the state machine and never
//!   touches hardware.
//! - [`SessionController`] borrows the hardware collaborators and drives the
//!   session from button releases and probe readings, one logical owner
//!   doing compute, then render, then persist.

mod controller;
mod error;
mod state;

pub use controller::{Peripherals, SessionController};
pub use error::SessionError;
pub use state::{Advance, MeasurementSession, SessionState};

use crate::record::ResultRecord;

/// Direction to move through the tire list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the next tire (and the Done row after the last one)
    Forward,
    /// Toward the previous tire
    Backward,
}

impl Direction {
    /// Signed step, `+1` or `-1`
    pub fn step(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// How measuring one tire ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TireOutcome {
    /// Every position was recorded
    Completed,
    /// The operator navigated away before arming the first position
    Skip(Direction),
    /// The operator cancelled the session
    Cancelled,
}

impl TireOutcome {
    /// Direction to continue in, if the session goes on
    pub fn direction(self) -> Option<Direction> {
        match self {
            TireOutcome::Completed => Some(Direction::Forward),
            TireOutcome::Skip(direction) => Some(direction),
            TireOutcome::Cancelled => None,
        }
    }
}

/// How a whole session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The result row was written
    Stored(ResultRecord),
    /// The operator cancelled; nothing was written
    Cancelled,
}
