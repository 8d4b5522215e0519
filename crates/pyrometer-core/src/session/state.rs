//! Session state machine

use super::{Direction, SessionError};
use crate::grid::MeasurementGrid;
use crate::profile::VehicleProfile;

/// Where the session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A tire row is selected, no position awaiting yet
    SelectingTire {
        /// Selected wheel
        wheel: usize,
    },
    /// Waiting for the operator to arm a position
    ArmingPosition {
        /// Wheel being measured
        wheel: usize,
        /// Position awaiting the arm signal
        position: usize,
    },
    /// Reading the probe until it settles
    Sampling {
        /// Wheel being measured
        wheel: usize,
        /// Position being measured
        position: usize,
    },
    /// The Done row is selected
    AllDone,
    /// The result row was written
    Stored,
    /// The operator aborted; the grid was discarded
    Cancelled,
}

impl SessionState {
    /// Whether no further transitions are possible
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Stored | SessionState::Cancelled)
    }
}

/// What recording a value led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move on to this position of the same wheel
    NextPosition(usize),
    /// Every position of the wheel is recorded
    TireComplete,
}

/// Grid plus state for one sweep over the selected vehicle
#[derive(Debug, Clone)]
pub struct MeasurementSession {
    profile: VehicleProfile,
    grid: MeasurementGrid,
    state: SessionState,
}

impl MeasurementSession {
    /// Start a session with an empty grid and the first wheel selected
    pub fn begin(profile: &VehicleProfile) -> Self {
        tracing::debug!(
            "Begin session for '{}' ({} wheels x {} positions)",
            profile.name,
            profile.wheel_count(),
            profile.position_count()
        );
        Self {
            grid: MeasurementGrid::new(profile.wheel_count(), profile.position_count()),
            profile: profile.clone(),
            state: SessionState::SelectingTire { wheel: 0 },
        }
    }

    /// Vehicle being measured
    pub fn profile(&self) -> &VehicleProfile {
        &self.profile
    }

    /// Measurements so far
    pub fn grid(&self) -> &MeasurementGrid {
        &self.grid
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Index of the virtual Done row
    pub fn done_row(&self) -> usize {
        self.profile.wheel_count()
    }

    fn transition(&mut self, to: SessionState) {
        tracing::debug!("Session {:?} -> {:?}", self.state, to);
        self.state = to;
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidState {
            action,
            state: self.state,
        }
    }

    /// Select a tire row, or the Done row when `wheel == done_row()`
    pub fn select_tire(&mut self, wheel: usize) -> Result<(), SessionError> {
        if self.state.is_terminal() {
            return Err(self.invalid("select a tire"));
        }
        let count = self.profile.wheel_count();
        if wheel > count {
            return Err(SessionError::InvalidWheel { wheel, count });
        }
        if wheel == count {
            self.transition(SessionState::AllDone);
        } else {
            self.transition(SessionState::SelectingTire { wheel });
        }
        Ok(())
    }

    /// Select the Done row
    pub fn reach_done(&mut self) -> Result<(), SessionError> {
        self.select_tire(self.done_row())
    }

    /// Wait for the arm signal at `position` of the selected wheel
    pub fn await_arm(&mut self, position: usize) -> Result<(), SessionError> {
        let wheel = match self.state {
            SessionState::SelectingTire { wheel }
            | SessionState::ArmingPosition { wheel, .. }
            | SessionState::Sampling { wheel, .. } => wheel,
            _ => return Err(self.invalid("await arming")),
        };
        if position >= self.profile.position_count() {
            return Err(self.invalid("await arming past the last position"));
        }
        self.transition(SessionState::ArmingPosition { wheel, position });
        Ok(())
    }

    /// Arm the awaiting position; returns the cell being sampled
    pub fn arm(&mut self) -> Result<(usize, usize), SessionError> {
        match self.state {
            SessionState::ArmingPosition { wheel, position } => {
                self.transition(SessionState::Sampling { wheel, position });
                Ok((wheel, position))
            }
            _ => Err(self.invalid("arm")),
        }
    }

    /// Return a sampling position to waiting for the arm signal
    pub fn disarm(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Sampling { wheel, position } => {
                self.transition(SessionState::ArmingPosition { wheel, position });
                Ok(())
            }
            _ => Err(self.invalid("disarm")),
        }
    }

    /// Record the stable value of the sampling position and advance
    pub fn record(&mut self, value: f64) -> Result<Advance, SessionError> {
        let SessionState::Sampling { wheel, position } = self.state else {
            return Err(self.invalid("record"));
        };
        self.grid.set(wheel, position, value);

        let next = position + 1;
        if next < self.profile.position_count() {
            self.transition(SessionState::ArmingPosition {
                wheel,
                position: next,
            });
            Ok(Advance::NextPosition(next))
        } else {
            self.transition(SessionState::SelectingTire { wheel });
            Ok(Advance::TireComplete)
        }
    }

    /// Row to visit after `current` when moving in `direction`.
    ///
    /// Rows wrap through `0..=wheel_count`, the last being the Done row.
    /// Moving forward skips wheels whose first position is already
    /// measured, so repeated "next" presses land on the next unmeasured
    /// wheel or on Done. Moving backward visits every row, which is how a
    /// measured wheel gets selected again.
    pub fn next_tire(&self, current: usize, direction: Direction) -> usize {
        let done = self.done_row();
        let rows = done + 1;
        let mut candidate = current.min(done);

        for _ in 0..rows {
            candidate = match direction {
                Direction::Forward => (candidate + 1) % rows,
                Direction::Backward => (candidate + rows - 1) % rows,
            };
            if candidate == done
                || direction == Direction::Backward
                || !self.grid.wheel_started(candidate)
            {
                return candidate;
            }
        }
        done
    }

    /// Abort: discard every measurement of this session
    pub fn cancel(&mut self) {
        self.grid.reset();
        self.transition(SessionState::Cancelled);
    }

    /// Mark the result row as written
    pub fn mark_stored(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::AllDone {
            return Err(SessionError::NotDone);
        }
        self.transition(SessionState::Stored);
        Ok(())
    }
}
