//! Button-driven session controller

use super::{
    Advance, Direction, MeasurementSession, SessionError, SessionOutcome, SessionState,
    TireOutcome,
};
use crate::grid::MeasurementGrid;
use crate::hardware::{Button, ButtonInput, CellDisplay, Clock, Color, Delay, Thermocouple};
use crate::profile::VehicleProfile;
use crate::record::ResultRecord;
use crate::report::ReportWriter;
use crate::sampler::{Sample, Sampler, SamplerConfig, SensorFault};
use crate::settings::DeviceSettings;
use crate::storage::results::append_result;
use crate::storage::Storage;
use crate::units::TempUnits;

/// Shown in a cell waiting for the arm signal
const PLACEHOLDER: &str = "*";

/// Shown in a cell whose reading faulted
const FAULT_TEXT: &str = "ERR";

/// Label of the virtual row after the last wheel
const DONE_LABEL: &str = "Done";

/// Hardware a session runs against
pub struct Peripherals<'a> {
    /// Grid display
    pub display: &'a mut dyn CellDisplay,
    /// Debounced buttons
    pub buttons: &'a mut dyn ButtonInput,
    /// Thermocouple amplifier
    pub probe: &'a mut dyn Thermocouple,
    /// Timestamp source for stored results
    pub clock: &'a dyn Clock,
    /// Pacing between polls and readings
    pub delay: &'a mut dyn Delay,
}

enum ArmSignal {
    Arm,
    Skip(Direction),
    Cancel,
}

enum SamplingOutcome {
    Stable(f64),
    Fault(SensorFault),
    Cancelled,
}

enum DoneChoice {
    Store,
    Move(Direction),
    Cancel,
}

/// Drives a [`MeasurementSession`] from button releases and probe readings.
///
/// The display is a grid with one row per wheel plus a trailing "Done" row.
/// Column 0 holds the row label and column `1 + p` holds position `p`.
pub struct SessionController<'a> {
    session: MeasurementSession,
    io: Peripherals<'a>,
    units: TempUnits,
    config: SamplerConfig,
    highlighted: Option<usize>,
}

impl<'a> SessionController<'a> {
    /// Create a controller and begin a session for `profile`
    pub fn new(
        profile: &VehicleProfile,
        settings: &DeviceSettings,
        io: Peripherals<'a>,
    ) -> Result<Self, SessionError> {
        settings.sampler.validate()?;

        let mut controller = Self {
            session: MeasurementSession::begin(profile),
            io,
            units: settings.temp_units,
            config: settings.sampler.clone(),
            highlighted: None,
        };
        controller.begin_session(profile)?;
        Ok(controller)
    }

    /// Start over with an empty grid for `profile` and draw it. An invalid
    /// profile leaves the current session untouched.
    pub fn begin_session(&mut self, profile: &VehicleProfile) -> Result<(), SessionError> {
        profile.validate()?;
        self.session = MeasurementSession::begin(profile);
        self.highlighted = None;
        self.draw_grid();
        self.highlight_row(0);
        Ok(())
    }

    /// Session state
    pub fn session(&self) -> &MeasurementSession {
        &self.session
    }

    /// Measurements so far
    pub fn grid(&self) -> &MeasurementGrid {
        self.session.grid()
    }

    /// Row to visit after `current` when moving in `direction`
    pub fn get_next_tire(&self, current: usize, direction: Direction) -> usize {
        self.session.next_tire(current, direction)
    }

    /// Run the session until the operator stores or cancels it
    pub fn run(
        &mut self,
        storage: &mut dyn Storage,
        report: &mut dyn ReportWriter,
    ) -> Result<SessionOutcome, SessionError> {
        let mut row = 0;
        loop {
            if row == self.session.done_row() {
                self.session.reach_done()?;
                self.highlight_row(row);
                match self.wait_on_done() {
                    DoneChoice::Store => {
                        let record = self.finalize(storage, report)?;
                        return Ok(SessionOutcome::Stored(record));
                    }
                    DoneChoice::Move(direction) => row = self.get_next_tire(row, direction),
                    DoneChoice::Cancel => {
                        self.cancel();
                        return Ok(SessionOutcome::Cancelled);
                    }
                }
                continue;
            }

            match self.measure_one_tire(row)? {
                TireOutcome::Cancelled => return Ok(SessionOutcome::Cancelled),
                outcome => {
                    let direction = outcome.direction().unwrap_or(Direction::Forward);
                    row = self.get_next_tire(row, direction);
                }
            }
        }
    }

    /// Measure every position of `wheel`, one armed position at a time.
    ///
    /// Before the first position is armed the operator may skip to another
    /// tire. At later positions navigation is ignored. Cancel is honored
    /// everywhere, including mid-sample.
    pub fn measure_one_tire(&mut self, wheel: usize) -> Result<TireOutcome, SessionError> {
        let count = self.session.done_row();
        if wheel >= count {
            return Err(SessionError::InvalidWheel { wheel, count });
        }
        self.session.select_tire(wheel)?;
        self.highlight_row(wheel);

        let mut position = 0;
        self.session.await_arm(position)?;
        self.draw_placeholder(wheel, position);
        loop {
            match self.wait_for_arm(position == 0) {
                ArmSignal::Cancel => {
                    self.cancel();
                    return Ok(TireOutcome::Cancelled);
                }
                ArmSignal::Skip(direction) => {
                    self.redraw_cell(wheel, position);
                    return Ok(TireOutcome::Skip(direction));
                }
                ArmSignal::Arm => {}
            }

            self.session.arm()?;
            tracing::debug!("Sampling wheel {} position {}", wheel, position);
            match self.sample_position(wheel, position) {
                SamplingOutcome::Stable(value) => {
                    tracing::info!(
                        "{} {}: {:.1}{}",
                        self.session.profile().wheels[wheel].short_name,
                        self.session.profile().positions[position].short_name,
                        value,
                        self.units.symbol()
                    );
                    let advance = self.session.record(value)?;
                    self.redraw_cell(wheel, position);
                    match advance {
                        Advance::NextPosition(next) => {
                            position = next;
                            self.draw_placeholder(wheel, position);
                        }
                        Advance::TireComplete => return Ok(TireOutcome::Completed),
                    }
                }
                SamplingOutcome::Fault(fault) => {
                    tracing::warn!("Wheel {} position {}: {}", wheel, position, fault);
                    self.io
                        .display
                        .draw_cell(wheel, position + 1, FAULT_TEXT, Color::Red, Color::Black);
                    self.session.disarm()?;
                }
                SamplingOutcome::Cancelled => {
                    self.cancel();
                    return Ok(TireOutcome::Cancelled);
                }
            }
        }
    }

    /// Persist the session: append the result row, then rebuild the report.
    ///
    /// Only valid from the Done row. When the append fails the session stays
    /// at Done so the operator can retry. A report failure is reported after
    /// the row is already stored.
    pub fn finalize(
        &mut self,
        storage: &mut dyn Storage,
        report: &mut dyn ReportWriter,
    ) -> Result<ResultRecord, SessionError> {
        if self.session.state() != SessionState::AllDone {
            return Err(SessionError::NotDone);
        }

        let grid = self.session.grid();
        if !grid.is_complete() {
            tracing::warn!(
                "Storing session with {} of {} cells unmeasured",
                grid.wheel_count() * grid.position_count() - grid.measured_count(),
                grid.wheel_count() * grid.position_count()
            );
        }

        let profile = self.session.profile().clone();
        let record = ResultRecord::from_session(self.io.clock.timestamp(), &profile, grid);
        append_result(storage, profile.id, &record)?;
        self.session.mark_stored()?;
        tracing::info!("Stored result for '{}' at {}", profile.name, record.timestamp);

        report
            .regenerate(storage, &profile)
            .map_err(SessionError::Report)?;
        Ok(record)
    }

    /// Abort and discard every measurement of this session
    pub fn cancel(&mut self) {
        tracing::info!("Session for '{}' cancelled", self.session.profile().name);
        self.session.cancel();
        self.draw_grid();
    }

    fn wait_for_arm(&mut self, first_position: bool) -> ArmSignal {
        loop {
            if self.io.buttons.released(Button::Cancel) {
                return ArmSignal::Cancel;
            }
            if self.io.buttons.released(Button::Primary) {
                return ArmSignal::Arm;
            }
            for (button, direction) in [
                (Button::Next, Direction::Forward),
                (Button::Previous, Direction::Backward),
            ] {
                if self.io.buttons.released(button) {
                    if first_position {
                        return ArmSignal::Skip(direction);
                    }
                    tracing::debug!("Ignoring {:?} after the first position", button);
                }
            }
            self.io.delay.delay_ms(self.config.poll_interval_ms);
        }
    }

    fn sample_position(&mut self, wheel: usize, position: usize) -> SamplingOutcome {
        let mut sampler = Sampler::new(&self.config, self.units);
        loop {
            if self.io.buttons.released(Button::Cancel) {
                return SamplingOutcome::Cancelled;
            }
            match sampler.step(&mut *self.io.probe) {
                Ok(Sample::Stable(mean)) => return SamplingOutcome::Stable(mean),
                Ok(Sample::Settling(raw)) => {
                    self.io.display.draw_cell(
                        wheel,
                        position + 1,
                        &format!("{:.1}", raw),
                        Color::Yellow,
                        Color::Black,
                    );
                }
                Err(fault) => return SamplingOutcome::Fault(fault),
            }
            self.io.delay.delay_ms(self.config.sample_interval_ms);
        }
    }

    fn wait_on_done(&mut self) -> DoneChoice {
        loop {
            if self.io.buttons.released(Button::Cancel) {
                return DoneChoice::Cancel;
            }
            if self.io.buttons.released(Button::Primary) {
                return DoneChoice::Store;
            }
            if self.io.buttons.released(Button::Next) {
                return DoneChoice::Move(Direction::Forward);
            }
            if self.io.buttons.released(Button::Previous) {
                return DoneChoice::Move(Direction::Backward);
            }
            self.io.delay.delay_ms(self.config.poll_interval_ms);
        }
    }

    fn draw_grid(&mut self) {
        let wheel_count = self.session.profile().wheel_count();
        let position_count = self.session.profile().position_count();
        for wheel in 0..wheel_count {
            self.draw_label(wheel, false);
            for position in 0..position_count {
                self.redraw_cell(wheel, position);
            }
        }
        self.draw_label(wheel_count, false);
    }

    fn draw_label(&mut self, row: usize, selected: bool) {
        let profile = self.session.profile();
        let label = profile
            .wheels
            .get(row)
            .map_or(DONE_LABEL, |w| w.short_name.as_str())
            .to_string();
        let bg = if selected { Color::Blue } else { Color::Black };
        self.io.display.draw_cell(row, 0, &label, Color::White, bg);
    }

    fn highlight_row(&mut self, row: usize) {
        if let Some(previous) = self.highlighted.take() {
            if previous != row {
                self.draw_label(previous, false);
            }
        }
        self.draw_label(row, true);
        self.highlighted = Some(row);
    }

    fn draw_placeholder(&mut self, wheel: usize, position: usize) {
        self.io
            .display
            .draw_cell(wheel, position + 1, PLACEHOLDER, Color::Grey, Color::Black);
    }

    /// Draw a cell from the grid: blank when unmeasured, red background
    /// when above the wheel's maximum.
    fn redraw_cell(&mut self, wheel: usize, position: usize) {
        let max_temp = self.session.profile().wheels[wheel].max_temp;
        let (text, bg) = match self.session.grid().get(wheel, position) {
            Some(value) if value > max_temp => (format!("{:.1}", value), Color::Red),
            Some(value) => (format!("{:.1}", value), Color::Black),
            None => (String::new(), Color::Black),
        };
        self.io
            .display
            .draw_cell(wheel, position + 1, &text, Color::White, bg);
    }
}
