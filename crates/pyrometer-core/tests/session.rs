use std::iter::repeat;

use pretty_assertions::assert_eq;
use pyrometer_core::prelude::*;
use pyrometer_core::report::report_path;
use pyrometer_core::storage::results::{load_results, result_path};

const TIMESTAMP: &str = "05/01/2024 10:00:00 am";

struct NullDisplay;

impl CellDisplay for NullDisplay {
    fn draw_cell(&mut self, _row: usize, _col: usize, _text: &str, _fg: Color, _bg: Color) {}
}

fn celsius() -> DeviceSettings {
    DeviceSettings {
        temp_units: TempUnits::Celsius,
        ..Default::default()
    }
}

/// Fifteen identical readings per value, one stable measurement each
fn settled(values: &[f64]) -> ScriptedProbe {
    ScriptedProbe::new(values.iter().flat_map(|v| repeat(*v).take(15)))
}

struct Rig {
    display: NullDisplay,
    buttons: ScriptedButtons,
    probe: ScriptedProbe,
    clock: FixedClock,
    delay: NoDelay,
}

impl Rig {
    fn new(buttons: impl IntoIterator<Item = Button>, probe: ScriptedProbe) -> Self {
        Self {
            display: NullDisplay,
            buttons: ScriptedButtons::new(buttons),
            probe,
            clock: FixedClock(TIMESTAMP.to_string()),
            delay: NoDelay::default(),
        }
    }

    fn peripherals(&mut self) -> Peripherals<'_> {
        Peripherals {
            display: &mut self.display,
            buttons: &mut self.buttons,
            probe: &mut self.probe,
            clock: &self.clock,
            delay: &mut self.delay,
        }
    }
}

#[test]
fn test_single_wheel_sweep_stores_row_major_line() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut rig = Rig::new(
        [Primary, Primary, Primary, Next, Next, Next, Primary],
        settled(&[80.0, 82.0, 81.0]),
    );
    let mut storage = MemoryStorage::new();

    let outcome = {
        let mut controller =
            SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();
        controller.run(&mut storage, &mut TextReport).unwrap()
    };

    let SessionOutcome::Stored(record) = outcome else {
        panic!("Expected a stored session");
    };
    assert_eq!(
        record.encode(),
        "05/01/2024 10:00:00 am;Car 1;4;3;\
         80.0;82.0;81.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;0.0;\
         RF;LF;RR;LR;O;M;I;200.0;200.0;200.0;200.0"
    );

    let stored = storage.contents(&result_path(profile.id)).unwrap();
    assert_eq!(stored, format!("{}\n", record.encode()));
    assert!(storage.exists(&report_path(profile.id)));
    assert_eq!(rig.buttons.remaining(), 0);
}

#[test]
fn test_stored_results_accumulate() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut storage = MemoryStorage::new();

    for value in [70.0, 75.0] {
        let mut rig = Rig::new(
            [Primary, Primary, Primary, Next, Next, Next, Primary],
            settled(&[value; 3]),
        );
        let mut controller =
            SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();
        controller.run(&mut storage, &mut TextReport).unwrap();
    }

    let loaded = load_results(&storage, profile.id).unwrap();
    assert_eq!(loaded.records.len(), 2);
    assert_eq!(loaded.records[1].temperature(0, 2), Some(75.0));
    assert!(loaded.rejected.is_empty());
}

#[test]
fn test_skip_before_arming_leaves_grid_untouched() {
    let profile = VehicleProfile::default();
    // Trailing Next keeps the script from running dry
    let mut rig = Rig::new([Button::Next, Button::Next], settled(&[80.0]));
    let mut controller = SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();

    let outcome = controller.measure_one_tire(0).unwrap();
    assert_eq!(outcome, TireOutcome::Skip(Direction::Forward));
    assert_eq!(controller.grid().measured_count(), 0);
    assert_eq!(controller.get_next_tire(0, Direction::Forward), 1);
}

#[test]
fn test_next_tire_wraps_through_done() {
    let profile = VehicleProfile::default();
    let mut rig = Rig::new([], settled(&[80.0]));
    let controller = SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();

    assert_eq!(controller.get_next_tire(3, Direction::Forward), 4);
    assert_eq!(controller.get_next_tire(4, Direction::Forward), 0);
    assert_eq!(controller.get_next_tire(0, Direction::Backward), 4);
    assert_eq!(controller.get_next_tire(4, Direction::Backward), 3);
}

#[test]
fn test_forward_sweep_skips_measured_wheels() {
    let profile = VehicleProfile::default();
    let mut session = MeasurementSession::begin(&profile);
    for wheel in [0, 2] {
        session.select_tire(wheel).unwrap();
        session.await_arm(0).unwrap();
        session.arm().unwrap();
        session.record(90.0).unwrap();
    }

    assert_eq!(session.next_tire(0, Direction::Forward), 1);
    assert_eq!(session.next_tire(1, Direction::Forward), 3);
    assert_eq!(session.next_tire(3, Direction::Forward), 4);
    assert_eq!(session.next_tire(4, Direction::Forward), 1);
}

#[test]
fn test_measured_zero_counts_as_measured() {
    let profile = VehicleProfile::default();
    let mut session = MeasurementSession::begin(&profile);
    session.await_arm(0).unwrap();
    session.arm().unwrap();
    session.record(0.0).unwrap();

    assert_eq!(session.next_tire(3, Direction::Forward), 4);
    assert_eq!(session.next_tire(4, Direction::Forward), 1);
}

#[test]
fn test_remeasure_after_moving_back() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut rig = Rig::new(
        [
            Primary, Primary, Primary, // wheel 0
            Previous, // wheel 1 -> back to wheel 0
            Primary, Primary, Primary, // wheel 0 again
            Next, Next, Next, Primary,
        ],
        settled(&[80.0, 82.0, 81.0, 90.0, 91.0, 92.0]),
    );
    let mut storage = MemoryStorage::new();
    let mut controller = SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();

    let SessionOutcome::Stored(record) = controller.run(&mut storage, &mut TextReport).unwrap()
    else {
        panic!("Expected a stored session");
    };
    assert_eq!(&record.temperatures[..4], &[90.0, 91.0, 92.0, 0.0]);
}

#[test]
fn test_cancel_mid_sample_discards_everything() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut rig = Rig::new(
        [Primary, Primary, Primary, Primary, Cancel],
        settled(&[80.0, 82.0, 81.0, 70.0]),
    );
    let mut storage = MemoryStorage::new();
    let mut controller = SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();

    let outcome = controller.run(&mut storage, &mut TextReport).unwrap();
    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(controller.session().state(), SessionState::Cancelled);
    assert_eq!(controller.grid().measured_count(), 0);
    assert_eq!(storage.paths().count(), 0);
}

#[test]
fn test_cancel_on_done_row() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut rig = Rig::new([Next, Next, Next, Next, Cancel], settled(&[80.0]));
    let mut storage = MemoryStorage::new();
    let mut controller = SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();

    assert_eq!(
        controller.run(&mut storage, &mut TextReport).unwrap(),
        SessionOutcome::Cancelled
    );
    assert_eq!(storage.paths().count(), 0);
}

#[test]
fn test_storage_fault_keeps_session_at_done() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut rig = Rig::new(
        [Primary, Primary, Primary, Next, Next, Next, Primary],
        settled(&[80.0, 82.0, 81.0]),
    );
    let mut storage = MemoryStorage::new();
    storage.set_read_only(true);
    let mut controller = SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();

    let result = controller.run(&mut storage, &mut TextReport);
    assert!(matches!(
        result,
        Err(SessionError::Storage(StorageError::ReadOnly(_)))
    ));
    assert_eq!(controller.session().state(), SessionState::AllDone);
    assert_eq!(controller.grid().get(0, 1), Some(82.0));

    storage.set_read_only(false);
    let record = controller.finalize(&mut storage, &mut TextReport).unwrap();
    assert_eq!(&record.temperatures[..3], &[80.0, 82.0, 81.0]);
    assert_eq!(controller.session().state(), SessionState::Stored);
}

struct BrokenReport;

impl ReportWriter for BrokenReport {
    fn regenerate(
        &mut self,
        _storage: &mut dyn Storage,
        _profile: &VehicleProfile,
    ) -> Result<(), StorageError> {
        Err(StorageError::ReadOnly("report.txt".to_string()))
    }
}

#[test]
fn test_report_failure_after_row_is_stored() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut rig = Rig::new([Next, Next, Next, Next, Primary], settled(&[80.0]));
    let mut storage = MemoryStorage::new();
    let mut controller = SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();

    let result = controller.run(&mut storage, &mut BrokenReport);
    assert!(matches!(result, Err(SessionError::Report(_))));
    assert_eq!(load_results(&storage, profile.id).unwrap().records.len(), 1);
}

#[test]
fn test_faulted_probe_shows_err_then_recovers() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut readings = vec![85.0, f64::NAN];
    readings.extend(repeat(85.0).take(15));
    let mut rig = Rig::new(
        [Primary, Primary, Primary, Primary, Next, Next, Next, Primary],
        ScriptedProbe::new(readings),
    );
    let mut storage = MemoryStorage::new();
    let mut controller = SessionController::new(&profile, &celsius(), rig.peripherals()).unwrap();

    let SessionOutcome::Stored(record) = controller.run(&mut storage, &mut TextReport).unwrap()
    else {
        panic!("Expected a stored session");
    };
    assert_eq!(&record.temperatures[..3], &[85.0, 85.0, 85.0]);
}

#[test]
fn test_fahrenheit_session_reads_in_fahrenheit() {
    use Button::*;
    let profile = VehicleProfile::default();
    let mut probe = SimulatedProbe::seeded(11);
    let mut display = NullDisplay;
    // Next after the first position is ignored; the trailing one keeps the script alive
    let mut buttons = ScriptedButtons::new([Primary, Next, Primary, Primary, Next]);
    let clock = FixedClock(TIMESTAMP.to_string());
    let mut delay = NoDelay::default();
    let settings = DeviceSettings::default();

    let mut controller = SessionController::new(
        &profile,
        &settings,
        Peripherals {
            display: &mut display,
            buttons: &mut buttons,
            probe: &mut probe,
            clock: &clock,
            delay: &mut delay,
        },
    )
    .unwrap();

    assert_eq!(controller.measure_one_tire(0).unwrap(), TireOutcome::Completed);
    for position in 0..3 {
        let value = controller.grid().get(0, position).unwrap();
        assert!((139.0..204.0).contains(&value), "{value}");
    }
    drop(controller);
    assert!(delay.elapsed_ms > 0);
}
