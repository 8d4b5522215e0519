//! Host simulator for the pyrometer core.
//!
//! Runs one full tire sweep of the selected vehicle against a simulated
//! probe and a scripted operator, storing results under a data directory
//! laid out like the device's SD card.
//!
//! ```text
//! pyrometer-sim [DATA_DIR] [--instant] [--realtime]
//! pyrometer-sim [DATA_DIR] --delete-results
//! pyrometer-sim --help
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pyrometer_core::instant::watch_temperature;
use pyrometer_core::prelude::*;
use pyrometer_core::report::report_path;
use pyrometer_core::storage::results::delete_results;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_DIR: &str = "./pyrometer-data";

/// Instant-read polls before the scripted operator presses Primary
const INSTANT_READS: usize = 20;

/// Keeps the latest text of every cell and prints the grid on demand
#[derive(Default)]
struct TextDisplay {
    rows: Vec<Vec<String>>,
}

impl CellDisplay for TextDisplay {
    fn draw_cell(&mut self, row: usize, col: usize, text: &str, fg: Color, bg: Color) {
        tracing::trace!("cell ({}, {}) = {:?} [{:?} on {:?}]", row, col, text, fg, bg);
        if self.rows.len() <= row {
            self.rows.resize(row + 1, Vec::new());
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = text.to_string();
    }
}

impl TextDisplay {
    fn print(&self) {
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|c| format!("{:>7}", c)).collect();
            println!("{}", line.join(" "));
        }
    }
}

/// Presses Primary after a fixed number of polls
struct PressAfter(usize);

impl ButtonInput for PressAfter {
    fn released(&mut self, button: Button) -> bool {
        if button != Button::Primary {
            return false;
        }
        if self.0 == 0 {
            return true;
        }
        self.0 -= 1;
        false
    }
}

#[derive(Parser, Debug)]
#[command(name = "pyrometer-sim")]
#[command(about = "Run a tire sweep against a simulated probe", long_about = None)]
struct Args {
    /// Directory standing in for the device's SD card
    #[arg(value_name = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Show live readings instead of running a sweep
    #[arg(long, default_value_t = false)]
    instant: bool,

    /// Pace polls and readings in real time
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Delete the selected vehicle's results and report, then exit
    #[arg(long, default_value_t = false, conflicts_with = "instant")]
    delete_results: bool,
}

/// One Primary per position of every wheel, then Primary on the Done row
fn sweep_script(profile: &VehicleProfile) -> ScriptedButtons {
    let presses = profile.wheel_count() * profile.position_count() + 1;
    ScriptedButtons::new(std::iter::repeat(Button::Primary).take(presses))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.data_dir).with_context(|| {
        format!("Failed to create data directory {}", args.data_dir.display())
    })?;
    let mut storage = FsStorage::new(&args.data_dir);

    let settings =
        DeviceSettings::load_or_default(&storage).context("Failed to load device settings")?;
    let profiles =
        ProfileCollection::load_or_init(&mut storage).context("Failed to load vehicle profiles")?;
    let profile = profiles.selected().clone();
    tracing::info!(
        "Pyrometer simulator v{}: '{}' in {}",
        pyrometer_core::VERSION,
        profile.name,
        settings.temp_units.symbol()
    );

    if args.delete_results {
        delete_results(&mut storage, profile.id)
            .with_context(|| format!("Failed to delete results for '{}'", profile.name))?;
        println!("Deleted results for '{}'", profile.name);
        return Ok(());
    }

    let mut display = TextDisplay::default();
    let mut probe = SimulatedProbe::new();
    let clock = settings.clock();
    let mut std_delay = StdDelay;
    let mut no_delay = NoDelay::default();
    let delay: &mut dyn Delay = if args.realtime {
        &mut std_delay
    } else {
        &mut no_delay
    };

    if args.instant {
        let mut buttons = PressAfter(INSTANT_READS);
        let mut io = Peripherals {
            display: &mut display,
            buttons: &mut buttons,
            probe: &mut probe,
            clock: &clock,
            delay,
        };
        let last = watch_temperature(&mut io, settings.temp_units, &settings.sampler);
        display.print();
        match last {
            Some(value) => println!("Last reading: {:.1}{}", value, settings.temp_units.symbol()),
            None => println!("No valid reading"),
        }
        return Ok(());
    }

    let mut buttons = sweep_script(&profile);
    let outcome = {
        let mut controller = SessionController::new(
            &profile,
            &settings,
            Peripherals {
                display: &mut display,
                buttons: &mut buttons,
                probe: &mut probe,
                clock: &clock,
                delay,
            },
        )
        .context("Failed to start session")?;
        controller
            .run(&mut storage, &mut TextReport)
            .context("Session failed")?
    };

    display.print();
    match outcome {
        SessionOutcome::Stored(record) => {
            println!("Stored: {}", record.encode());
            println!(
                "Report: {}",
                storage.root().join(report_path(profile.id)).display()
            );
        }
        SessionOutcome::Cancelled => println!("Session cancelled"),
    }
    Ok(())
}
