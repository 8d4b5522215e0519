//! # Pyrometer Core Library
//!
//! Core functionality for the recording tire pyrometer.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Probe stabilization (deciding when a thermocouple reading has settled)
//! - The tire-by-tire measurement session state machine
//! - Vehicle profiles and their line-oriented configuration store
//! - Result record encoding, decoding and per-vehicle result files
//! - Device settings and a plain-text report writer
//!
//! Hardware (display, buttons, thermocouple amplifier, clock, storage) is
//! reached only through the traits in [`hardware`] and [`storage`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use pyrometer_core::prelude::*;
//!
//! let mut storage = FsStorage::new("/sd");
//! let settings = DeviceSettings::load_or_default(&storage)?;
//! let profiles = ProfileCollection::load_or_init(&mut storage)?;
//!
//! let mut controller = SessionController::new(profiles.selected(), &settings, peripherals)?;
//! match controller.run(&mut storage, &mut TextReport)? {
//!     SessionOutcome::Stored(record) => println!("saved {}", record.timestamp),
//!     SessionOutcome::Cancelled => println!("discarded"),
//! }
//! ```

pub mod demo;
pub mod grid;
pub mod hardware;
pub mod instant;
pub mod profile;
pub mod record;
pub mod report;
pub mod sampler;
pub mod session;
pub mod settings;
pub mod storage;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::demo::{ScriptedProbe, SimulatedProbe};
    pub use crate::grid::MeasurementGrid;
    pub use crate::hardware::{
        Button, ButtonInput, CellDisplay, Clock, Color, Delay, FixedClock, NoDelay,
        ScriptedButtons, StdDelay, SystemClock, Thermocouple,
    };
    pub use crate::profile::{Position, ProfileCollection, VehicleProfile, Wheel};
    pub use crate::record::{RecordError, ResultRecord};
    pub use crate::report::{ReportWriter, TextReport};
    pub use crate::sampler::{Sample, Sampler, SamplerConfig, SensorFault, StabilizationWindow};
    pub use crate::session::{
        Direction, MeasurementSession, Peripherals, SessionController, SessionError,
        SessionOutcome, SessionState, TireOutcome,
    };
    pub use crate::settings::DeviceSettings;
    pub use crate::storage::{FsStorage, MemoryStorage, Storage, StorageError};
    pub use crate::units::TempUnits;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
