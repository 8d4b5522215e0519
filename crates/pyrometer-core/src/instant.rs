//! Instant read
//!
//! Continuously shows the raw probe reading without any stabilization or
//! recording, until the operator presses Primary or Cancel.

use crate::hardware::{Button, Color};
use crate::sampler::SamplerConfig;
use crate::session::Peripherals;
use crate::units::TempUnits;

/// Display row used for the live reading
const ROW: usize = 0;

/// Show live readings until Primary or Cancel is released.
///
/// Returns the last valid reading, if any.
pub fn watch_temperature(
    io: &mut Peripherals<'_>,
    units: TempUnits,
    config: &SamplerConfig,
) -> Option<f64> {
    let mut last = None;
    io.display
        .draw_cell(ROW, 0, units.symbol(), Color::White, Color::Black);

    loop {
        if io.buttons.released(Button::Primary) || io.buttons.released(Button::Cancel) {
            return last;
        }

        let reading = io.probe.read_temperature(units);
        if reading.is_finite() {
            io.display.draw_cell(
                ROW,
                1,
                &format!("{:.1}", reading),
                Color::Green,
                Color::Black,
            );
            last = Some(reading);
        } else {
            tracing::debug!("Instant read fault: {}", reading);
            io.display.draw_cell(ROW, 1, "ERR", Color::Red, Color::Black);
        }
        io.delay.delay_ms(config.sample_interval_ms);
    }
}
