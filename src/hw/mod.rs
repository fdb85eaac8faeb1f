//! ESP32 hardware adapters (feature `embedded`).
//!
//! Each submodule implements exactly one collaborator trait from
//! [`crate::traits`]:
//!
//! - `lcd`    - HD44780 20x4 character LCD behind a PCF8574 I²C backpack
//! - `rotary` - quadrature encoder + push button as the wrapping knob
//! - `flash`  - internal flash slots via `sequential-storage`
//! - `wifi`   - station-mode radio via `esp-wifi`
//! - `http`   - price relay client over the blocking network stack

pub mod flash;
pub mod http;
pub mod lcd;
pub mod rotary;
pub mod wifi;

use crate::traits::Delay;

/// [`Delay`] over the HAL's blocking delay driver.
pub struct HalDelay(esp_hal::delay::Delay);

impl HalDelay {
    pub fn new() -> Self {
        Self(esp_hal::delay::Delay::new())
    }
}

impl Default for HalDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl Delay for HalDelay {
    fn sleep_ms(&mut self, ms: u32) {
        self.0.delay_millis(ms);
    }
}
