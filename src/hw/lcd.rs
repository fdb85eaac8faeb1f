//! HD44780 character LCD behind a PCF8574 I²C backpack.
//!
//! The panel is the classic 2004 module: four rows of twenty 5x8 cells,
//! with the interleaved DDRAM row addressing all HD44780 controllers
//! share.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use hd44780_driver::bus::I2CBus;
use hd44780_driver::{Cursor, CursorBlink, Display, DisplayMode, HD44780};

use crate::config::{GLYPH_CURSOR, LCD_COLS, LCD_ROWS};
use crate::traits::TextDisplay;

/// DDRAM start address of each row on a 20x4 panel.
const ROW_OFFSETS: [u8; LCD_ROWS] = [0x00, 0x40, 0x14, 0x54];

pub struct CharLcd<I2C, D> {
    lcd: Option<HD44780<I2CBus<I2C>>>,
    delay: D,
}

impl<I2C, D> CharLcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Initialise the panel. A display that fails to probe yields an
    /// inert sink - the control loop keeps running headless rather
    /// than refusing to boot.
    pub fn new(i2c: I2C, address: u8, mut delay: D) -> Self {
        let lcd = match HD44780::new_i2c(i2c, address, &mut delay) {
            Ok(mut lcd) => {
                let _ = lcd.reset(&mut delay);
                let _ = lcd.clear(&mut delay);
                let _ = lcd.set_display_mode(
                    DisplayMode {
                        display: Display::On,
                        cursor_visibility: Cursor::Invisible,
                        cursor_blink: CursorBlink::Off,
                    },
                    &mut delay,
                );
                Some(lcd)
            }
            Err(_) => None,
        };
        Self { lcd, delay }
    }
}

impl<I2C, D> TextDisplay for CharLcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn clear(&mut self) {
        if let Some(lcd) = self.lcd.as_mut() {
            let _ = lcd.clear(&mut self.delay);
        }
    }

    fn move_to(&mut self, col: u8, row: u8) {
        let row = (row as usize).min(LCD_ROWS - 1);
        let col = (col as usize).min(LCD_COLS - 1);
        if let Some(lcd) = self.lcd.as_mut() {
            let _ = lcd.set_cursor_pos(ROW_OFFSETS[row] + col as u8, &mut self.delay);
        }
    }

    fn put_str(&mut self, text: &str) {
        let Some(lcd) = self.lcd.as_mut() else {
            return;
        };
        for c in text.chars() {
            // The backpack driver exposes no CGRAM access, so the
            // custom-glyph code point falls back to ASCII.
            let c = if c == GLYPH_CURSOR { '>' } else { c };
            let _ = lcd.write_char(c, &mut self.delay);
        }
    }

    fn backlight_on(&mut self) {
        // Backpack backlight control is not exposed either; panel
        // on/off is the closest observable effect.
        if let Some(lcd) = self.lcd.as_mut() {
            let _ = lcd.set_display_mode(
                DisplayMode {
                    display: Display::On,
                    cursor_visibility: Cursor::Invisible,
                    cursor_blink: CursorBlink::Off,
                },
                &mut self.delay,
            );
        }
    }

    fn backlight_off(&mut self) {
        if let Some(lcd) = self.lcd.as_mut() {
            let _ = lcd.set_display_mode(
                DisplayMode {
                    display: Display::Off,
                    cursor_visibility: Cursor::Invisible,
                    cursor_blink: CursorBlink::Off,
                },
                &mut self.delay,
            );
        }
    }

    fn define_glyph(&mut self, _slot: u8, _bitmap: [u8; 8]) {
        // See put_str: without CGRAM access the glyph is emulated.
    }

    fn size(&self) -> (u8, u8) {
        (LCD_COLS as u8, LCD_ROWS as u8)
    }
}
