//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, capacity limits, storage slot names and
//! hardware assignments live here so they can be tuned in one place.

// Display

/// Character columns on the LCD (HD44780 2004 module).
pub const LCD_COLS: usize = 20;

/// Character rows on the LCD.
pub const LCD_ROWS: usize = 4;

/// CGRAM slot used for the cursor/selection glyph.
pub const GLYPH_CURSOR_SLOT: u8 = 0;

/// Character code that renders the cursor glyph once defined.
pub const GLYPH_CURSOR: char = '\u{0}';

/// 5x8 bitmap for the cursor glyph (a small right-pointing arrow).
pub const GLYPH_CURSOR_BITMAP: [u8; 8] = [0x00, 0x04, 0x06, 0x1F, 0x1F, 0x06, 0x04, 0x00];

// Timing

/// Shared polling granularity of every interactive loop (ms).
pub const POLL_PERIOD_MS: u32 = 50;

/// Interval between successive price fetches inside a tracking loop (ms).
pub const FETCH_CADENCE_MS: u32 = 5_000;

/// How long transient status lines stay on screen (ms).
pub const STATUS_PAUSE_MS: u32 = 1_000;

/// Shorter settle pause used by splash/backlight effects (ms).
pub const SHORT_PAUSE_MS: u32 = 500;

/// Cool-down before the control loop restarts after a fatal error (ms).
pub const RESTART_COOLDOWN_MS: u32 = 5_000;

// Text entry

/// Maximum length of a line entered with the rotary knob.
pub const INPUT_MAX: usize = 40;

/// Maximum rendered length of a menu entry label.
pub const LABEL_MAX: usize = 32;

/// Maximum length of an asset or quote-currency symbol.
pub const SYMBOL_MAX: usize = 12;

// Wi-Fi

/// Maximum number of access points kept from one scan pass.
pub const MAX_SCAN_RESULTS: usize = 16;

/// Maximum number of remembered networks.
pub const MAX_NETWORKS: usize = 8;

/// Maximum SSID length (802.11 limit).
pub const SSID_MAX: usize = 32;

/// Maximum stored passphrase length.
pub const SECRET_MAX: usize = 40;

/// Settle delay after issuing a connect before polling the link (ms).
pub const CONNECT_SETTLE_MS: u32 = 2_500;

/// Number of link polls after the settle delay before giving up.
pub const CONNECT_ATTEMPTS: u8 = 5;

/// Delay between link polls while waiting for a connect (ms).
pub const CONNECT_POLL_DELAY_MS: u32 = 1_000;

// Fetching

/// Attempts per cadence tick before a fetch failure escalates.
pub const FETCH_ATTEMPTS: u8 = 3;

/// Delay between fetch retries (ms).
pub const FETCH_RETRY_DELAY_MS: u32 = 500;

/// Knob range bound while a tracking loop runs (any movement exits).
pub const TRACKER_KNOB_RANGE: u16 = 50;

// Watchlist

/// Maximum number of tracked pairs.
pub const MAX_PAIRS: usize = 16;

/// Maximum number of cached quote currencies.
pub const MAX_QUOTES: usize = 32;

// Persistent storage slots

/// Remembered Wi-Fi credentials (whole map, last writer wins).
pub const SLOT_NETWORKS: &str = "networks";

/// Tracked pair list.
pub const SLOT_PAIRS: &str = "pairs";

/// Session to resume after a restart.
pub const SLOT_SESSION: &str = "state";

/// Cached quote-currency list.
pub const SLOT_QUOTES: &str = "coins";

/// Scratch buffer size for reading/writing any one slot.
pub const SLOT_BUF_SIZE: usize = 1024;

// GPIO pin assignments (ESP32 devkit defaults)
//
// These are logical names; the concrete `esp_hal` pins are selected in
// `main.rs`.  Adjust for your wiring.
//
//   Encoder CLK    → GPIO15
//   Encoder DT     → GPIO4
//   Encoder button → GPIO34 (input only, external pull-down)
//   I²C SDA        → GPIO21
//   I²C SCL        → GPIO22

/// I²C address of the PCF8574 LCD backpack.
pub const LCD_I2C_ADDR: u8 = 0x27;
