//! Scripted collaborator fakes for host-side tests.
//!
//! Interactive loops are tested by scripting the knob (one counter
//! value and one button sample per poll) and the link (one answer per
//! `is_connected` call), then asserting on the captured display grid
//! and store contents.

use std::collections::HashMap;
use std::string::String as StdString;
use std::vec::Vec as StdVec;

use heapless::Vec;

use crate::config::{LCD_COLS, LCD_ROWS, MAX_QUOTES, MAX_SCAN_RESULTS};
use crate::error::{FetchError, LinkError, StoreError};
use crate::net::Ssid;
use crate::track::{Pair, Symbol};
use crate::traits::{Context, Delay, PriceSource, RotaryKnob, SlotStore, TextDisplay, WifiLink};

pub type TestContext =
    Context<MockDisplay, ScriptKnob, MemStore, ScriptLink, ScriptSource, CountingDelay>;

/// Fresh context with inert fakes; tests swap in scripted ones.
pub fn ctx() -> TestContext {
    Context::new(
        MockDisplay::new(),
        ScriptKnob::new(&[0], &[]),
        MemStore::new(),
        ScriptLink::down(),
        ScriptSource::prices(vec![]),
        CountingDelay::default(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// Display
// ═══════════════════════════════════════════════════════════════════════════

/// Character-grid display capture.
///
/// `grid` is the live frame; `last_frame` is a snapshot of the frame as
/// it looked just before the most recent `clear`, so tests can inspect
/// a screen that an exit path already wiped.
pub struct MockDisplay {
    pub grid: [[char; LCD_COLS]; LCD_ROWS],
    pub last_frame: [[char; LCD_COLS]; LCD_ROWS],
    pub clears: usize,
    pub backlight: bool,
    pub glyphs: StdVec<(u8, [u8; 8])>,
    col: usize,
    row: usize,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            grid: [[' '; LCD_COLS]; LCD_ROWS],
            last_frame: [[' '; LCD_COLS]; LCD_ROWS],
            clears: 0,
            backlight: false,
            glyphs: StdVec::new(),
            col: 0,
            row: 0,
        }
    }

    /// Current text of a row, without trailing blanks.
    pub fn row_text(&self, row: usize) -> StdString {
        let s: StdString = self.grid[row].iter().collect();
        s.trim_end().to_string()
    }

    /// Row text from the snapshot taken at the last `clear`, with
    /// trailing blanks kept (centered lines pad to full width).
    pub fn frame_row(&self, row: usize) -> StdString {
        self.last_frame[row].iter().collect()
    }
}

impl TextDisplay for MockDisplay {
    fn clear(&mut self) {
        self.last_frame = self.grid;
        self.grid = [[' '; LCD_COLS]; LCD_ROWS];
        self.col = 0;
        self.row = 0;
        self.clears += 1;
    }

    fn move_to(&mut self, col: u8, row: u8) {
        self.col = col as usize;
        self.row = row as usize;
    }

    fn put_str(&mut self, text: &str) {
        for c in text.chars() {
            if self.row < LCD_ROWS && self.col < LCD_COLS {
                self.grid[self.row][self.col] = c;
                self.col += 1;
            }
        }
    }

    fn backlight_on(&mut self) {
        self.backlight = true;
    }

    fn backlight_off(&mut self) {
        self.backlight = false;
    }

    fn define_glyph(&mut self, slot: u8, bitmap: [u8; 8]) {
        self.glyphs.push((slot, bitmap));
    }

    fn size(&self) -> (u8, u8) {
        (LCD_COLS as u8, LCD_ROWS as u8)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Knob
// ═══════════════════════════════════════════════════════════════════════════

/// Knob that replays one counter value per `value()` call and one
/// button sample per `button_pressed()` call.  Exhausted scripts repeat
/// the last value (resp. report "released").
pub struct ScriptKnob {
    values: StdVec<u16>,
    presses: StdVec<bool>,
    value_pos: usize,
    press_pos: usize,
    pub ranges: StdVec<(u16, u16, u16)>,
    pub button_polls: usize,
}

impl ScriptKnob {
    pub fn new(values: &[u16], presses: &[bool]) -> Self {
        Self {
            values: values.to_vec(),
            presses: presses.to_vec(),
            value_pos: 0,
            press_pos: 0,
            ranges: StdVec::new(),
            button_polls: 0,
        }
    }
}

impl RotaryKnob for ScriptKnob {
    fn set_range(&mut self, min: u16, max: u16, initial: u16) {
        self.ranges.push((min, max, initial));
    }

    fn value(&mut self) -> u16 {
        let v = self
            .values
            .get(self.value_pos)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or(0);
        self.value_pos += 1;
        v
    }

    fn button_pressed(&mut self) -> bool {
        self.button_polls += 1;
        let v = self.presses.get(self.press_pos).copied().unwrap_or(false);
        self.press_pos += 1;
        v
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Store
// ═══════════════════════════════════════════════════════════════════════════

/// In-memory slot store.
pub struct MemStore {
    slots: HashMap<StdString, StdVec<u8>>,
    pub fail_writes: bool,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            fail_writes: false,
        }
    }

    /// Seed a slot with raw bytes (e.g. deliberately corrupt records).
    pub fn put_raw(&mut self, slot: &str, data: &[u8]) {
        self.slots.insert(slot.to_string(), data.to_vec());
    }

    pub fn get_raw(&self, slot: &str) -> Option<&[u8]> {
        self.slots.get(slot).map(|v| v.as_slice())
    }
}

impl SlotStore for MemStore {
    fn read_slot(&mut self, slot: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        match self.slots.get(slot) {
            None => Ok(None),
            Some(data) => {
                if data.len() > buf.len() {
                    return Err(StoreError::Read);
                }
                buf[..data.len()].copy_from_slice(data);
                Ok(Some(data.len()))
            }
        }
    }

    fn write_slot(&mut self, slot: &str, data: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write);
        }
        self.slots.insert(slot.to_string(), data.to_vec());
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Link
// ═══════════════════════════════════════════════════════════════════════════

/// Wi-Fi link fake: `connected_script` is consumed one entry per
/// `is_connected` call, after which `default_connected` applies.
pub struct ScriptLink {
    pub connected_script: StdVec<bool>,
    pub default_connected: bool,
    pub scan_results: StdVec<StdVec<&'static str>>,
    pub scan_fail: bool,
    pub connect_ok: bool,
    pub connect_calls: StdVec<(StdString, StdString)>,
    pub scan_count: usize,
    pub radio_on_count: usize,
    pub radio_off_count: usize,
    connected_pos: usize,
    scan_pos: usize,
}

impl ScriptLink {
    fn base(default_connected: bool) -> Self {
        Self {
            connected_script: StdVec::new(),
            default_connected,
            scan_results: StdVec::new(),
            scan_fail: false,
            connect_ok: false,
            connect_calls: StdVec::new(),
            scan_count: 0,
            radio_on_count: 0,
            radio_off_count: 0,
            connected_pos: 0,
            scan_pos: 0,
        }
    }

    /// Link that is always up.
    pub fn up() -> Self {
        Self::base(true)
    }

    /// Link that is always down.
    pub fn down() -> Self {
        Self::base(false)
    }

    /// Link that answers "up" for the first `n` polls, then drops.
    pub fn up_for(n: usize) -> Self {
        let mut link = Self::base(false);
        link.connected_script = vec![true; n];
        link
    }
}

impl WifiLink for ScriptLink {
    fn is_connected(&mut self) -> bool {
        let v = self
            .connected_script
            .get(self.connected_pos)
            .copied()
            .unwrap_or(self.default_connected);
        self.connected_pos += 1;
        v
    }

    fn scan(&mut self, out: &mut Vec<Ssid, MAX_SCAN_RESULTS>) -> Result<(), LinkError> {
        self.scan_count += 1;
        if self.scan_fail {
            return Err(LinkError::ScanFailed);
        }
        if let Some(names) = self
            .scan_results
            .get(self.scan_pos)
            .or_else(|| self.scan_results.last())
        {
            for name in names {
                let _ = out.push(crate::net::ssid(name));
            }
        }
        self.scan_pos += 1;
        Ok(())
    }

    fn connect(&mut self, ssid: &str, secret: &str) -> Result<(), LinkError> {
        self.connect_calls.push((ssid.into(), secret.into()));
        if self.connect_ok {
            Ok(())
        } else {
            Err(LinkError::ConnectFailed)
        }
    }

    fn radio_off(&mut self) {
        self.radio_off_count += 1;
    }

    fn radio_on(&mut self) {
        self.radio_on_count += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Price source
// ═══════════════════════════════════════════════════════════════════════════

/// Price backend fake.
pub struct ScriptSource {
    pub prices: StdVec<Result<f64, FetchError>>,
    pub constant_price: Option<f64>,
    pub quotes: Option<StdVec<&'static str>>,
    pub price_calls: usize,
    pub fetched_pairs: StdVec<Pair>,
    price_pos: usize,
}

impl ScriptSource {
    /// Answer fetches from a finite script; exhausted → transport error.
    pub fn prices(prices: StdVec<Result<f64, FetchError>>) -> Self {
        Self {
            prices,
            constant_price: None,
            quotes: None,
            price_calls: 0,
            fetched_pairs: StdVec::new(),
            price_pos: 0,
        }
    }

    /// Answer every fetch with the same price.
    pub fn constant(price: f64) -> Self {
        let mut s = Self::prices(vec![]);
        s.constant_price = Some(price);
        s
    }

    /// Backend that also knows its quote currencies.
    pub fn with_quotes(quotes: &[&'static str]) -> Self {
        let mut s = Self::prices(vec![]);
        s.quotes = Some(quotes.to_vec());
        s
    }
}

impl PriceSource for ScriptSource {
    fn fetch_price(&mut self, pair: &Pair) -> Result<f64, FetchError> {
        self.price_calls += 1;
        self.fetched_pairs.push(pair.clone());
        if let Some(price) = self.constant_price {
            return Ok(price);
        }
        let result = self
            .prices
            .get(self.price_pos)
            .copied()
            .unwrap_or(Err(FetchError::Transport));
        self.price_pos += 1;
        result
    }

    fn supported_quotes(&mut self, out: &mut Vec<Symbol, MAX_QUOTES>) -> Result<(), FetchError> {
        match &self.quotes {
            Some(names) => {
                for name in names {
                    let _ = out.push(crate::track::symbol(name));
                }
                Ok(())
            }
            None => Err(FetchError::Transport),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Delay
// ═══════════════════════════════════════════════════════════════════════════

/// No-op delay that accumulates requested sleep time.
#[derive(Default)]
pub struct CountingDelay {
    pub slept_ms: u64,
}

impl Delay for CountingDelay {
    fn sleep_ms(&mut self, ms: u32) {
        self.slept_ms += ms as u64;
    }
}
