//! Collaborator seams between the core logic and the outside world.
//!
//! Every piece of hardware and I/O the device touches sits behind one of
//! these traits, so the menu, text-entry and polling state machines run
//! unchanged on the host (with scripted fakes) and on the target (with
//! the adapters in `hw`).
//!
//! All of them are carried by one owned [`Context`], constructed once at
//! startup and threaded through explicitly - there are no process-wide
//! singletons.

use heapless::Vec;

use crate::config::{MAX_QUOTES, MAX_SCAN_RESULTS};
use crate::error::{FetchError, LinkError, StoreError};
use crate::net::Ssid;
use crate::track::{Pair, Symbol};

/// Fixed-width character display, at least 20 columns by 4 rows.
///
/// Methods are infallible by design: a failed bus transaction produces a
/// garbled frame, not a dead control loop, so adapters swallow bus
/// errors the way the rest of the firmware swallows draw errors.
pub trait TextDisplay {
    /// Blank the screen and home the cursor.
    fn clear(&mut self);

    /// Move the write position to (column, row), zero-based.
    fn move_to(&mut self, col: u8, row: u8);

    /// Write text at the current position; excess columns are dropped.
    fn put_str(&mut self, text: &str);

    fn backlight_on(&mut self);

    fn backlight_off(&mut self);

    /// Program a custom glyph into character-generator slot `slot`.
    fn define_glyph(&mut self, slot: u8, bitmap: [u8; 8]);

    /// (columns, rows) of the sink. Rendering truncates to `columns`.
    fn size(&self) -> (u8, u8);
}

/// Rotary encoder with a wrapping position counter and a push button.
pub trait RotaryKnob {
    /// Bind the counter to `[min, max]` and preset it to `initial`.
    /// Turning past either end wraps to the other.
    fn set_range(&mut self, min: u16, max: u16, initial: u16);

    /// Current counter value within the bound range.
    fn value(&mut self) -> u16;

    /// Momentary state of the push button (true while held down).
    fn button_pressed(&mut self) -> bool;
}

/// Durable named-slot store. Whole-value overwrite, last writer wins.
pub trait SlotStore {
    /// Read a slot into `buf`, returning the record length.
    ///
    /// An absent slot is a normal condition (first run) and reports as
    /// `Ok(None)`, never as an error.
    fn read_slot(&mut self, slot: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError>;

    /// Replace the slot contents.
    fn write_slot(&mut self, slot: &str, data: &[u8]) -> Result<(), StoreError>;
}

/// Wireless link management.
///
/// `connect` only *starts* an association; completion is observed by
/// polling [`WifiLink::is_connected`].
pub trait WifiLink {
    fn is_connected(&mut self) -> bool;

    /// Scan for visible networks, deduplicated, strongest first if the
    /// driver sorts them.
    fn scan(&mut self, out: &mut Vec<Ssid, MAX_SCAN_RESULTS>) -> Result<(), LinkError>;

    /// Begin associating with `ssid` using `secret`.
    fn connect(&mut self, ssid: &str, secret: &str) -> Result<(), LinkError>;

    /// Power the radio down (used to unwedge a failed association).
    fn radio_off(&mut self);

    fn radio_on(&mut self);
}

/// Price backend. The transport (direct HTTP or a broker relay) is
/// opaque here; adapters map transport problems onto [`FetchError`].
pub trait PriceSource {
    /// Latest price of `pair`, in units of its quote currency.
    fn fetch_price(&mut self, pair: &Pair) -> Result<f64, FetchError>;

    /// Quote currencies the backend can price against.
    fn supported_quotes(&mut self, out: &mut Vec<Symbol, MAX_QUOTES>) -> Result<(), FetchError>;
}

/// Blocking sleep, the only way any loop in the firmware waits.
pub trait Delay {
    fn sleep_ms(&mut self, ms: u32);
}

/// Owned bundle of every collaborator, threaded through all components.
pub struct Context<D, R, S, W, P, T> {
    pub display: D,
    pub knob: R,
    pub store: S,
    pub link: W,
    pub source: P,
    pub delay: T,
}

impl<D, R, S, W, P, T> Context<D, R, S, W, P, T> {
    pub fn new(display: D, knob: R, store: S, link: W, source: P, delay: T) -> Self {
        Self {
            display,
            knob,
            store,
            link,
            source,
            delay,
        }
    }
}
