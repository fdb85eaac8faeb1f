//! Cadence-timed price tracking loops.
//!
//! Both loops share one shape: every 50 ms tick they check the link,
//! sample the knob, and bump a cadence accumulator; once the
//! accumulator crosses the fetch cadence, exactly one fetch runs and
//! the accumulator resets.  Between cadence boundaries nothing but the
//! link and the knob are touched.
//!
//! Knob movement is the universal "back to menu" gesture: it persists
//! an Idle session and exits the loop within one tick.  It is not a
//! selection.

use core::fmt::Write as _;

use heapless::Vec;

use crate::config::{
    FETCH_CADENCE_MS, LCD_COLS, MAX_PAIRS, POLL_PERIOD_MS, STATUS_PAUSE_MS, TRACKER_KNOB_RANGE,
};
use crate::error::Error;
use crate::session::{Mode, Session};
use crate::track::{Pair, Watchlist};
use crate::traits::{Context, Delay, PriceSource, RotaryKnob, SlotStore, TextDisplay, WifiLink};
use crate::ui::render::{centered, put_line, status};
use crate::ui::MenuItem;

/// Why a tracking loop handed control back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExitReason {
    /// The knob moved; an Idle session is already persisted.
    Interrupted,
    /// The link dropped; reconnect before doing anything else.
    LinkLost,
    /// The watchlist is empty; run the add-pair flow once.
    NoItems,
}

impl<D, R, S, W, P, T> Context<D, R, S, W, P, T>
where
    D: TextDisplay,
    R: RotaryKnob,
    S: SlotStore,
    W: WifiLink,
    P: PriceSource,
    T: Delay,
{
    /// Track one pair. Without a `focus`, the user picks one from the
    /// watchlist first (that re-entry point is what a persisted
    /// focus-less TrackSingle session resumes into).
    pub fn track_single(&mut self, focus: Option<Pair>) -> Result<ExitReason, Error> {
        Session::new(Mode::TrackSingle, None).save(&mut self.store)?;

        let pair = match focus {
            Some(pair) => pair,
            None => {
                let list = Watchlist::load(&mut self.store)?;
                if list.is_empty() {
                    status(&mut self.display, "No pairs found!");
                    self.delay.sleep_ms(STATUS_PAUSE_MS);
                    return Ok(ExitReason::NoItems);
                }
                let mut items: Vec<MenuItem, { MAX_PAIRS + 1 }> = Vec::new();
                for pair in list.iter() {
                    let _ = items.push(MenuItem::Pair(pair.clone()));
                }
                let _ = items.push(MenuItem::label(crate::ui::RETURN_LABEL));

                match self.select(&items, Some("Select pair:"))? {
                    MenuItem::Pair(pair) => pair.clone(),
                    MenuItem::Label(_) => {
                        Session::idle().save(&mut self.store)?;
                        return Ok(ExitReason::Interrupted);
                    }
                }
            }
        };

        Session::new(Mode::TrackSingle, Some(pair.clone())).save(&mut self.store)?;

        self.display.clear();
        put_line(&mut self.display, 0, &header(&pair));
        put_line(&mut self.display, 2, &centered("Tracking..."));

        self.knob.set_range(0, TRACKER_KNOB_RANGE, 0);
        let mut knob_rest = self.knob.value();
        let mut cadence_ms: u32 = 0;

        loop {
            if !self.link.is_connected() {
                status(&mut self.display, "Not connected!");
                self.delay.sleep_ms(STATUS_PAUSE_MS);
                return Ok(ExitReason::LinkLost);
            }
            let value = self.knob.value();
            if value != knob_rest {
                Session::idle().save(&mut self.store)?;
                return Ok(ExitReason::Interrupted);
            }
            knob_rest = value;

            if cadence_ms >= FETCH_CADENCE_MS {
                cadence_ms = 0;
                let price = self.fetch_with_retry(&pair)?;
                put_line(&mut self.display, 2, &price_line(price, &pair));
            }

            self.delay.sleep_ms(POLL_PERIOD_MS);
            cadence_ms += POLL_PERIOD_MS;
        }
    }

    /// Track the whole watchlist round-robin, one pair per cadence
    /// tick, wrapping back to the first after the last.
    pub fn track_multi(&mut self) -> Result<ExitReason, Error> {
        status(&mut self.display, "Loading coins...");
        let list = Watchlist::load(&mut self.store)?;
        if list.is_empty() {
            status(&mut self.display, "No pairs found!");
            self.delay.sleep_ms(STATUS_PAUSE_MS);
            return Ok(ExitReason::NoItems);
        }

        Session::new(Mode::TrackMultiple, None).save(&mut self.store)?;

        self.knob.set_range(0, TRACKER_KNOB_RANGE, 0);
        let mut knob_rest = self.knob.value();
        let mut cadence_ms: u32 = 0;
        let mut index: usize = 0;

        loop {
            if !self.link.is_connected() {
                status(&mut self.display, "Not connected!");
                self.delay.sleep_ms(STATUS_PAUSE_MS);
                return Ok(ExitReason::LinkLost);
            }
            let value = self.knob.value();
            if value != knob_rest {
                Session::idle().save(&mut self.store)?;
                return Ok(ExitReason::Interrupted);
            }
            knob_rest = value;

            if cadence_ms >= FETCH_CADENCE_MS {
                cadence_ms = 0;
                // Cursor invariant: index always addresses a live entry.
                let pair = match list.get(index) {
                    Some(pair) => pair.clone(),
                    None => return Err(Error::CorruptRecord),
                };
                let price = self.fetch_with_retry(&pair)?;
                self.display.clear();
                put_line(&mut self.display, 0, &header(&pair));
                put_line(&mut self.display, 2, &price_line(price, &pair));
                index = (index + 1) % list.len();
            }

            self.delay.sleep_ms(POLL_PERIOD_MS);
            cadence_ms += POLL_PERIOD_MS;
        }
    }
}

/// "BASE:" centered header row.
fn header(pair: &Pair) -> heapless::String<LCD_COLS> {
    let mut text: heapless::String<16> = heapless::String::new();
    let _ = write!(text, "{}:", pair.base_upper());
    centered(&text)
}

/// "<price> QUOTE" centered price row.
fn price_line(price: f64, pair: &Pair) -> heapless::String<LCD_COLS> {
    let mut text: heapless::String<{ LCD_COLS }> = heapless::String::new();
    let _ = write!(text, "{} {}", price, pair.quote_upper());
    centered(&text)
}
