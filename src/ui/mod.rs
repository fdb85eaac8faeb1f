//! User interface subsystem - 20x4 character LCD + rotary knob.
//!
//! Everything the user does goes through two blocking primitives driven
//! by the same knob:
//!
//! - **Menu** - paged selection over a list of items
//!   ([`crate::traits::Context::select`])
//! - **Charpad** - character-by-character text entry over a generated
//!   alphabet ([`crate::traits::Context::read_line`])
//!
//! Both poll the knob on the shared tick and exit through their button
//! debounce, so a selection never bleeds into the next screen.

pub mod charpad;
pub mod menu;
pub mod render;

use core::fmt::Write as _;

use heapless::String;

use crate::config::{LABEL_MAX, POLL_PERIOD_MS};
use crate::track::Pair;
use crate::traits::{Context, Delay, RotaryKnob};

/// Sentinel label used by flows that need a "go back" row.
pub const RETURN_LABEL: &str = "(RETURN)";

/// One selectable menu entry.
///
/// Callers branch on the returned variant, not on rendered text, so a
/// pair row and a label row that happen to render alike stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    /// Plain text row.
    Label(String<LABEL_MAX>),
    /// Tradable pair row, rendered "BASE/QUOTE".
    Pair(Pair),
}

impl MenuItem {
    /// Truncating label constructor.
    pub fn label(text: &str) -> Self {
        let mut out = String::new();
        for c in text.chars().take(LABEL_MAX) {
            let _ = out.push(c);
        }
        MenuItem::Label(out)
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            MenuItem::Label(s) => Some(s.as_str()),
            MenuItem::Pair(_) => None,
        }
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            MenuItem::Pair(p) => Some(p),
            MenuItem::Label(_) => None,
        }
    }

    /// Row text, without the selection glyph.
    pub fn render(&self) -> String<LABEL_MAX> {
        match self {
            MenuItem::Label(s) => s.clone(),
            MenuItem::Pair(p) => {
                let mut out = String::new();
                let _ = write!(out, "{}/{}", p.base_upper(), p.quote_upper());
                out
            }
        }
    }

    pub fn is_return(&self) -> bool {
        self.as_label() == Some(RETURN_LABEL)
    }
}

impl<D, R, S, W, P, T> Context<D, R, S, W, P, T>
where
    R: RotaryKnob,
    T: Delay,
{
    /// Block until the knob button is released (debounce).
    pub(crate) fn wait_release(&mut self) {
        while self.knob.button_pressed() {
            self.delay.sleep_ms(POLL_PERIOD_MS);
        }
    }
}
