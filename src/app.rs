//! Top-level control flow: boot, dispatch, menus, failure recovery.
//!
//! One explicit loop owns the screen.  Each pass checks the link,
//! reloads the persisted session and dispatches into the mode it names;
//! flows hand control back by returning (never by re-entering
//! themselves), so the stack stays flat no matter how long the device
//! runs.
//!
//! Anything that escapes dispatch as an `Err` is treated as fatal: a
//! generic failure line plus the numeric diagnostic code goes to the
//! display, and after a cool-down the whole control loop starts over
//! from durable state.

use heapless::Vec;

use crate::config::{
    GLYPH_CURSOR_BITMAP, GLYPH_CURSOR_SLOT, MAX_PAIRS, MAX_QUOTES, RESTART_COOLDOWN_MS,
    SHORT_PAUSE_MS, STATUS_PAUSE_MS,
};
use crate::error::Error;
use crate::session::{Mode, Session};
use crate::track::engine::ExitReason;
use crate::track::{symbol, Pair, QuoteList, Symbol, Watchlist};
use crate::traits::{Context, Delay, PriceSource, RotaryKnob, SlotStore, TextDisplay, WifiLink};
use crate::ui::charpad::CharClasses;
use crate::ui::render::{banner, put_line, status};
use crate::ui::{MenuItem, RETURN_LABEL};

impl<D, R, S, W, P, T> Context<D, R, S, W, P, T>
where
    D: TextDisplay,
    R: RotaryKnob,
    S: SlotStore,
    W: WifiLink,
    P: PriceSource,
    T: Delay,
{
    /// Boot the device and never return.
    pub fn run(mut self) -> ! {
        self.display.backlight_on();
        self.display
            .define_glyph(GLYPH_CURSOR_SLOT, GLYPH_CURSOR_BITMAP);
        self.splash();

        loop {
            if let Err(e) = self.control_loop() {
                self.show_fatal(&e);
            }
        }
    }

    /// Welcome banner with a backlight blink.
    fn splash(&mut self) {
        banner(&mut self.display, "PRICE", "TRACKER!");
        self.display.backlight_off();
        self.delay.sleep_ms(SHORT_PAUSE_MS);
        self.display.backlight_on();
        self.delay.sleep_ms(STATUS_PAUSE_MS);
    }

    /// Dispatch loop. Runs until something fatal escapes.
    fn control_loop(&mut self) -> Result<(), Error> {
        loop {
            if !self.link.is_connected() {
                status(&mut self.display, "Couldn't connect to the internet!");
                self.ensure_link()?;
                continue;
            }

            let session = Session::load_or_default(&mut self.store)?;
            match session.mode {
                Mode::Idle => self.main_menu()?,
                Mode::TrackSingle => {
                    let exit = self.track_single(session.focus)?;
                    self.handle_exit(exit)?;
                }
                Mode::TrackMultiple => {
                    let exit = self.track_multi()?;
                    self.handle_exit(exit)?;
                }
            }
        }
    }

    /// React to a tracking loop handing control back.
    ///
    /// Interrupted and LinkLost need nothing here - the session (resp.
    /// the link check) already steers the next dispatch pass.  An empty
    /// watchlist runs the add-pair flow once before re-dispatching.
    fn handle_exit(&mut self, exit: ExitReason) -> Result<(), Error> {
        match exit {
            ExitReason::NoItems => self.add_pair(),
            ExitReason::Interrupted | ExitReason::LinkLost => Ok(()),
        }
    }

    /// Fatal error screen, then a cool-down before the restart.
    fn show_fatal(&mut self, error: &Error) {
        let mut code: heapless::String<8> = heapless::String::new();
        let _ = core::fmt::Write::write_fmt(&mut code, format_args!("E{:02}", error.code()));

        self.display.clear();
        put_line(&mut self.display, 0, "Unknown error!");
        put_line(&mut self.display, 1, &code);
        put_line(&mut self.display, 3, "Restarting...");
        self.display.backlight_off();
        self.delay.sleep_ms(STATUS_PAUSE_MS);
        self.display.backlight_on();
        self.delay.sleep_ms(RESTART_COOLDOWN_MS);
    }

    /// Main menu. Returns to the dispatch loop after a track flow ran
    /// or the user backed out.
    fn main_menu(&mut self) -> Result<(), Error> {
        let items = [
            MenuItem::label("Pairs"),
            MenuItem::label("Track"),
            MenuItem::label("Screen"),
            MenuItem::label("Update coin list"),
            MenuItem::label(RETURN_LABEL),
        ];
        loop {
            let chosen = self.select(&items, Some("Select an option:"))?;
            match chosen.as_label() {
                Some("Pairs") => self.pairs_menu()?,
                Some("Track") => {
                    if self.track_menu()? {
                        // A tracking loop ran and exited; let dispatch
                        // look at the link and session again.
                        return Ok(());
                    }
                }
                Some("Screen") => self.screen_menu()?,
                Some("Update coin list") => self.update_quote_list()?,
                _ => return Ok(()),
            }
        }
    }

    fn pairs_menu(&mut self) -> Result<(), Error> {
        let items = [
            MenuItem::label("Add pair"),
            MenuItem::label("Remove pair"),
            MenuItem::label(RETURN_LABEL),
        ];
        loop {
            let chosen = self.select(&items, Some("Pair options:"))?;
            match chosen.as_label() {
                Some("Add pair") => self.add_pair()?,
                Some("Remove pair") => self.remove_pair()?,
                _ => return Ok(()),
            }
        }
    }

    /// Returns whether a tracking loop ran.
    fn track_menu(&mut self) -> Result<bool, Error> {
        let items = [
            MenuItem::label("Single pair"),
            MenuItem::label("Multiple pairs"),
            MenuItem::label(RETURN_LABEL),
        ];
        let chosen = self.select(&items, Some("Track options:"))?;
        match chosen.as_label() {
            Some("Single pair") => {
                let exit = self.track_single(None)?;
                self.handle_exit(exit)?;
                Ok(true)
            }
            Some("Multiple pairs") => {
                let exit = self.track_multi()?;
                self.handle_exit(exit)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn screen_menu(&mut self) -> Result<(), Error> {
        let items = [
            MenuItem::label("Turn ON light"),
            MenuItem::label("Turn OFF light"),
            MenuItem::label(RETURN_LABEL),
        ];
        loop {
            let chosen = self.select(&items, Some("Screen options:"))?;
            match chosen.as_label() {
                Some("Turn ON light") => self.display.backlight_on(),
                Some("Turn OFF light") => self.display.backlight_off(),
                _ => return Ok(()),
            }
        }
    }

    /// Fetch the quote-currency list and cache it.
    ///
    /// A failed refresh keeps whatever was cached before; it shows a
    /// status line and moves on rather than escalating.
    fn update_quote_list(&mut self) -> Result<(), Error> {
        status(&mut self.display, "Getting coin list...");
        let mut symbols: Vec<Symbol, MAX_QUOTES> = Vec::new();
        match self.source.supported_quotes(&mut symbols) {
            Ok(()) => {
                QuoteList::from_symbols(&symbols).save(&mut self.store)?;
                status(&mut self.display, "Coin list saved!");
            }
            Err(_) => {
                status(&mut self.display, "Something happened!");
            }
        }
        self.delay.sleep_ms(STATUS_PAUSE_MS);
        Ok(())
    }

    /// Cached quote list, fetching it first if this is the first run.
    fn load_quote_list(&mut self) -> Result<Option<QuoteList>, Error> {
        if let Some(list) = QuoteList::load(&mut self.store)? {
            return Ok(Some(list));
        }
        self.update_quote_list()?;
        QuoteList::load(&mut self.store)
    }

    /// Interactive add-pair flow: type the asset symbol, pick the quote
    /// currency, validate the pair with one fetch, persist.
    fn add_pair(&mut self) -> Result<(), Error> {
        let mut list = Watchlist::load(&mut self.store)?;
        let quotes = match self.load_quote_list()? {
            Some(q) if !q.is_empty() => q,
            _ => return Ok(()),
        };
        let mut quote_items: Vec<MenuItem, MAX_QUOTES> = Vec::new();
        for quote in quotes.iter() {
            let _ = quote_items.push(MenuItem::label(quote));
        }

        loop {
            if !self.link.is_connected() {
                status(&mut self.display, "Not connected!");
                self.delay.sleep_ms(STATUS_PAUSE_MS);
                return Ok(());
            }

            let raw = self.read_line("Select coin:", &CharClasses::with_symbol_subset("-"))?;
            let base = normalize_symbol(&raw);
            if base.is_empty() {
                return Ok(());
            }

            let chosen = self.select(&quote_items, Some("Select vs coin:"))?;
            let quote = match chosen.as_label() {
                Some(q) => symbol(q),
                None => continue,
            };
            let pair = Pair {
                base: base.clone(),
                quote,
            };

            status(&mut self.display, "Looking for pair...");
            match self.source.fetch_price(&pair) {
                Ok(_) => {
                    if list.add(pair) {
                        list.save(&mut self.store)?;
                        status(&mut self.display, "Pair saved!");
                    } else {
                        status(&mut self.display, "Pair exists!");
                    }
                    self.delay.sleep_ms(STATUS_PAUSE_MS);
                    return Ok(());
                }
                Err(_) => {
                    status(&mut self.display, "Pair not found!");
                    self.delay.sleep_ms(STATUS_PAUSE_MS);
                    let retry_items = [MenuItem::label("Yes"), MenuItem::label("No")];
                    let again = self.select(&retry_items, Some("Try again?"))?;
                    if again.as_label() == Some("No") {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Pick a pair off the watchlist and delete it.
    fn remove_pair(&mut self) -> Result<(), Error> {
        let mut list = Watchlist::load(&mut self.store)?;
        let mut items: Vec<MenuItem, { MAX_PAIRS + 1 }> = Vec::new();
        for pair in list.iter() {
            let _ = items.push(MenuItem::Pair(pair.clone()));
        }
        let _ = items.push(MenuItem::label(RETURN_LABEL));

        let chosen = self.select(&items, Some("Select pair:"))?.clone();
        if let MenuItem::Pair(pair) = chosen {
            status(&mut self.display, "Wait...");
            if list.remove(&pair) {
                list.save(&mut self.store)?;
                status(&mut self.display, "Pair removed!");
                self.delay.sleep_ms(STATUS_PAUSE_MS);
            }
        }
        Ok(())
    }
}

/// Lowercase the typed symbol and strip blanks (the charpad offers
/// SPACE even here; the backend does not).
fn normalize_symbol(raw: &str) -> Symbol {
    let mut out = Symbol::new();
    for c in raw.chars().filter(|c| !c.is_whitespace()) {
        if out.push(c.to_ascii_lowercase()).is_err() {
            break;
        }
    }
    out
}
