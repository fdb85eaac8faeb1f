//! Link establishment state machine.
//!
//! `ensure_link` blocks until the radio reports an association:
//!
//! ```text
//! CheckingLink ──already up──▶ Connected
//!      │
//!      ▼
//! LoadKnownCredentials ─▶ Scan ─▶ try each known+visible network ─▶ Connected
//!                          │
//!                   none matched / all failed
//!                          ▼
//!            Select network ─▶ Enter passphrase ─▶ bounded connect wait
//!                  ▲                                   │        │
//!                  └──── radio off/on on failure ──────┘     success:
//!                                                      persist credential,
//!                                                           Connected
//! ```
//!
//! Every transition drops a short status line on the display.  A failed
//! attempt never wedges the boot: known-network attempts share the same
//! bounded wait as interactive ones and fall through to the picker.

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::config::{
    CONNECT_ATTEMPTS, CONNECT_POLL_DELAY_MS, CONNECT_SETTLE_MS, MAX_SCAN_RESULTS, STATUS_PAUSE_MS,
};
use crate::error::Error;
use crate::net::credentials::CredentialStore;
use crate::net::Ssid;
use crate::traits::{Context, Delay, RotaryKnob, SlotStore, TextDisplay, WifiLink};
use crate::ui::charpad::CharClasses;
use crate::ui::render::{banner, status};
use crate::ui::MenuItem;

impl<D, R, S, W, P, T> Context<D, R, S, W, P, T>
where
    D: TextDisplay,
    R: RotaryKnob,
    S: SlotStore,
    W: WifiLink,
    T: Delay,
{
    /// Bring the link up, interacting with the user if no remembered
    /// network is in range.  Returns only once connected; store errors
    /// (other than a missing credential slot) escalate to the caller.
    pub fn ensure_link(&mut self) -> Result<(), Error> {
        status(&mut self.display, "Wait...");
        self.link.radio_on();
        if self.link.is_connected() {
            status(&mut self.display, "Connected!");
            self.delay.sleep_ms(STATUS_PAUSE_MS);
            return Ok(());
        }

        banner(&mut self.display, "LOADING", "CONFIG");
        let mut creds = CredentialStore::load(&mut self.store)?;

        loop {
            status(&mut self.display, "Scanning networks...");
            let mut visible: Vec<Ssid, MAX_SCAN_RESULTS> = Vec::new();
            let scan_ok = self.link.scan(&mut visible).is_ok();
            if !scan_ok || visible.is_empty() {
                status(&mut self.display, "No networks found!");
                self.delay.sleep_ms(STATUS_PAUSE_MS);
                continue;
            }

            // Replay remembered credentials against what is in range.
            for ssid in &visible {
                let Some(secret) = creds.get(ssid) else {
                    continue;
                };
                let secret: crate::net::Secret = crate::net::secret(secret);
                if self.try_connect(ssid, &secret) {
                    self.show_connected(ssid);
                    return Ok(());
                }
            }

            // Nothing known worked - ask the user.
            let mut items: Vec<MenuItem, MAX_SCAN_RESULTS> = Vec::new();
            for ssid in &visible {
                let _ = items.push(MenuItem::label(ssid));
            }

            loop {
                let chosen = self.select(&items, Some("Select network:"))?.clone();
                let ssid = match chosen.as_label() {
                    Some(s) => crate::net::ssid(s),
                    None => continue,
                };
                let pass = self.read_line("Insert password:", &CharClasses::all())?;

                status(&mut self.display, "Connecting...");
                if self.try_connect(&ssid, &pass) {
                    creds.insert(&ssid, &pass);
                    creds.save(&mut self.store)?;
                    self.show_connected(&ssid);
                    return Ok(());
                }

                // Unwedge the radio before offering the picker again.
                self.link.radio_off();
                status(&mut self.display, "Something happened. Try again!");
                self.delay.sleep_ms(STATUS_PAUSE_MS);
                self.link.radio_on();
            }
        }
    }

    /// Start an association and poll for completion within a fixed
    /// budget: one settle delay, then `CONNECT_ATTEMPTS` polls.
    fn try_connect(&mut self, ssid: &str, secret: &str) -> bool {
        if self.link.connect(ssid, secret).is_err() {
            return false;
        }
        self.delay.sleep_ms(CONNECT_SETTLE_MS);
        for _ in 0..CONNECT_ATTEMPTS {
            if self.link.is_connected() {
                return true;
            }
            self.delay.sleep_ms(CONNECT_POLL_DELAY_MS);
        }
        false
    }

    fn show_connected(&mut self, ssid: &str) {
        let mut line: String<64> = String::new();
        let _ = write!(line, "Connected to {} network!", ssid);
        status(&mut self.display, &line);
        self.delay.sleep_ms(STATUS_PAUSE_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SLOT_NETWORKS;
    use crate::testutil::{ctx, ScriptKnob, ScriptLink};
    use crate::ui::charpad::{build_alphabet, CharClasses};

    #[test]
    fn already_connected_short_circuits() {
        let mut c = ctx();
        c.link = ScriptLink::up();
        c.ensure_link().unwrap();
        assert_eq!(c.link.scan_count, 0);
        assert!(c.link.connect_calls.is_empty());
        assert_eq!(c.display.row_text(0), "Connected!");
    }

    #[test]
    fn known_network_connects_without_interaction() {
        let mut c = ctx();
        let mut creds = CredentialStore::new();
        creds.insert("home", "hunter2");
        creds.save(&mut c.store).unwrap();

        c.link = ScriptLink::down();
        c.link.scan_results = vec![vec!["cafe", "home"]];
        // First poll after the settle delay reports the link as up.
        c.link.connected_script = vec![false, true];
        c.link.connect_ok = true;

        c.ensure_link().unwrap();
        assert_eq!(c.link.connect_calls, vec![("home".into(), "hunter2".into())]);
        assert!(c.display.row_text(0).contains("Connected to home"));
    }

    #[test]
    fn unknown_networks_drive_interactive_entry() {
        let mut c = ctx();
        c.link = ScriptLink::down();
        c.link.scan_results = vec![vec!["cafe"]];
        c.link.connected_script = vec![false, true];
        c.link.connect_ok = true;

        // Menu: press on the first (only) network. Charpad: spin to
        // ENTER and press - empty passphrase (an open network).
        let enter = (build_alphabet(&CharClasses::all()).len() - 1) as u16;
        c.knob = ScriptKnob::new(&[0, 0, 0, enter], &[true, false, false, true, false]);

        c.ensure_link().unwrap();
        assert_eq!(c.link.connect_calls, vec![("cafe".into(), "".into())]);

        // The new credential was persisted.
        let creds = CredentialStore::load(&mut c.store).unwrap();
        assert_eq!(creds.get("cafe"), Some(""));
    }

    #[test]
    fn failed_interactive_attempt_toggles_radio_and_retries() {
        let mut c = ctx();
        c.link = ScriptLink::down();
        c.link.scan_results = vec![vec!["cafe"]];
        // Stays down through the first bounded wait, comes up on the
        // second attempt's first poll.
        let polls_per_attempt = 1 + CONNECT_ATTEMPTS as usize;
        let mut script = vec![false; 1 + polls_per_attempt];
        script.push(true);
        c.link.connected_script = script;
        c.link.connect_ok = true;

        let enter = (build_alphabet(&CharClasses::all()).len() - 1) as u16;
        c.knob = ScriptKnob::new(
            &[0, 0, 0, enter, 0, 0, 0, enter],
            &[
                true, false, true, false, // first select + passphrase enter
                true, false, true, false, // second round
            ],
        );

        c.ensure_link().unwrap();
        assert_eq!(c.link.connect_calls.len(), 2);
        assert_eq!(c.link.radio_off_count, 1);
        // Radio came back on: once at entry, once after the failure.
        assert!(c.link.radio_on_count >= 2);
    }

    #[test]
    fn corrupt_credential_slot_escalates() {
        let mut c = ctx();
        c.link = ScriptLink::down();
        c.store.put_raw(SLOT_NETWORKS, &[1, 4, b'x']);
        assert_eq!(c.ensure_link(), Err(Error::CorruptRecord));
    }
}
