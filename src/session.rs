//! Crash-resumable session state.
//!
//! The session records which screen the device was on (and, for
//! single-pair tracking, which pair) so an abrupt restart resumes there
//! instead of dumping the user back at the menu.  Every mode transition
//! rewrites the slot *before* the new mode's loop starts running.

use crate::codec::{Reader, Writer};
use crate::config::SLOT_SESSION;
use crate::error::{Error, StoreError};
use crate::track::{Pair, Symbol};
use crate::traits::SlotStore;

/// Which top-level loop owns the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Main menu.
    #[default]
    Idle,
    /// Single-pair tracking. Without a focus pair, resuming re-enters
    /// pair selection rather than the price loop.
    TrackSingle,
    /// Round-robin tracking over the whole watchlist.
    TrackMultiple,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    pub mode: Mode,
    pub focus: Option<Pair>,
}

impl Session {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn new(mode: Mode, focus: Option<Pair>) -> Self {
        Self { mode, focus }
    }

    /// Load the persisted session. A missing slot writes the Idle
    /// default back so the next restart reads a well-formed record.
    pub fn load_or_default<S: SlotStore>(store: &mut S) -> Result<Self, Error> {
        let mut buf = [0u8; 64];
        match store.read_slot(SLOT_SESSION, &mut buf)? {
            None => {
                let session = Self::idle();
                session.save(store)?;
                Ok(session)
            }
            Some(len) => Self::decode(&buf[..len]).ok_or(Error::CorruptRecord),
        }
    }

    pub fn save<S: SlotStore>(&self, store: &mut S) -> Result<(), Error> {
        let mut buf = [0u8; 64];
        let len = self.encode(&mut buf).ok_or(StoreError::Write)?;
        store.write_slot(SLOT_SESSION, &buf[..len])?;
        Ok(())
    }

    pub fn encode(&self, buf: &mut [u8]) -> Option<usize> {
        let mut w = Writer::new(buf);
        w.u8(match self.mode {
            Mode::Idle => 0,
            Mode::TrackSingle => 1,
            Mode::TrackMultiple => 2,
        });
        match &self.focus {
            None => w.u8(0),
            Some(pair) => {
                w.u8(1);
                w.str_field(&pair.base);
                w.str_field(&pair.quote);
            }
        }
        w.finish()
    }

    pub fn decode(data: &[u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        let mode = match r.u8()? {
            0 => Mode::Idle,
            1 => Mode::TrackSingle,
            2 => Mode::TrackMultiple,
            _ => return None,
        };
        let focus = match r.u8()? {
            0 => None,
            1 => {
                let base: Symbol = r.str_field()?;
                let quote: Symbol = r.str_field()?;
                Some(Pair { base, quote })
            }
            _ => return None,
        };
        r.done().then_some(Session { mode, focus })
    }
}
