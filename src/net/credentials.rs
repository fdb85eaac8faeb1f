//! Persisted Wi-Fi credential map.
//!
//! SSID → passphrase entries, written back as a whole map after every
//! change.  A missing slot is the normal first-run condition and loads
//! as an empty store; a slot that fails to decode is corruption and
//! escalates.

use heapless::Vec;

use crate::codec::{Reader, Writer};
use crate::config::{MAX_NETWORKS, SLOT_BUF_SIZE, SLOT_NETWORKS};
use crate::error::{Error, StoreError};
use crate::net::{Secret, Ssid};
use crate::traits::SlotStore;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    ssid: Ssid,
    secret: Secret,
}

/// In-memory credential map, synced with its slot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    entries: Vec<Entry, MAX_NETWORKS>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn load<S: SlotStore>(store: &mut S) -> Result<Self, Error> {
        let mut buf = [0u8; SLOT_BUF_SIZE];
        match store.read_slot(SLOT_NETWORKS, &mut buf)? {
            None => Ok(Self::new()),
            Some(len) => Self::decode(&buf[..len]).ok_or(Error::CorruptRecord),
        }
    }

    pub fn save<S: SlotStore>(&self, store: &mut S) -> Result<(), Error> {
        let mut buf = [0u8; SLOT_BUF_SIZE];
        let len = self.encode(&mut buf).ok_or(StoreError::Write)?;
        store.write_slot(SLOT_NETWORKS, &buf[..len])?;
        Ok(())
    }

    /// Passphrase for `ssid`, if remembered.
    pub fn get(&self, ssid: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.ssid.as_str() == ssid)
            .map(|e| e.secret.as_str())
    }

    /// Remember `ssid` with `secret`, replacing any previous entry.
    /// When the map is full the oldest entry is evicted.
    pub fn insert(&mut self, ssid: &str, secret: &str) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.ssid.as_str() == ssid) {
            existing.secret = crate::net::secret(secret);
            return;
        }
        if self.entries.is_full() {
            self.entries.remove(0);
        }
        let _ = self.entries.push(Entry {
            ssid: crate::net::ssid(ssid),
            secret: crate::net::secret(secret),
        });
    }

    /// Forget `ssid`. Returns whether an entry was removed.
    pub fn remove(&mut self, ssid: &str) -> bool {
        match self.entries.iter().position(|e| e.ssid.as_str() == ssid) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn encode(&self, buf: &mut [u8]) -> Option<usize> {
        let mut w = Writer::new(buf);
        w.u8(self.entries.len() as u8);
        for entry in &self.entries {
            w.str_field(&entry.ssid);
            w.str_field(&entry.secret);
        }
        w.finish()
    }

    pub fn decode(data: &[u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        let count = r.u8()?;
        let mut out = Self::new();
        for _ in 0..count {
            let ssid: Ssid = r.str_field()?;
            let secret: Secret = r.str_field()?;
            out.entries.push(Entry { ssid, secret }).ok()?;
        }
        r.done().then_some(out)
    }
}
