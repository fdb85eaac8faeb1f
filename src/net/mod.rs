//! Wireless connectivity subsystem.
//!
//! 1. **Credentials** - the persisted SSID → passphrase map, replayed on
//!    every boot so a known network connects without interaction.
//! 2. **Supervisor** - the `ensure_link` state machine: check the link,
//!    replay known credentials against a scan, and fall back to an
//!    on-device network picker plus passphrase entry.
//!
//! The radio itself is driven through [`crate::traits::WifiLink`]; this
//! module owns only the decision logic around it.

pub mod credentials;
pub mod supervisor;

use heapless::String;

use crate::config::{SECRET_MAX, SSID_MAX};

/// Network identifier as broadcast by the access point.
pub type Ssid = String<SSID_MAX>;

/// Stored passphrase.
pub type Secret = String<SECRET_MAX>;

/// Truncating [`Ssid`] constructor.
pub fn ssid(text: &str) -> Ssid {
    let mut out = Ssid::new();
    for c in text.chars().take(SSID_MAX) {
        let _ = out.push(c);
    }
    out
}

/// Truncating [`Secret`] constructor.
pub fn secret(text: &str) -> Secret {
    let mut out = Secret::new();
    for c in text.chars().take(SECRET_MAX) {
        let _ = out.push(c);
    }
    out
}
