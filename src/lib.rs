//! pricetick - a rotary-knob crypto price tracker.
//!
//! One knob, one 20x4 character LCD, Wi-Fi, and a price backend: browse
//! menus and type text with the knob, then watch tracked pairs update
//! on a fixed cadence.  The session survives restarts, so the device
//! comes back up on the screen it was on.
//!
//! The crate is split along a hardware seam:
//!
//! - everything in [`ui`], [`net`], [`fetch`], [`track`], [`session`]
//!   and [`app`] is hardware-free `no_std` logic, driven through the
//!   collaborator traits in [`traits`] and fully testable on the host
//!   (`cargo test`);
//! - the `hw` module (feature `embedded`) provides the ESP32 adapters,
//!   and `main.rs` wires them into a [`traits::Context`].

#![cfg_attr(not(test), no_std)]

pub mod app;
pub(crate) mod codec;
pub mod config;
pub mod error;
pub mod fetch;
pub mod net;
pub mod session;
pub mod track;
pub mod traits;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod hw;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Error, FetchError, LinkError, StoreError};
pub use traits::Context;
