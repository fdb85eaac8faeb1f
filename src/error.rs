//! Unified error type for pricetick.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging when the
//! `defmt` feature is enabled.

/// Top-level error type used across the application.
///
/// Anything that reaches the control loop as an `Err` is treated as
/// fatal: a short status line plus `code()` goes to the display, then
/// the loop restarts after a cool-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Persistent store read/write failed.
    Store(StoreError),

    /// A slot decoded into garbage (corrupt or truncated record).
    CorruptRecord,

    /// A menu was opened over an empty item list (caller bug).
    EmptyMenu,

    /// A fetch kept failing after bounded retries.
    Fetch(FetchError),

    /// The radio rejected an operation outside the normal retry paths.
    Link(LinkError),
}

impl Error {
    /// Minimal numeric diagnostic shown on the display next to the
    /// generic failure message.
    pub fn code(&self) -> u8 {
        match self {
            Error::Store(StoreError::Read) => 10,
            Error::Store(StoreError::Write) => 11,
            Error::CorruptRecord => 12,
            Error::EmptyMenu => 20,
            Error::Fetch(FetchError::Transport) => 30,
            Error::Fetch(FetchError::BadStatus(_)) => 31,
            Error::Fetch(FetchError::Malformed) => 32,
            Error::Fetch(FetchError::KeyMismatch) => 33,
            Error::Link(LinkError::ScanFailed) => 40,
            Error::Link(LinkError::ConnectFailed) => 41,
        }
    }
}

/// Persistent store failures.
///
/// An *absent* slot is not an error - `SlotStore::read_slot` reports it
/// as `Ok(None)` and callers fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Flash/file read failed.
    Read,
    /// Flash/file write or erase failed.
    Write,
}

/// Transient failures of a single price fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchError {
    /// Could not reach the backend at all.
    Transport,
    /// Backend answered with a non-success status code.
    BadStatus(u16),
    /// Response body did not parse into the expected shape.
    Malformed,
    /// Relayed response carried a validation key for a different request.
    KeyMismatch,
}

/// Radio/link level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Scan was cancelled or could not start.
    ScanFailed,
    /// Connection attempt was rejected by the driver.
    ConnectFailed,
}

// Convenience conversions

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

impl From<FetchError> for Error {
    fn from(e: FetchError) -> Self {
        Error::Fetch(e)
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Error::Link(e)
    }
}
