//! Price fetching policy.
//!
//! The transport lives behind [`crate::traits::PriceSource`]; this
//! module owns what happens around it: bounded retries with a fixed
//! delay, and (in [`payload`]) validation of the bytes a transport
//! hands back.

pub mod payload;

use crate::config::{FETCH_ATTEMPTS, FETCH_RETRY_DELAY_MS};
use crate::error::{Error, FetchError};
use crate::track::Pair;
use crate::traits::{Context, Delay, PriceSource};

impl<D, R, S, W, P, T> Context<D, R, S, W, P, T>
where
    P: PriceSource,
    T: Delay,
{
    /// Fetch `pair`, retrying transient failures a bounded number of
    /// times.  Exhausting the budget escalates the last failure - a
    /// tick is never silently skipped.
    pub(crate) fn fetch_with_retry(&mut self, pair: &Pair) -> Result<f64, Error> {
        let mut last = FetchError::Transport;
        for attempt in 1..=FETCH_ATTEMPTS {
            match self.source.fetch_price(pair) {
                Ok(price) => return Ok(price),
                Err(e) => {
                    last = e;
                    if attempt < FETCH_ATTEMPTS {
                        self.delay.sleep_ms(FETCH_RETRY_DELAY_MS);
                    }
                }
            }
        }
        Err(Error::Fetch(last))
    }
}
