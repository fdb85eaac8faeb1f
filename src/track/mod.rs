//! Tracked pairs, the persisted watchlist, and the quote-currency cache.

pub mod engine;

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::codec::{Reader, Writer};
use crate::config::{MAX_PAIRS, MAX_QUOTES, SLOT_BUF_SIZE, SLOT_PAIRS, SLOT_QUOTES, SYMBOL_MAX};
use crate::error::{Error, StoreError};
use crate::traits::SlotStore;

/// Asset or quote-currency symbol, stored lowercase.
pub type Symbol = String<SYMBOL_MAX>;

/// Truncating [`Symbol`] constructor.
pub fn symbol(text: &str) -> Symbol {
    let mut out = Symbol::new();
    for c in text.chars().take(SYMBOL_MAX) {
        let _ = out.push(c);
    }
    out
}

/// One tradable pair the user tracks, e.g. base "btc" against quote "usd".
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pair {
    pub base: Symbol,
    pub quote: Symbol,
}

impl Pair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: symbol(base),
            quote: symbol(quote),
        }
    }

    /// Upper-cased base symbol, for display headers.
    pub fn base_upper(&self) -> Symbol {
        upper(&self.base)
    }

    /// Upper-cased quote symbol.
    pub fn quote_upper(&self) -> Symbol {
        upper(&self.quote)
    }

    /// Exchange-style concatenated symbol, e.g. "BTCUSD". Used as the
    /// validation key on relayed responses.
    pub fn ticker_symbol(&self) -> String<24> {
        let mut out = String::new();
        let _ = write!(out, "{}{}", self.base_upper(), self.quote_upper());
        out
    }
}

fn upper(sym: &Symbol) -> Symbol {
    let mut out = Symbol::new();
    for c in sym.chars() {
        let _ = out.push(c.to_ascii_uppercase());
    }
    out
}

/// Deduplicated, order-preserving list of tracked pairs.
///
/// Persisted as a whole on every mutation, so a restart always sees the
/// last committed list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Watchlist {
    pairs: Vec<Pair, MAX_PAIRS>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn load<S: SlotStore>(store: &mut S) -> Result<Self, Error> {
        let mut buf = [0u8; SLOT_BUF_SIZE];
        match store.read_slot(SLOT_PAIRS, &mut buf)? {
            None => Ok(Self::new()),
            Some(len) => Self::decode(&buf[..len]).ok_or(Error::CorruptRecord),
        }
    }

    pub fn save<S: SlotStore>(&self, store: &mut S) -> Result<(), Error> {
        let mut buf = [0u8; SLOT_BUF_SIZE];
        let len = self.encode(&mut buf).ok_or(StoreError::Write)?;
        store.write_slot(SLOT_PAIRS, &buf[..len])?;
        Ok(())
    }

    /// Append `pair` unless it is already tracked or the list is full.
    /// Returns whether the list changed.
    pub fn add(&mut self, pair: Pair) -> bool {
        if self.pairs.contains(&pair) {
            return false;
        }
        self.pairs.push(pair).is_ok()
    }

    /// Remove `pair` if present. Returns whether the list changed.
    pub fn remove(&mut self, pair: &Pair) -> bool {
        match self.pairs.iter().position(|p| p == pair) {
            Some(index) => {
                self.pairs.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pair: &Pair) -> bool {
        self.pairs.contains(pair)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn get(&self, index: usize) -> Option<&Pair> {
        self.pairs.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    pub fn encode(&self, buf: &mut [u8]) -> Option<usize> {
        let mut w = Writer::new(buf);
        w.u8(self.pairs.len() as u8);
        for pair in &self.pairs {
            w.str_field(&pair.base);
            w.str_field(&pair.quote);
        }
        w.finish()
    }

    pub fn decode(data: &[u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        let count = r.u8()?;
        let mut out = Self::new();
        for _ in 0..count {
            let base: Symbol = r.str_field()?;
            let quote: Symbol = r.str_field()?;
            out.pairs.push(Pair { base, quote }).ok()?;
        }
        r.done().then_some(out)
    }
}

/// Cached list of quote currencies the backend supports.
///
/// Fetched once, persisted, and refreshed on demand from the menu; the
/// add-pair flow builds its "vs coin" menu from it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QuoteList {
    quotes: Vec<Symbol, MAX_QUOTES>,
}

impl QuoteList {
    pub fn new() -> Self {
        Self { quotes: Vec::new() }
    }

    pub fn from_symbols(symbols: &Vec<Symbol, MAX_QUOTES>) -> Self {
        Self {
            quotes: symbols.clone(),
        }
    }

    /// `Ok(None)` when nothing has been cached yet (first run).
    pub fn load<S: SlotStore>(store: &mut S) -> Result<Option<Self>, Error> {
        let mut buf = [0u8; SLOT_BUF_SIZE];
        match store.read_slot(SLOT_QUOTES, &mut buf)? {
            None => Ok(None),
            Some(len) => Self::decode(&buf[..len])
                .map(Some)
                .ok_or(Error::CorruptRecord),
        }
    }

    pub fn save<S: SlotStore>(&self, store: &mut S) -> Result<(), Error> {
        let mut buf = [0u8; SLOT_BUF_SIZE];
        let len = self.encode(&mut buf).ok_or(StoreError::Write)?;
        store.write_slot(SLOT_QUOTES, &buf[..len])?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.quotes.iter()
    }

    pub fn encode(&self, buf: &mut [u8]) -> Option<usize> {
        let mut w = Writer::new(buf);
        w.u8(self.quotes.len() as u8);
        for quote in &self.quotes {
            w.str_field(quote);
        }
        w.finish()
    }

    pub fn decode(data: &[u8]) -> Option<Self> {
        let mut r = Reader::new(data);
        let count = r.u8()?;
        let mut out = Self::new();
        for _ in 0..count {
            out.quotes.push(r.str_field()?).ok()?;
        }
        r.done().then_some(out)
    }
}
