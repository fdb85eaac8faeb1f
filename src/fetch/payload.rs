//! Response payload parsing and validation.
//!
//! Two wire shapes reach the device:
//!
//! - **Relay payload** - a broker/relay answers a price request with a
//!   fixed-shape ticker record.  Because relay responses are fanned out
//!   by topic, each one carries the requested symbol back as a
//!   validation key; a record for somebody else's request must be
//!   rejected, not displayed.
//! - **Simple price payload** - a direct API answer keyed by the asset
//!   and quote names themselves, e.g. `{"btc":{"usd":62000.5}}`.  The
//!   keys are dynamic, so this one is walked by hand instead of derived.

use serde::Deserialize;

use crate::error::FetchError;

/// Fixed-shape relay ticker record.
#[derive(Debug, Deserialize)]
struct RelayTicker<'a> {
    symbol: &'a str,
    #[serde(rename = "lastPrice")]
    last_price: &'a str,
}

/// Parse a relayed ticker response and validate it answers *our*
/// request for `expected_symbol` (e.g. "BTCUSD").
pub fn parse_relay_quote(payload: &[u8], expected_symbol: &str) -> Result<f64, FetchError> {
    let (ticker, _rest) = serde_json_core::de::from_slice::<RelayTicker>(payload)
        .map_err(|_| FetchError::Malformed)?;
    if !ticker.symbol.eq_ignore_ascii_case(expected_symbol) {
        return Err(FetchError::KeyMismatch);
    }
    ticker
        .last_price
        .parse::<f64>()
        .map_err(|_| FetchError::Malformed)
}

/// Extract `payload[base][quote]` from a dynamic-key simple-price
/// response.
pub fn extract_simple_price(payload: &[u8], base: &str, quote: &str) -> Result<f64, FetchError> {
    let text = core::str::from_utf8(payload).map_err(|_| FetchError::Malformed)?;

    let inner = find_quoted_key(text, base).ok_or(FetchError::Malformed)?;
    let value = find_quoted_key(inner, quote).ok_or(FetchError::Malformed)?;

    let colon = value.find(':').ok_or(FetchError::Malformed)?;
    let number = value[colon + 1..].trim_start();
    let end = number
        .find(|c: char| !matches!(c, '0'..='9' | '.' | '-' | '+' | 'e' | 'E'))
        .unwrap_or(number.len());
    number[..end].parse::<f64>().map_err(|_| FetchError::Malformed)
}

/// Slice `text` after the first occurrence of `"key"`.
fn find_quoted_key<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let bytes = text.as_bytes();
    let key_bytes = key.as_bytes();
    let mut i = 0;
    while i + key_bytes.len() + 2 <= bytes.len() {
        if bytes[i] == b'"'
            && bytes[i + 1 + key_bytes.len()] == b'"'
            && &bytes[i + 1..i + 1 + key_bytes.len()] == key_bytes
        {
            return Some(&text[i + key_bytes.len() + 2..]);
        }
        i += 1;
    }
    None
}

/// Parse the supported-quote-currency response, a flat string array
/// like `["usd","eur","btc"]`.
pub fn parse_quote_symbols(
    payload: &[u8],
) -> Result<heapless::Vec<crate::track::Symbol, { crate::config::MAX_QUOTES }>, FetchError> {
    let (raw, _rest) = serde_json_core::de::from_slice::<
        heapless::Vec<&str, { crate::config::MAX_QUOTES }>,
    >(payload)
    .map_err(|_| FetchError::Malformed)?;
    let mut out = heapless::Vec::new();
    for name in raw {
        let _ = out.push(crate::track::symbol(name));
    }
    Ok(out)
}

/// Split a raw HTTP/1.x response into (status code, body).
///
/// Transport adapters read whole responses into a buffer; framing stops
/// here so the parsing above only ever sees the body.
pub fn split_http_response(raw: &[u8]) -> Result<(u16, &[u8]), FetchError> {
    let header_end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or(FetchError::Malformed)?;
    let head = core::str::from_utf8(&raw[..header_end]).map_err(|_| FetchError::Malformed)?;

    // Status line: "HTTP/1.1 200 OK"
    let mut parts = head.split_whitespace();
    let _version = parts.next().ok_or(FetchError::Malformed)?;
    let code: u16 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or(FetchError::Malformed)?;

    Ok((code, &raw[header_end + 4..]))
}
