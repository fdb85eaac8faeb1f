//! Integration tests for the pricetick host-testable logic.

use pricetick::fetch::payload::{extract_simple_price, parse_relay_quote};
use pricetick::session::{Mode, Session};
use pricetick::track::{Pair, Watchlist};
use pricetick::ui::charpad::{build_alphabet, CharClasses, Token};
use pricetick::ui::menu::{page_of, page_size, row_of};
use pricetick::FetchError;

#[test]
fn alphabet_is_byte_identical_across_builds() {
    let classes = CharClasses::all();
    let first = build_alphabet(&classes);
    for _ in 0..10 {
        assert_eq!(build_alphabet(&classes), first);
    }
    // Control tokens frame the character set.
    assert_eq!(first[0], Token::Space);
    assert_eq!(first[first.len() - 2], Token::Delete);
    assert_eq!(first[first.len() - 1], Token::Enter);
}

#[test]
fn paging_covers_every_cursor_exactly_once() {
    for count in 1..=25usize {
        for &titled in &[true, false] {
            let size = page_size(titled);
            let mut seen = vec![false; count];
            for cursor in 0..count {
                let page = page_of(cursor, size);
                let row = row_of(cursor, size);
                let index = page * size + row;
                assert!(!seen[index], "cursor {} visited twice", index);
                seen[index] = true;
            }
            assert!(seen.iter().all(|&v| v));
        }
    }
}

#[test]
fn session_codec_roundtrips() {
    let sessions = [
        Session::idle(),
        Session::new(Mode::TrackSingle, None),
        Session::new(Mode::TrackSingle, Some(Pair::new("btc", "usd"))),
        Session::new(Mode::TrackMultiple, None),
    ];
    for session in &sessions {
        let mut buf = [0u8; 64];
        let len = session.encode(&mut buf).expect("encode");
        assert_eq!(Session::decode(&buf[..len]).as_ref(), Some(session));
    }
}

#[test]
fn watchlist_codec_roundtrips() {
    let mut list = Watchlist::new();
    list.add(Pair::new("btc", "usd"));
    list.add(Pair::new("eth", "eur"));
    list.add(Pair::new("doge", "btc"));

    let mut buf = [0u8; 1024];
    let len = list.encode(&mut buf).expect("encode");
    assert_eq!(Watchlist::decode(&buf[..len]), Some(list));
}

#[test]
fn watchlist_decode_rejects_corrupt_bytes() {
    assert_eq!(Watchlist::decode(&[2, 3, b'b', b't']), None);
    // Trailing garbage after a valid record is also rejected.
    let mut list = Watchlist::new();
    list.add(Pair::new("btc", "usd"));
    let mut buf = [0u8; 64];
    let len = list.encode(&mut buf).unwrap();
    assert_eq!(Watchlist::decode(&buf[..len + 1]), None);
}

#[test]
fn relayed_response_for_another_request_is_rejected() {
    let payload = br#"{"symbol":"ETHUSD","lastPrice":"3100.2"}"#;
    assert_eq!(
        parse_relay_quote(payload, "BTCUSD"),
        Err(FetchError::KeyMismatch)
    );
    assert_eq!(parse_relay_quote(payload, "ETHUSD"), Ok(3100.2));
}

#[test]
fn simple_price_payload_walks_dynamic_keys() {
    let payload = br#"{"bitcoin":{"usd":61234.0,"eur":56789.5}}"#;
    assert_eq!(
        extract_simple_price(payload, "bitcoin", "eur"),
        Ok(56789.5)
    );
    assert_eq!(
        extract_simple_price(payload, "bitcoin", "gbp"),
        Err(FetchError::Malformed)
    );
}
