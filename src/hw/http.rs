//! Price relay client over the blocking network stack.
//!
//! HTTPS does not fit this part, so the device talks plain HTTP to a
//! local relay that forwards to the exchange API (the same division of
//! labor as running the data retriever on a host machine and letting
//! the device ask it).  Responses come back as the relay's trimmed
//! ticker record, validated in `fetch::payload`.

use core::fmt::Write as _;

use blocking_network_stack::Stack;
use esp_wifi::wifi::{WifiDevice, WifiStaDevice};
use heapless::{String, Vec};
use smoltcp::wire::{IpAddress, Ipv4Address};

use crate::config::MAX_QUOTES;
use crate::error::FetchError;
use crate::fetch::payload::{parse_quote_symbols, parse_relay_quote, split_http_response};
use crate::track::{Pair, Symbol};
use crate::traits::PriceSource;

/// Relay endpoint on the local network.
const RELAY_IP: [u8; 4] = [192, 168, 1, 10];
const RELAY_PORT: u16 = 8080;
const RELAY_HOST: &str = "192.168.1.10:8080";

/// Response buffer; relay payloads are trimmed to a few hundred bytes.
const RESPONSE_MAX: usize = 2048;

pub struct RelaySource<'a> {
    stack: Stack<'a, WifiDevice<'a, WifiStaDevice>>,
}

impl<'a> RelaySource<'a> {
    pub fn new(stack: Stack<'a, WifiDevice<'a, WifiStaDevice>>) -> Self {
        Self { stack }
    }

    /// One GET round-trip; returns the bytes read into `response`.
    fn get(&mut self, path: &str, response: &mut [u8]) -> Result<usize, FetchError> {
        let mut rx_buffer = [0u8; 1536];
        let mut tx_buffer = [0u8; 1536];
        let mut socket = self.stack.get_socket(&mut rx_buffer, &mut tx_buffer);

        socket.work();
        socket
            .open(
                IpAddress::Ipv4(Ipv4Address::new(
                    RELAY_IP[0],
                    RELAY_IP[1],
                    RELAY_IP[2],
                    RELAY_IP[3],
                )),
                RELAY_PORT,
            )
            .map_err(|_| FetchError::Transport)?;

        let mut request: String<192> = String::new();
        write!(
            request,
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, RELAY_HOST
        )
        .map_err(|_| FetchError::Transport)?;
        socket
            .write(request.as_bytes())
            .map_err(|_| FetchError::Transport)?;
        socket.flush().map_err(|_| FetchError::Transport)?;

        let mut total = 0;
        while total < response.len() {
            match socket.read(&mut response[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(_) => break,
            }
        }
        socket.disconnect();

        if total == 0 {
            return Err(FetchError::Transport);
        }
        Ok(total)
    }

    fn get_body<'b>(
        &mut self,
        path: &str,
        response: &'b mut [u8; RESPONSE_MAX],
    ) -> Result<&'b [u8], FetchError> {
        let len = self.get(path, response)?;
        let (code, body) = split_http_response(&response[..len])?;
        if code != 200 {
            return Err(FetchError::BadStatus(code));
        }
        Ok(body)
    }
}

impl PriceSource for RelaySource<'_> {
    fn fetch_price(&mut self, pair: &Pair) -> Result<f64, FetchError> {
        let symbol = pair.ticker_symbol();
        let mut path: String<64> = String::new();
        write!(path, "/price?symbol={}", symbol).map_err(|_| FetchError::Transport)?;

        let mut response = [0u8; RESPONSE_MAX];
        let body = self.get_body(&path, &mut response)?;
        parse_relay_quote(body, &symbol)
    }

    fn supported_quotes(&mut self, out: &mut Vec<Symbol, MAX_QUOTES>) -> Result<(), FetchError> {
        let mut response = [0u8; RESPONSE_MAX];
        let body = self.get_body("/quotes", &mut response)?;
        for symbol in parse_quote_symbols(body)? {
            let _ = out.push(symbol);
        }
        Ok(())
    }
}
