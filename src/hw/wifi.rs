//! Station-mode Wi-Fi radio adapter.

use heapless::Vec;

use esp_wifi::wifi::{AuthMethod, ClientConfiguration, Configuration, WifiController};

use crate::config::MAX_SCAN_RESULTS;
use crate::error::LinkError;
use crate::net::Ssid;
use crate::traits::WifiLink;

pub struct Radio<'d> {
    controller: WifiController<'d>,
}

impl<'d> Radio<'d> {
    pub fn new(controller: WifiController<'d>) -> Self {
        Self { controller }
    }

    fn ensure_started(&mut self) -> Result<(), LinkError> {
        if !matches!(self.controller.is_started(), Ok(true)) {
            self.controller
                .start()
                .map_err(|_| LinkError::ConnectFailed)?;
        }
        Ok(())
    }
}

impl WifiLink for Radio<'_> {
    fn is_connected(&mut self) -> bool {
        matches!(self.controller.is_connected(), Ok(true))
    }

    fn scan(&mut self, out: &mut Vec<Ssid, MAX_SCAN_RESULTS>) -> Result<(), LinkError> {
        self.ensure_started().map_err(|_| LinkError::ScanFailed)?;
        let (points, _total) = self
            .controller
            .scan_n::<MAX_SCAN_RESULTS>()
            .map_err(|_| LinkError::ScanFailed)?;

        for point in points {
            let name = crate::net::ssid(point.ssid.as_str());
            if name.is_empty() || out.iter().any(|s| *s == name) {
                continue;
            }
            let _ = out.push(name);
        }
        Ok(())
    }

    fn connect(&mut self, ssid: &str, secret: &str) -> Result<(), LinkError> {
        let config = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| LinkError::ConnectFailed)?,
            password: secret.try_into().map_err(|_| LinkError::ConnectFailed)?,
            auth_method: if secret.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        });
        self.controller
            .set_configuration(&config)
            .map_err(|_| LinkError::ConnectFailed)?;
        self.ensure_started()?;
        self.controller
            .connect()
            .map_err(|_| LinkError::ConnectFailed)
    }

    fn radio_off(&mut self) {
        let _ = self.controller.stop();
    }

    fn radio_on(&mut self) {
        let _ = self.ensure_started();
    }
}
