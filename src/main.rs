//! ESP32 firmware entry point.
//!
//! Bring-up only: initialise the HAL, the radio and the network stack,
//! wrap each peripheral in its `hw` adapter, and hand the resulting
//! `Context` to the application loop.  Everything after this file is
//! hardware-free.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_println::println;

use blocking_network_stack::Stack;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rng::Rng;
use esp_hal::time;
use esp_hal::timer::timg::TimerGroup;
use esp_storage::FlashStorage;
use esp_wifi::wifi::{self, WifiStaDevice};
use smoltcp::iface::{SocketSet, SocketStorage};

use pricetick::config::LCD_I2C_ADDR;
use pricetick::hw::flash::FlashStore;
use pricetick::hw::http::RelaySource;
use pricetick::hw::lcd::CharLcd;
use pricetick::hw::rotary::RotaryEncoder;
use pricetick::hw::wifi::Radio;
use pricetick::hw::HalDelay;
use pricetick::Context;

#[esp_hal::main]
fn main() -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);
    esp_alloc::heap_allocator!(72 * 1024);

    println!("pricetick boot");

    // Radio + network stack.
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let mut rng = Rng::new(peripherals.RNG);
    let wifi_init = esp_wifi::init(timg0.timer0, rng, peripherals.RADIO_CLK)
        .expect("radio init failed");

    let (iface, device, controller) = wifi::utils::create_network_interface(
        &wifi_init,
        peripherals.WIFI,
        WifiStaDevice,
    )
    .expect("wifi interface failed");
    // DHCP wants a monotonic millisecond clock and a seed.  The
    // storage can live on main's stack: `run` never returns.
    let mut socket_set_entries: [SocketStorage; 3] = Default::default();
    let sockets = SocketSet::new(&mut socket_set_entries[..]);
    let now = || time::now().duration_since_epoch().to_millis();
    let stack = Stack::new(iface, device, sockets, now, rng.random());

    // Panel and knob.
    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .expect("i2c init failed")
        .with_sda(peripherals.GPIO21)
        .with_scl(peripherals.GPIO22);
    let lcd = CharLcd::new(i2c, LCD_I2C_ADDR, esp_hal::delay::Delay::new());

    let knob = RotaryEncoder::new(
        Input::new(peripherals.GPIO15, Pull::Up),
        Input::new(peripherals.GPIO4, Pull::Up),
        Input::new(peripherals.GPIO34, Pull::None),
    );

    let ctx = Context::new(
        lcd,
        knob,
        FlashStore::new(FlashStorage::new()),
        Radio::new(controller),
        RelaySource::new(stack),
        HalDelay::new(),
    );

    ctx.run()
}
