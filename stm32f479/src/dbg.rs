//! `log` backend on the debug UART (UART7, PE8 TX, 115200 8N1).
//!
//! Records are written as `[LEVEL] message\r\n`. Writes block, a record is on the wire once
//! `log` returns.

use core::{cell::RefCell, fmt::Write};

use critical_section::Mutex;
use hal::{
    pac::UART7,
    prelude::*,
    rcc::Clocks,
    serial::{
        config::{Config, InvalidConfig, StopBits},
        Serial, Tx,
    },
    time::Bps,
};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::pins::DebugUart;

pub type DebugTx = Tx<UART7, u8>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSerialConfig {
    pub baudrate: Bps,
    pub level: LevelFilter,
}

impl Default for DebugSerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200.bps(),
            level: LevelFilter::Info,
        }
    }
}

static SINK: Mutex<RefCell<Option<DebugTx>>> = Mutex::new(RefCell::new(None));
static LOGGER: UartLogger = UartLogger;

struct UartLogger;

impl Log for UartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        critical_section::with(|cs| {
            if let Some(tx) = SINK.borrow_ref_mut(cs).as_mut() {
                // Nothing sensible to do if the console itself fails.
                let _ = write!(tx, "[{}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {}
}

/// Brings up UART7 transmit-only. RX stays unused, it is not needed for logging.
pub fn serial(
    uart: UART7,
    pins: DebugUart,
    config: &DebugSerialConfig,
    clocks: &Clocks,
) -> Result<DebugTx, InvalidConfig> {
    let serial_config = Config::default()
        .baudrate(config.baudrate)
        .wordlength_8()
        .parity_none()
        .stopbits(StopBits::STOP1);

    Serial::tx(uart, pins.tx.into_alternate::<8>(), serial_config, clocks)
}

/// Installs the UART as the `log` backend. Only the first call succeeds.
pub fn init(tx: DebugTx, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    critical_section::with(|cs| SINK.borrow(cs).replace(Some(tx)));
    log::set_max_level(level);
    Ok(())
}
