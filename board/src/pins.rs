//! The pin table. Every net on the board that ends at the MCU has exactly one entry here.

use core::fmt;

use heapless::Vec;

/// GPIO banks that have something connected on this board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    H,
}

impl Port {
    pub const fn letter(self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
            Port::H => 'H',
        }
    }

    /// Index of the bank as used by the SYSCFG EXTI multiplexer (A = 0, B = 1, ...).
    pub const fn index(self) -> u8 {
        match self {
            Port::A => 0,
            Port::B => 1,
            Port::C => 2,
            Port::D => 3,
            Port::E => 4,
            Port::H => 7,
        }
    }

    pub const fn cube_name(self) -> &'static str {
        match self {
            Port::A => "GPIOA",
            Port::B => "GPIOB",
            Port::C => "GPIOC",
            Port::D => "GPIOD",
            Port::E => "GPIOE",
            Port::H => "GPIOH",
        }
    }
}

/// Pin number within a bank, 0 to 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinNumber(u8);

impl PinNumber {
    pub const MAX: u8 = 15;

    pub const fn new(number: u8) -> Option<Self> {
        if number <= Self::MAX {
            Some(Self(number))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Single bit mask of this pin, which is what the ST HAL calls `GPIO_PIN_n`.
    pub const fn mask(self) -> u16 {
        1 << self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    pub port: Port,
    pub number: PinNumber,
}

impl PinId {
    pub const fn new(port: Port, number: u8) -> Option<Self> {
        match PinNumber::new(number) {
            Some(number) => Some(Self { port, number }),
            None => None,
        }
    }

    /// `PartialEq` is not usable in const contexts, the table checks need this one.
    pub const fn same_as(self, other: PinId) -> bool {
        self.port as u8 == other.port as u8 && self.number.0 == other.number.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.number.0)
    }
}

/// Only used to build the table below, an out of range number fails the build.
const fn pin(port: Port, number: u8) -> PinId {
    assert!(number <= PinNumber::MAX, "pin number out of range");
    PinId {
        port,
        number: PinNumber(number),
    }
}

/// The board function a net belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    Oled,
    SysEth,
    ExtEth,
    DebugUart,
    Rs232,
    Usb,
    Swd,
    Clock,
    Power,
    IndicatorLights,
    DebugLed,
}

/// How the MCU drives a net. This is a hint for bring-up code, the typed pins in the BSP are
/// what actually enforces a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
    /// Routed to a peripheral through an alternate function.
    Alternate,
    /// HSE oscillator input.
    Oscillator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalInfo {
    pub signal: Signal,
    pub pin: PinId,
    pub peripheral: Peripheral,
    pub direction: Direction,
    /// Base name in the CubeMX generated header, `OLED_RST` for `OLED_RST_Pin`.
    /// Nets the header never named have `None`.
    pub cube_name: Option<&'static str>,
}

macro_rules! signals {
    ($(
        $(#[$meta:meta])*
        $variant:ident: $port:ident $number:literal, $peripheral:ident, $direction:ident, $cube:expr;
    )*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum Signal {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        impl Signal {
            pub const ALL: [Signal; [$(Signal::$variant),*].len()] = [$(Signal::$variant),*];
            pub const COUNT: usize = Self::ALL.len();
        }

        /// Indexed by `Signal as usize`.
        pub const SIGNALS: [SignalInfo; Signal::COUNT] = [$(
            SignalInfo {
                signal: Signal::$variant,
                pin: pin(Port::$port, $number),
                peripheral: Peripheral::$peripheral,
                direction: Direction::$direction,
                cube_name: $cube,
            },
        )*];
    };
}

signals! {
    OledRst: C 13, Oled, Output, Some("OLED_RST");
    /// Data/command select of the OLED controller.
    OledDc: C 14, Oled, Output, Some("OLED_DC");
    /// 26 MHz crystal, OSC_IN.
    ClockIn: H 0, Clock, Oscillator, Some("CLOCK_IN");
    OledMosi: C 3, Oled, Alternate, Some("OLED_MOSI");
    /// Enables the magnetics of the system-facing Ethernet port.
    SysethXfrmEn: A 3, SysEth, Output, Some("SYSETH_XFRM_EN");
    SysethSs: A 4, SysEth, Output, Some("SYSETH_SS");
    SysethSck: A 5, SysEth, Alternate, Some("SYSETH_SCK");
    SysethMiso: A 6, SysEth, Alternate, Some("SYSETH_MISO");
    SysethMosi: A 7, SysEth, Alternate, Some("SYSETH_MOSI");
    /// Active low.
    SysethInt: B 0, SysEth, Input, Some("SYSETH_INT");
    SysethRst: B 1, SysEth, Output, Some("SYSETH_RST");
    UartRx: E 7, DebugUart, Alternate, Some("UART_RX");
    UartTx: E 8, DebugUart, Alternate, Some("UART_TX");
    DbgLed: E 12, DebugLed, Output, Some("DBGLED");
    Rs232Tx: B 10, Rs232, Alternate, Some("RS232_TX");
    Rs232Rx: B 11, Rs232, Alternate, Some("RS232_RX");
    Rs232Cts: B 13, Rs232, Alternate, Some("RS232_CTS");
    Rs232Rts: B 14, Rs232, Alternate, Some("RS232_RTS");
    /// Drives the power button of the system under test.
    SysPower: C 8, Power, Output, Some("SYS_POWER");
    /// Drives the reset button of the system under test.
    SysReset: C 9, Power, Output, Some("SYS_RESET");
    /// USB D-, named `USB_D_` in the generated header.
    UsbDm: A 11, Usb, Alternate, Some("USB_D_");
    /// USB D+, named `USB_D_A12` in the generated header.
    UsbDp: A 12, Usb, Alternate, Some("USB_D_A12");
    Swdio: A 13, Swd, Alternate, Some("SWDIO");
    Swclk: A 14, Swd, Alternate, Some("SWCLK");
    ExtethSs: A 15, ExtEth, Output, Some("EXTETH_SS");
    ExtethSck: C 10, ExtEth, Alternate, Some("EXTETH_SCK");
    ExtethMiso: C 11, ExtEth, Alternate, Some("EXTETH_MISO");
    ExtethMosi: C 12, ExtEth, Alternate, Some("EXTETH_MOSI");
    ExtethRst: D 0, ExtEth, Output, Some("EXTETH_RST");
    /// Active low.
    ExtethInt: D 1, ExtEth, Input, Some("EXTETH_INT");
    ExtethXfrmEn: D 2, ExtEth, Output, Some("EXTETH_XFRM_EN");
    OledSck: D 3, Oled, Alternate, Some("OLED_SCK");
    /// PWR_OK of the ATX supply.
    PsuOk: D 5, Power, Input, Some("PSU_OK");
    /// PS_ON of the ATX supply.
    PsuOn: D 6, Power, Output, Some("PSU_ON");
    Swo: B 3, Swd, Alternate, Some("SWO");
    IndlightsScl: B 6, IndicatorLights, Alternate, Some("INDLIGHTS_SCL");
    IndlightsSda: B 7, IndicatorLights, Alternate, Some("INDLIGHTS_SDA");
    OledSs: B 9, Oled, Output, Some("OLED_SS");
    SysethEn: A 2, SysEth, Output, None;
    ExtethEn: D 7, ExtEth, Output, None;
    OledEn: E 2, Oled, Output, None;
    IndlightsEn: B 4, IndicatorLights, Output, None;
    Rs232En: D 8, Rs232, Output, None;
    /// Switches the 5V standby rail of the ATX supply.
    PsuStandby: D 4, Power, Output, None;
}

/// Most nets a single peripheral has on this board.
pub const MAX_SIGNALS_PER_PERIPHERAL: usize = 8;

impl Signal {
    pub const fn info(self) -> SignalInfo {
        SIGNALS[self as usize]
    }

    pub const fn pin(self) -> PinId {
        self.info().pin
    }

    pub const fn peripheral(self) -> Peripheral {
        self.info().peripheral
    }

    pub const fn direction(self) -> Direction {
        self.info().direction
    }

    pub const fn cube_name(self) -> Option<&'static str> {
        self.info().cube_name
    }

    /// Finds the signal named `name` in the generated header, with or without the
    /// `_Pin`/`_GPIO_Port` suffix.
    pub fn from_cube_name(name: &str) -> Option<Signal> {
        let base = name
            .strip_suffix("_Pin")
            .or_else(|| name.strip_suffix("_GPIO_Port"))
            .unwrap_or(name);

        SIGNALS
            .iter()
            .find(|info| info.cube_name == Some(base))
            .map(|info| info.signal)
    }

    pub fn from_pin(pin: PinId) -> Option<Signal> {
        SIGNALS
            .iter()
            .find(|info| info.pin == pin)
            .map(|info| info.signal)
    }

    pub fn of_peripheral(peripheral: Peripheral) -> Vec<Signal, MAX_SIGNALS_PER_PERIPHERAL> {
        SIGNALS
            .iter()
            .filter(|info| info.peripheral == peripheral)
            .map(|info| info.signal)
            .collect()
    }
}

const fn table_is_indexed_by_signal(table: &[SignalInfo]) -> bool {
    let mut i = 0;
    while i < table.len() {
        if table[i].signal as usize != i {
            return false;
        }
        i += 1;
    }
    true
}

const fn peripherals_fit(table: &[SignalInfo]) -> bool {
    let mut counts = [0usize; Peripheral::DebugLed as usize + 1];
    let mut i = 0;
    while i < table.len() {
        let slot = table[i].peripheral as usize;
        counts[slot] += 1;
        if counts[slot] > MAX_SIGNALS_PER_PERIPHERAL {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(table_is_indexed_by_signal(&SIGNALS));
const _: () = assert!(peripherals_fit(&SIGNALS));
