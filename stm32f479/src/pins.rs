//! The MCU pins, grouped by what they are wired to.
//!
//! Every field is the HAL pin of the net with the same name in [`link_board::pins`], checked
//! against that table at compile time.

use hal::{
    gpio::{
        Alternate, GpioExt, Input, Output, PushPull, PA11, PA12, PA13, PA14, PA15, PA2, PA3, PA4,
        PA5, PA6, PA7, PB0, PB1, PB10, PB11, PB13, PB14, PB3, PB4, PB6, PB7, PB9, PC10, PC11,
        PC12, PC13, PC14, PC3, PC8, PC9, PD0, PD1, PD2, PD3, PD4, PD5, PD6, PD7, PD8, PE12, PE2,
        PE7, PE8, PH0,
    },
    pac,
};
use link_board::Signal;

pub type DebugUartTxPin = PE8<Alternate<8>>;
pub type DbgLedPin = PE12<Output<PushPull>>;
pub type SysResetPin = PC9<Output<PushPull>>;
pub type SysPowerPin = PC8<Output<PushPull>>;
pub type PsuOnPin = PD6<Output<PushPull>>;
pub type PsuStandbyPin = PD4<Output<PushPull>>;
pub type PsuOkPin = PD5<Input>;
pub type SysethIntPin = PB0<Input>;
pub type ExtethIntPin = PD1<Input>;
pub type IndlightsEnPin = PB4<Output<PushPull>>;

/// OLED on SPI2, transmit only.
pub struct Oled {
    pub rst: PC13,
    pub dc: PC14,
    pub mosi: PC3,
    pub sck: PD3,
    pub ss: PB9,
    pub en: PE2,
}

/// Ethernet controller facing the system under test, on SPI1.
pub struct SysEth {
    pub en: PA2,
    pub xfrm_en: PA3,
    pub ss: PA4,
    pub sck: PA5,
    pub miso: PA6,
    pub mosi: PA7,
    pub int: PB0,
    pub rst: PB1,
}

/// Ethernet controller facing the outside network, on SPI3.
pub struct ExtEth {
    pub ss: PA15<Alternate<0>>,
    pub sck: PC10,
    pub miso: PC11,
    pub mosi: PC12,
    pub rst: PD0,
    pub int: PD1,
    pub xfrm_en: PD2,
    pub en: PD7,
}

/// UART7, the debug console.
pub struct DebugUart {
    pub rx: PE7,
    pub tx: PE8,
}

/// USART3 through the RS232 transceiver.
pub struct Rs232 {
    pub tx: PB10,
    pub rx: PB11,
    pub cts: PB13,
    pub rts: PB14,
    pub en: PD8,
}

pub struct Usb {
    pub dm: PA11,
    pub dp: PA12,
}

/// Left in debugger mode after reset.
pub struct Swd {
    pub swdio: PA13<Alternate<0>>,
    pub swclk: PA14<Alternate<0>>,
    pub swo: PB3<Alternate<0>>,
}

/// ATX supply and front panel of the system under test.
pub struct Power {
    pub sys_power: PC8,
    pub sys_reset: PC9,
    pub psu_standby: PD4,
    pub psu_ok: PD5,
    pub psu_on: PD6,
}

/// Indicator light controller on I2C1.
pub struct IndicatorLights {
    pub scl: PB6,
    pub sda: PB7,
    pub en: PB4<Alternate<0>>,
}

pub struct Pins {
    pub oled: Oled,
    pub syseth: SysEth,
    pub exteth: ExtEth,
    pub uart: DebugUart,
    pub rs232: Rs232,
    pub usb: Usb,
    pub swd: Swd,
    pub power: Power,
    pub indlights: IndicatorLights,
    pub dbgled: PE12,
    /// HSE input, taken over by the RCC once the crystal is enabled.
    pub clock_in: PH0,
}

impl Pins {
    /// Enables the GPIO banks and hands out every connected pin in its reset state.
    pub fn new(
        gpioa: pac::GPIOA,
        gpiob: pac::GPIOB,
        gpioc: pac::GPIOC,
        gpiod: pac::GPIOD,
        gpioe: pac::GPIOE,
        gpioh: pac::GPIOH,
    ) -> Self {
        let a = gpioa.split();
        let b = gpiob.split();
        let c = gpioc.split();
        let d = gpiod.split();
        let e = gpioe.split();
        let h = gpioh.split();

        Self {
            oled: Oled {
                rst: c.pc13,
                dc: c.pc14,
                mosi: c.pc3,
                sck: d.pd3,
                ss: b.pb9,
                en: e.pe2,
            },
            syseth: SysEth {
                en: a.pa2,
                xfrm_en: a.pa3,
                ss: a.pa4,
                sck: a.pa5,
                miso: a.pa6,
                mosi: a.pa7,
                int: b.pb0,
                rst: b.pb1,
            },
            exteth: ExtEth {
                ss: a.pa15,
                sck: c.pc10,
                miso: c.pc11,
                mosi: c.pc12,
                rst: d.pd0,
                int: d.pd1,
                xfrm_en: d.pd2,
                en: d.pd7,
            },
            uart: DebugUart {
                rx: e.pe7,
                tx: e.pe8,
            },
            rs232: Rs232 {
                tx: b.pb10,
                rx: b.pb11,
                cts: b.pb13,
                rts: b.pb14,
                en: d.pd8,
            },
            usb: Usb {
                dm: a.pa11,
                dp: a.pa12,
            },
            swd: Swd {
                swdio: a.pa13,
                swclk: a.pa14,
                swo: b.pb3,
            },
            power: Power {
                sys_power: c.pc8,
                sys_reset: c.pc9,
                psu_standby: d.pd4,
                psu_ok: d.pd5,
                psu_on: d.pd6,
            },
            indlights: IndicatorLights {
                scl: b.pb6,
                sda: b.pb7,
                en: b.pb4,
            },
            dbgled: e.pe12,
            clock_in: h.ph0,
        }
    }
}

impl Power {
    /// Configures the sequencer pins: buttons and supply controls as outputs, PWR_OK pulled up.
    pub fn into_sequencer_pins(
        self,
    ) -> (SysResetPin, SysPowerPin, PsuOnPin, PsuStandbyPin, PsuOkPin) {
        (
            self.sys_reset.into_push_pull_output(),
            self.sys_power.into_push_pull_output(),
            self.psu_on.into_push_pull_output(),
            self.psu_standby.into_push_pull_output(),
            self.psu_ok.into_pull_up_input(),
        )
    }
}

const fn wired_to(signal: Signal, port: char, number: u8) -> bool {
    let pin = signal.pin();
    pin.port.letter() == port && pin.number.get() == number
}

macro_rules! wired {
    ($($signal:ident => $port:literal $number:literal),* $(,)?) => {
        $(
            const _: () = assert!(
                wired_to(Signal::$signal, $port, $number),
                concat!(stringify!($signal), " is not on P", $port, stringify!($number))
            );
        )*
    };
}

wired! {
    OledRst => 'C' 13, OledDc => 'C' 14, OledMosi => 'C' 3, OledSck => 'D' 3, OledSs => 'B' 9,
    OledEn => 'E' 2,
    SysethEn => 'A' 2, SysethXfrmEn => 'A' 3, SysethSs => 'A' 4, SysethSck => 'A' 5,
    SysethMiso => 'A' 6, SysethMosi => 'A' 7, SysethInt => 'B' 0, SysethRst => 'B' 1,
    ExtethSs => 'A' 15, ExtethSck => 'C' 10, ExtethMiso => 'C' 11, ExtethMosi => 'C' 12,
    ExtethRst => 'D' 0, ExtethInt => 'D' 1, ExtethXfrmEn => 'D' 2, ExtethEn => 'D' 7,
    UartRx => 'E' 7, UartTx => 'E' 8,
    Rs232Tx => 'B' 10, Rs232Rx => 'B' 11, Rs232Cts => 'B' 13, Rs232Rts => 'B' 14,
    Rs232En => 'D' 8,
    UsbDm => 'A' 11, UsbDp => 'A' 12,
    Swdio => 'A' 13, Swclk => 'A' 14, Swo => 'B' 3,
    SysPower => 'C' 8, SysReset => 'C' 9, PsuStandby => 'D' 4, PsuOk => 'D' 5, PsuOn => 'D' 6,
    IndlightsScl => 'B' 6, IndlightsSda => 'B' 7, IndlightsEn => 'B' 4,
    DbgLed => 'E' 12,
    ClockIn => 'H' 0,
}
