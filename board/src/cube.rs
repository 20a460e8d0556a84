//! The pin and interrupt names of the CubeMX generated `main.h`, spelled exactly as generated.
//!
//! C code and schematics refer to the board by these names, so they are kept verbatim instead of
//! being converted to Rust naming. The values are written out the way the header writes them and
//! are compared against the pin table at compile time.
#![allow(non_upper_case_globals)]

use crate::{
    exti::{ExtiIrq, EXTETH_INT, SYSETH_INT},
    pins::{Port, Signal},
};

pub const GPIO_PIN_0: u16 = 0x0001;
pub const GPIO_PIN_1: u16 = 0x0002;
pub const GPIO_PIN_2: u16 = 0x0004;
pub const GPIO_PIN_3: u16 = 0x0008;
pub const GPIO_PIN_4: u16 = 0x0010;
pub const GPIO_PIN_5: u16 = 0x0020;
pub const GPIO_PIN_6: u16 = 0x0040;
pub const GPIO_PIN_7: u16 = 0x0080;
pub const GPIO_PIN_8: u16 = 0x0100;
pub const GPIO_PIN_9: u16 = 0x0200;
pub const GPIO_PIN_10: u16 = 0x0400;
pub const GPIO_PIN_11: u16 = 0x0800;
pub const GPIO_PIN_12: u16 = 0x1000;
pub const GPIO_PIN_13: u16 = 0x2000;
pub const GPIO_PIN_14: u16 = 0x4000;
pub const GPIO_PIN_15: u16 = 0x8000;

pub const GPIOA: Port = Port::A;
pub const GPIOB: Port = Port::B;
pub const GPIOC: Port = Port::C;
pub const GPIOD: Port = Port::D;
pub const GPIOE: Port = Port::E;
pub const GPIOH: Port = Port::H;

pub const EXTI0_IRQn: i16 = ExtiIrq::Exti0.irqn();
pub const EXTI1_IRQn: i16 = ExtiIrq::Exti1.irqn();
pub const EXTI2_IRQn: i16 = ExtiIrq::Exti2.irqn();
pub const EXTI3_IRQn: i16 = ExtiIrq::Exti3.irqn();
pub const EXTI4_IRQn: i16 = ExtiIrq::Exti4.irqn();
pub const EXTI9_5_IRQn: i16 = ExtiIrq::Exti9To5.irqn();
pub const EXTI15_10_IRQn: i16 = ExtiIrq::Exti15To10.irqn();

/// One `X_Pin`/`X_GPIO_Port` pair of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeDefine {
    pub name: &'static str,
    pub signal: Signal,
    pub pin: u16,
    pub port: Port,
}

macro_rules! defines {
    ($($name:literal => $signal:ident: $pin:ident = $mask:ident, $port:ident = $bank:ident;)*) => {
        $(
            pub const $pin: u16 = $mask;
            pub const $port: Port = $bank;
        )*

        /// All pairs in header order.
        pub const DEFINES: &[CubeDefine] = &[$(
            CubeDefine {
                name: $name,
                signal: Signal::$signal,
                pin: $pin,
                port: $port,
            },
        )*];
    };
}

defines! {
    "OLED_RST" => OledRst: OLED_RST_Pin = GPIO_PIN_13, OLED_RST_GPIO_Port = GPIOC;
    "OLED_DC" => OledDc: OLED_DC_Pin = GPIO_PIN_14, OLED_DC_GPIO_Port = GPIOC;
    "CLOCK_IN" => ClockIn: CLOCK_IN_Pin = GPIO_PIN_0, CLOCK_IN_GPIO_Port = GPIOH;
    "OLED_MOSI" => OledMosi: OLED_MOSI_Pin = GPIO_PIN_3, OLED_MOSI_GPIO_Port = GPIOC;
    "SYSETH_XFRM_EN" => SysethXfrmEn: SYSETH_XFRM_EN_Pin = GPIO_PIN_3, SYSETH_XFRM_EN_GPIO_Port = GPIOA;
    "SYSETH_SS" => SysethSs: SYSETH_SS_Pin = GPIO_PIN_4, SYSETH_SS_GPIO_Port = GPIOA;
    "SYSETH_SCK" => SysethSck: SYSETH_SCK_Pin = GPIO_PIN_5, SYSETH_SCK_GPIO_Port = GPIOA;
    "SYSETH_MISO" => SysethMiso: SYSETH_MISO_Pin = GPIO_PIN_6, SYSETH_MISO_GPIO_Port = GPIOA;
    "SYSETH_MOSI" => SysethMosi: SYSETH_MOSI_Pin = GPIO_PIN_7, SYSETH_MOSI_GPIO_Port = GPIOA;
    "SYSETH_INT" => SysethInt: SYSETH_INT_Pin = GPIO_PIN_0, SYSETH_INT_GPIO_Port = GPIOB;
    "SYSETH_RST" => SysethRst: SYSETH_RST_Pin = GPIO_PIN_1, SYSETH_RST_GPIO_Port = GPIOB;
    "UART_RX" => UartRx: UART_RX_Pin = GPIO_PIN_7, UART_RX_GPIO_Port = GPIOE;
    "UART_TX" => UartTx: UART_TX_Pin = GPIO_PIN_8, UART_TX_GPIO_Port = GPIOE;
    "DBGLED" => DbgLed: DBGLED_Pin = GPIO_PIN_12, DBGLED_GPIO_Port = GPIOE;
    "RS232_TX" => Rs232Tx: RS232_TX_Pin = GPIO_PIN_10, RS232_TX_GPIO_Port = GPIOB;
    "RS232_RX" => Rs232Rx: RS232_RX_Pin = GPIO_PIN_11, RS232_RX_GPIO_Port = GPIOB;
    "RS232_CTS" => Rs232Cts: RS232_CTS_Pin = GPIO_PIN_13, RS232_CTS_GPIO_Port = GPIOB;
    "RS232_RTS" => Rs232Rts: RS232_RTS_Pin = GPIO_PIN_14, RS232_RTS_GPIO_Port = GPIOB;
    "SYS_POWER" => SysPower: SYS_POWER_Pin = GPIO_PIN_8, SYS_POWER_GPIO_Port = GPIOC;
    "SYS_RESET" => SysReset: SYS_RESET_Pin = GPIO_PIN_9, SYS_RESET_GPIO_Port = GPIOC;
    "USB_D_" => UsbDm: USB_D__Pin = GPIO_PIN_11, USB_D__GPIO_Port = GPIOA;
    "USB_D_A12" => UsbDp: USB_D_A12_Pin = GPIO_PIN_12, USB_D_A12_GPIO_Port = GPIOA;
    "SWDIO" => Swdio: SWDIO_Pin = GPIO_PIN_13, SWDIO_GPIO_Port = GPIOA;
    "SWCLK" => Swclk: SWCLK_Pin = GPIO_PIN_14, SWCLK_GPIO_Port = GPIOA;
    "EXTETH_SS" => ExtethSs: EXTETH_SS_Pin = GPIO_PIN_15, EXTETH_SS_GPIO_Port = GPIOA;
    "EXTETH_SCK" => ExtethSck: EXTETH_SCK_Pin = GPIO_PIN_10, EXTETH_SCK_GPIO_Port = GPIOC;
    "EXTETH_MISO" => ExtethMiso: EXTETH_MISO_Pin = GPIO_PIN_11, EXTETH_MISO_GPIO_Port = GPIOC;
    "EXTETH_MOSI" => ExtethMosi: EXTETH_MOSI_Pin = GPIO_PIN_12, EXTETH_MOSI_GPIO_Port = GPIOC;
    "EXTETH_RST" => ExtethRst: EXTETH_RST_Pin = GPIO_PIN_0, EXTETH_RST_GPIO_Port = GPIOD;
    "EXTETH_INT" => ExtethInt: EXTETH_INT_Pin = GPIO_PIN_1, EXTETH_INT_GPIO_Port = GPIOD;
    "EXTETH_XFRM_EN" => ExtethXfrmEn: EXTETH_XFRM_EN_Pin = GPIO_PIN_2, EXTETH_XFRM_EN_GPIO_Port = GPIOD;
    "OLED_SCK" => OledSck: OLED_SCK_Pin = GPIO_PIN_3, OLED_SCK_GPIO_Port = GPIOD;
    "PSU_OK" => PsuOk: PSU_OK_Pin = GPIO_PIN_5, PSU_OK_GPIO_Port = GPIOD;
    "PSU_ON" => PsuOn: PSU_ON_Pin = GPIO_PIN_6, PSU_ON_GPIO_Port = GPIOD;
    "SWO" => Swo: SWO_Pin = GPIO_PIN_3, SWO_GPIO_Port = GPIOB;
    "INDLIGHTS_SCL" => IndlightsScl: INDLIGHTS_SCL_Pin = GPIO_PIN_6, INDLIGHTS_SCL_GPIO_Port = GPIOB;
    "INDLIGHTS_SDA" => IndlightsSda: INDLIGHTS_SDA_Pin = GPIO_PIN_7, INDLIGHTS_SDA_GPIO_Port = GPIOB;
    "OLED_SS" => OledSs: OLED_SS_Pin = GPIO_PIN_9, OLED_SS_GPIO_Port = GPIOB;
}

pub const SYSETH_INT_EXTI_IRQn: i16 = EXTI0_IRQn;
pub const EXTETH_INT_EXTI_IRQn: i16 = EXTI1_IRQn;

impl CubeDefine {
    /// Whether the header values describe the same pin as the board table.
    pub const fn matches_table(&self) -> bool {
        let pin = self.signal.pin();
        pin.number.mask() == self.pin && pin.port as u8 == self.port as u8
    }
}

const fn defines_match_table(defines: &[CubeDefine]) -> bool {
    let mut i = 0;
    while i < defines.len() {
        if !defines[i].matches_table() {
            return false;
        }
        i += 1;
    }
    true
}

/// A `_Pin` value has to be a single pin, the header never ORs masks together.
const fn masks_are_single_pins(defines: &[CubeDefine]) -> bool {
    let mut i = 0;
    while i < defines.len() {
        if defines[i].pin.count_ones() != 1 {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(defines_match_table(DEFINES), "header and pin table disagree");
const _: () = assert!(masks_are_single_pins(DEFINES));
const _: () = assert!(SYSETH_INT_EXTI_IRQn == SYSETH_INT.irq.irqn());
const _: () = assert!(EXTETH_INT_EXTI_IRQn == EXTETH_INT.irq.irqn());

/// The `X_Pin` value for a header name such as `"OLED_RST"`.
pub fn pin_of(name: &str) -> Option<u16> {
    DEFINES.iter().find(|d| d.name == name).map(|d| d.pin)
}

/// The `X_GPIO_Port` value for a header name such as `"OLED_RST"`.
pub fn port_of(name: &str) -> Option<Port> {
    DEFINES.iter().find(|d| d.name == name).map(|d| d.port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_values() {
        assert_eq!(OLED_RST_Pin, 1 << 13);
        assert_eq!(OLED_RST_GPIO_Port, Port::C);
        assert_eq!(USB_D__Pin, GPIO_PIN_11);
        assert_eq!(CLOCK_IN_GPIO_Port, GPIOH);
        assert_eq!(SYSETH_INT_EXTI_IRQn, 6);
        assert_eq!(EXTETH_INT_EXTI_IRQn, 7);
    }

    #[test]
    fn every_named_net_is_in_the_header() {
        for info in crate::SIGNALS.iter() {
            if let Some(name) = info.cube_name {
                let define = DEFINES.iter().find(|d| d.name == name);
                assert_eq!(define.map(|d| d.signal), Some(info.signal), "{name}");
            }
        }
        assert_eq!(DEFINES.len(), 38);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(pin_of("PSU_OK"), Some(GPIO_PIN_5));
        assert_eq!(port_of("PSU_OK"), Some(GPIOD));
        assert_eq!(pin_of("PSU_STANDBY"), None);
    }
}
