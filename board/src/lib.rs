//! Board description of the Oro Link PCB: which STM32F479VG pin every net is soldered to,
//! how the Ethernet interrupt lines reach the NVIC and how the clock tree is set up.
//!
//! Nothing in here touches hardware, so it builds and tests on the host. The `link-stm32f479`
//! crate turns this data into owned, typed HAL pins.
#![no_std]

#[cfg(test)]
extern crate std;

pub mod check;
pub mod clock;
pub mod cube;
pub mod exti;
pub mod pins;

pub use check::{check_all, BoardError};
pub use exti::{ExtiIrq, ExtiLine, InterruptSource};
pub use pins::{Direction, Peripheral, PinId, PinNumber, Port, Signal, SignalInfo, SIGNALS};
