#![no_std]

pub extern crate stm32f4xx_hal as hal;

#[cfg(feature = "rt")]
extern crate cortex_m_rt;

#[cfg(feature = "rt")]
pub use cortex_m_rt::entry;

pub use hal::pac;
pub use link_board as board;

pub mod clocks;
pub mod dbg;
pub mod error;
pub mod exti;
pub mod pins;
pub mod system;

pub use pins::Pins;

/// 26 MHz crystal on OSC_IN/OSC_OUT.
pub const HSE_FREQ: fugit::HertzU32 = board::clock::HSE_FREQ;
