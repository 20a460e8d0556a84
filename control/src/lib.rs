#![no_std]

pub mod debug_led;
pub mod indicator_lights;
pub mod power;
