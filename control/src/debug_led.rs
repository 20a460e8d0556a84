//! The single debug LED next to the MCU, used to show signs of life during bring-up.

use core::convert::Infallible;

use embedded_hal::{blocking::delay::DelayMs, digital::v2::OutputPin};

pub trait DebugLed {
    fn set_bit(&mut self, on: bool);

    fn is_lit(&self) -> bool;

    fn on(&mut self) {
        self.set_bit(true);
    }

    fn off(&mut self) {
        self.set_bit(false);
    }

    fn toggle(&mut self) {
        let lit = self.is_lit();
        self.set_bit(!lit);
    }
}

/// An LED on a plain push-pull output, lit when the pin is high.
///
/// Only pins that cannot fail to switch qualify, which is every GPIO on the STM32 HALs.
pub struct LedPin<P> {
    pin: P,
    lit: bool,
}

impl<P> LedPin<P>
where
    P: OutputPin<Error = Infallible>,
{
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_low();
        Self { pin, lit: false }
    }

    pub fn free(self) -> P {
        self.pin
    }
}

impl<P> DebugLed for LedPin<P>
where
    P: OutputPin<Error = Infallible>,
{
    fn set_bit(&mut self, on: bool) {
        let _ = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        self.lit = on;
    }

    fn is_lit(&self) -> bool {
        self.lit
    }
}

/// Short flash followed by a long pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heartbeat {
    pub on_ms: u32,
    pub off_ms: u32,
    lit: bool,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new(100, 2000)
    }
}

impl Heartbeat {
    pub const fn new(on_ms: u32, off_ms: u32) -> Self {
        Self {
            on_ms,
            off_ms,
            lit: false,
        }
    }

    pub const fn period_ms(&self) -> u32 {
        self.on_ms + self.off_ms
    }

    /// Switches the LED to the next phase and returns how long it should stay there.
    /// Meant for superloops and timers that cannot block for a whole period.
    pub fn step<L: DebugLed>(&mut self, led: &mut L) -> u32 {
        self.lit = !self.lit;
        led.set_bit(self.lit);

        if self.lit {
            self.on_ms
        } else {
            self.off_ms
        }
    }

    /// Blocks for one full flash and pause.
    pub fn run_once<L, D>(&mut self, led: &mut L, delay: &mut D)
    where
        L: DebugLed,
        D: DelayMs<u32>,
    {
        if self.lit {
            // Finish a phase started through `step` first.
            let ms = self.step(led);
            delay.delay_ms(ms);
        }

        let on = self.step(led);
        delay.delay_ms(on);
        let off = self.step(led);
        delay.delay_ms(off);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLed {
        lit: bool,
        changes: usize,
    }

    impl DebugLed for RecordingLed {
        fn set_bit(&mut self, on: bool) {
            self.lit = on;
            self.changes += 1;
        }

        fn is_lit(&self) -> bool {
            self.lit
        }
    }

    #[derive(Default)]
    struct CountingDelay(u32);

    impl DelayMs<u32> for CountingDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.0 += ms;
        }
    }

    #[test]
    fn heartbeat_alternates() {
        let mut led = RecordingLed::default();
        let mut beat = Heartbeat::default();

        assert_eq!(beat.step(&mut led), 100);
        assert!(led.lit);
        assert_eq!(beat.step(&mut led), 2000);
        assert!(!led.lit);
        assert_eq!(beat.step(&mut led), 100);
    }

    #[test]
    fn run_once_takes_one_period() {
        let mut led = RecordingLed::default();
        let mut delay = CountingDelay::default();
        let mut beat = Heartbeat::new(20, 80);

        beat.run_once(&mut led, &mut delay);

        assert_eq!(delay.0, beat.period_ms());
        assert_eq!(led.changes, 2);
        assert!(!led.lit);
    }

    #[test]
    fn run_once_after_step_finishes_the_flash() {
        let mut led = RecordingLed::default();
        let mut delay = CountingDelay::default();
        let mut beat = Heartbeat::new(20, 80);

        beat.step(&mut led);
        beat.run_once(&mut led, &mut delay);

        assert_eq!(delay.0, 80 + 100);
        assert!(!led.lit);
    }

    #[test]
    fn toggle_flips() {
        let mut led = RecordingLed::default();
        led.toggle();
        assert!(led.is_lit());
        led.toggle();
        assert!(!led.is_lit());
    }
}
