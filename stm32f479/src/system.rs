//! The control crate's drivers bound to the board's pins.

use core::convert::Infallible;

use hal::{
    gpio::PE12,
    i2c::{DutyCycle, I2c, Mode},
    pac::I2C1,
    prelude::*,
    rcc::Clocks,
};
use link_control::{
    debug_led::LedPin,
    indicator_lights::{self, Is31fl3218, BOARD_CHANNELS},
    power::{PowerSequencer, SequencerConfig},
};

use crate::pins::{
    DbgLedPin, IndicatorLights, IndlightsEnPin, Power, PsuOkPin, PsuOnPin, PsuStandbyPin,
    SysPowerPin, SysResetPin,
};

pub type SystemUnderTest =
    PowerSequencer<SysResetPin, SysPowerPin, PsuOnPin, PsuStandbyPin, PsuOkPin>;

pub type DebugLed = LedPin<DbgLedPin>;

pub type BoardIndicatorLights = indicator_lights::IndicatorLights<I2c<I2C1>, IndlightsEnPin>;

/// The IS31FL3218 runs I2C fast mode.
pub const INDICATOR_I2C_FREQ: u32 = 400_000;

impl Power {
    /// The sequencer, starting with the supply off and both buttons released.
    pub fn into_system_under_test(self, config: SequencerConfig) -> SystemUnderTest {
        let (reset, power, psu_on, psu_standby, psu_ok) = self.into_sequencer_pins();

        infallible(PowerSequencer::new(
            reset,
            power,
            psu_on,
            psu_standby,
            psu_ok,
            config,
        ))
    }
}

impl IndicatorLights {
    /// I2C1 at 400 kHz with the driver held in hardware shutdown. Call `enable` on the result
    /// before setting colours.
    pub fn into_indicator_lights(self, i2c1: I2C1, clocks: &Clocks) -> BoardIndicatorLights {
        let i2c = i2c1.i2c(
            (
                self.scl.into_alternate_open_drain::<4>(),
                self.sda.into_alternate_open_drain::<4>(),
            ),
            Mode::fast(INDICATOR_I2C_FREQ.Hz(), DutyCycle::Ratio2to1),
            clocks,
        );

        indicator_lights::IndicatorLights::new(
            Is31fl3218::new(i2c),
            self.en.into_push_pull_output(),
            BOARD_CHANNELS,
        )
    }
}

pub fn debug_led(pin: PE12) -> DebugLed {
    LedPin::new(pin.into_push_pull_output())
}

/// GPIO writes on this part cannot fail.
pub fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
