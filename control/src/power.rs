//! Power sequencing of the machine plugged into the board (the "system under test").
//!
//! The board switches the ATX supply through PSU_STANDBY and PSU_ON, watches PWR_OK through
//! PSU_OK and can press the front panel power and reset buttons. The supply has to be walked
//! through standby: Off <-> Standby <-> On.

use embedded_hal::{
    blocking::delay::DelayMs,
    digital::v2::{InputPin, OutputPin},
};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    Off,
    /// Only the 5V standby rail is up.
    Standby,
    On,
}

impl PowerState {
    /// The next state on the way from `self` to `target`.
    pub const fn step_towards(self, target: PowerState) -> PowerState {
        match (self, target) {
            (PowerState::Off, PowerState::Off) => PowerState::Off,
            (PowerState::On, PowerState::On) => PowerState::On,
            (PowerState::Off, _) | (PowerState::On, _) => PowerState::Standby,
            (PowerState::Standby, target) => target,
        }
    }
}

/// Timing of the sequencer, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequencerConfig {
    /// Time the motherboard gets after the standby rail comes up or goes down.
    pub standby_settle_ms: u32,
    /// How long PWR_OK may take to follow PS_ON, in either direction.
    pub psu_ok_timeout_ms: u32,
    /// Extra time after PWR_OK dropped before the supply counts as off.
    pub psu_off_settle_ms: u32,
    /// Length of a button press from `press_power`/`press_reset`.
    pub press_ms: u32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            standby_settle_ms: 1000,
            psu_ok_timeout_ms: 500,
            psu_off_settle_ms: 100,
            press_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerError<E> {
    Pin(E),
    /// PWR_OK did not reach `expected` within the timeout.
    PsuOkTimeout { expected: bool },
}

impl<E> From<E> for PowerError<E> {
    fn from(err: E) -> Self {
        PowerError::Pin(err)
    }
}

pub struct PowerSequencer<RST, PWR, ON, SB, OK> {
    state: PowerState,
    config: SequencerConfig,
    reset: RST,
    power: PWR,
    psu_on: ON,
    psu_standby: SB,
    psu_ok: OK,
}

impl<RST, PWR, ON, SB, OK, E> PowerSequencer<RST, PWR, ON, SB, OK>
where
    RST: OutputPin<Error = E>,
    PWR: OutputPin<Error = E>,
    ON: OutputPin<Error = E>,
    SB: OutputPin<Error = E>,
    OK: InputPin<Error = E>,
{
    /// Releases both buttons and switches the supply off completely.
    pub fn new(
        mut reset: RST,
        mut power: PWR,
        mut psu_on: ON,
        mut psu_standby: SB,
        psu_ok: OK,
        config: SequencerConfig,
    ) -> Result<Self, E> {
        reset.set_low()?;
        power.set_low()?;
        psu_on.set_low()?;
        psu_standby.set_low()?;

        Ok(Self {
            state: PowerState::Off,
            config,
            reset,
            power,
            psu_on,
            psu_standby,
            psu_ok,
        })
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn power_ok(&self) -> Result<bool, E> {
        self.psu_ok.is_high()
    }

    /// Walks the supply to `target` one state at a time. On error the sequencer stays in the
    /// last state it fully reached, with the pins put back the way that state drives them.
    pub fn set_power_state<D>(
        &mut self,
        target: PowerState,
        delay: &mut D,
    ) -> Result<(), PowerError<E>>
    where
        D: DelayMs<u32>,
    {
        while self.state != target {
            let next = self.state.step_towards(target);
            self.transition(next, delay)?;
            info!("system under test: {:?} -> {:?}", self.state, next);
            self.state = next;
        }

        Ok(())
    }

    fn transition<D>(&mut self, next: PowerState, delay: &mut D) -> Result<(), PowerError<E>>
    where
        D: DelayMs<u32>,
    {
        match (self.state, next) {
            (PowerState::Off, PowerState::Standby) => {
                self.psu_standby.set_high()?;
                delay.delay_ms(self.config.standby_settle_ms);
            }
            (PowerState::Standby, PowerState::On) => {
                self.psu_on.set_high()?;
                if let Err(err) = self.wait_for_psu_ok(true, delay) {
                    warn!("supply did not report PWR_OK, dropping PS_ON again");
                    self.psu_on.set_low()?;
                    return Err(err);
                }
            }
            (PowerState::On, PowerState::Standby) => {
                self.psu_on.set_low()?;
                if let Err(err) = self.wait_for_psu_ok(false, delay) {
                    warn!("supply kept PWR_OK up, raising PS_ON again");
                    self.psu_on.set_high()?;
                    return Err(err);
                }
                delay.delay_ms(self.config.psu_off_settle_ms);
            }
            (PowerState::Standby, PowerState::Off) => {
                self.psu_standby.set_low()?;
                delay.delay_ms(self.config.standby_settle_ms);
            }
            // step_towards only ever moves one state and never stays put.
            _ => {}
        }

        Ok(())
    }

    fn wait_for_psu_ok<D>(&mut self, expected: bool, delay: &mut D) -> Result<(), PowerError<E>>
    where
        D: DelayMs<u32>,
    {
        for _ in 0..self.config.psu_ok_timeout_ms {
            if self.psu_ok.is_high()? == expected {
                return Ok(());
            }
            delay.delay_ms(1);
        }

        if self.psu_ok.is_high()? == expected {
            Ok(())
        } else {
            Err(PowerError::PsuOkTimeout { expected })
        }
    }

    pub fn press_power<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), E> {
        let ms = self.config.press_ms;
        self.hold_power(ms, delay)
    }

    pub fn press_reset<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), E> {
        let ms = self.config.press_ms;
        self.hold_reset(ms, delay)
    }

    /// Holds the power button for `ms`, long enough (about 4 s) forces most machines off.
    pub fn hold_power<D: DelayMs<u32>>(&mut self, ms: u32, delay: &mut D) -> Result<(), E> {
        info!("pressing power button for {}ms", ms);
        self.power.set_high()?;
        delay.delay_ms(ms);
        self.power.set_low()
    }

    pub fn hold_reset<D: DelayMs<u32>>(&mut self, ms: u32, delay: &mut D) -> Result<(), E> {
        info!("pressing reset button for {}ms", ms);
        self.reset.set_high()?;
        delay.delay_ms(ms);
        self.reset.set_low()
    }

    /// Gives the pins back, in whatever state they were left.
    pub fn free(self) -> (RST, PWR, ON, SB, OK) {
        (
            self.reset,
            self.power,
            self.psu_on,
            self.psu_standby,
            self.psu_ok,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_go_through_standby() {
        use PowerState::*;

        assert_eq!(Off.step_towards(On), Standby);
        assert_eq!(On.step_towards(Off), Standby);
        assert_eq!(Standby.step_towards(On), On);
        assert_eq!(Standby.step_towards(Off), Off);
        assert_eq!(Standby.step_towards(Standby), Standby);
        assert_eq!(Off.step_towards(Off), Off);
    }
}
