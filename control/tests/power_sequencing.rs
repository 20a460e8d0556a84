use std::{cell::Cell, convert::Infallible, rc::Rc};

use embedded_hal::{
    blocking::delay::DelayMs,
    digital::v2::{InputPin, OutputPin},
};
use link_control::{
    debug_led::{DebugLed, LedPin},
    power::{PowerError, PowerSequencer, PowerState, SequencerConfig},
};

/// A wire both the sequencer and the test can see.
#[derive(Clone, Default)]
struct Line(Rc<Cell<bool>>);

impl Line {
    fn level(&self) -> bool {
        self.0.get()
    }
}

impl OutputPin for Line {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

impl InputPin for Line {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

/// An ATX supply whose PWR_OK follows PS_ON after `lag_ms`, unless it is broken.
struct SimulatedPsu {
    ps_on: Line,
    pwr_ok: Line,
    lag_ms: u32,
    pending_ms: u32,
    broken: bool,
}

impl SimulatedPsu {
    fn advance(&mut self, ms: u32) {
        if self.ps_on.level() == self.pwr_ok.level() {
            self.pending_ms = 0;
            return;
        }

        self.pending_ms += ms;
        if self.pending_ms >= self.lag_ms && !self.broken {
            self.pwr_ok.0.set(self.ps_on.level());
            self.pending_ms = 0;
        }
    }
}

/// Keeps time and lets the simulated supply react to it.
struct SimulatedDelay {
    elapsed_ms: u32,
    psu: SimulatedPsu,
}

impl DelayMs<u32> for SimulatedDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += ms;
        self.psu.advance(ms);
    }
}

struct Bench {
    reset: Line,
    power: Line,
    psu_on: Line,
    psu_standby: Line,
    psu_ok: Line,
    delay: SimulatedDelay,
}

type Sequencer = PowerSequencer<Line, Line, Line, Line, Line>;

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let log_level =
        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("error,link_control=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .without_time()
        .try_init();
}

fn bench(lag_ms: u32, broken: bool) -> (Sequencer, Bench) {
    init_logging();

    let psu_on = Line::default();
    let psu_ok = Line::default();

    let bench = Bench {
        reset: Line::default(),
        power: Line::default(),
        psu_on: psu_on.clone(),
        psu_standby: Line::default(),
        psu_ok: psu_ok.clone(),
        delay: SimulatedDelay {
            elapsed_ms: 0,
            psu: SimulatedPsu {
                ps_on: psu_on,
                pwr_ok: psu_ok,
                lag_ms,
                pending_ms: 0,
                broken,
            },
        },
    };

    let sequencer = PowerSequencer::new(
        bench.reset.clone(),
        bench.power.clone(),
        bench.psu_on.clone(),
        bench.psu_standby.clone(),
        bench.psu_ok.clone(),
        SequencerConfig::default(),
    )
    .unwrap();

    (sequencer, bench)
}

#[test]
fn starts_off_with_everything_released() {
    let (sequencer, bench) = bench(100, false);

    assert_eq!(sequencer.state(), PowerState::Off);
    assert!(!bench.reset.level());
    assert!(!bench.power.level());
    assert!(!bench.psu_on.level());
    assert!(!bench.psu_standby.level());
}

#[test]
fn off_to_on_passes_through_standby() {
    let (mut sequencer, mut bench) = bench(100, false);

    sequencer
        .set_power_state(PowerState::On, &mut bench.delay)
        .unwrap();

    assert_eq!(sequencer.state(), PowerState::On);
    assert!(bench.psu_standby.level());
    assert!(bench.psu_on.level());
    assert!(sequencer.power_ok().unwrap());
    // Standby settle plus the supply's reaction time.
    assert_eq!(bench.delay.elapsed_ms, 1000 + 100);
}

#[test]
fn dead_supply_times_out_in_standby() {
    let (mut sequencer, mut bench) = bench(100, true);

    let result = sequencer.set_power_state(PowerState::On, &mut bench.delay);

    assert_eq!(result, Err(PowerError::PsuOkTimeout { expected: true }));
    assert_eq!(sequencer.state(), PowerState::Standby);
    assert!(!bench.psu_on.level(), "PS_ON must be dropped again");
    assert!(bench.psu_standby.level());
    assert_eq!(
        bench.delay.elapsed_ms,
        1000 + sequencer.config().psu_ok_timeout_ms
    );
}

#[test]
fn stuck_power_good_keeps_the_supply_on() {
    let (mut sequencer, mut bench) = bench(20, false);

    sequencer
        .set_power_state(PowerState::On, &mut bench.delay)
        .unwrap();
    // PWR_OK no longer follows PS_ON from here on.
    bench.delay.psu.broken = true;
    bench.delay.elapsed_ms = 0;

    let result = sequencer.set_power_state(PowerState::Standby, &mut bench.delay);

    assert_eq!(result, Err(PowerError::PsuOkTimeout { expected: false }));
    assert_eq!(sequencer.state(), PowerState::On);
    assert!(bench.psu_on.level(), "PS_ON must be raised again");
    assert!(bench.psu_ok.level());
    assert_eq!(bench.delay.elapsed_ms, sequencer.config().psu_ok_timeout_ms);

    // The state still matches the pins, so asking for On is a no-op that leaves PS_ON up.
    sequencer
        .set_power_state(PowerState::On, &mut bench.delay)
        .unwrap();
    assert!(bench.psu_on.level());
}

#[test]
fn on_to_off_shuts_everything_down() {
    let (mut sequencer, mut bench) = bench(20, false);

    sequencer
        .set_power_state(PowerState::On, &mut bench.delay)
        .unwrap();
    bench.delay.elapsed_ms = 0;

    sequencer
        .set_power_state(PowerState::Off, &mut bench.delay)
        .unwrap();

    assert_eq!(sequencer.state(), PowerState::Off);
    assert!(!bench.psu_on.level());
    assert!(!bench.psu_ok.level());
    assert!(!bench.psu_standby.level());
    assert_eq!(bench.delay.elapsed_ms, 20 + 100 + 1000);
}

#[test]
fn requesting_the_current_state_does_nothing() {
    let (mut sequencer, mut bench) = bench(20, false);

    sequencer
        .set_power_state(PowerState::Off, &mut bench.delay)
        .unwrap();

    assert_eq!(bench.delay.elapsed_ms, 0);
    assert_eq!(sequencer.state(), PowerState::Off);
}

#[test]
fn buttons_are_pressed_and_released() {
    let (mut sequencer, mut bench) = bench(20, false);

    sequencer.press_power(&mut bench.delay).unwrap();
    assert!(!bench.power.level());
    assert_eq!(bench.delay.elapsed_ms, 200);

    sequencer.hold_reset(50, &mut bench.delay).unwrap();
    assert!(!bench.reset.level());
    assert_eq!(bench.delay.elapsed_ms, 250);

    let (reset, power, ..) = sequencer.free();
    assert!(!reset.level());
    assert!(!power.level());
}

#[test]
fn led_pin_follows_the_trait() {
    let line = Line::default();
    let mut led = LedPin::new(line.clone());

    led.on();
    assert!(line.level());
    led.toggle();
    assert!(!line.level());
    assert!(!led.is_lit());
}
