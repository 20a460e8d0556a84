use std::{cell::Cell, convert::Infallible, rc::Rc};

use embedded_hal::{blocking::delay::DelayMs, blocking::i2c, digital::v2::OutputPin};
use link_control::indicator_lights::{
    Color, IndicatorError, IndicatorLights, Is31fl3218, ADDRESS, BOARD_CHANNELS,
};

/// Records every I2C transaction, or refuses them all when `nack` is set.
#[derive(Default)]
struct MockedI2c {
    writes: Vec<(u8, Vec<u8>)>,
    nack: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Nack;

impl i2c::Write for MockedI2c {
    type Error = Nack;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.nack {
            return Err(Nack);
        }
        self.writes.push((address, bytes.to_vec()));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Sdb(Rc<Cell<bool>>);

impl OutputPin for Sdb {
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

#[derive(Default)]
struct CountingDelay(u32);

impl DelayMs<u32> for CountingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.0 += ms;
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let log_level =
        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("error,link_control=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .without_time()
        .try_init();
}

fn lights() -> (IndicatorLights<MockedI2c, Sdb>, Sdb) {
    init_logging();

    let sdb = Sdb(Rc::new(Cell::new(true)));
    let lights = IndicatorLights::new(
        Is31fl3218::new(MockedI2c::default()),
        sdb.clone(),
        BOARD_CHANNELS,
    );
    (lights, sdb)
}

#[test]
fn starts_in_hardware_shutdown() {
    let (lights, sdb) = lights();

    assert!(!sdb.0.get());
    let (driver, _) = lights.free();
    assert!(driver.free().writes.is_empty());
}

#[test]
fn enable_releases_sdb_before_talking_to_the_chip() {
    let (mut lights, sdb) = lights();
    let mut delay = CountingDelay::default();

    lights.enable(&mut delay).unwrap();
    assert!(sdb.0.get());
    assert_eq!(delay.0, 1);

    lights.disable(&mut delay).unwrap();
    assert!(!sdb.0.get());

    let (driver, _) = lights.free();
    assert_eq!(
        driver.free().writes,
        vec![(ADDRESS, vec![0x00, 0x01]), (ADDRESS, vec![0x00, 0x00])]
    );
}

#[test]
fn a_light_is_written_as_one_frame() {
    let (mut lights, _) = lights();

    lights.first(Color::RED).unwrap();

    let driver = lights.driver();
    assert_eq!(driver.pwm(0), Some(255));
    assert_eq!(driver.pwm(1), Some(0));
    assert_eq!(driver.pwm(17), Some(0));
    assert!(driver.is_channel_enabled(0));
    assert!(!driver.is_channel_enabled(17));

    let (driver, _) = lights.free();
    let writes = driver.free().writes;
    assert_eq!(writes.len(), 1);
    let (address, frame) = &writes[0];
    assert_eq!(*address, ADDRESS);
    // Start register, 18 PWM registers, 3 control registers and the update register.
    assert_eq!(frame.len(), 1 + 18 + 3 + 1);
    assert_eq!(frame[0], 0x01);
    assert_eq!(frame[1], 255);
    assert_eq!(frame[0x13], 0b0000_0001);
}

#[test]
fn turning_a_channel_off_clears_its_enable_bit() {
    let mut driver = Is31fl3218::new(MockedI2c::default());

    driver.set_channel_pwm(7, 40).unwrap();
    driver.set_channel_pwm(8, 40).unwrap();
    assert!(driver.is_channel_enabled(7));

    driver.set_channel_pwm(7, 0).unwrap();
    assert!(!driver.is_channel_enabled(7));
    assert!(driver.is_channel_enabled(8));
}

#[test]
fn out_of_range_channels_are_refused() {
    let mut driver = Is31fl3218::new(MockedI2c::default());

    assert_eq!(
        driver.set_channel_pwm(18, 1),
        Err(IndicatorError::InvalidChannel(18))
    );
    assert_eq!(driver.pwm(18), None);
}

#[test]
fn all_off_resets_chip_and_buffer() {
    let (mut lights, _) = lights();

    lights.third((10, 20, 30)).unwrap();
    lights.all_off().unwrap();

    assert_eq!(lights.driver().pwm(16), Some(0));
    assert!(!lights.driver().is_channel_enabled(16));

    let (driver, _) = lights.free();
    assert_eq!(driver.free().writes.last(), Some(&(ADDRESS, vec![0x17, 0x00])));
}

#[test]
fn bus_errors_are_returned() {
    let mut bus = MockedI2c::default();
    bus.nack = true;
    let mut lights = IndicatorLights::new(Is31fl3218::new(bus), Sdb::default(), BOARD_CHANNELS);

    assert_eq!(lights.second(Color::BLUE), Err(IndicatorError::I2c(Nack)));
    assert_eq!(lights.enable(&mut CountingDelay::default()), Err(Nack));
}
