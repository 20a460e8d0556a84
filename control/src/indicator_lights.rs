//! The three RGB indicator lights, driven by an IS31FL3218 18 channel LED driver on I2C.
//!
//! The chip's SDB input sits on INDLIGHTS_EN. PWM values and channel enables are buffered and
//! only reach the chip on [`Is31fl3218::present`].

use core::convert::Infallible;

use embedded_hal::{
    blocking::{delay::DelayMs, i2c},
    digital::v2::OutputPin,
};
use log::{debug, info};

/// 7 bit address with AD tied to GND.
pub const ADDRESS: u8 = 0x54;
pub const CHANNELS: u8 = 18;

const REG_SHUTDOWN: u8 = 0x00;
const REG_PWM: u8 = 0x01;
const REG_LED_CONTROL: u8 = 0x13;
const REG_UPDATE: u8 = 0x16;
const REG_RESET: u8 = 0x17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorError<E> {
    I2c(E),
    InvalidChannel(u8),
}

impl<E> From<E> for IndicatorError<E> {
    fn from(err: E) -> Self {
        IndicatorError::I2c(err)
    }
}

/// Channels are counted from 0, the datasheet's OUT1 is channel 0.
pub struct Is31fl3218<I2C> {
    i2c: I2C,
    /// Register image from `REG_PWM` up to and including `REG_UPDATE`, prefixed by the start
    /// register so it goes out as a single auto-incrementing write.
    frame: [u8; REG_UPDATE as usize + 1],
}

impl<I2C, E> Is31fl3218<I2C>
where
    I2C: i2c::Write<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            frame: blank_frame(),
        }
    }

    /// Leaves software shutdown. Does not touch SDB.
    pub fn enable(&mut self) -> Result<(), E> {
        self.i2c.write(ADDRESS, &[REG_SHUTDOWN, 0x01])
    }

    /// Enters software shutdown. Does not touch SDB.
    pub fn disable(&mut self) -> Result<(), E> {
        self.i2c.write(ADDRESS, &[REG_SHUTDOWN, 0x00])
    }

    /// Puts every register back to its power-on value and clears the buffer to match.
    pub fn reset(&mut self) -> Result<(), E> {
        self.i2c.write(ADDRESS, &[REG_RESET, 0x00])?;
        self.frame = blank_frame();
        Ok(())
    }

    /// Sends the buffered PWM values and channel enables and latches them.
    pub fn present(&mut self) -> Result<(), E> {
        self.i2c.write(ADDRESS, &self.frame)
    }

    /// Buffers a raw PWM duty for `channel`. A zero duty also clears the channel's enable bit.
    pub fn set_channel_pwm(&mut self, channel: u8, value: u8) -> Result<(), IndicatorError<E>> {
        if channel >= CHANNELS {
            return Err(IndicatorError::InvalidChannel(channel));
        }

        self.frame[(REG_PWM + channel) as usize] = value;

        let control = &mut self.frame[(REG_LED_CONTROL + channel / 6) as usize];
        let mask = 1 << (channel % 6);
        if value == 0 {
            *control &= !mask;
        } else {
            *control |= mask;
        }

        Ok(())
    }

    /// Like [`Self::set_channel_pwm`] with the datasheet's 64 step gamma curve applied.
    pub fn set_channel(&mut self, channel: u8, value: u8) -> Result<(), IndicatorError<E>> {
        self.set_channel_pwm(channel, gamma(value))
    }

    pub fn pwm(&self, channel: u8) -> Option<u8> {
        (channel < CHANNELS).then(|| self.frame[(REG_PWM + channel) as usize])
    }

    pub fn is_channel_enabled(&self, channel: u8) -> bool {
        channel < CHANNELS
            && self.frame[(REG_LED_CONTROL + channel / 6) as usize] & (1 << (channel % 6)) != 0
    }

    pub fn free(self) -> I2C {
        self.i2c
    }
}

const fn blank_frame() -> [u8; REG_UPDATE as usize + 1] {
    let mut frame = [0; REG_UPDATE as usize + 1];
    frame[0] = REG_PWM;
    frame
}

const GAMMA64: [u8; 64] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 29, 32, 35, 38, 41, 44, 47, 50,
    53, 57, 61, 65, 69, 73, 77, 81, 85, 89, 94, 99, 104, 109, 114, 119, 124, 129, 134, 140, 146,
    152, 158, 164, 170, 176, 182, 188, 195, 202, 209, 216, 223, 230, 237, 244, 251, 255,
];

pub const fn gamma(value: u8) -> u8 {
    if value == 0 {
        0
    } else {
        GAMMA64[value as usize >> 2]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgba(0x0000_00FF);
    pub const WHITE: Color = Color::from_rgba(0xFFFF_FFFF);
    pub const RED: Color = Color::from_rgba(0xFF00_00FF);
    pub const GREEN: Color = Color::from_rgba(0x00FF_00FF);
    pub const BLUE: Color = Color::from_rgba(0x0000_FFFF);
    pub const CYAN: Color = Color::from_rgba(0x00FF_FFFF);
    pub const MAGENTA: Color = Color::from_rgba(0xFF00_FFFF);
    pub const YELLOW: Color = Color::from_rgba(0xFFFF_00FF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `0xRRGGBBAA`
    pub const fn from_rgba(rgba: u32) -> Self {
        Self {
            r: (rgba >> 24) as u8,
            g: (rgba >> 16) as u8,
            b: (rgba >> 8) as u8,
            a: rgba as u8,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scales the components by alpha, exact at 0 and 255.
    pub const fn premultiplied(self) -> (u8, u8, u8) {
        const fn scale(c: u8, a: u8) -> u8 {
            ((c as u16 * a as u16 + 127) / 255) as u8
        }

        (
            scale(self.r, self.a),
            scale(self.g, self.a),
            scale(self.b, self.a),
        )
    }
}

impl From<u32> for Color {
    fn from(rgba: u32) -> Self {
        Color::from_rgba(rgba)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b, 0xFF)
    }
}

/// Driver channels of one RGB light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbChannels {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// How the three lights are routed to the driver outputs on this board.
pub const BOARD_CHANNELS: [RgbChannels; 3] = [
    RgbChannels { r: 0, g: 1, b: 17 },
    RgbChannels { r: 12, g: 13, b: 11 },
    RgbChannels { r: 16, g: 14, b: 15 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    First,
    Second,
    Third,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::First, Indicator::Second, Indicator::Third];
}

/// The lights as the board wires them: the driver plus its SDB line.
pub struct IndicatorLights<I2C, EN> {
    driver: Is31fl3218<I2C>,
    en: EN,
    channels: [RgbChannels; 3],
}

impl<I2C, EN, E> IndicatorLights<I2C, EN>
where
    I2C: i2c::Write<Error = E>,
    EN: OutputPin<Error = Infallible>,
{
    /// Holds the driver in hardware shutdown until [`Self::enable`].
    pub fn new(driver: Is31fl3218<I2C>, mut en: EN, channels: [RgbChannels; 3]) -> Self {
        let _ = en.set_low();
        Self {
            driver,
            en,
            channels,
        }
    }

    /// Releases SDB, gives the chip a millisecond to wake up and leaves software shutdown.
    pub fn enable<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), E> {
        let _ = self.en.set_high();
        delay.delay_ms(1);
        self.driver.enable()?;
        info!("indicator lights enabled");
        Ok(())
    }

    pub fn disable<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), E> {
        self.driver.disable()?;
        delay.delay_ms(1);
        let _ = self.en.set_low();
        info!("indicator lights disabled");
        Ok(())
    }

    pub fn set<C: Into<Color>>(
        &mut self,
        indicator: Indicator,
        color: C,
    ) -> Result<(), IndicatorError<E>> {
        let color = color.into();
        let (r, g, b) = color.premultiplied();
        let channels = self.channels[indicator as usize];

        self.driver.set_channel(channels.r, r)?;
        self.driver.set_channel(channels.g, g)?;
        self.driver.set_channel(channels.b, b)?;
        self.driver.present()?;

        debug!("{:?} light set to {:?}", indicator, color);
        Ok(())
    }

    pub fn first<C: Into<Color>>(&mut self, color: C) -> Result<(), IndicatorError<E>> {
        self.set(Indicator::First, color)
    }

    pub fn second<C: Into<Color>>(&mut self, color: C) -> Result<(), IndicatorError<E>> {
        self.set(Indicator::Second, color)
    }

    pub fn third<C: Into<Color>>(&mut self, color: C) -> Result<(), IndicatorError<E>> {
        self.set(Indicator::Third, color)
    }

    /// Switches every light off through a chip reset, the driver stays enabled.
    pub fn all_off(&mut self) -> Result<(), E> {
        self.driver.reset()
    }

    pub fn driver(&self) -> &Is31fl3218<I2C> {
        &self.driver
    }

    pub fn free(self) -> (Is31fl3218<I2C>, EN) {
        (self.driver, self.en)
    }
}
