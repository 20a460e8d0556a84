//! Clock plan of the board: a 26 MHz crystal on `CLOCK_IN` feeding the main PLL.

use fugit::HertzU32;

pub const HSE_FREQ: HertzU32 = HertzU32::MHz(26);

/// Main PLL factors as written to `RCC_PLLCFGR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllConfig {
    pub m: u8,
    pub n: u16,
    pub p: u8,
    pub q: u8,
}

/// 26 MHz / 22 * 285 / 2 gives ~168.41 MHz SYSCLK and /7 gives the ~48.12 MHz USB clock.
pub const BOARD_PLL: PllConfig = PllConfig {
    m: 22,
    n: 285,
    p: 2,
    q: 7,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusPrescalers {
    pub ahb: u16,
    pub apb1: u8,
    pub apb2: u8,
}

pub const BOARD_PRESCALERS: BusPrescalers = BusPrescalers {
    ahb: 1,
    apb1: 4,
    apb2: 2,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PllConfigError {
    MOutOfRange(u8),
    NOutOfRange(u16),
    InvalidP(u8),
    QOutOfRange(u8),
    VcoInputOutOfRange(HertzU32),
    VcoOutputOutOfRange(HertzU32),
    SysclkTooHigh(HertzU32),
    Pclk1TooHigh(HertzU32),
    Pclk2TooHigh(HertzU32),
    InvalidPrescaler,
}

const VCO_INPUT_MIN: u32 = 1_000_000;
const VCO_INPUT_MAX: u32 = 2_000_000;
const VCO_OUTPUT_MIN: u32 = 100_000_000;
const VCO_OUTPUT_MAX: u32 = 432_000_000;
const SYSCLK_MAX: u32 = 180_000_000;
const PCLK1_MAX: u32 = 45_000_000;
const PCLK2_MAX: u32 = 90_000_000;

/// Divides `hse * n` by `divisor` in 64 bit so the /22 does not throw away precision first.
const fn scaled(hse: HertzU32, n: u16, divisor: u32) -> HertzU32 {
    HertzU32::from_raw((hse.raw() as u64 * n as u64 / divisor as u64) as u32)
}

impl PllConfig {
    pub const fn vco_input(&self, hse: HertzU32) -> HertzU32 {
        HertzU32::from_raw(hse.raw() / self.m as u32)
    }

    pub const fn vco_output(&self, hse: HertzU32) -> HertzU32 {
        scaled(hse, self.n, self.m as u32)
    }

    pub const fn sysclk(&self, hse: HertzU32) -> HertzU32 {
        scaled(hse, self.n, self.m as u32 * self.p as u32)
    }

    /// The 48 MHz domain clock used by USB FS.
    pub const fn pll48clk(&self, hse: HertzU32) -> HertzU32 {
        scaled(hse, self.n, self.m as u32 * self.q as u32)
    }

    /// Checks the factors and resulting frequencies against the limits in the STM32F479
    /// reference manual.
    pub fn validate(&self, hse: HertzU32) -> Result<(), PllConfigError> {
        if !(2..=63).contains(&self.m) {
            return Err(PllConfigError::MOutOfRange(self.m));
        }
        if !(50..=432).contains(&self.n) {
            return Err(PllConfigError::NOutOfRange(self.n));
        }
        if !matches!(self.p, 2 | 4 | 6 | 8) {
            return Err(PllConfigError::InvalidP(self.p));
        }
        if !(2..=15).contains(&self.q) {
            return Err(PllConfigError::QOutOfRange(self.q));
        }

        let vco_in = self.vco_input(hse);
        if !(VCO_INPUT_MIN..=VCO_INPUT_MAX).contains(&vco_in.raw()) {
            return Err(PllConfigError::VcoInputOutOfRange(vco_in));
        }

        let vco_out = self.vco_output(hse);
        if !(VCO_OUTPUT_MIN..=VCO_OUTPUT_MAX).contains(&vco_out.raw()) {
            return Err(PllConfigError::VcoOutputOutOfRange(vco_out));
        }

        let sysclk = self.sysclk(hse);
        if sysclk.raw() > SYSCLK_MAX {
            return Err(PllConfigError::SysclkTooHigh(sysclk));
        }

        Ok(())
    }
}

/// Everything needed to reproduce the board's clock tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockPlan {
    pub hse: HertzU32,
    pub pll: PllConfig,
    pub prescalers: BusPrescalers,
}

pub const BOARD_CLOCKS: ClockPlan = ClockPlan {
    hse: HSE_FREQ,
    pll: BOARD_PLL,
    prescalers: BOARD_PRESCALERS,
};

impl ClockPlan {
    pub const fn sysclk(&self) -> HertzU32 {
        self.pll.sysclk(self.hse)
    }

    pub const fn hclk(&self) -> HertzU32 {
        HertzU32::from_raw(self.sysclk().raw() / self.prescalers.ahb as u32)
    }

    pub const fn pclk1(&self) -> HertzU32 {
        HertzU32::from_raw(self.hclk().raw() / self.prescalers.apb1 as u32)
    }

    pub const fn pclk2(&self) -> HertzU32 {
        HertzU32::from_raw(self.hclk().raw() / self.prescalers.apb2 as u32)
    }

    pub const fn pll48clk(&self) -> HertzU32 {
        self.pll.pll48clk(self.hse)
    }

    /// The frequency getters divide by the factors, so an untrusted plan has to pass this
    /// first. Every factor is range checked before anything is derived from it.
    pub fn validate(&self) -> Result<(), PllConfigError> {
        self.pll.validate(self.hse)?;

        let BusPrescalers { ahb, apb1, apb2 } = self.prescalers;
        if !matches!(ahb, 1 | 2 | 4 | 8 | 16 | 64 | 128 | 256 | 512)
            || !matches!(apb1, 1 | 2 | 4 | 8 | 16)
            || !matches!(apb2, 1 | 2 | 4 | 8 | 16)
        {
            return Err(PllConfigError::InvalidPrescaler);
        }

        if self.pclk1().raw() > PCLK1_MAX {
            return Err(PllConfigError::Pclk1TooHigh(self.pclk1()));
        }
        if self.pclk2().raw() > PCLK2_MAX {
            return Err(PllConfigError::Pclk2TooHigh(self.pclk2()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_plan_frequencies() {
        assert_eq!(BOARD_CLOCKS.sysclk().raw(), 168_409_090);
        assert_eq!(BOARD_CLOCKS.pll48clk().raw(), 48_116_883);
        assert_eq!(BOARD_CLOCKS.pclk1().raw(), 42_102_272);
        assert_eq!(BOARD_CLOCKS.pclk2().raw(), 84_204_545);
        assert_eq!(BOARD_PLL.vco_output(HSE_FREQ).raw(), 336_818_181);
        assert_eq!(BOARD_CLOCKS.validate(), Ok(()));
    }

    #[test]
    fn usb_clock_is_within_tolerance() {
        // USB FS allows +-0.25% on the 48 MHz clock.
        let deviation = BOARD_CLOCKS.pll48clk().raw().abs_diff(48_000_000);
        assert!(deviation <= 48_000_000 / 400, "deviation {deviation} Hz");
    }

    #[test]
    fn rejects_out_of_range_factors() {
        let bad_p = PllConfig { p: 3, ..BOARD_PLL };
        assert_eq!(bad_p.validate(HSE_FREQ), Err(PllConfigError::InvalidP(3)));

        let vco_in_too_high = PllConfig { m: 2, ..BOARD_PLL };
        assert!(matches!(
            vco_in_too_high.validate(HSE_FREQ),
            Err(PllConfigError::VcoInputOutOfRange(_))
        ));

        let overclocked = PllConfig { n: 330, ..BOARD_PLL };
        assert!(matches!(
            overclocked.validate(HSE_FREQ),
            Err(PllConfigError::SysclkTooHigh(_))
        ));
    }

    #[test]
    fn zero_factors_are_rejected_before_dividing() {
        let no_m = ClockPlan {
            pll: PllConfig { m: 0, ..BOARD_PLL },
            ..BOARD_CLOCKS
        };
        assert_eq!(no_m.validate(), Err(PllConfigError::MOutOfRange(0)));

        let no_p = ClockPlan {
            pll: PllConfig { p: 0, ..BOARD_PLL },
            ..BOARD_CLOCKS
        };
        assert_eq!(no_p.validate(), Err(PllConfigError::InvalidP(0)));

        let no_ahb = ClockPlan {
            prescalers: BusPrescalers {
                ahb: 0,
                ..BOARD_PRESCALERS
            },
            ..BOARD_CLOCKS
        };
        assert_eq!(no_ahb.validate(), Err(PllConfigError::InvalidPrescaler));
    }

    #[test]
    fn rejects_fast_apb1() {
        let plan = ClockPlan {
            prescalers: BusPrescalers {
                apb1: 2,
                ..BOARD_PRESCALERS
            },
            ..BOARD_CLOCKS
        };
        assert!(matches!(
            plan.validate(),
            Err(PllConfigError::Pclk1TooHigh(_))
        ));
    }
}
