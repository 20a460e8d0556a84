//! Clock tree of the board: 26 MHz HSE into the main PLL, USB/SDIO clock kept at 48 MHz.

use hal::{
    pac::RCC,
    rcc::{Clocks, RccExt},
};
use link_board::clock::{ClockPlan, PllConfigError, BOARD_CLOCKS};
use log::{info, warn};

/// Largest relative deviation from the board clock plan, in parts per thousand, that is still
/// accepted without a warning.
const TOLERANCE_PERMILLE: u32 = 10;

/// Starts the crystal and the PLL and switches SYSCLK over, aiming for [`BOARD_CLOCKS`].
pub fn setup(rcc: RCC) -> Result<Clocks, PllConfigError> {
    setup_with(rcc, &BOARD_CLOCKS)
}

/// Refuses plans outside the chip limits before the RCC is touched.
pub fn setup_with(rcc: RCC, plan: &ClockPlan) -> Result<Clocks, PllConfigError> {
    plan.validate()?;

    let clocks = rcc
        .constrain()
        .cfgr
        .use_hse(plan.hse)
        .sysclk(plan.sysclk())
        .hclk(plan.hclk())
        .pclk1(plan.pclk1())
        .pclk2(plan.pclk2())
        .require_pll48clk()
        .freeze();

    info!(
        "sysclk {} Hz, hclk {} Hz, pclk1 {} Hz, pclk2 {} Hz",
        clocks.sysclk().raw(),
        clocks.hclk().raw(),
        clocks.pclk1().raw(),
        clocks.pclk2().raw()
    );

    if !close_to(clocks.sysclk().raw(), plan.sysclk().raw()) {
        warn!(
            "sysclk is {} Hz instead of the planned {} Hz",
            clocks.sysclk().raw(),
            plan.sysclk().raw()
        );
    }

    match clocks.pll48clk() {
        Some(pll48) => info!("pll48clk {} Hz", pll48.raw()),
        None => warn!("no 48 MHz clock, USB will not enumerate"),
    }

    Ok(clocks)
}

fn close_to(actual: u32, planned: u32) -> bool {
    let diff = actual.abs_diff(planned) as u64;
    diff * 1000 <= planned as u64 * TOLERANCE_PERMILLE as u64
}
