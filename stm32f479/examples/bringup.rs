//! First power-on of a fresh board: checks the wiring tables, brings up the clocks and the debug
//! console, arms the Ethernet interrupts, walks the system under test to On and back to Standby,
//! then blinks the debug LED and rotates colours through the indicator lights forever.
#![no_std]
#![no_main]

use core::sync::atomic::{AtomicU32, Ordering};

use defmt_rtt as _;
use panic_probe as _;

use link_control::{
    debug_led::Heartbeat,
    indicator_lights::Color,
    power::{PowerState, SequencerConfig},
};
use link_stm32f479::{
    board::{
        self,
        exti::{EXTETH_INT, SYSETH_INT},
    },
    clocks,
    dbg::{self, DebugSerialConfig},
    entry,
    error::OrHalt,
    exti,
    hal::{pac, pac::interrupt, prelude::*},
    system, Pins,
};
use log::{info, warn};

const COLORS: [Color; 6] = [
    Color::RED,
    Color::YELLOW,
    Color::GREEN,
    Color::CYAN,
    Color::BLUE,
    Color::MAGENTA,
];

static SYSETH_EVENTS: AtomicU32 = AtomicU32::new(0);
static EXTETH_EVENTS: AtomicU32 = AtomicU32::new(0);

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().or_halt();
    let cp = pac::CorePeripherals::take().or_halt();

    let clocks = clocks::setup(dp.RCC).or_halt();
    let pins = Pins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE, dp.GPIOH);

    let console = DebugSerialConfig::default();
    let tx = dbg::serial(dp.UART7, pins.uart, &console, &clocks).or_halt();
    dbg::init(tx, console.level).or_halt();

    info!("Hello from the link board!");
    board::check_all().or_halt();

    let mut syscfg = dp.SYSCFG.constrain();
    let mut exti_regs = dp.EXTI;
    let mut syseth_int = pins.syseth.int.into_pull_up_input();
    let mut exteth_int = pins.exteth.int.into_pull_up_input();
    exti::enable_ethernet_interrupts(&mut syseth_int, &mut exteth_int, &mut syscfg, &mut exti_regs)
        .or_halt();

    let mut delay = cp.SYST.delay(&clocks);
    let mut led = system::debug_led(pins.dbgled);
    let mut lights = pins.indlights.into_indicator_lights(dp.I2C1, &clocks);
    if let Err(err) = lights.enable(&mut delay) {
        warn!("indicator lights did not answer: {:?}", err);
    }
    let mut sut = pins
        .power
        .into_system_under_test(SequencerConfig::default());

    match sut.set_power_state(PowerState::On, &mut delay) {
        Ok(()) => info!("system under test is up"),
        Err(err) => warn!("could not power up the system under test: {:?}", err),
    }
    sut.set_power_state(PowerState::Standby, &mut delay)
        .or_halt();

    info!(
        "interrupts seen: syseth {}, exteth {}",
        SYSETH_EVENTS.load(Ordering::Relaxed),
        EXTETH_EVENTS.load(Ordering::Relaxed)
    );

    let mut heartbeat = Heartbeat::default();
    let mut color_idx = 0;
    loop {
        let shown = lights
            .first(COLORS[color_idx % COLORS.len()])
            .and_then(|()| lights.second(COLORS[(color_idx + 1) % COLORS.len()]))
            .and_then(|()| lights.third(COLORS[(color_idx + 2) % COLORS.len()]));
        if let Err(err) = shown {
            warn!("indicator lights: {:?}", err);
        }
        color_idx = color_idx.wrapping_add(1);

        heartbeat.run_once(&mut led, &mut delay);
    }
}

#[interrupt]
fn EXTI0() {
    exti::clear_pending(&SYSETH_INT);
    SYSETH_EVENTS.fetch_add(1, Ordering::Relaxed);
}

#[interrupt]
fn EXTI1() {
    exti::clear_pending(&EXTETH_INT);
    EXTETH_EVENTS.fetch_add(1, Ordering::Relaxed);
}
