use link_board::{
    check::{check_cube_names, check_interrupts, check_unique_pins},
    check_all,
    exti::{INTERRUPT_SOURCES, SYSETH_INT},
    BoardError, ExtiIrq, InterruptSource, PinId, Port, Signal, SignalInfo, SIGNALS,
};

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let log_level =
        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("error,link_board=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .without_time()
        .try_init();
}

#[test]
fn shipped_tables_pass_every_check() {
    init_logging();

    assert_eq!(check_all(), Ok(()));
}

#[test]
fn every_net_has_its_own_pin() {
    let mut pins: Vec<PinId> = SIGNALS.iter().map(|info| info.pin).collect();
    pins.sort();
    pins.dedup();
    assert_eq!(pins.len(), SIGNALS.len());
}

#[test]
fn rewiring_onto_a_used_pin_is_reported() {
    let mut table: Vec<SignalInfo> = SIGNALS.to_vec();
    // Move the OLED reset onto the OLED D/C pin.
    table[Signal::OledRst as usize].pin = Signal::OledDc.pin();

    assert_eq!(
        check_unique_pins(&table),
        Err(BoardError::DuplicatePin {
            first: Signal::OledRst,
            second: Signal::OledDc,
            pin: PinId::new(Port::C, 14).unwrap(),
        })
    );
}

#[test]
fn reused_header_names_are_reported() {
    let mut table: Vec<SignalInfo> = SIGNALS.to_vec();
    table[Signal::PsuStandby as usize].cube_name = Some("PSU_ON");

    assert_eq!(
        check_cube_names(&table),
        Err(BoardError::DuplicateCubeName {
            first: Signal::PsuOn,
            second: Signal::PsuStandby,
        })
    );
}

#[test]
fn interrupt_on_wrong_vector_is_reported() {
    let sources = [
        SYSETH_INT,
        InterruptSource {
            signal: Signal::ExtethInt,
            irq: ExtiIrq::Exti9To5,
        },
    ];

    assert_eq!(
        check_interrupts(&sources),
        Err(BoardError::IrqMismatch {
            signal: Signal::ExtethInt,
            expected: ExtiIrq::Exti1,
            found: ExtiIrq::Exti9To5,
        })
    );
}

#[test]
fn interrupts_sharing_a_line_are_reported() {
    // CLOCK_IN on PH0 would need EXTI0, which SYSETH_INT on PB0 already uses.
    let sources = [
        SYSETH_INT,
        InterruptSource {
            signal: Signal::ClockIn,
            irq: ExtiIrq::Exti0,
        },
    ];

    assert_eq!(
        check_interrupts(&sources),
        Err(BoardError::SharedExtiLine {
            first: Signal::SysethInt,
            second: Signal::ClockIn,
        })
    );
    assert_eq!(check_interrupts(&INTERRUPT_SOURCES), Ok(()));
}
