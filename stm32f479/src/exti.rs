//! Arms the interrupt lines of the two Ethernet controllers.

use cortex_m::peripheral::NVIC;
use hal::{
    gpio::{Edge, ExtiPin, Pin},
    pac::{self, Interrupt, EXTI},
    syscfg::SysCfg,
};
use link_board::{
    exti::{ExtiIrq, InterruptSource, EXTETH_INT, SYSETH_INT},
    BoardError,
};
use log::debug;

use crate::pins::{ExtethIntPin, SysethIntPin};

pub const fn interrupt(irq: ExtiIrq) -> Interrupt {
    match irq {
        ExtiIrq::Exti0 => Interrupt::EXTI0,
        ExtiIrq::Exti1 => Interrupt::EXTI1,
        ExtiIrq::Exti2 => Interrupt::EXTI2,
        ExtiIrq::Exti3 => Interrupt::EXTI3,
        ExtiIrq::Exti4 => Interrupt::EXTI4,
        ExtiIrq::Exti9To5 => Interrupt::EXTI9_5,
        ExtiIrq::Exti15To10 => Interrupt::EXTI15_10,
    }
}

pub fn irq_of(interrupt: Interrupt) -> Option<ExtiIrq> {
    match interrupt {
        Interrupt::EXTI0 => Some(ExtiIrq::Exti0),
        Interrupt::EXTI1 => Some(ExtiIrq::Exti1),
        Interrupt::EXTI2 => Some(ExtiIrq::Exti2),
        Interrupt::EXTI3 => Some(ExtiIrq::Exti3),
        Interrupt::EXTI4 => Some(ExtiIrq::Exti4),
        Interrupt::EXTI9_5 => Some(ExtiIrq::Exti9To5),
        Interrupt::EXTI15_10 => Some(ExtiIrq::Exti15To10),
        _ => None,
    }
}

/// Routes both INT nets to their EXTI lines, triggers on the falling edge (the controllers
/// pull INT low) and unmasks the vectors in the NVIC.
///
/// Nothing is touched if a pin is not on the vector the board tables say it is. The handlers
/// can run as soon as this returns and acknowledge through [`clear_pending`], which needs no
/// pin.
pub fn enable_ethernet_interrupts(
    syseth_int: &mut SysethIntPin,
    exteth_int: &mut ExtethIntPin,
    syscfg: &mut SysCfg,
    exti: &mut EXTI,
) -> Result<(), BoardError> {
    verify(syseth_int, &SYSETH_INT)?;
    verify(exteth_int, &EXTETH_INT)?;

    arm(syseth_int, &SYSETH_INT, syscfg, exti);
    arm(exteth_int, &EXTETH_INT, syscfg, exti);

    Ok(())
}

fn verify<const P: char, const N: u8, MODE>(
    pin: &Pin<P, N, MODE>,
    source: &InterruptSource,
) -> Result<(), BoardError> {
    match irq_of(pin.interrupt()) {
        Some(found) if found == source.irq => Ok(()),
        found => Err(BoardError::IrqMismatch {
            signal: source.signal,
            expected: source.irq,
            found: found.unwrap_or(source.wired_irq()),
        }),
    }
}

fn arm<P: ExtiPin>(pin: &mut P, source: &InterruptSource, syscfg: &mut SysCfg, exti: &mut EXTI) {
    pin.make_interrupt_source(syscfg);
    pin.trigger_on_edge(exti, Edge::Falling);
    pin.clear_interrupt_pending_bit();
    pin.enable_interrupt(exti);

    // SAFETY: not called from inside a mask-based critical section.
    unsafe { NVIC::unmask(interrupt(source.irq)) };

    debug!(
        "{:?} on EXTI{} armed, vector {}",
        source.signal,
        source.line().get(),
        source.irq.irqn()
    );
}

/// Acknowledges `source` in the EXTI pending register. Safe to call from its handler before
/// the application has stored the pin anywhere.
pub fn clear_pending(source: &InterruptSource) {
    // SAFETY: PR is write-one-to-clear, other lines are left alone by the zero bits.
    unsafe {
        (*pac::EXTI::ptr())
            .pr
            .write(|w| w.bits(source.pending_mask()))
    };
}
