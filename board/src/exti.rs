//! External interrupt routing of the two Ethernet controllers.
//!
//! EXTI line `n` can be fed by pin `n` of exactly one bank at a time, and lines 5 to 9 and 10 to
//! 15 share a vector each. Both INT nets sit on lines with their own vector.

use crate::pins::{PinNumber, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtiLine(u8);

impl ExtiLine {
    pub const fn of_pin(number: PinNumber) -> Self {
        Self(number.get())
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// NVIC vectors the GPIO EXTI lines end up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtiIrq {
    Exti0,
    Exti1,
    Exti2,
    Exti3,
    Exti4,
    Exti9To5,
    Exti15To10,
}

impl ExtiIrq {
    pub const fn for_line(line: ExtiLine) -> Self {
        match line.0 {
            0 => ExtiIrq::Exti0,
            1 => ExtiIrq::Exti1,
            2 => ExtiIrq::Exti2,
            3 => ExtiIrq::Exti3,
            4 => ExtiIrq::Exti4,
            5..=9 => ExtiIrq::Exti9To5,
            _ => ExtiIrq::Exti15To10,
        }
    }

    /// Position in the STM32F4 vector table, `IRQn_Type` in CMSIS.
    pub const fn irqn(self) -> i16 {
        match self {
            ExtiIrq::Exti0 => 6,
            ExtiIrq::Exti1 => 7,
            ExtiIrq::Exti2 => 8,
            ExtiIrq::Exti3 => 9,
            ExtiIrq::Exti4 => 10,
            ExtiIrq::Exti9To5 => 23,
            ExtiIrq::Exti15To10 => 40,
        }
    }

    pub const fn is_shared(self) -> bool {
        matches!(self, ExtiIrq::Exti9To5 | ExtiIrq::Exti15To10)
    }
}

/// A net that raises an interrupt, together with the vector the firmware services it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptSource {
    pub signal: Signal,
    pub irq: ExtiIrq,
}

impl InterruptSource {
    pub const fn line(&self) -> ExtiLine {
        ExtiLine::of_pin(self.signal.pin().number)
    }

    /// The vector the line is hardwired to, which `irq` has to match.
    pub const fn wired_irq(&self) -> ExtiIrq {
        ExtiIrq::for_line(self.line())
    }

    /// Bit of the line in the EXTI pending register, which is cleared by writing it back.
    pub const fn pending_mask(&self) -> u32 {
        1 << self.line().get()
    }

    pub const fn is_consistent(&self) -> bool {
        self.irq as u8 == self.wired_irq() as u8
    }
}

pub const SYSETH_INT: InterruptSource = InterruptSource {
    signal: Signal::SysethInt,
    irq: ExtiIrq::Exti0,
};

pub const EXTETH_INT: InterruptSource = InterruptSource {
    signal: Signal::ExtethInt,
    irq: ExtiIrq::Exti1,
};

pub const INTERRUPT_SOURCES: [InterruptSource; 2] = [SYSETH_INT, EXTETH_INT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_map_onto_vectors() {
        let line = |n| ExtiLine::of_pin(PinNumber::new(n).unwrap());

        assert_eq!(ExtiIrq::for_line(line(0)), ExtiIrq::Exti0);
        assert_eq!(ExtiIrq::for_line(line(4)), ExtiIrq::Exti4);
        assert_eq!(ExtiIrq::for_line(line(5)), ExtiIrq::Exti9To5);
        assert_eq!(ExtiIrq::for_line(line(9)), ExtiIrq::Exti9To5);
        assert_eq!(ExtiIrq::for_line(line(10)), ExtiIrq::Exti15To10);
        assert_eq!(ExtiIrq::for_line(line(15)), ExtiIrq::Exti15To10);
    }

    #[test]
    fn ethernet_interrupts_are_wired_as_declared() {
        assert_eq!(SYSETH_INT.line().get(), 0);
        assert_eq!(EXTETH_INT.line().get(), 1);
        assert!(SYSETH_INT.is_consistent());
        assert!(EXTETH_INT.is_consistent());
        assert!(!SYSETH_INT.irq.is_shared());
    }

    #[test]
    fn pending_bits_follow_the_lines() {
        assert_eq!(SYSETH_INT.pending_mask(), 0b01);
        assert_eq!(EXTETH_INT.pending_mask(), 0b10);
        assert_eq!(SYSETH_INT.pending_mask() & EXTETH_INT.pending_mask(), 0);
    }

    #[test]
    fn a_mismatched_vector_is_detected() {
        let wrong = InterruptSource {
            signal: Signal::ExtethInt,
            irq: ExtiIrq::Exti0,
        };
        assert!(!wrong.is_consistent());
        assert_eq!(wrong.wired_irq(), ExtiIrq::Exti1);
    }
}
