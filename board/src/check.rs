//! Structural checks over the board tables.
//!
//! The const finders run at compile time against the tables this crate ships, so a wiring typo
//! fails the build. The `check_*` wrappers report the same problems as errors, which is what
//! bring-up code and the tests use for tables assembled at runtime.

use crate::{
    exti::{ExtiIrq, InterruptSource, INTERRUPT_SOURCES},
    pins::{PinId, Signal, SignalInfo, SIGNALS},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// Two nets are bound to the same physical pin.
    DuplicatePin {
        first: Signal,
        second: Signal,
        pin: PinId,
    },
    /// Two nets claim the same generated-header name.
    DuplicateCubeName { first: Signal, second: Signal },
    /// The declared vector is not the one the pin's EXTI line is hardwired to.
    IrqMismatch {
        signal: Signal,
        expected: ExtiIrq,
        found: ExtiIrq,
    },
    /// Two interrupt sources need the same EXTI line, the SYSCFG mux can only route one bank.
    SharedExtiLine { first: Signal, second: Signal },
}

pub const fn find_duplicate_pin(table: &[SignalInfo]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < table.len() {
        let mut j = i + 1;
        while j < table.len() {
            if table[i].pin.same_as(table[j].pin) {
                return Some((i, j));
            }
            j += 1;
        }
        i += 1;
    }
    None
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

pub const fn find_duplicate_cube_name(table: &[SignalInfo]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < table.len() {
        if let Some(first) = table[i].cube_name {
            let mut j = i + 1;
            while j < table.len() {
                if let Some(second) = table[j].cube_name {
                    if str_eq(first, second) {
                        return Some((i, j));
                    }
                }
                j += 1;
            }
        }
        i += 1;
    }
    None
}

pub const fn find_inconsistent_irq(sources: &[InterruptSource]) -> Option<usize> {
    let mut i = 0;
    while i < sources.len() {
        if !sources[i].is_consistent() {
            return Some(i);
        }
        i += 1;
    }
    None
}

pub const fn find_shared_line(sources: &[InterruptSource]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < sources.len() {
        let mut j = i + 1;
        while j < sources.len() {
            if sources[i].line().get() == sources[j].line().get() {
                return Some((i, j));
            }
            j += 1;
        }
        i += 1;
    }
    None
}

const _: () = assert!(find_duplicate_pin(&SIGNALS).is_none(), "two nets share a pin");
const _: () = assert!(
    find_duplicate_cube_name(&SIGNALS).is_none(),
    "two nets share a header name"
);
const _: () = assert!(
    find_inconsistent_irq(&INTERRUPT_SOURCES).is_none(),
    "interrupt source on the wrong vector"
);
const _: () = assert!(
    find_shared_line(&INTERRUPT_SOURCES).is_none(),
    "interrupt sources share an EXTI line"
);

pub fn check_unique_pins(table: &[SignalInfo]) -> Result<(), BoardError> {
    match find_duplicate_pin(table) {
        Some((i, j)) => Err(BoardError::DuplicatePin {
            first: table[i].signal,
            second: table[j].signal,
            pin: table[i].pin,
        }),
        None => Ok(()),
    }
}

pub fn check_cube_names(table: &[SignalInfo]) -> Result<(), BoardError> {
    match find_duplicate_cube_name(table) {
        Some((i, j)) => Err(BoardError::DuplicateCubeName {
            first: table[i].signal,
            second: table[j].signal,
        }),
        None => Ok(()),
    }
}

pub fn check_interrupts(sources: &[InterruptSource]) -> Result<(), BoardError> {
    if let Some(i) = find_inconsistent_irq(sources) {
        let source = &sources[i];
        return Err(BoardError::IrqMismatch {
            signal: source.signal,
            expected: source.wired_irq(),
            found: source.irq,
        });
    }

    if let Some((i, j)) = find_shared_line(sources) {
        return Err(BoardError::SharedExtiLine {
            first: sources[i].signal,
            second: sources[j].signal,
        });
    }

    Ok(())
}

/// Runs every check over the tables of this board.
pub fn check_all() -> Result<(), BoardError> {
    check_unique_pins(&SIGNALS)?;
    check_cube_names(&SIGNALS)?;
    check_interrupts(&INTERRUPT_SOURCES)?;

    log::debug!(
        "board tables ok: {} nets, {} interrupt sources",
        SIGNALS.len(),
        INTERRUPT_SOURCES.len()
    );

    Ok(())
}
