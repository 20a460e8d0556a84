//! What the firmware does when it cannot go on.

use core::fmt::Debug;

use log::error;

/// Logs, masks all interrupts and parks the core. The debugger can still attach.
pub fn error_handler() -> ! {
    error!("unrecoverable error, halting");
    cortex_m::interrupt::disable();
    loop {
        cortex_m::asm::nop();
    }
}

/// Entry point under the name the CubeMX generated C code calls.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn Error_Handler() -> ! {
    error_handler()
}

/// Bring-up shorthand: unwrap or go to [`error_handler`].
pub trait OrHalt<T> {
    fn or_halt(self) -> T;
}

impl<T, E: Debug> OrHalt<T> for Result<T, E> {
    fn or_halt(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                error!("{:?}", err);
                error_handler()
            }
        }
    }
}

impl<T> OrHalt<T> for Option<T> {
    fn or_halt(self) -> T {
        match self {
            Some(value) => value,
            None => error_handler(),
        }
    }
}
