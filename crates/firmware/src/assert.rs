//! Software-assertion entry: capture a snapshot, then go down for the warm
//! reset.
//!
//! Use [`fatal_assert!`](crate::fatal_assert) for conditions the firmware
//! cannot continue past:
//!
//! ```ignore
//! fatal_assert!(dma_buffer.len() >= frame_len);
//! fatal_assert!(sample_rate != 0, ERR_BAD_CLOCK_CONFIG);
//! ```
//!
//! Unlike `assert!`, a failed `fatal_assert!` does not unwind or print: it
//! records file, line and an optional auxiliary code into the survivable
//! record and resets the CPU. The report surfaces at the next boot.

use blackbox::capture;

/// Record a software-assertion capture for `file`/`line` and reset.
///
/// The capture carries no stack-pointer argument, which is exactly what
/// classifies it as a software assertion rather than a hardware exception.
pub fn software_fault(file: &str, line: u32, aux_code: u32) -> ! {
    capture(None, Some(file), line, aux_code);
    warm_reset()
}

/// Force a warm reset (RAM contents retained).
///
/// On the hardware target this requests a system reset through the SCB. On
/// host builds, where there is nothing to reset, it parks the thread — the
/// assertion paths that reach this are never exercised by host tests.
pub fn warm_reset() -> ! {
    #[cfg(all(feature = "hardware", target_arch = "arm"))]
    {
        cortex_m::peripheral::SCB::sys_reset();
    }
    #[cfg(not(all(feature = "hardware", target_arch = "arm")))]
    loop {
        core::hint::spin_loop();
    }
}

/// Capture-and-reset assertion for unrecoverable conditions.
///
/// `fatal_assert!(cond)` records aux code 0; `fatal_assert!(cond, aux)`
/// records the given auxiliary code.
#[macro_export]
macro_rules! fatal_assert {
    ($cond:expr $(,)?) => {
        if !$cond {
            $crate::assert::software_fault(::core::file!(), ::core::line!(), 0);
        }
    };
    ($cond:expr, $aux:expr $(,)?) => {
        if !$cond {
            $crate::assert::software_fault(::core::file!(), ::core::line!(), $aux);
        }
    };
}
