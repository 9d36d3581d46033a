//! Human-readable crash report for the export path.
//!
//! Written against `core::fmt::Write`, so the same renderer serves a
//! heapless buffer on the target, a `String` in host tools, and anything
//! else with a `Write` impl. Addresses are printed raw; pairing them with
//! source lines is the offline decoder's job.

use core::fmt::{self, Write};

use crate::record::{DumpRecord, FaultKind};

/// Capacity of the [`render`] buffer, sized for a full report under the
/// active feature set.
pub const REPORT_CAPACITY: usize = {
    let mut cap = 1024;
    #[cfg(feature = "hardware")]
    {
        cap += 512;
    }
    #[cfg(feature = "os")]
    {
        cap += 2048;
    }
    cap
};

/// Write the text report for `record` into `out`.
///
/// The caller is responsible for only passing a record that holds a
/// capture; rendering an invalid record produces well-formed nonsense.
pub fn write_report<W: Write>(record: &DumpRecord, out: &mut W) -> fmt::Result {
    writeln!(out, "=== blackbox crash report ===")?;
    let kind = FaultKind::from_raw(record.fault_kind);
    let kind_name = match kind {
        Some(FaultKind::HardwareException) => "Hardware Exception",
        Some(FaultKind::SoftwareAssertion) => "Software Assertion",
        None => "Unknown",
    };
    writeln!(out, "Fault kind       : {kind_name}")?;
    writeln!(out, "File             : {}", record.file_name_str())?;
    writeln!(out, "Line             : {}", record.line_number)?;
    writeln!(out, "Aux code         : {:#010x}", record.aux_code)?;
    writeln!(out, "Software version : {:#010x}", record.software_version)?;

    #[cfg(feature = "hardware")]
    if kind == Some(FaultKind::HardwareException) {
        let r = &record.cpu_registers;
        writeln!(out, "R0   : {:#010x}", r.r0)?;
        writeln!(out, "R1   : {:#010x}", r.r1)?;
        writeln!(out, "R2   : {:#010x}", r.r2)?;
        writeln!(out, "R3   : {:#010x}", r.r3)?;
        writeln!(out, "R12  : {:#010x}", r.r12)?;
        writeln!(out, "LR   : {:#010x}", r.lr)?;
        writeln!(out, "PC   : {:#010x}", r.pc)?;
        writeln!(out, "xPSR : {:#010x}", r.xpsr)?;
        let s = &record.fault_status;
        writeln!(out, "CFSR : {:#010x}", s.cfsr)?;
        writeln!(out, "HFSR : {:#010x}", s.hfsr)?;
        writeln!(out, "MMFAR: {:#010x}", s.mmfar)?;
        writeln!(out, "BFAR : {:#010x}", s.bfar)?;
        writeln!(out, "AFSR : {:#010x}", s.afsr)?;
    }

    for (i, addr) in record.backtrace().iter().enumerate() {
        writeln!(out, "Stack {i}: {addr:#010x}")?;
    }

    #[cfg(feature = "os")]
    for (t, row) in record.task_backtraces.iter().enumerate() {
        if row.iter().all(|&addr| addr == 0) {
            continue;
        }
        for (i, addr) in row.iter().take_while(|&&addr| addr != 0).enumerate() {
            writeln!(out, "Task {t} Stack {i}: {addr:#010x}")?;
        }
    }

    Ok(())
}

/// Render the report into a fixed-capacity string.
pub fn render(record: &DumpRecord) -> Result<heapless::String<REPORT_CAPACITY>, fmt::Error> {
    let mut out = heapless::String::new();
    write_report(record, &mut out)?;
    Ok(out)
}
