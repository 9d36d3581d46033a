//! Capture orchestration and the process-wide record.
//!
//! There is exactly one [`DumpRecord`] per device and it lives here, in a
//! region the startup runtime must not touch. [`capture`] is the single
//! entry the fault-dispatch glue calls; [`is_saved`], [`get`] and [`reset`]
//! are the post-reboot consumer surface.
//!
//! # Record placement
//!
//! On hardware builds the backing region carries
//! `#[link_section = ".uninit.BLACKBOX_RECORD"]`. cortex-m-rt collects
//! `.uninit.*` input sections into the NOLOAD `.uninit` output section,
//! which its startup code neither zeroes nor copies — exactly the
//! warm-reset survivability the record needs. When a bootloader is present
//! it must agree on the same region and equally leave it alone. The region
//! is [`RECORD_REGION_BYTES`] even though the record is smaller, so the
//! record can grow in application updates without moving anything the
//! bootloader knows about.
//!
//! # Write discipline
//!
//! The record has one writer at a time, separated by resets: the faulting
//! context writes it, the next boot reads and clears it. `capture` bails
//! out when a capture is already stored (first writer wins), so a cascade
//! of secondary faults cannot shred the snapshot of the original one.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

use crate::profile::{MemoryLayout, Word, CALL_STACK_SIZE, FILE_NAME_LEN, SOFTWARE_VERSION};
use crate::record::{DumpRecord, FaultKind};
use crate::walker::{self, RamAccess, WalkStrategy};

#[cfg(feature = "hardware")]
use crate::profile::WORD_BYTES;

/// Bytes reserved for the record region, with headroom over the current
/// record size (see the module docs).
pub const RECORD_REGION_BYTES: usize = 1024;

const _: () = assert!(core::mem::size_of::<DumpRecord>() <= RECORD_REGION_BYTES);

#[repr(C, align(8))]
struct RecordRegion {
    bytes: MaybeUninit<[u8; RECORD_REGION_BYTES]>,
}

struct RecordCell(UnsafeCell<RecordRegion>);

// SAFETY: access is single-threaded by construction — the fault path writes
// with scheduling suspended, the post-reboot path reads before any fault can
// occur, and a CPU reset separates the two (see the module docs).
unsafe impl Sync for RecordCell {}

#[cfg_attr(
    all(feature = "hardware", target_os = "none"),
    link_section = ".uninit.BLACKBOX_RECORD"
)]
static RECORD: RecordCell = RecordCell(UnsafeCell::new(RecordRegion {
    bytes: MaybeUninit::uninit(),
}));

fn record_ref() -> &'static DumpRecord {
    // SAFETY: every DumpRecord field is an integer or integer array, so any
    // bit pattern the region powers up with is a valid value; alignment is
    // guaranteed by RecordRegion. Aliasing is governed by the single-writer
    // discipline documented on RecordCell.
    unsafe { &*RECORD.0.get().cast::<DumpRecord>() }
}

pub(crate) fn with_record<T>(f: impl FnOnce(&mut DumpRecord) -> T) -> T {
    // SAFETY: as record_ref, and the mutable borrow is confined to `f`.
    f(unsafe { &mut *RECORD.0.get().cast::<DumpRecord>() })
}

/// Everything the orchestrator needs to know about the platform it runs on.
pub struct CaptureEnv<'a> {
    /// Address-space facts for the walker and register capture.
    pub layout: &'a MemoryLayout,
    /// Build-identity tag stored into the record.
    pub software_version: u32,
    /// Walk strategy for the backtraces.
    pub strategy: WalkStrategy,
}

#[cfg(all(feature = "hardware", target_os = "none"))]
fn active_layout() -> &'static MemoryLayout {
    &crate::profile::STM32H743_LAYOUT
}

#[cfg(not(all(feature = "hardware", target_os = "none")))]
fn active_layout() -> &'static MemoryLayout {
    &crate::profile::HOST_FALLBACK_LAYOUT
}

pub(crate) fn default_env() -> CaptureEnv<'static> {
    CaptureEnv {
        layout: active_layout(),
        software_version: SOFTWARE_VERSION,
        strategy: WalkStrategy::DEFAULT,
    }
}

pub(crate) fn with_default_ram<T>(
    env: &CaptureEnv<'_>,
    f: impl FnOnce(&dyn RamAccess) -> T,
) -> T {
    #[cfg(all(feature = "hardware", target_os = "none"))]
    {
        // SAFETY: the target layout's RAM window is ordinary SRAM, readable
        // at every word-aligned address.
        let ram = unsafe { walker::DeviceRam::new(env.layout) };
        return f(&ram);
    }
    #[cfg(not(all(feature = "hardware", target_os = "none")))]
    {
        let _ = env;
        f(&walker::NoRam)
    }
}

/// Record a crash snapshot into `record`.
///
/// The record-parameterized core of [`capture`]; the global entry binds the
/// singleton and the build's platform defaults, tests bind
/// [`sim::SimRam`](crate::sim::SimRam) and synthetic layouts.
///
/// There is no error return. Every degraded input — already-captured
/// record, stack pointer outside RAM, missing file name — produces a
/// still-readable record with the affected substructure zero-filled or
/// untouched; the record's validity alone announces "a fault occurred".
pub fn capture_into<R: RamAccess + ?Sized>(
    record: &mut DumpRecord,
    ram: &R,
    env: &CaptureEnv<'_>,
    stack_pointer: Option<Word>,
    file_name: Option<&str>,
    line_number: u32,
    aux_code: u32,
) {
    // First writer wins: cascading faults after the initial one routinely
    // corrupt the very context being captured, so the first snapshot is the
    // one worth keeping.
    if record.is_valid() {
        return;
    }
    record.mark_valid();

    record.software_version = env.software_version;
    record.aux_code = aux_code;

    // A caller-supplied stack pointer is the exception-frame address pushed
    // by the CPU on its way into an ISR; the assertion path has none.
    match stack_pointer {
        Some(frame) => {
            record.fault_kind = FaultKind::HardwareException.as_raw();
            #[cfg(feature = "hardware")]
            capture_exception_state(record, ram, frame);
            #[cfg(not(feature = "hardware"))]
            let _ = frame;
        }
        None => {
            record.fault_kind = FaultKind::SoftwareAssertion.as_raw();
            #[cfg(feature = "hardware")]
            {
                record.cpu_registers = Default::default();
                record.fault_status = Default::default();
            }
        }
    }

    match file_name {
        Some(name) => record.set_file_name(name),
        // Degraded input: the buffer is left alone apart from the tail NUL
        // the accessors rely on.
        None => record.file_name[FILE_NAME_LEN - 1] = 0,
    }
    record.line_number = line_number;

    record.active_backtrace = [0; CALL_STACK_SIZE];
    #[cfg(feature = "os")]
    {
        record.task_backtraces = [[0; CALL_STACK_SIZE]; crate::profile::OS_TASKCNT];
    }

    let walk_sp = stack_pointer.or_else(current_stack_pointer);
    match env.strategy {
        WalkStrategy::Scan => {
            if let Some(sp) = walk_sp {
                walker::scan_stack(ram, env.layout, sp, &mut record.active_backtrace);
            }
        }
        WalkStrategy::FrameChain => {
            if let Some(fp) = walk_sp {
                walker::walk_frame_chain(ram, env.layout, fp, &mut record.active_backtrace);
            }
        }
        #[cfg(feature = "std")]
        WalkStrategy::Host => {
            crate::host::host_backtrace(&mut record.active_backtrace);
        }
    }
}

/// Copy the register file the CPU stacked on exception entry, plus the
/// SCB's secondary fault-cause registers.
#[cfg(feature = "hardware")]
fn capture_exception_state<R: RamAccess + ?Sized>(record: &mut DumpRecord, ram: &R, frame: Word) {
    use crate::record::CpuRegisters;

    // Stacking order on exception entry: r0 r1 r2 r3 r12 lr pc xpsr, at
    // increasing addresses from the passed frame pointer. Unreadable slots
    // degrade to zero.
    let read = |slot: usize| {
        slot.checked_mul(WORD_BYTES)
            .and_then(|off| frame.checked_add(off))
            .and_then(|addr| ram.read_word(addr))
            .unwrap_or(0)
    };
    record.cpu_registers = CpuRegisters {
        r0: read(0),
        r1: read(1),
        r2: read(2),
        r3: read(3),
        r12: read(4),
        lr: read(5),
        pc: read(6),
        xpsr: read(7),
    };
    record.fault_status = read_fault_status();
}

#[cfg(all(feature = "hardware", target_arch = "arm"))]
fn read_fault_status() -> crate::record::FaultStatusRegisters {
    // SAFETY: reads of the SCB fault-status registers have no side effects.
    let scb = unsafe { &*cortex_m::peripheral::SCB::ptr() };
    crate::record::FaultStatusRegisters {
        cfsr: scb.cfsr.read(),
        hfsr: scb.hfsr.read(),
        mmfar: scb.mmfar.read(),
        bfar: scb.bfar.read(),
        afsr: scb.afsr.read(),
    }
}

#[cfg(all(feature = "hardware", not(target_arch = "arm")))]
fn read_fault_status() -> crate::record::FaultStatusRegisters {
    Default::default()
}

#[cfg(all(feature = "hardware", target_arch = "arm"))]
fn current_stack_pointer() -> Option<Word> {
    // The assertion path runs in thread mode on the main stack.
    Some(cortex_m::register::msp::read() as Word)
}

#[cfg(not(all(feature = "hardware", target_arch = "arm")))]
fn current_stack_pointer() -> Option<Word> {
    None
}

// ---------------------------------------------------------------------------
// Process-wide surface
// ---------------------------------------------------------------------------

/// Record a crash snapshot into the device's record.
///
/// `stack_pointer` is the exception-frame address when called from a fault
/// handler, `None` from an assertion path (the fault kind is classified
/// from exactly this). `file_name`/`line_number` locate the assertion or
/// handler; `aux_code` carries a caller-chosen tag such as the exception
/// vector number.
///
/// The expected continuation is a CPU reset performed by the caller; the
/// function itself returns nothing and never fails. If a capture is
/// already stored, the call changes nothing.
pub fn capture(
    stack_pointer: Option<Word>,
    file_name: Option<&str>,
    line_number: u32,
    aux_code: u32,
) {
    let env = default_env();
    with_record(|record| {
        #[cfg(feature = "os")]
        let fresh = !record.is_valid();

        with_default_ram(&env, |ram| {
            capture_into(
                record,
                ram,
                &env,
                stack_pointer,
                file_name,
                line_number,
                aux_code,
            );
        });

        #[cfg(feature = "os")]
        if fresh && record.is_valid() {
            crate::tasks::arm_task_walk();
        }
    });
}

/// `true` when the device's record holds a capture (the post-reboot "did
/// we crash?" question).
pub fn is_saved() -> bool {
    record_ref().is_valid()
}

/// Read-only handle to the stored capture, or `None` when there is none.
pub fn get() -> Option<&'static DumpRecord> {
    let record = record_ref();
    record.is_valid().then_some(record)
}

/// Clear the validity keys so the next boot sees "no capture". Call only
/// after the record's content has been durably exported; the payload
/// fields are not scrubbed.
pub fn reset() {
    with_record(DumpRecord::invalidate);
}
