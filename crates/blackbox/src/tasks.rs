//! Multi-task backtraces over an RTOS task table (`os` feature).
//!
//! The active stack is captured by [`crate::capture`]; this module adds one
//! walked row per live task, using the saved stack pointer each task parked
//! in its control block when it was scheduled out.
//!
//! Reading another task's stack is racy when that task could still run, and
//! most RTOSes leave the task table inconsistent inside an exception, so
//! the walk is *not* part of the fault-time capture. Call [`capture_tasks`]
//! from a software-assertion path, or from a recovery task, where the
//! scheduler state is quiescent. The results are best-effort by contract —
//! the same heuristic standard the single-stack walker already sets.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::capture::{self, CaptureEnv};
use crate::profile::{Word, CALL_STACK_SIZE, OS_TASKCNT};
use crate::record::DumpRecord;
use crate::walker::{self, RamAccess, WalkStrategy};

/// Read access to the OS task table, provided by the RTOS integration.
pub trait TaskTable {
    /// The stack pointer task slot `slot` saved when it was last scheduled
    /// out, or `None` when the slot holds no live task.
    fn saved_stack_pointer(&self, slot: usize) -> Option<Word>;
}

/// Walk every live task's stack into `record.task_backtraces`.
///
/// Zeroes the matrix, then visits slots `0..OS_TASKCNT` and packs one row
/// per live task in slot order. Inactive slots are skipped; a task whose
/// saved stack pointer is out of range simply leaves its row zeroed, like
/// any other degraded walk.
#[allow(clippy::indexing_slicing)] // row < OS_TASKCNT is checked before each store
pub fn capture_tasks_into<R: RamAccess + ?Sized, T: TaskTable + ?Sized>(
    record: &mut DumpRecord,
    ram: &R,
    env: &CaptureEnv<'_>,
    table: &T,
) {
    record.task_backtraces = [[0; CALL_STACK_SIZE]; OS_TASKCNT];
    let mut row = 0;
    for slot in 0..OS_TASKCNT {
        let Some(sp) = table.saved_stack_pointer(slot) else {
            continue;
        };
        let out = &mut record.task_backtraces[row];
        match env.strategy {
            WalkStrategy::FrameChain => {
                walker::walk_frame_chain(ram, env.layout, sp, out);
            }
            // The host unwinder cannot walk a foreign task's stack; the
            // address-range scan is the portable per-task walk.
            _ => {
                walker::scan_stack(ram, env.layout, sp, out);
            }
        }
        row += 1;
        if row == OS_TASKCNT {
            break;
        }
    }
}

// One-shot latch armed by the capture that stored the record. It keeps a
// later fault cascade (capture call that found the record already valid,
// followed by its own capture_tasks) from overwriting the first capture's
// task rows, and it does not survive the reboot, so the post-reboot path
// can never write either.
static TASK_WALK_ARMED: AtomicBool = AtomicBool::new(false);

pub(crate) fn arm_task_walk() {
    // Relaxed: same-context flag, not synchronization (the capture path is
    // single-threaded by construction).
    TASK_WALK_ARMED.store(true, Ordering::Relaxed);
}

fn take_task_walk() -> bool {
    TASK_WALK_ARMED.swap(false, Ordering::Relaxed)
}

/// Walk every live task's stack into the device's record.
///
/// Runs at most once per stored capture: only the [`crate::capture`] call
/// that actually wrote the record arms this walk. Every other call — second
/// faults in a cascade, post-reboot callers — returns without touching the
/// record.
pub fn capture_tasks<T: TaskTable + ?Sized>(table: &T) {
    if !take_task_walk() {
        return;
    }
    let env = capture::default_env();
    capture::with_record(|record| {
        if !record.is_valid() {
            return;
        }
        capture::with_default_ram(&env, |ram| {
            capture_tasks_into(record, ram, &env, table);
        });
    });
}
