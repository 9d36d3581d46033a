//! Strategy C: host-runtime backtrace adapter.
//!
//! On commodity OSes (test harnesses, desktop ports) the runtime already
//! knows how to unwind. This adapter takes the first `n` instruction
//! pointers from the native unwinder and drops everything else — symbol
//! names in particular, so the stored record looks exactly like one a
//! target produced and the offline pipeline stays identical.

use crate::profile::Word;

/// Fill `out` with instruction pointers of the current call stack, most
/// recent first. Returns the number of entries stored; the remainder of
/// `out` is zeroed.
#[allow(clippy::indexing_slicing)] // n < out.len() is checked before each store
pub fn host_backtrace(out: &mut [Word]) -> usize {
    out.fill(0);
    let mut n = 0;
    backtrace::trace(|frame| {
        if n == out.len() {
            return false;
        }
        out[n] = frame.ip() as Word;
        n += 1;
        true
    });
    n
}
