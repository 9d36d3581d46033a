//! Post-mortem crash capture for embedded targets without an OS core-dump
//! facility.
//!
//! At the moment of a fatal software assertion or hardware fault, `blackbox`
//! records a compact diagnostic snapshot — fault classification, source
//! location, CPU register file (when available), and a heuristic call-stack
//! backtrace — into a RAM region that survives a warm reset. The next boot
//! detects the record, exports it to durable storage or a remote host, and
//! clears it. Symbolication happens offline (addr2line against the shipped
//! ELF); the target stores raw addresses only.
//!
//! # Architecture Layers
//!
//! ```text
//! Fault dispatch (firmware crate: HardFault handler, fatal_assert!)
//!         ↓
//! Capture orchestrator (capture module — first-writer-wins)
//!         ↓
//! Stack walker (walker module — scan / frame-chain / host strategies)
//!         ↓
//! Dump record (record module — fixed layout in non-initialized RAM)
//! ```
//!
//! # Modules
//!
//! - [`profile`] — platform constants and the `MemoryLayout` the walker is
//!   parameterized over
//! - [`record`] — `DumpRecord` fixed-layout snapshot and its wire codec
//! - [`validity`] — key/anti-key scheme separating a real capture from
//!   uninitialized RAM
//! - [`walker`] — return-address extraction from raw stack memory
//! - [`capture`] — the single capture entry point and post-reboot accessors
//! - [`tasks`] — per-task backtraces over an RTOS task table (`os` feature)
//! - [`report`] — human-readable text report for the export path
//! - [`sim`] — synthetic RAM and cold-boot helpers for host tests
//!
//! # Features
//!
//! - `std`: host-runtime backtrace strategy (testing and ports on commodity
//!   OSes)
//! - `hardware`: Cortex-M profile — exception-frame register capture,
//!   fault-status registers, `.uninit` section placement
//! - `os`: multi-task walk over an external task table
//! - `frame-pointers`: default to the frame-pointer-chain walker
//! - `defmt`: `defmt::Format` derives for RTT logging
//!
//! # Example
//!
//! ```
//! use blackbox::{capture, is_saved, reset};
//!
//! // Fault path (normally invoked by a fault handler, then a CPU reset):
//! capture(None, Some("src/main.rs"), 42, 0);
//! assert!(is_saved());
//!
//! // Post-reboot path, after the record has been exported:
//! reset();
//! assert!(!is_saved());
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
// Pedantic lints suppressed for this crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // read-only accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)] // Word→u32 narrowing is the wire contract

pub mod capture;
pub mod profile;
pub mod record;
pub mod report;
pub mod sim;
pub mod validity;
pub mod walker;

#[cfg(feature = "std")]
pub mod host;

#[cfg(feature = "os")]
pub mod tasks;

// Re-export the process-wide surface and the types it hands out.
pub use capture::{capture, get, is_saved, reset, CaptureEnv};
pub use profile::{
    AddressRange, MemoryLayout, Word, CALL_STACK_SIZE, FILE_NAME_LEN, MAX_STACK_DEPTH_SEARCH,
    SOFTWARE_VERSION, STACK_MARKER,
};
pub use record::{DumpRecord, FaultKind, RecordError};
pub use walker::{with_stack_sentinel, DeviceRam, NoRam, RamAccess, WalkStrategy};

#[cfg(feature = "os")]
pub use profile::OS_TASKCNT;
#[cfg(feature = "os")]
pub use tasks::{capture_tasks, TaskTable};
