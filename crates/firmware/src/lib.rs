//! Cortex-M integration glue for the blackbox crash-capture core.
//!
//! The core crate deliberately knows nothing about how faults are
//! dispatched or where records go after a reboot; this crate is that
//! collaborator for Cortex-M targets:
//!
//! ```text
//! HardFault / fatal_assert!   (this crate)
//!         ↓ capture
//! blackbox core               (record in .uninit RAM)
//!         ↓ warm reset, reboot
//! export_pending → DumpSink   (this crate, at next boot)
//! ```
//!
//! # Boot-time responsibilities of the application
//!
//! 1. Call [`export::export_pending`] early in `main`, before anything that
//!    could fault, and hand it a [`export::DumpSink`] that writes to flash,
//!    an SD card, or a link to a host.
//! 2. Wrap the entry of `main` and of every task in
//!    [`blackbox::with_stack_sentinel`] so the walker can find the stack
//!    base.
//! 3. Optionally call [`handlers::enable_divide_by_zero_trap`] so integer
//!    division by zero raises a fault instead of silently producing zero.
//!
//! # Features
//!
//! - `hardware` — build for the STM32H7 target: real exception handlers
//!   (`cortex-m-rt`), warm reset via SCB, defmt/RTT logging
//! - `os` — per-task backtraces through `blackbox/os`

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(async_fn_in_trait)] // bare-metal single-executor use, Send bounds not needed
#![allow(clippy::doc_markdown)] // HardFault, DumpSink etc. in doc comments
#![allow(clippy::module_name_repetitions)]

pub mod assert;
pub mod export;
pub mod handlers;

pub use assert::software_fault;
pub use export::{export_pending, DumpSink};

// RTT transport and panic handler are only meaningful on the real target.
#[cfg(all(feature = "hardware", target_arch = "arm"))]
use defmt_rtt as _;
#[cfg(all(feature = "hardware", target_arch = "arm"))]
use panic_probe as _;
