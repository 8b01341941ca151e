//! # shift-register
//!
//! A `no_std` driver for a generic 3-wire serial-in/parallel-out shift
//! register (data, clock, latch) hosted by a real-time digital I/O framework
//! that hands out work in fixed-size batches of frames.
//!
//! The driver never blocks and never allocates while processing: each frame
//! performs at most one protocol step (one bit plus one clock pulse), so an
//! `M`-bit message takes exactly `M + 2` frames and is spread across as many
//! real-time cycles as needed.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Boundary | [`context`] | `FrameContext` trait implemented by the host |
//! | Hand-off | [`exchange`] | Lock-free triple buffer for bit snapshots |
//! | Driver | [`driver`] | `ShiftRegister` state machine and split handles |
//! | Simulation | [`sim`] | Software host buffer and 74HC595-style model |
//! | HAL | [`hal`] | `embedded-hal` output-pin adapter (feature-gated) |
//!
//! ## Quick start
//!
//! ```ignore
//! use shift_register::{Pins, ShiftRegister};
//!
//! let mut sr = ShiftRegister::with_pins(Pins { data: 0, clock: 1, latch: 2 }, 16);
//! sr.set_data(&[true, false, true, true]);
//!
//! // In the real-time callback, once per block:
//! sr.process(&mut context);
//!
//! if sr.data_sent() {
//!     // safe to queue the next message without piling up
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `hal` | yes | [`hal::HalOutputs`] over `embedded-hal` 1.0 output pins |
//! | `log` | no | Diagnostics through the `log` facade (non-real-time paths only) |

#![no_std]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod constants;
pub mod context;
pub mod exchange;
pub mod driver;
pub mod sim;

#[cfg(feature = "hal")]
pub mod hal;

pub use context::{FrameContext, Pin, PinMode};
pub use driver::{
    BitOrder, CapacityError, DataUpdate, DataWriter, Pins, ShiftRegister, TransmitState,
    Transmitter,
};
