//! Software stand-ins for the real-time host and the shift-register chip.
//!
//! These let the driver run end-to-end without hardware:
//!
//! ```text
//! ShiftRegister.process() ──► DigitalFrames ──► SimulatedRegister.observe()
//!                           (packed u32/frame)    (clock/latch edge model)
//! ```
//!
//! - [`DigitalFrames`] — a block of digital frames in a packed word layout,
//!   implementing [`FrameContext`](crate::context::FrameContext)
//! - [`SimulatedRegister`] — a 74HC595-style serial-in/parallel-out model

mod frames;
mod register;

pub use frames::DigitalFrames;
pub use register::SimulatedRegister;
