//! Host boundary.
//!
//! The real-time host delivers digital I/O in batches of frames. The driver
//! only needs to know how many frames a batch holds and how to request pin
//! writes at a given frame; everything else about the host stays opaque.

/// Host-defined digital channel identifier.
pub type Pin = u32;

/// Digital pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

/// A batch of digital frames supplied by the real-time host.
pub trait FrameContext {
    /// Number of digital frames in this batch.
    fn digital_frames(&self) -> usize;

    /// Set the direction of `pin` from `frame` onwards.
    fn pin_mode(&mut self, frame: usize, pin: Pin, mode: PinMode);

    /// Drive `pin` to `high` from `frame` onwards. The level persists into
    /// later frames and later batches until written again.
    fn digital_write(&mut self, frame: usize, pin: Pin, high: bool);

    /// Emit one complete active-high pulse on `pin` within `frame`, after the
    /// frame's persistent levels have settled. The pin ends the frame at its
    /// persistent level, so pulses in consecutive frames stay distinct.
    fn pulse(&mut self, frame: usize, pin: Pin);
}

impl<T: FrameContext + ?Sized> FrameContext for &mut T {
    fn digital_frames(&self) -> usize {
        (**self).digital_frames()
    }

    fn pin_mode(&mut self, frame: usize, pin: Pin, mode: PinMode) {
        (**self).pin_mode(frame, pin, mode)
    }

    fn digital_write(&mut self, frame: usize, pin: Pin, high: bool) {
        (**self).digital_write(frame, pin, high)
    }

    fn pulse(&mut self, frame: usize, pin: Pin) {
        (**self).pulse(frame, pin)
    }
}
