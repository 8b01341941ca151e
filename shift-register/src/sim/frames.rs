//! Block of digital frames in packed word layout.
//!
//! ## Word layout
//!
//! One `u32` per frame, covering [`DIGITAL_CHANNELS`] channels:
//!
//! ```text
//!  31            16 15             0
//! ┌────────────────┬────────────────┐
//! │ levels (1=high)│ dirs (1=input) │
//! └────────────────┴────────────────┘
//! ```
//!
//! Persistent writes apply from the given frame to the end of the block and
//! carry over into the next block. Pulses are kept in a separate per-frame
//! mask (one bit per channel), since a whole high/low pulse fits inside one
//! frame and cannot be expressed as a frame level.

use crate::constants::{DIGITAL_CHANNELS, DIGITAL_LEVEL_SHIFT};
use crate::context::{FrameContext, Pin, PinMode};

/// Direction bits with every channel set to input.
const ALL_INPUTS: u32 = (1 << DIGITAL_CHANNELS) - 1;

/// An `N`-frame digital I/O block.
///
/// # Example
/// ```ignore
/// let mut frames = DigitalFrames::<16>::new();
/// sr.process(&mut frames);
/// register.observe(&frames, sr.pins());
/// frames.next_block();
/// ```
#[derive(Debug, Clone)]
pub struct DigitalFrames<const N: usize> {
    words: [u32; N],
    /// Channels pulsed within each frame.
    pulses: [u32; N],
    /// State every frame of the next block starts from.
    carry: u32,
}

impl<const N: usize> DigitalFrames<N> {
    /// Create a block with every channel an input at low level.
    pub const fn new() -> Self {
        assert!(N >= 1, "a block needs at least one frame");
        DigitalFrames {
            words: [ALL_INPUTS; N],
            pulses: [0; N],
            carry: ALL_INPUTS,
        }
    }

    /// Start the next block: every frame takes the persistent state left by
    /// the previous block, with no pulses.
    pub fn next_block(&mut self) {
        self.words.fill(self.carry);
        self.pulses.fill(0);
    }

    /// Level of `pin` at `frame`.
    pub fn level(&self, frame: usize, pin: Pin) -> bool {
        self.words[frame] & level_bit(pin) != 0
    }

    /// Whether `pin` is an output at `frame`.
    pub fn is_output(&self, frame: usize, pin: Pin) -> bool {
        self.words[frame] & dir_bit(pin) == 0
    }

    /// Level an external device sees on `pin` at `frame`: inputs are read as
    /// low.
    pub fn driven_level(&self, frame: usize, pin: Pin) -> bool {
        self.is_output(frame, pin) && self.level(frame, pin)
    }

    /// Whether an output `pin` was pulsed within `frame`.
    pub fn pulsed(&self, frame: usize, pin: Pin) -> bool {
        self.is_output(frame, pin) && self.pulses[frame] & dir_bit(pin) != 0
    }

    /// Raw packed words for this block.
    pub fn words(&self) -> &[u32; N] {
        &self.words
    }

    fn apply_from(&mut self, frame: usize, set: u32, clear: u32) {
        for word in &mut self.words[frame..] {
            *word = (*word | set) & !clear;
        }
        self.carry = (self.carry | set) & !clear;
    }
}

impl<const N: usize> Default for DigitalFrames<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn dir_bit(pin: Pin) -> u32 {
    debug_assert!((pin as usize) < DIGITAL_CHANNELS, "digital channel {} out of range", pin);
    1 << pin
}

fn level_bit(pin: Pin) -> u32 {
    debug_assert!((pin as usize) < DIGITAL_CHANNELS, "digital channel {} out of range", pin);
    1 << (pin + DIGITAL_LEVEL_SHIFT)
}

impl<const N: usize> FrameContext for DigitalFrames<N> {
    fn digital_frames(&self) -> usize {
        N
    }

    fn pin_mode(&mut self, frame: usize, pin: Pin, mode: PinMode) {
        match mode {
            PinMode::Input => self.apply_from(frame, dir_bit(pin), 0),
            PinMode::Output => self.apply_from(frame, 0, dir_bit(pin)),
        }
    }

    fn digital_write(&mut self, frame: usize, pin: Pin, high: bool) {
        if high {
            self.apply_from(frame, level_bit(pin), 0);
        } else {
            self.apply_from(frame, 0, level_bit(pin));
        }
    }

    fn pulse(&mut self, frame: usize, pin: Pin) {
        self.pulses[frame] |= dir_bit(pin);
    }
}
