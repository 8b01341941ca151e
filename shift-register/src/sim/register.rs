//! 74HC595-style serial-in/parallel-out register model.
//!
//! - Clock rising edge: every stage moves one place along and stage 0 takes
//!   the data level.
//! - Latch rising edge: the shift stages are copied to the parallel outputs.
//!
//! A pulse recorded in a [`DigitalFrames`] is seen as a rising and a falling
//! edge inside that frame, after the frame's levels.
//!
//! After shifting `BITS` bits `b0..b(BITS-1)` and latching, output `Q0`
//! holds the last bit shifted and `Q(BITS-1)` the first.

use super::frames::DigitalFrames;
use crate::driver::Pins;

/// A simulated `BITS`-wide shift register.
#[derive(Debug, Clone)]
pub struct SimulatedRegister<const BITS: usize> {
    stages: [bool; BITS],
    outputs: [bool; BITS],
    prev_clock: bool,
    prev_latch: bool,
    clock_edges: usize,
    latch_edges: usize,
}

impl<const BITS: usize> SimulatedRegister<BITS> {
    /// Create a cleared register.
    pub const fn new() -> Self {
        SimulatedRegister {
            stages: [false; BITS],
            outputs: [false; BITS],
            prev_clock: false,
            prev_latch: false,
            clock_edges: 0,
            latch_edges: 0,
        }
    }

    /// Feed every frame of `frames` through the register, as wired to `pins`.
    ///
    /// Edge detection carries over between calls, so call this once per
    /// block, in order.
    pub fn observe<const N: usize>(&mut self, frames: &DigitalFrames<N>, pins: Pins) {
        for n in 0..N {
            let data = frames.driven_level(n, pins.data);
            let clock = frames.driven_level(n, pins.clock);
            let latch = frames.driven_level(n, pins.latch);
            self.sample(data, clock, latch);

            let clock_pulse = frames.pulsed(n, pins.clock);
            let latch_pulse = frames.pulsed(n, pins.latch);
            if clock_pulse || latch_pulse {
                self.sample(data, clock || clock_pulse, latch || latch_pulse);
                self.sample(data, clock, latch);
            }
        }
    }

    /// Apply one instant of line levels.
    pub fn sample(&mut self, data: bool, clock: bool, latch: bool) {
        if clock && !self.prev_clock && BITS > 0 {
            self.stages.copy_within(0..BITS - 1, 1);
            self.stages[0] = data;
            self.clock_edges += 1;
        }
        if latch && !self.prev_latch {
            self.outputs = self.stages;
            self.latch_edges += 1;
        }
        self.prev_clock = clock;
        self.prev_latch = latch;
    }

    /// Parallel outputs `Q0..Q(BITS-1)`.
    pub fn outputs(&self) -> &[bool; BITS] {
        &self.outputs
    }

    /// Shift stages, not yet latched.
    pub fn stages(&self) -> &[bool; BITS] {
        &self.stages
    }

    /// Number of clock rising edges seen.
    pub fn clock_edges(&self) -> usize {
        self.clock_edges
    }

    /// Number of latch rising edges seen.
    pub fn latch_edges(&self) -> usize {
        self.latch_edges
    }
}

impl<const BITS: usize> Default for SimulatedRegister<BITS> {
    fn default() -> Self {
        Self::new()
    }
}
