//! Handles for driving one [`ShiftRegister`](super::ShiftRegister) from two
//! execution contexts.
//!
//! ```ignore
//! let (mut writer, mut tx) = sr.split();
//!
//! // control-rate task / UI thread:
//! writer.set_data(&pattern);
//!
//! // real-time callback:
//! tx.process(&mut context);
//! ```
//!
//! Only one pair exists at a time (it borrows the driver mutably), which is
//! what makes the single-producer/single-consumer exchange sound.

use crate::context::FrameContext;

use super::bits::{BitOrder, ByteBits};
use super::{CapacityError, DataUpdate, Engine, Shared, TransmitState};

/// Staging side: replaces the message to shift out.
pub struct DataWriter<'a> {
    shared: &'a Shared,
}

impl<'a> DataWriter<'a> {
    pub(super) fn new(shared: &'a Shared) -> Self {
        DataWriter { shared }
    }

    /// Replace the message. The [`Transmitter`] restarts from the first bit
    /// on its next tick. Reallocates (not real-time safe) if the message is
    /// longer than the reserved capacity.
    pub fn set_data(&mut self, bits: &[bool]) -> DataUpdate {
        self.shared.publish(bits.iter().copied())
    }

    /// Replace the message with the bits of `bytes`, each byte in `order`.
    pub fn set_data_bytes(&mut self, bytes: &[u8], order: BitOrder) -> DataUpdate {
        self.shared.publish(ByteBits::new(bytes, order))
    }

    /// Replace the message only if it fits in the reserved capacity.
    /// Real-time safe.
    pub fn try_set_data(&mut self, bits: &[bool]) -> Result<(), CapacityError> {
        self.shared.try_publish(bits)
    }

    /// Check whether the last message has been fully shifted out and latched.
    pub fn data_sent(&self) -> bool {
        self.shared.data_sent()
    }

    /// Bits the next message may hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.shared.exchange.capacity()
    }
}

/// Real-time side: runs the transmission state machine.
pub struct Transmitter<'a> {
    engine: &'a mut Engine,
    shared: &'a Shared,
}

impl<'a> Transmitter<'a> {
    pub(super) fn new(engine: &'a mut Engine, shared: &'a Shared) -> Self {
        Transmitter { engine, shared }
    }

    /// Shift out data for every frame in `context`.
    pub fn process<C>(&mut self, context: &mut C)
    where
        C: FrameContext + ?Sized,
    {
        self.engine.process(self.shared, context);
    }

    /// Shift out data for frame `n` of `context`.
    pub fn process_frame<C>(&mut self, context: &mut C, n: usize)
    where
        C: FrameContext + ?Sized,
    {
        self.engine.tick(self.shared, context, n);
    }

    /// Check whether the last message has been fully shifted out and latched.
    pub fn data_sent(&self) -> bool {
        self.shared.data_sent()
    }

    /// Current transmission state.
    pub fn state(&self) -> TransmitState {
        self.engine.state
    }

    /// Bits of the current message already shifted out.
    pub fn cursor(&self) -> usize {
        self.engine.cursor
    }
}
