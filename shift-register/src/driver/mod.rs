//! Shift-register driver.
//!
//! [`ShiftRegister`] serializes a bit message over three digital outputs
//! (data, clock, latch), one protocol step per frame:
//!
//! ```text
//!  tick:    1        2 .. M+1            M+2
//!  state:   Start    Transmitting        Stop        → Idle
//!  latch:   ▔▔╲▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁▁╱▔▔▔▔▔
//!  data:             b0   b1  ..  bM-1
//!  clock:            ╱╲   ╱╲      ╱╲
//! ```
//!
//! New data can be staged at any time with [`set_data()`](ShiftRegister::set_data).
//! The message is handed to the real-time side through a lock-free triple
//! buffer ([`BitExchange`](crate::exchange::BitExchange)) and adopted at the
//! start of the next tick; a transmission in flight is abandoned and the new
//! message starts from its first bit.
//!
//! When the staging and processing sides run in different contexts, use
//! [`split()`](ShiftRegister::split) to obtain a [`DataWriter`] and a
//! [`Transmitter`].

mod bits;
mod split;
mod state;

#[cfg(test)]
mod integration_tests;

pub use bits::BitOrder;
pub use split::{DataWriter, Transmitter};
pub use state::TransmitState;

use core::fmt;

use crate::constants::DEFAULT_MAX_BITS;
use crate::context::{FrameContext, Pin, PinMode};
use crate::exchange::BitExchange;

use bits::ByteBits;
use state::AtomicState;

/// The digital channels connected to the shift register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pins {
    /// Serial data input.
    pub data: Pin,
    /// Shift clock (rising edge shifts).
    pub clock: Pin,
    /// Storage latch (rising edge commits to the parallel outputs).
    pub latch: Pin,
}

/// How a data update was staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DataUpdate {
    /// The message fit in the pre-reserved buffer.
    InPlace,
    /// The buffer was reallocated to fit the message. Not real-time safe.
    Reallocated,
}

/// Returned by [`ShiftRegister::try_set_data`] when a message does not fit
/// in the reserved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// Message length in bits.
    pub requested: usize,
    /// Bits available without reallocating.
    pub capacity: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "message of {} bits exceeds reserved capacity of {} bits",
            self.requested, self.capacity
        )
    }
}

/// State reachable from both the staging and the real-time side.
pub(crate) struct Shared {
    exchange: BitExchange,
    state: AtomicState,
}

impl Shared {
    const fn new() -> Self {
        Shared {
            exchange: BitExchange::new(),
            state: AtomicState::new(TransmitState::Idle),
        }
    }

    /// Stage and publish a message (producer side).
    fn publish<I>(&self, bits: I) -> DataUpdate
    where
        I: ExactSizeIterator<Item = bool>,
    {
        let len = bits.len();
        if self.exchange.write(bits) {
            warn!("shift register buffer reallocated for {} bits", len);
            DataUpdate::Reallocated
        } else {
            DataUpdate::InPlace
        }
    }

    /// Stage a message only if it fits without reallocating (producer side).
    fn try_publish(&self, bits: &[bool]) -> Result<(), CapacityError> {
        let capacity = self.exchange.capacity();
        if bits.len() > capacity {
            return Err(CapacityError {
                requested: bits.len(),
                capacity,
            });
        }
        let grew = self.exchange.write(bits.iter().copied());
        debug_assert!(!grew);
        Ok(())
    }

    fn data_sent(&self) -> bool {
        // Pending is checked first: the real-time side marks itself busy
        // before it adopts a message, so a cleared pending flag implies the
        // state load below sees that mark or something later.
        !self.exchange.has_pending() && self.state.load() == TransmitState::Idle
    }
}

/// Real-time side state, only touched while ticking.
pub(crate) struct Engine {
    pins: Pins,
    state: TransmitState,
    /// Bits of the current message already shifted out.
    cursor: usize,
    /// Whether the pins have been switched to outputs since the last setup.
    pin_mode_set: bool,
}

impl Engine {
    const fn new() -> Self {
        Engine {
            pins: Pins {
                data: 0,
                clock: 0,
                latch: 0,
            },
            state: TransmitState::Idle,
            cursor: 0,
            pin_mode_set: false,
        }
    }

    fn set_state(&mut self, shared: &Shared, state: TransmitState) {
        if self.state != state {
            self.state = state;
            shared.state.store(state);
        }
    }

    /// Run one tick at frame `n`.
    fn tick<C>(&mut self, shared: &Shared, context: &mut C, n: usize)
    where
        C: FrameContext + ?Sized,
    {
        if !self.pin_mode_set {
            context.pin_mode(n, self.pins.data, PinMode::Output);
            context.pin_mode(n, self.pins.clock, PinMode::Output);
            context.pin_mode(n, self.pins.latch, PinMode::Output);
            self.pin_mode_set = true;
        }

        if shared.exchange.has_pending() {
            // Go busy before adopting so `data_sent()` cannot observe the
            // new message as already sent.
            self.state = TransmitState::Start;
            shared.state.store(TransmitState::Start);
            shared.exchange.acquire();
        }

        let next = match self.state {
            TransmitState::Idle => TransmitState::Idle,
            TransmitState::Start => {
                context.digital_write(n, self.pins.latch, false);
                self.cursor = 0;
                if shared.exchange.front().is_empty() {
                    TransmitState::Stop
                } else {
                    TransmitState::Transmitting
                }
            }
            TransmitState::Transmitting => {
                let bits = shared.exchange.front();
                if let Some(&bit) = bits.get(self.cursor) {
                    context.digital_write(n, self.pins.data, bit);
                    context.pulse(n, self.pins.clock);
                    self.cursor += 1;
                }
                if self.cursor >= bits.len() {
                    TransmitState::Stop
                } else {
                    TransmitState::Transmitting
                }
            }
            TransmitState::Stop => {
                context.digital_write(n, self.pins.latch, true);
                TransmitState::Idle
            }
        };
        self.set_state(shared, next);
    }

    fn process<C>(&mut self, shared: &Shared, context: &mut C)
    where
        C: FrameContext + ?Sized,
    {
        for n in 0..context.digital_frames() {
            self.tick(shared, context, n);
        }
    }
}

/// Drives a shift register from a frame-batched real-time host.
///
/// # Example
/// ```ignore
/// let mut sr = ShiftRegister::with_pins(Pins { data: 0, clock: 1, latch: 2 }, 8);
/// sr.set_data(&[true, false, true, true, false, false, true, false]);
///
/// // once per real-time cycle:
/// sr.process(&mut context);
/// ```
pub struct ShiftRegister {
    engine: Engine,
    shared: Shared,
    max_size: usize,
}

impl ShiftRegister {
    /// Create an unconfigured driver. Call [`setup()`](Self::setup) before
    /// processing.
    pub const fn new() -> Self {
        ShiftRegister {
            engine: Engine::new(),
            shared: Shared::new(),
            max_size: 0,
        }
    }

    /// Create a driver and run [`setup()`](Self::setup).
    pub fn with_pins(pins: Pins, max_size: usize) -> Self {
        let mut sr = Self::new();
        sr.setup(pins, max_size);
        sr
    }

    /// Bind the digital channels and reserve room for messages of up to
    /// `max_size` bits, so that [`set_data()`](Self::set_data) does not
    /// allocate for them.
    ///
    /// The pins are switched to outputs on the next processed frame. Calling
    /// this again re-applies the pin configuration; it never starts a
    /// transmission. Not real-time safe.
    pub fn setup(&mut self, pins: Pins, max_size: usize) {
        debug_assert!(
            pins.data != pins.clock && pins.data != pins.latch && pins.clock != pins.latch,
            "data, clock and latch must be distinct pins"
        );
        self.engine.pins = pins;
        self.engine.pin_mode_set = false;
        self.shared.exchange.reserve(max_size);
        self.max_size = self.max_size.max(max_size);
        debug!(
            "shift register setup: data={} clock={} latch={} max_size={}",
            pins.data, pins.clock, pins.latch, max_size
        );
    }

    /// Replace the message to shift out.
    ///
    /// Transmission (re)starts from the first bit on the next tick, whatever
    /// was in flight. Messages longer than the reserved capacity reallocate
    /// the staging buffer, which is not real-time safe; real-time callers
    /// should reserve enough in [`setup()`](Self::setup) or use
    /// [`try_set_data()`](Self::try_set_data).
    pub fn set_data(&mut self, bits: &[bool]) -> DataUpdate {
        let update = self.shared.publish(bits.iter().copied());
        self.arm();
        update
    }

    /// Replace the message with the bits of `bytes`, each byte in `order`.
    pub fn set_data_bytes(&mut self, bytes: &[u8], order: BitOrder) -> DataUpdate {
        let update = self.shared.publish(ByteBits::new(bytes, order));
        self.arm();
        update
    }

    /// Replace the message only if it fits in the reserved capacity.
    /// Real-time safe.
    pub fn try_set_data(&mut self, bits: &[bool]) -> Result<(), CapacityError> {
        self.shared.try_publish(bits)?;
        self.arm();
        Ok(())
    }

    /// With exclusive access the restart is visible immediately rather than
    /// at the next tick.
    fn arm(&mut self) {
        self.engine.cursor = 0;
        self.engine.set_state(&self.shared, TransmitState::Start);
    }

    /// Check whether the last message has been fully shifted out and latched.
    pub fn data_sent(&self) -> bool {
        self.shared.data_sent()
    }

    /// Shift out data for every frame in `context`.
    pub fn process<C>(&mut self, context: &mut C)
    where
        C: FrameContext + ?Sized,
    {
        self.engine.process(&self.shared, context);
    }

    /// Shift out data for frame `n` of `context`.
    pub fn process_frame<C>(&mut self, context: &mut C, n: usize)
    where
        C: FrameContext + ?Sized,
    {
        self.engine.tick(&self.shared, context, n);
    }

    /// Split into a staging handle and a real-time handle that can be used
    /// from different contexts.
    pub fn split(&mut self) -> (DataWriter<'_>, Transmitter<'_>) {
        (
            DataWriter::new(&self.shared),
            Transmitter::new(&mut self.engine, &self.shared),
        )
    }

    /// Current transmission state.
    pub fn state(&self) -> TransmitState {
        self.engine.state
    }

    /// Bits of the current message already shifted out.
    pub fn cursor(&self) -> usize {
        self.engine.cursor
    }

    /// The configured pins.
    pub fn pins(&self) -> Pins {
        self.engine.pins
    }

    /// Largest `max_size` passed to [`setup()`](Self::setup).
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Bits the next message may hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.shared.exchange.capacity()
    }
}

impl Default for ShiftRegister {
    /// A driver on pins 0 (data), 1 (clock) and 2 (latch) with
    /// [`DEFAULT_MAX_BITS`] reserved.
    fn default() -> Self {
        Self::with_pins(
            Pins {
                data: 0,
                clock: 1,
                latch: 2,
            },
            DEFAULT_MAX_BITS,
        )
    }
}
