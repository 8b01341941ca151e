use core::sync::atomic::{AtomicU8, Ordering};

/// Transmission state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitState {
    /// Latch about to be pulled low; the next tick starts shifting.
    Start = 0,
    /// Shifting one bit per tick.
    Transmitting = 1,
    /// All bits shifted; the next tick raises the latch.
    Stop = 2,
    /// Nothing to do.
    Idle = 3,
}

impl TransmitState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TransmitState::Start,
            1 => TransmitState::Transmitting,
            2 => TransmitState::Stop,
            _ => TransmitState::Idle,
        }
    }
}

/// A [`TransmitState`] readable from another context.
///
/// Written only by the real-time side; read by both.
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
    pub(crate) const fn new(state: TransmitState) -> Self {
        AtomicState(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self) -> TransmitState {
        TransmitState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, state: TransmitState) {
        self.0.store(state as u8, Ordering::Release);
    }
}
