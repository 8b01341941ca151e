//! Lock-free triple buffer for publishing bit snapshots.
//!
//! Carries whole messages from the context that calls `set_data` to the
//! real-time context that shifts them out. A message is written into a
//! private slot and then published with a single atomic swap, so the reader
//! always sees a complete buffer whose length matches its contents.
//!
//! # Safety Contract
//!
//! - Only ONE context may call the producer methods
//!   ([`write()`](BitExchange::write), [`capacity()`](BitExchange::capacity)).
//! - Only ONE context may call the consumer methods
//!   ([`acquire()`](BitExchange::acquire), [`front()`](BitExchange::front)).
//! - These may be different threads/ISR contexts running concurrently.
//!
//! The contract is enforced by keeping these methods crate-private and handing
//! them out only through the borrow-checked handles in [`crate::driver`].
//!
//! # Slot ownership
//!
//! ```text
//!  producer            shared              consumer
//!  ┌──────┐  swap   ┌──────────┐  swap   ┌───────┐
//!  │ back ├────────►│ middle|F │────────►│ front │
//!  └──────┘         └──────────┘         └───────┘
//! ```
//!
//! `F` marks a middle slot the consumer has not yet adopted. Writing a new
//! message while one is still unread replaces it, so the consumer only ever
//! sees the latest message.

use alloc::vec::Vec;
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, Ordering};

/// Number of slots in the exchange.
const SLOTS: usize = 3;

/// Mask selecting the slot index from a packed index byte.
const INDEX_MASK: u8 = 0b011;

/// Set on the middle index when it holds a message not yet adopted.
const FRESH: u8 = 0b100;

/// Triple-buffered bit message exchange.
pub struct BitExchange {
    slots: [UnsafeCell<Vec<bool>>; SLOTS],
    /// Slot shared between the two sides, tagged with [`FRESH`] when unread.
    middle: AtomicU8,
    /// Slot owned by the producer (only touched by the producer).
    back: AtomicU8,
    /// Slot owned by the consumer (only touched by the consumer).
    front: AtomicU8,
}

// SAFETY: Vec<bool> is Send. Under the single-producer/single-consumer
// contract each slot is owned by exactly one side at a time, ownership only
// moves through the AcqRel swaps on `middle`, and `back`/`front` are each
// modified by one side only.
unsafe impl Sync for BitExchange {}

impl BitExchange {
    /// Create an exchange with empty, unallocated slots.
    pub const fn new() -> Self {
        BitExchange {
            slots: [
                UnsafeCell::new(Vec::new()),
                UnsafeCell::new(Vec::new()),
                UnsafeCell::new(Vec::new()),
            ],
            middle: AtomicU8::new(1),
            back: AtomicU8::new(0),
            front: AtomicU8::new(2),
        }
    }

    /// Reserve room for `bits` in every slot.
    ///
    /// Takes `&mut self`, so neither side can be active. Not real-time safe.
    pub fn reserve(&mut self, bits: usize) {
        for slot in self.slots.iter_mut() {
            let slot = slot.get_mut();
            if slot.capacity() < bits {
                slot.reserve_exact(bits - slot.len());
            }
        }
    }

    /// Stage `bits` in the producer's slot and publish it (producer side).
    ///
    /// Returns `true` if the slot had to be reallocated to fit the message.
    pub(crate) fn write<I>(&self, bits: I) -> bool
    where
        I: ExactSizeIterator<Item = bool>,
    {
        let back = self.back.load(Ordering::Relaxed);

        // SAFETY: The back slot is owned by the producer until it is swapped
        // into `middle` below, and we are the sole producer.
        let slot = unsafe { &mut *self.slots[back as usize].get() };

        let len = bits.len();
        let grew = len > slot.capacity();
        if grew {
            grow(slot, len);
        }
        slot.clear();
        slot.extend(bits);

        // Release publishes the slot contents; Acquire takes ownership of the
        // slot the consumer (or a previous write) left in the middle.
        let previous = self.middle.swap(back | FRESH, Ordering::AcqRel);
        self.back.store(previous & INDEX_MASK, Ordering::Relaxed);
        grew
    }

    /// Capacity of the slot the next [`write()`](Self::write) will fill
    /// (producer side).
    pub(crate) fn capacity(&self) -> usize {
        let back = self.back.load(Ordering::Relaxed);
        // SAFETY: The back slot is owned by the producer.
        unsafe { (*self.slots[back as usize].get()).capacity() }
    }

    /// Check whether a published message is waiting to be adopted.
    pub fn has_pending(&self) -> bool {
        self.middle.load(Ordering::Acquire) & FRESH != 0
    }

    /// Adopt the latest published message, if any (consumer side).
    ///
    /// Returns `true` if [`front()`](Self::front) now refers to a new message.
    /// Never allocates or frees.
    pub(crate) fn acquire(&self) -> bool {
        if !self.has_pending() {
            return false;
        }
        let front = self.front.load(Ordering::Relaxed);
        // The producer may have published again since the check; the swap
        // picks up whichever message is newest. It never clears FRESH, so the
        // swapped-out value is always a fresh one.
        let previous = self.middle.swap(front, Ordering::AcqRel);
        self.front.store(previous & INDEX_MASK, Ordering::Relaxed);
        true
    }

    /// The most recently adopted message (consumer side).
    pub(crate) fn front(&self) -> &[bool] {
        let front = self.front.load(Ordering::Relaxed);
        // SAFETY: The front slot is owned by the consumer; the producer only
        // ever writes the back slot, which is never the front slot.
        unsafe { &*self.slots[front as usize].get() }
    }
}

impl Default for BitExchange {
    fn default() -> Self {
        Self::new()
    }
}

/// Grow `slot` to hold at least `bits` entries. Not real-time safe: this
/// reallocates, and frees the old allocation.
#[cold]
#[inline(never)]
fn grow(slot: &mut Vec<bool>, bits: usize) {
    slot.clear();
    slot.reserve_exact(bits);
}
