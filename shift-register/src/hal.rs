//! `embedded-hal` adapter.
//!
//! [`HalOutputs`] lets the driver run on plain GPIO pins, e.g. from a timer
//! interrupt, instead of a frame-batched host. Each call to
//! [`process()`](crate::ShiftRegister::process) is one frame.
//!
//! The adapter is generic over any [`embedded_hal::digital::OutputPin`].
//!
//! # Example
//!
//! ```ignore
//! let mut outputs = HalOutputs::new([data_pin, clock_pin, latch_pin]);
//! let mut sr = ShiftRegister::with_pins(HalOutputs::<_, 3>::PINS, 16);
//! sr.set_data_bytes(&[0xA5], BitOrder::MsbFirst);
//!
//! // timer ISR:
//! sr.process(&mut outputs);
//! if let Some(err) = outputs.take_fault() { /* report */ }
//! ```

use embedded_hal::digital::{OutputPin, PinState};

use crate::context::{FrameContext, Pin, PinMode};
use crate::driver::Pins;

/// A [`FrameContext`] over `N` output pins. Pin identifiers are array
/// indices.
pub struct HalOutputs<P: OutputPin, const N: usize> {
    pins: [P; N],
    /// First error reported by a pin since the last `take_fault()`.
    fault: Option<P::Error>,
}

impl<P: OutputPin> HalOutputs<P, 3> {
    /// Pin assignment for `[data, clock, latch]` ordering.
    pub const PINS: Pins = Pins {
        data: 0,
        clock: 1,
        latch: 2,
    };
}

impl<P: OutputPin, const N: usize> HalOutputs<P, N> {
    /// Wrap `pins`; identifier `i` addresses `pins[i]`.
    pub fn new(pins: [P; N]) -> Self {
        HalOutputs { pins, fault: None }
    }

    /// Take the first pin error seen since the last call, if any.
    pub fn take_fault(&mut self) -> Option<P::Error> {
        self.fault.take()
    }

    /// Give the pins back.
    pub fn release(self) -> [P; N] {
        self.pins
    }

    fn set(&mut self, pin: Pin, state: PinState) {
        let Some(p) = self.pins.get_mut(pin as usize) else {
            debug_assert!(false, "output pin {} out of range", pin);
            return;
        };
        if let Err(e) = p.set_state(state) {
            if self.fault.is_none() {
                self.fault = Some(e);
            }
        }
    }
}

impl<P: OutputPin, const N: usize> FrameContext for HalOutputs<P, N> {
    fn digital_frames(&self) -> usize {
        1
    }

    /// Output pins are outputs by type; nothing to configure.
    fn pin_mode(&mut self, _frame: usize, _pin: Pin, _mode: PinMode) {}

    fn digital_write(&mut self, _frame: usize, pin: Pin, high: bool) {
        self.set(pin, PinState::from(high));
    }

    fn pulse(&mut self, _frame: usize, pin: Pin) {
        self.set(pin, PinState::High);
        self.set(pin, PinState::Low);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ShiftRegister;
    use crate::sim::SimulatedRegister;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use embedded_hal::digital::{Error, ErrorKind, ErrorType};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct PinFault(u8);

    impl Error for PinFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Shared log of (pin index, level) transitions.
    type Trace = Rc<RefCell<Vec<(u8, bool)>>>;

    struct MockPin {
        id: u8,
        trace: Trace,
        fail: bool,
    }

    impl ErrorType for MockPin {
        type Error = PinFault;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), PinFault> {
            if self.fail {
                return Err(PinFault(self.id));
            }
            self.trace.borrow_mut().push((self.id, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), PinFault> {
            if self.fail {
                return Err(PinFault(self.id));
            }
            self.trace.borrow_mut().push((self.id, true));
            Ok(())
        }
    }

    fn mock_outputs(trace: &Trace, failing: Option<u8>) -> HalOutputs<MockPin, 3> {
        HalOutputs::new(core::array::from_fn(|i| MockPin {
            id: i as u8,
            trace: trace.clone(),
            fail: failing == Some(i as u8),
        }))
    }

    #[test]
    fn pulse_is_high_then_low() {
        let trace = Trace::default();
        let mut outputs = mock_outputs(&trace, None);

        outputs.pulse(0, 1);
        assert_eq!(*trace.borrow(), [(1, true), (1, false)]);
    }

    #[test]
    fn drives_register_through_gpio() {
        let trace = Trace::default();
        let mut outputs = mock_outputs(&trace, None);
        let mut sr = ShiftRegister::with_pins(HalOutputs::<MockPin, 3>::PINS, 8);

        let _ = sr.set_data_bytes(&[0b1100_1010], crate::BitOrder::MsbFirst);
        while !sr.data_sent() {
            sr.process(&mut outputs);
        }
        assert!(outputs.take_fault().is_none());

        // Replay the GPIO transitions into the register model
        let mut reg = SimulatedRegister::<8>::new();
        let mut levels = [false; 3];
        for &(pin, level) in trace.borrow().iter() {
            levels[pin as usize] = level;
            reg.sample(levels[0], levels[1], levels[2]);
        }
        assert_eq!(reg.clock_edges(), 8);
        assert_eq!(reg.latch_edges(), 1);
        // MSB shifted first ends up on Q7
        assert_eq!(
            reg.outputs(),
            &[false, true, false, true, false, false, true, true]
        );
    }

    #[test]
    fn first_fault_is_kept() {
        let trace = Trace::default();
        let mut outputs = mock_outputs(&trace, Some(1));
        let mut sr = ShiftRegister::with_pins(HalOutputs::<MockPin, 3>::PINS, 8);

        let _ = sr.set_data(&[true, false]);
        for _ in 0..4 {
            sr.process(&mut outputs);
        }

        // Clock pin failed, but the rest of the protocol still ran
        assert!(sr.data_sent());
        assert_eq!(outputs.take_fault(), Some(PinFault(1)));
        assert_eq!(outputs.take_fault(), None);
        let latch_rises = trace.borrow().iter().filter(|&&t| t == (2, true)).count();
        assert_eq!(latch_rises, 1);
    }
}
