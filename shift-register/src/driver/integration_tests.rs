//! End-to-end tests: driver → simulated host frames → simulated register.
//!
//! ```text
//! ShiftRegister.process() → DigitalFrames → SimulatedRegister.observe()
//!        ▲                      │ next_block()
//!        └── set_data() ────────┘ (per block)
//! ```

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicBool, Ordering};

    use crate::driver::{BitOrder, Pins, ShiftRegister, TransmitState};
    use crate::sim::{DigitalFrames, SimulatedRegister};

    const PINS: Pins = Pins {
        data: 0,
        clock: 1,
        latch: 2,
    };

    const BLOCK: usize = 16;

    /// Run one host block: process, let the register see it, advance.
    fn run_block<const BITS: usize>(
        sr: &mut ShiftRegister,
        frames: &mut DigitalFrames<BLOCK>,
        reg: &mut SimulatedRegister<BITS>,
    ) {
        sr.process(frames);
        reg.observe(frames, PINS);
        frames.next_block();
    }

    /// Register outputs for a message exactly as wide as the register:
    /// the first bit shifted ends up on the last output.
    fn latched<const BITS: usize>(msg: &[bool]) -> [bool; BITS] {
        let mut out = [false; BITS];
        for (i, &b) in msg.iter().rev().enumerate() {
            out[i] = b;
        }
        out
    }

    #[test]
    fn byte_reaches_parallel_outputs() {
        let mut sr = ShiftRegister::with_pins(PINS, 8);
        let mut frames = DigitalFrames::<BLOCK>::new();
        let mut reg = SimulatedRegister::<8>::new();

        let msg = [true, false, true, true, false, false, true, false];
        let _ = sr.set_data(&msg);
        run_block(&mut sr, &mut frames, &mut reg);

        assert!(sr.data_sent());
        assert_eq!(reg.clock_edges(), 8);
        assert_eq!(reg.latch_edges(), 1);
        assert_eq!(reg.outputs(), &latched::<8>(&msg));
    }

    #[test]
    fn message_spans_several_blocks() {
        let mut sr = ShiftRegister::with_pins(PINS, 24);
        let mut frames = DigitalFrames::<BLOCK>::new();
        let mut reg = SimulatedRegister::<24>::new();

        let _ = sr.set_data_bytes(&[0xA5, 0x0F, 0x81], BitOrder::MsbFirst);

        // 26 ticks: first block ends mid-message
        run_block(&mut sr, &mut frames, &mut reg);
        assert!(!sr.data_sent());
        assert_eq!(sr.state(), TransmitState::Transmitting);
        assert_eq!(reg.clock_edges(), 15);
        // Latch held low: nothing reaches the outputs yet
        assert_eq!(reg.latch_edges(), 0);
        assert_eq!(reg.outputs(), &[false; 24]);

        run_block(&mut sr, &mut frames, &mut reg);
        assert!(sr.data_sent());
        assert_eq!(reg.clock_edges(), 24);
        assert_eq!(reg.latch_edges(), 1);

        let msg: Vec<bool> = [0xA5u8, 0x0F, 0x81]
            .iter()
            .flat_map(|&byte| (0..8).map(move |i| byte & (0x80 >> i) != 0))
            .collect();
        assert_eq!(reg.outputs(), &latched::<24>(&msg));
    }

    #[test]
    fn idle_blocks_leave_outputs_alone() {
        let mut sr = ShiftRegister::with_pins(PINS, 8);
        let mut frames = DigitalFrames::<BLOCK>::new();
        let mut reg = SimulatedRegister::<4>::new();

        let msg = [true, true, false, true];
        let _ = sr.set_data(&msg);
        for _ in 0..5 {
            run_block(&mut sr, &mut frames, &mut reg);
        }
        assert_eq!(reg.clock_edges(), 4);
        assert_eq!(reg.latch_edges(), 1);
        assert_eq!(reg.outputs(), &latched::<4>(&msg));
    }

    #[test]
    fn abandoned_message_is_replaced() {
        let mut sr = ShiftRegister::with_pins(PINS, 32);
        let mut frames = DigitalFrames::<BLOCK>::new();
        let mut reg = SimulatedRegister::<8>::new();

        let _ = sr.set_data(&[true; 32]);
        run_block(&mut sr, &mut frames, &mut reg);
        assert!(!sr.data_sent());
        assert_eq!(reg.latch_edges(), 0);

        let msg = [false, true, false, false, true, true, false, true];
        let _ = sr.set_data(&msg);
        run_block(&mut sr, &mut frames, &mut reg);

        assert!(sr.data_sent());
        // 15 stray bits from the first message, then the full second one
        assert_eq!(reg.clock_edges(), 15 + 8);
        assert_eq!(reg.latch_edges(), 1);
        assert_eq!(reg.outputs(), &latched::<8>(&msg));
    }

    #[test]
    fn back_to_back_messages() {
        let mut sr = ShiftRegister::with_pins(PINS, 8);
        let mut frames = DigitalFrames::<BLOCK>::new();
        let mut reg = SimulatedRegister::<8>::new();

        for byte in [0x01u8, 0xFE, 0x3C] {
            let _ = sr.set_data_bytes(&[byte], BitOrder::LsbFirst);
            while !sr.data_sent() {
                run_block(&mut sr, &mut frames, &mut reg);
            }
            // LSB shifted first lands on Q7, so Q reads the byte reversed
            let expected: [bool; 8] = core::array::from_fn(|i| byte & (0x80 >> i) != 0);
            assert_eq!(reg.outputs(), &expected);
        }
        assert_eq!(reg.latch_edges(), 3);
    }

    #[test]
    fn oversized_message_still_fully_latched() {
        let mut sr = ShiftRegister::with_pins(PINS, 4);
        let mut frames = DigitalFrames::<BLOCK>::new();
        let mut reg = SimulatedRegister::<12>::new();

        let msg: Vec<bool> = (0..12).map(|i| i % 3 == 0).collect();
        let _ = sr.set_data(&msg);
        while !sr.data_sent() {
            run_block(&mut sr, &mut frames, &mut reg);
        }
        assert_eq!(reg.clock_edges(), 12);
        assert_eq!(reg.outputs(), &latched::<12>(&msg));
    }

    #[test]
    fn split_handles_across_threads() {
        const FINAL: [bool; 8] = [true, false, false, true, true, true, false, true];

        let mut sr = ShiftRegister::with_pins(PINS, 8);
        let mut frames = DigitalFrames::<BLOCK>::new();
        let mut reg = SimulatedRegister::<8>::new();
        let done = AtomicBool::new(false);

        {
            let (mut writer, mut tx) = sr.split();
            let done = &done;

            std::thread::scope(|s| {
                s.spawn(move || {
                    for k in 0..500u32 {
                        let byte = (k % 256) as u8;
                        let _ = writer.set_data_bytes(&[byte], BitOrder::MsbFirst);
                        if k % 7 == 0 {
                            std::thread::yield_now();
                        }
                    }
                    let _ = writer.set_data(&FINAL);
                    done.store(true, Ordering::Release);
                });

                loop {
                    let finished = done.load(Ordering::Acquire);
                    tx.process(&mut frames);
                    reg.observe(&frames, PINS);
                    frames.next_block();
                    assert!(tx.cursor() <= 8);
                    if finished && tx.data_sent() {
                        break;
                    }
                }
            });
        }

        assert!(sr.data_sent());
        assert_eq!(reg.outputs(), &latched::<8>(&FINAL));
    }
}
