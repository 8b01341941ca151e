/// Default message capacity in bits (one 8-bit register).
pub const DEFAULT_MAX_BITS: usize = 8;

/// Number of digital channels in the simulated host buffer.
pub const DIGITAL_CHANNELS: usize = 16;

/// Bit offset of the channel levels within a packed digital frame word.
/// The lower [`DIGITAL_CHANNELS`] bits hold the pin directions (1 = input).
pub const DIGITAL_LEVEL_SHIFT: u32 = 16;
