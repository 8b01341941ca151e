/// Order in which the bits of each byte are shifted out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Bit 7 first.
    MsbFirst,
    /// Bit 0 first.
    LsbFirst,
}

/// Iterator over the bits of a byte slice.
pub(crate) struct ByteBits<'a> {
    bytes: &'a [u8],
    order: BitOrder,
    /// Index of the next bit across the whole slice.
    pos: usize,
}

impl<'a> ByteBits<'a> {
    pub(crate) fn new(bytes: &'a [u8], order: BitOrder) -> Self {
        ByteBits { bytes, order, pos: 0 }
    }
}

impl Iterator for ByteBits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let byte = *self.bytes.get(self.pos / 8)?;
        let i = self.pos % 8;
        self.pos += 1;
        let bit = match self.order {
            BitOrder::MsbFirst => (byte >> (7 - i)) & 1,
            BitOrder::LsbFirst => (byte >> i) & 1,
        };
        Some(bit != 0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() * 8 - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ByteBits<'_> {}
