use std::{fmt, fmt::Formatter};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RomSlice {
    pub begin: usize,
    pub size:  usize,
}

impl RomSlice {
    pub const fn new(begin: usize, size: usize) -> Self {
        Self { begin, size }
    }

    /// `None` when the end does not fit in the address space.
    pub fn end(&self) -> Option<usize> {
        self.begin.checked_add(self.size)
    }

    /// Moves the slice forward by `lengths` of its own size, for walking a table of equally
    /// sized records.
    #[must_use]
    pub fn skip_forward(self, lengths: usize) -> Self {
        Self { begin: self.begin.saturating_add(self.size.saturating_mul(lengths)), ..self }
    }
}

impl fmt::Display for RomSlice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "RomSlice {{ begin: ${:06X}, size: {} }}", self.begin, self.size)
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::RomSlice;

    #[test]
    fn test_skip_forward_walks_records() {
        let slice = RomSlice::new(0x12EF26, 512);
        assert_eq!(slice.skip_forward(2), RomSlice::new(0x12EF26 + 1024, 512));
        assert_eq!(slice.skip_forward(0), slice);
    }

    #[test]
    fn test_display() {
        assert_eq!(RomSlice::new(0x15A52A, 16).to_string(), "RomSlice { begin: $15A52A, size: 16 }");
    }
}
