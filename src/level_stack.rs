// SPDX-License-Identifier: MIT OR Apache-2.0

/// Highest embedding level explicit controls may reach.
pub const MAX_LEVEL: u8 = 61;

/// Stack of active embedding levels, stored as one bit per level.
///
/// Bit `n` is set when level `n` is on the stack. Levels only ever increase towards the top, so
/// the current level is the highest set bit and the paragraph level is the lowest.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LevelStack {
    bits: u64,
}

impl LevelStack {
    /// Create a stack holding only `level`, or `None` if `level` is above [`MAX_LEVEL`]
    pub fn new(level: u8) -> Option<Self> {
        let mut stack = Self { bits: 0 };
        stack.init(level).then_some(stack)
    }

    /// Restore a stack from [`Self::raw_bits`], or `None` if the bits describe no valid stack
    pub fn from_bits(bits: u64) -> Option<Self> {
        if bits == 0 || 63 - bits.leading_zeros() > MAX_LEVEL as u32 {
            return None;
        }
        Some(Self { bits })
    }

    /// Reset the stack to hold only `level`.
    ///
    /// Returns `false` and leaves the stack unchanged if `level` is above [`MAX_LEVEL`].
    pub fn init(&mut self, level: u8) -> bool {
        if level > MAX_LEVEL {
            return false;
        }
        self.bits = 1 << level;
        true
    }

    /// Push the least level greater than the current one with the requested parity.
    ///
    /// Returns `false` and leaves the stack unchanged if that level would exceed [`MAX_LEVEL`].
    pub fn push(&mut self, to_greater_even: bool) -> bool {
        let current = self.current_level();
        let next = if to_greater_even {
            (current + 2) & !1
        } else {
            (current + 1) | 1
        };
        if next > MAX_LEVEL {
            return false;
        }
        self.bits |= 1 << next;
        true
    }

    /// Pop the current level.
    ///
    /// Returns `false` if only the bottom level remains.
    pub fn pop(&mut self) -> bool {
        if self.bits.count_ones() <= 1 {
            return false;
        }
        self.bits &= !(1 << self.current_level());
        true
    }

    /// Level at the top of the stack
    #[inline]
    pub fn current_level(&self) -> u8 {
        (63 - self.bits.leading_zeros()) as u8
    }

    /// Level at the bottom of the stack, the paragraph level
    #[inline]
    pub fn bottom_level(&self) -> u8 {
        self.bits.trailing_zeros() as u8
    }

    #[inline]
    pub fn raw_bits(&self) -> u64 {
        self.bits
    }
}
