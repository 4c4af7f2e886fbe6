// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Range;

use crate::class::{is_high_surrogate, is_low_surrogate};
use crate::tables::IMPLICIT_PUSH;
use crate::DirectionClass;

/// Level that marks a paragraph separator until [`restore_paragraph_levels`] runs
pub const PARAGRAPH_TERMINATOR_LEVEL: u8 = 255;

#[inline]
fn class_bucket(class: DirectionClass) -> Option<usize> {
    match class {
        DirectionClass::Left => Some(0),
        DirectionClass::Right => Some(1),
        DirectionClass::ArabicNumber => Some(2),
        DirectionClass::EuropeanNumber => Some(3),
        _ => None,
    }
}

/// Turn resolved classes into final levels over `range`, rules I1, I2 and the separator part
/// of L1.
///
/// `original` holds the classes before explicit processing; segment separators in it are set to
/// `base_level`. The range is scanned from the end so both halves of a surrogate pair are
/// assigned together.
pub fn resolve_implicit_levels(
    text: &[u16],
    classes: &[DirectionClass],
    original: &[DirectionClass],
    levels: &mut [u8],
    range: Range<usize>,
    base_level: u8,
) {
    let mut i = range.end;
    while i > range.start {
        i -= 1;
        let level = if original[i] == DirectionClass::SegmentSeparator {
            base_level
        } else if let Some(bucket) = class_bucket(classes[i]) {
            levels[i] + IMPLICIT_PUSH[(levels[i] & 1) as usize][bucket]
        } else {
            debug_assert!(false, "unresolved {:?} at {}", classes[i], i);
            levels[i]
        };
        levels[i] = level;
        if i > range.start && is_low_surrogate(text[i]) && is_high_surrogate(text[i - 1]) {
            i -= 1;
            levels[i] = level;
        }
    }
}

/// Give paragraph separators the paragraph level (L1)
pub fn restore_paragraph_levels(levels: &mut [u8], base_level: u8) {
    for level in levels
        .iter_mut()
        .filter(|level| **level == PARAGRAPH_TERMINATOR_LEVEL)
    {
        *level = base_level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DirectionClass::*;

    #[test]
    fn pushes() {
        let text = [0u16; 4];
        let classes = [Left, Right, ArabicNumber, EuropeanNumber];
        let mut levels = [0; 4];
        resolve_implicit_levels(&text, &classes, &classes, &mut levels, 0..4, 0);
        assert_eq!(levels, [0, 1, 2, 2]);

        let mut levels = [1; 4];
        resolve_implicit_levels(&text, &classes, &classes, &mut levels, 0..4, 1);
        assert_eq!(levels, [2, 1, 2, 2]);
    }

    #[test]
    fn segment_separator_resets() {
        let text = [0u16; 3];
        let classes = [Right, Right, Right];
        let original = [Right, SegmentSeparator, Right];
        let mut levels = [2; 3];
        resolve_implicit_levels(&text, &classes, &original, &mut levels, 0..3, 0);
        assert_eq!(levels, [3, 0, 3]);
    }

    #[test]
    fn terminator_levels() {
        let mut levels = [0, PARAGRAPH_TERMINATOR_LEVEL, 1];
        restore_paragraph_levels(&mut levels, 1);
        assert_eq!(levels, [0, 1, 1]);
    }
}
