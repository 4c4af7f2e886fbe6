// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visual order of one line from its resolved levels (L2).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::ops::Range;

/// Spans of equal level, in visual order.
///
/// Apply this to one line at a time. A span at an odd level is displayed right to left.
pub fn visual_runs(levels: &[u8]) -> Vec<Range<usize>> {
    let mut runs: Vec<(Range<usize>, u8)> = Vec::new();
    let mut start = 0;
    for i in 1..=levels.len() {
        if i == levels.len() || levels[i] != levels[start] {
            runs.push((start..i, levels[start]));
            start = i;
        }
    }

    let Some(highest) = runs.iter().map(|(_, level)| *level).max() else {
        return Vec::new();
    };
    let Some(lowest_odd) = runs
        .iter()
        .map(|(_, level)| *level)
        .filter(|level| level & 1 == 1)
        .min()
    else {
        return runs.into_iter().map(|(range, _)| range).collect();
    };

    // From the highest level down, reverse every sequence of runs at that level or above
    for level in (lowest_odd..=highest).rev() {
        let mut i = 0;
        while i < runs.len() {
            if runs[i].1 < level {
                i += 1;
                continue;
            }
            let start = i;
            while i < runs.len() && runs[i].1 >= level {
                i += 1;
            }
            runs[start..i].reverse();
        }
    }
    runs.into_iter().map(|(range, _)| range).collect()
}

/// Logical index of each code unit, in visual order.
///
/// Code units are reordered individually, so a surrogate pair in a right-to-left run comes out
/// low half first.
pub fn reorder_visual(levels: &[u8]) -> Vec<usize> {
    let mut order = Vec::with_capacity(levels.len());
    for range in visual_runs(levels) {
        if levels[range.start] & 1 == 1 {
            order.extend(range.rev());
        } else {
            order.extend(range);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_direction() {
        assert_eq!(reorder_visual(&[0, 0, 0]), [0, 1, 2]);
        assert_eq!(reorder_visual(&[1, 1, 1]), [2, 1, 0]);
        assert_eq!(reorder_visual(&[2, 2]), [0, 1]);
        assert!(reorder_visual(&[]).is_empty());
    }

    #[test]
    fn mixed() {
        assert_eq!(reorder_visual(&[0, 0, 1, 1, 0]), [0, 1, 3, 2, 4]);
        assert_eq!(reorder_visual(&[0, 1, 2, 1, 0]), [0, 3, 2, 1, 4]);
        // Numbers inside right-to-left text keep their order
        assert_eq!(reorder_visual(&[1, 1, 2, 2, 1]), [4, 2, 3, 1, 0]);
    }

    #[test]
    fn runs() {
        assert_eq!(visual_runs(&[0, 0, 1, 1, 0]), [0..2, 2..4, 4..5]);
        assert_eq!(visual_runs(&[1, 2, 2, 1]), [3..4, 1..3, 0..1]);
    }
}
