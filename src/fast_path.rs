// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::tables::{FastClass, FAST_PATH_CLASS};
use crate::DirectionClass;

/// Resolve text made only of letters and neutrals without the state machine.
///
/// Every character ends up at `base_level` or one above it. Neutrals take the level above only
/// when both neighbouring strong characters are of the direction opposite to the paragraph.
/// `last_strong` is the strong class assumed before the text.
///
/// Returns the strong class in effect at the end, or `None` as soon as a class is found that
/// needs the general path; `classes` and `levels` are then only partly written.
pub fn resolve_fast_path(
    classes: &mut [DirectionClass],
    levels: &mut [u8],
    base_level: u8,
    last_strong: DirectionClass,
) -> Option<DirectionClass> {
    let base_class = DirectionClass::for_level(base_level);
    let flip_level = base_level + 1;
    let mut last_strong = last_strong;
    let mut neutral_start: Option<usize> = None;

    let flush = |classes: &mut [DirectionClass],
                 levels: &mut [u8],
                 start: usize,
                 end: usize,
                 before: DirectionClass,
                 after: DirectionClass| {
        let (class, level) = if before == after && before != base_class {
            (before, flip_level)
        } else {
            (base_class, base_level)
        };
        for i in start..end {
            // L1
            levels[i] = if classes[i] == DirectionClass::SegmentSeparator {
                base_level
            } else {
                level
            };
            classes[i] = class;
        }
    };

    for i in 0..classes.len() {
        let class = classes[i];
        match FAST_PATH_CLASS[class as usize] {
            FastClass::Left | FastClass::Right => {
                let strong = if FAST_PATH_CLASS[class as usize] == FastClass::Left {
                    DirectionClass::Left
                } else {
                    DirectionClass::Right
                };
                if let Some(start) = neutral_start.take() {
                    flush(classes, levels, start, i, direction(last_strong), strong);
                }
                classes[i] = strong;
                levels[i] = if strong == base_class {
                    base_level
                } else {
                    flip_level
                };
                last_strong = class;
            }
            FastClass::Neutral => {
                neutral_start.get_or_insert(i);
            }
            FastClass::Paragraph => {
                if let Some(start) = neutral_start.take() {
                    flush(classes, levels, start, i, direction(last_strong), base_class);
                }
                levels[i] = base_level;
                last_strong = base_class;
            }
            FastClass::Slow => {
                log::debug!("fast path stopped at {} by {:?}", i, class);
                return None;
            }
        }
    }
    if let Some(start) = neutral_start {
        flush(classes, levels, start, classes.len(), direction(last_strong), base_class);
    }
    Some(last_strong)
}

#[inline]
fn direction(class: DirectionClass) -> DirectionClass {
    if class == DirectionClass::Left {
        DirectionClass::Left
    } else {
        DirectionClass::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(feature = "std"))]
    use alloc::{vec, vec::Vec};
    use DirectionClass::*;

    fn fast(
        classes: &[DirectionClass],
        base_level: u8,
    ) -> Option<(Vec<DirectionClass>, Vec<u8>)> {
        let mut classes = classes.to_vec();
        let mut levels = vec![base_level; classes.len()];
        resolve_fast_path(
            &mut classes,
            &mut levels,
            base_level,
            DirectionClass::for_level(base_level),
        )?;
        Some((classes, levels))
    }

    #[test]
    fn neutrals_between_opposite_letters() {
        let (_, levels) =
            fast(&[Left, WhiteSpace, Right, OtherNeutral, Right, WhiteSpace], 0).unwrap();
        assert_eq!(levels, [0, 0, 1, 1, 1, 0]);

        let (classes, levels) = fast(&[Left, WhiteSpace, Left, Right], 1).unwrap();
        assert_eq!(levels, [2, 2, 2, 1]);
        assert_eq!(classes[1], Left);
    }

    #[test]
    fn separator_keeps_paragraph_level() {
        let (classes, levels) = fast(&[Right, SegmentSeparator, Right], 0).unwrap();
        assert_eq!(levels, [1, 0, 1]);
        assert_eq!(classes[1], Right);
    }

    #[test]
    fn paragraph_restarts_context() {
        let (_, levels) = fast(&[Right, ParagraphSeparator, WhiteSpace, Right], 0).unwrap();
        assert_eq!(levels, [1, 0, 0, 1]);
    }

    #[test]
    fn bails_on_numbers() {
        assert!(fast(&[Left, EuropeanNumber], 0).is_none());
        assert!(fast(&[Right, NonSpacingMark], 1).is_none());
        assert!(fast(&[LeftToRightEmbedding], 0).is_none());
    }
}
