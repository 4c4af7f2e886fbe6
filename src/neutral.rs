// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Range;

use crate::DirectionClass;

/// Direction a boundary character imposes on adjacent neutrals; numbers count as right-to-left
#[inline]
fn boundary_direction(class: DirectionClass) -> Option<DirectionClass> {
    match class {
        DirectionClass::Left => Some(DirectionClass::Left),
        DirectionClass::Right
        | DirectionClass::ArabicLetter
        | DirectionClass::ArabicNumber
        | DirectionClass::EuropeanNumber => Some(DirectionClass::Right),
        _ => None,
    }
}

/// Resolve a span of neutral characters to `Left` or `Right`, rules N1 and N2.
///
/// `before` and `after` are the resolved classes on either side of the span (or the run's
/// sor/eor). When both impose the same direction the span takes it, otherwise it takes the
/// embedding direction of `level`.
///
/// Returns `false` without writing anything if the span holds a class that is not neutral.
pub fn resolve_neutral_run(
    classes: &mut [DirectionClass],
    range: Range<usize>,
    before: DirectionClass,
    after: DirectionClass,
    level: u8,
) -> bool {
    if let Some(fixed) = classes[range.clone()].iter().find(|class| class.is_fixed()) {
        debug_assert!(false, "{:?} cannot be resolved as a neutral", fixed);
        log::warn!("refusing to resolve {:?} as a neutral", fixed);
        return false;
    }

    let class = match (boundary_direction(before), boundary_direction(after)) {
        (Some(before), Some(after)) if before == after => before,
        _ => DirectionClass::for_level(level),
    };
    classes[range].fill(class);
    true
}
