// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static tables driving weak-type resolution (W1-W7), implicit levels (I1, I2) and the
//! unidirectional fast path.
//!
//! Columns of the state machine tables follow the first eleven [`DirectionClass`] variants:
//! `L R AN EN AL ES CS ET NSM BN N`.

use crate::class::{CLASS_COUNT, MACHINE_CLASS_COUNT};
use crate::DirectionClass;

/// Context of the weak-type state machine: what the previous significant character was
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub(crate) enum State {
    /// After a left-to-right letter
    L,
    /// After an Arabic letter
    AL,
    /// After a right-to-left letter
    R,
    /// After an Arabic number
    AN,
    /// After a European number
    EN,
    /// Inside a run of European terminators that may still become numbers
    ET,
    /// After an Arabic number and a single common separator
    ANfCS,
    /// After a European number and a single separator
    ENfCS,
    /// Inside a run of neutrals
    N,
}

pub(crate) const STATE_COUNT: usize = 9;

/// What to do with the incoming character
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Action {
    /// Resolve a strong or number character, settling everything pending before it as neutral
    Resolve,
    /// Resolve a number that completes the pending separator or terminator run (W4, W5)
    ResolveSeparated,
    /// The character is neutral; pending weak characters become neutral too (W6)
    Neutral,
    /// A separator directly after a number; hold it until the next character (W4)
    Separator,
    /// Start a run of terminators that may precede a European number (W5)
    Terminator,
    /// A terminator directly after a European number becomes one (W5)
    TerminatorAfterNumber,
    /// Take the class of the previous character (W1 for marks, retained boundary neutrals)
    Mark,
    /// Join the pending run unchanged
    Extend,
}

use Action::{
    Extend as XT, Mark as MK, Neutral as NE, Resolve as RS, ResolveSeparated as RN,
    Separator as SP, Terminator as TM, TerminatorAfterNumber as TN,
};

#[rustfmt::skip]
pub(crate) static ACTION: [[Action; MACHINE_CLASS_COUNT]; STATE_COUNT] = [
    //          L   R   AN  EN  AL  ES  CS  ET  NSM BN  N
    /* L */    [RS, RS, RS, RS, RS, NE, NE, TM, MK, MK, NE],
    /* AL */   [RS, RS, RS, RS, RS, NE, NE, TM, MK, MK, NE],
    /* R */    [RS, RS, RS, RS, RS, NE, NE, TM, MK, MK, NE],
    /* AN */   [RS, RS, RS, RS, RS, NE, SP, TM, MK, MK, NE],
    /* EN */   [RS, RS, RS, RS, RS, SP, SP, TN, MK, MK, NE],
    /* ET */   [RS, RS, RS, RN, RS, NE, NE, XT, XT, XT, NE],
    /* ANfCS */[RS, RS, RN, RS, RS, NE, NE, TM, NE, XT, NE],
    /* ENfCS */[RS, RS, RS, RN, RS, NE, NE, TM, NE, XT, NE],
    /* N */    [RS, RS, RS, RS, RS, NE, NE, TM, NE, NE, NE],
];

use State::{ANfCS, ENfCS, AL as SAL, AN as SAN, EN as SEN, ET as SET, L as SL, N as SN, R as SR};

#[rustfmt::skip]
pub(crate) static NEXT_STATE: [[State; MACHINE_CLASS_COUNT]; STATE_COUNT] = [
    //          L    R    AN   EN   AL   ES     CS     ET   NSM  BN     N
    /* L */    [SL, SR, SAN, SEN, SAL, SN,    SN,    SET, SL,  SL,    SN],
    /* AL */   [SL, SR, SAN, SEN, SAL, SN,    SN,    SET, SAL, SAL,   SN],
    /* R */    [SL, SR, SAN, SEN, SAL, SN,    SN,    SET, SR,  SR,    SN],
    /* AN */   [SL, SR, SAN, SEN, SAL, SN,    ANfCS, SET, SAN, SAN,   SN],
    /* EN */   [SL, SR, SAN, SEN, SAL, ENfCS, ENfCS, SEN, SEN, SEN,   SN],
    /* ET */   [SL, SR, SAN, SEN, SAL, SN,    SN,    SET, SET, SET,   SN],
    /* ANfCS */[SL, SR, SAN, SEN, SAL, SN,    SN,    SET, SN,  ANfCS, SN],
    /* ENfCS */[SL, SR, SAN, SEN, SAL, SN,    SN,    SET, SN,  ENfCS, SN],
    /* N */    [SL, SR, SAN, SEN, SAL, SN,    SN,    SET, SN,  SN,    SN],
];

/// State to start from when the preceding character had the given class
#[rustfmt::skip]
pub(crate) static CLASS_TO_STATE: [State; CLASS_COUNT] = [
    /* Left */ SL, /* Right */ SR, /* ArabicNumber */ SAN, /* EuropeanNumber */ SEN,
    /* ArabicLetter */ SAL, /* EuropeanSeparator */ SN, /* CommonSeparator */ SN,
    /* EuropeanTerminator */ SET, /* NonSpacingMark */ SN, /* BoundaryNeutral */ SN,
    /* GenericNeutral */ SN, /* ParagraphSeparator */ SN, /* LeftToRightEmbedding */ SN,
    /* LeftToRightOverride */ SN, /* RightToLeftEmbedding */ SN, /* RightToLeftOverride */ SN,
    /* PopDirectionalFormat */ SN, /* SegmentSeparator */ SN, /* WhiteSpace */ SN,
    /* OtherNeutral */ SN, /* Invalid */ SN,
];

/// How the fast path treats a class
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FastClass {
    Left,
    Right,
    Neutral,
    Paragraph,
    /// Needs the general path
    Slow,
}

use FastClass::{Left as FL, Neutral as FN, Paragraph as FP, Right as FR, Slow as FX};

#[rustfmt::skip]
pub(crate) static FAST_PATH_CLASS: [FastClass; CLASS_COUNT] = [
    /* Left */ FL, /* Right */ FR, /* ArabicNumber */ FX, /* EuropeanNumber */ FX,
    /* ArabicLetter */ FR, /* EuropeanSeparator */ FX, /* CommonSeparator */ FX,
    /* EuropeanTerminator */ FX, /* NonSpacingMark */ FX, /* BoundaryNeutral */ FX,
    /* GenericNeutral */ FN, /* ParagraphSeparator */ FP, /* LeftToRightEmbedding */ FX,
    /* LeftToRightOverride */ FX, /* RightToLeftEmbedding */ FX, /* RightToLeftOverride */ FX,
    /* PopDirectionalFormat */ FX, /* SegmentSeparator */ FN, /* WhiteSpace */ FN,
    /* OtherNeutral */ FN, /* Invalid */ FX,
];

/// Level increase per level parity (even, odd) and final class (`L R AN EN`), rules I1 and I2
#[rustfmt::skip]
pub(crate) static IMPLICIT_PUSH: [[u8; 4]; 2] = [
    //  L  R  AN EN
    [0, 1, 2, 2],
    [1, 0, 1, 1],
];

#[inline]
pub(crate) fn action(state: State, class: DirectionClass) -> Action {
    ACTION[state as usize][class as usize]
}

#[inline]
pub(crate) fn next_state(state: State, class: DirectionClass) -> State {
    NEXT_STATE[state as usize][class as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_agree_on_strong_columns() {
        // Every state moves to the state of a strong or number character it resolves
        for row in 0..STATE_COUNT {
            for class in [
                DirectionClass::Left,
                DirectionClass::Right,
                DirectionClass::ArabicNumber,
                DirectionClass::EuropeanNumber,
                DirectionClass::ArabicLetter,
            ] {
                assert_eq!(NEXT_STATE[row][class as usize], CLASS_TO_STATE[class as usize]);
                assert!(matches!(
                    ACTION[row][class as usize],
                    Action::Resolve | Action::ResolveSeparated
                ));
            }
        }
    }

    #[test]
    fn implicit_push() {
        assert_eq!(IMPLICIT_PUSH[0], [0, 1, 2, 2]);
        assert_eq!(IMPLICIT_PUSH[1], [1, 0, 1, 1]);
    }
}
