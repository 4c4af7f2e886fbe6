// SPDX-License-Identifier: MIT OR Apache-2.0

use unicode_bidi::{bidi_class, BidiClass};

/// Code unit marking a hidden character.
///
/// Hidden characters never introduce a level transition of their own, they take the class of
/// the surrounding text instead.
pub const CHAR_HIDDEN: u16 = 0xFFFF;

/// Bidirectional character class of a single code point.
///
/// The first eleven variants, [`Left`](Self::Left) through
/// [`GenericNeutral`](Self::GenericNeutral), are the classes the weak-type state machine accepts,
/// in table column order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DirectionClass {
    Left,
    Right,
    ArabicNumber,
    EuropeanNumber,
    ArabicLetter,
    EuropeanSeparator,
    CommonSeparator,
    EuropeanTerminator,
    NonSpacingMark,
    BoundaryNeutral,
    GenericNeutral,
    ParagraphSeparator,
    LeftToRightEmbedding,
    LeftToRightOverride,
    RightToLeftEmbedding,
    RightToLeftOverride,
    PopDirectionalFormat,
    SegmentSeparator,
    WhiteSpace,
    OtherNeutral,
    /// No class; also marks an absent number class in [`AnalysisState`](crate::AnalysisState)
    Invalid,
}

/// Number of [`DirectionClass`] variants
pub const CLASS_COUNT: usize = 21;

/// Number of classes with a column in the weak-type state machine
pub const MACHINE_CLASS_COUNT: usize = 11;

const STRONG: u8 = 1 << 0;
const STRONG_OR_NUMBER: u8 = 1 << 1;
const FIXED: u8 = 1 << 2;
const FINAL: u8 = 1 << 3;
const NUMBER: u8 = 1 << 4;
const RESOLVABLE: u8 = 1 << 5;

/// Category bits per class, indexed by `DirectionClass as usize`.
static CHAR_PROPERTY: [u8; CLASS_COUNT] = [
    /* Left */ STRONG | STRONG_OR_NUMBER | FIXED | FINAL,
    /* Right */ STRONG | STRONG_OR_NUMBER | FIXED | FINAL,
    /* ArabicNumber */ STRONG_OR_NUMBER | FIXED | FINAL | NUMBER,
    /* EuropeanNumber */ STRONG_OR_NUMBER | FIXED | FINAL | NUMBER,
    /* ArabicLetter */ STRONG | STRONG_OR_NUMBER | FIXED,
    /* EuropeanSeparator */ RESOLVABLE,
    /* CommonSeparator */ RESOLVABLE,
    /* EuropeanTerminator */ RESOLVABLE,
    /* NonSpacingMark */ RESOLVABLE,
    /* BoundaryNeutral */ RESOLVABLE,
    /* GenericNeutral */ RESOLVABLE,
    /* ParagraphSeparator */ FIXED,
    /* LeftToRightEmbedding */ 0,
    /* LeftToRightOverride */ 0,
    /* RightToLeftEmbedding */ 0,
    /* RightToLeftOverride */ 0,
    /* PopDirectionalFormat */ 0,
    /* SegmentSeparator */ RESOLVABLE,
    /* WhiteSpace */ RESOLVABLE,
    /* OtherNeutral */ RESOLVABLE,
    /* Invalid */ 0,
];

impl DirectionClass {
    #[inline]
    fn has(self, property: u8) -> bool {
        CHAR_PROPERTY[self as usize] & property != 0
    }

    /// `Left`, `Right` or `ArabicLetter`
    #[inline]
    pub fn is_strong(self) -> bool {
        self.has(STRONG)
    }

    /// A strong class or one of the two number classes
    #[inline]
    pub fn is_strong_or_number(self) -> bool {
        self.has(STRONG_OR_NUMBER)
    }

    /// Classes that neutral resolution must never overwrite
    #[inline]
    pub fn is_fixed(self) -> bool {
        self.has(FIXED)
    }

    /// Classes implicit level resolution accepts: `Left`, `Right` and the numbers
    #[inline]
    pub fn is_final(self) -> bool {
        self.has(FINAL)
    }

    #[inline]
    pub fn is_number(self) -> bool {
        self.has(NUMBER)
    }

    /// Weak and neutral classes that rules N1 and N2 may rewrite
    #[inline]
    pub fn is_resolvable(self) -> bool {
        self.has(RESOLVABLE)
    }

    /// One of the embedding, override or pop controls
    #[inline]
    pub fn is_explicit_control(self) -> bool {
        matches!(
            self,
            Self::LeftToRightEmbedding
                | Self::LeftToRightOverride
                | Self::RightToLeftEmbedding
                | Self::RightToLeftOverride
                | Self::PopDirectionalFormat
        )
    }

    /// Strong class matching the parity of `level`
    #[inline]
    pub fn for_level(level: u8) -> Self {
        if level & 1 == 0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Look up the raw bidirectional class of a code point.
///
/// Isolate controls are classified as [`DirectionClass::OtherNeutral`], as are values that are
/// not Unicode scalar values.
pub fn classify(codepoint: u32) -> DirectionClass {
    let Some(c) = char::from_u32(codepoint) else {
        return DirectionClass::OtherNeutral;
    };
    match bidi_class(c) {
        BidiClass::L => DirectionClass::Left,
        BidiClass::R => DirectionClass::Right,
        BidiClass::AL => DirectionClass::ArabicLetter,
        BidiClass::EN => DirectionClass::EuropeanNumber,
        BidiClass::ES => DirectionClass::EuropeanSeparator,
        BidiClass::ET => DirectionClass::EuropeanTerminator,
        BidiClass::AN => DirectionClass::ArabicNumber,
        BidiClass::CS => DirectionClass::CommonSeparator,
        BidiClass::NSM => DirectionClass::NonSpacingMark,
        BidiClass::BN => DirectionClass::BoundaryNeutral,
        BidiClass::B => DirectionClass::ParagraphSeparator,
        BidiClass::S => DirectionClass::SegmentSeparator,
        BidiClass::WS => DirectionClass::WhiteSpace,
        BidiClass::ON => DirectionClass::OtherNeutral,
        BidiClass::LRE => DirectionClass::LeftToRightEmbedding,
        BidiClass::LRO => DirectionClass::LeftToRightOverride,
        BidiClass::RLE => DirectionClass::RightToLeftEmbedding,
        BidiClass::RLO => DirectionClass::RightToLeftOverride,
        BidiClass::PDF => DirectionClass::PopDirectionalFormat,
        // LRI, RLI, FSI and PDI
        _ => DirectionClass::OtherNeutral,
    }
}

#[inline]
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

#[inline]
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

/// Decode the code point starting at `index`, returning it with the number of code units used.
///
/// Unpaired surrogates are returned as-is with a length of one.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
pub fn decode_codepoint(buffer: &[u16], index: usize) -> (u32, usize) {
    let unit = buffer[index];
    if is_high_surrogate(unit) {
        if let Some(&low) = buffer.get(index + 1) {
            if is_low_surrogate(low) {
                let codepoint = 0x10000 + (((unit as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
                return (codepoint, 2);
            }
        }
    }
    (unit as u32, 1)
}

/// Classify every code unit of `text`; both halves of a surrogate pair get the pair's class.
pub fn classify_text(text: &[u16]) -> alloc::vec::Vec<DirectionClass> {
    let mut classes = alloc::vec![DirectionClass::Invalid; text.len()];
    let mut i = 0;
    while i < text.len() {
        let (codepoint, units) = decode_codepoint(text, i);
        let class = classify(codepoint);
        classes[i..i + units].fill(class);
        i += units;
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_basic() {
        assert_eq!(classify('a' as u32), DirectionClass::Left);
        assert_eq!(classify(0x05D0), DirectionClass::Right);
        assert_eq!(classify(0x0627), DirectionClass::ArabicLetter);
        assert_eq!(classify('1' as u32), DirectionClass::EuropeanNumber);
        assert_eq!(classify(0x0661), DirectionClass::ArabicNumber);
        assert_eq!(classify(' ' as u32), DirectionClass::WhiteSpace);
        assert_eq!(classify('\n' as u32), DirectionClass::ParagraphSeparator);
        assert_eq!(classify('\t' as u32), DirectionClass::SegmentSeparator);
        assert_eq!(classify(0x202A), DirectionClass::LeftToRightEmbedding);
        assert_eq!(classify(0x202C), DirectionClass::PopDirectionalFormat);
        // Isolates are not part of this algorithm revision
        assert_eq!(classify(0x2066), DirectionClass::OtherNeutral);
        assert_eq!(classify(0xD800), DirectionClass::OtherNeutral);
    }

    #[test]
    fn decode_pairs() {
        let text: alloc::vec::Vec<u16> = "a\u{10900}".encode_utf16().collect();
        assert_eq!(decode_codepoint(&text, 0), ('a' as u32, 1));
        assert_eq!(decode_codepoint(&text, 1), (0x10900, 2));
        // Lone low surrogate
        assert_eq!(decode_codepoint(&text, 2), (text[2] as u32, 1));
        // Truncated pair
        assert_eq!(decode_codepoint(&text[..2], 1), (text[1] as u32, 1));
    }

    #[test]
    fn pair_shares_class() {
        // U+10900 PHOENICIAN LETTER ALF is strong R
        let text: alloc::vec::Vec<u16> = "\u{10900}b".encode_utf16().collect();
        let classes = classify_text(&text);
        assert_eq!(
            classes,
            [DirectionClass::Right, DirectionClass::Right, DirectionClass::Left]
        );
    }

    #[test]
    fn properties() {
        use DirectionClass::*;
        assert!(ArabicLetter.is_strong());
        assert!(!ArabicNumber.is_strong());
        assert!(ArabicNumber.is_strong_or_number());
        assert!(EuropeanNumber.is_number());
        assert!(!ArabicLetter.is_final());
        assert!(WhiteSpace.is_resolvable());
        assert!(!Left.is_resolvable());
        assert!(ParagraphSeparator.is_fixed());
        assert!(RightToLeftOverride.is_explicit_control());
        assert_eq!(DirectionClass::for_level(3), Right);
    }

    #[test]
    #[should_panic]
    fn decode_past_the_end() {
        decode_codepoint(&[0x61], 1);
    }
}
