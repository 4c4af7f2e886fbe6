// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{DirectionClass, LevelStack};

bitflags::bitflags! {
    /// Flags controlling a call to [`analyze`](crate::analyze)
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[repr(transparent)]
    pub struct AnalysisFlags: u16 {
        /// Paragraphs are right-to-left (level 1). Without this or `FIRST_STRONG` they are
        /// left-to-right (level 0).
        const RIGHT_TO_LEFT = 1 << 0;
        /// Take the paragraph direction from the first strong character
        const FIRST_STRONG = 1 << 1;
        /// Resolve as if the text were preceded by an Arabic letter
        const PREVIOUS_STRONG_IS_ARABIC = 1 << 2;
        /// Resume from the supplied [`AnalysisState`]; direction flags are ignored
        const CONTINUE_ANALYSIS = 1 << 3;
        /// More text follows; context-dependent characters at the end are left unresolved
        const INCOMPLETE_TEXT = 1 << 4;
        /// Stop at the first safe boundary after `max_hint`
        const MAXIMUM_HINT = 1 << 5;
        /// Treat embedding and override controls as boundary neutrals without stack effect
        const IGNORE_DIRECTIONAL_CONTROLS = 1 << 6;
        /// Keep European numbers as given instead of converting them after Arabic letters
        const OVERRIDE_EUROPEAN_NUMBER = 1 << 7;
    }
}

/// Everything needed to resume analysis where a previous call stopped.
///
/// Create one with [`AnalysisState::new`] (or `Default` for a left-to-right paragraph) before
/// the first call, then pass the same value to every following call.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisState {
    level_stack: u64,
    override_levels: u64,
    overflow: u16,
    last_strong_class: DirectionClass,
    last_number_class: DirectionClass,
    hidden_class: DirectionClass,
}

impl AnalysisState {
    /// State at the start of a paragraph with the given base level
    pub fn new(base_level: u8) -> Self {
        let base_level = base_level & 1;
        Self {
            level_stack: 1 << base_level,
            override_levels: 0,
            overflow: 0,
            last_strong_class: DirectionClass::for_level(base_level),
            last_number_class: DirectionClass::Invalid,
            hidden_class: DirectionClass::Invalid,
        }
    }

    pub(crate) fn from_parts(
        stack: LevelStack,
        override_levels: u64,
        overflow: u16,
        last_strong_class: DirectionClass,
        last_number_class: Option<DirectionClass>,
    ) -> Self {
        Self {
            level_stack: stack.raw_bits(),
            override_levels,
            overflow,
            last_strong_class,
            last_number_class: last_number_class.unwrap_or(DirectionClass::Invalid),
            hidden_class: DirectionClass::Invalid,
        }
    }

    pub(crate) fn with_hidden_class(mut self, class: Option<DirectionClass>) -> Self {
        self.hidden_class = class.unwrap_or(DirectionClass::Invalid);
        self
    }

    /// Bits of the saved [`LevelStack`]
    pub fn level_stack_bits(&self) -> u64 {
        self.level_stack
    }

    /// One bit per level pushed by an override control
    pub fn override_levels_bits(&self) -> u64 {
        self.override_levels
    }

    /// Embedding controls beyond [`MAX_LEVEL`](crate::MAX_LEVEL) not yet matched by a pop
    pub fn overflow_count(&self) -> u16 {
        self.overflow
    }

    pub fn level_stack(&self) -> Option<LevelStack> {
        LevelStack::from_bits(self.level_stack)
    }

    /// Paragraph level the state belongs to
    pub fn base_level(&self) -> u8 {
        self.level_stack.trailing_zeros() as u8
    }

    /// Strong class of the last resolved strong character: `Left`, `Right` or `ArabicLetter`
    pub fn last_strong_class(&self) -> DirectionClass {
        self.last_strong_class
    }

    pub fn set_last_strong_class(&mut self, class: DirectionClass) {
        self.last_strong_class = class;
    }

    /// Number class of the last resolved character, if it was a number
    pub fn last_number_class(&self) -> Option<DirectionClass> {
        match self.last_number_class {
            DirectionClass::Invalid => None,
            class => Some(class),
        }
    }

    pub fn set_last_number_class(&mut self, class: Option<DirectionClass>) {
        self.last_number_class = class.unwrap_or(DirectionClass::Invalid);
    }

    /// Class a hidden character at the start of the next call inherits, or `None` at the start
    /// of a paragraph
    pub fn hidden_class(&self) -> Option<DirectionClass> {
        match self.hidden_class {
            DirectionClass::Invalid => None,
            class => Some(class),
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.level_stack().is_some()
            && self.last_strong_class.is_strong()
            && matches!(
                self.last_number_class,
                DirectionClass::Invalid
                    | DirectionClass::ArabicNumber
                    | DirectionClass::EuropeanNumber
            )
            && self.hidden_class != DirectionClass::ParagraphSeparator
            && !self.hidden_class.is_explicit_control()
    }
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state() {
        let state = AnalysisState::new(1);
        assert_eq!(state.base_level(), 1);
        assert_eq!(state.level_stack().unwrap().current_level(), 1);
        assert_eq!(state.last_strong_class(), DirectionClass::Right);
        assert_eq!(state.last_number_class(), None);
        assert_eq!(state.hidden_class(), None);
        assert!(state.is_valid());
        assert_eq!(AnalysisState::default().last_strong_class(), DirectionClass::Left);
    }

    #[test]
    fn accessors() {
        let mut state = AnalysisState::default();
        state.set_last_number_class(Some(DirectionClass::EuropeanNumber));
        state.set_last_strong_class(DirectionClass::ArabicLetter);
        assert_eq!(state.last_number_class(), Some(DirectionClass::EuropeanNumber));
        assert!(state.is_valid());
        state.set_last_strong_class(DirectionClass::WhiteSpace);
        assert!(!state.is_valid());
    }
}
