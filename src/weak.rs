// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weak type resolution, rules W1-W7, with neutral resolution (N1, N2) of the spans it defers.
//!
//! One level run is resolved left to right by the state machine in [`crate::tables`]. Characters
//! whose class depends on what follows are not resolved when visited; they are kept in one of
//! two pending spans:
//!
//! - the weak span holds a separator after a number, or a run of terminators, that may still
//!   turn into a number,
//! - the neutral span holds characters that will become `Left` or `Right` once the next strong
//!   character (or the end of the run) is known.
//!
//! The weak span always directly follows the neutral span when both are pending.

use crate::class::MACHINE_CLASS_COUNT;
use crate::neutral::resolve_neutral_run;
use crate::tables::{self, Action, State, CLASS_TO_STATE};
use crate::DirectionClass;

/// Left context carried from one resolved character to the next, and across calls
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WeakContext {
    /// `Left`, `Right` or `ArabicLetter`
    pub last_strong: DirectionClass,
    /// Class of the previous character if it was a number
    pub last_number: Option<DirectionClass>,
}

impl WeakContext {
    /// Context at the start of a run with the given start-of-run class
    pub fn from_sor(sor: DirectionClass) -> Self {
        Self {
            last_strong: sor,
            last_number: None,
        }
    }

    /// Resolved class of the character this context describes
    fn resolved_class(&self) -> DirectionClass {
        match self.last_number {
            Some(DirectionClass::EuropeanNumber) if self.last_strong == DirectionClass::Left => {
                DirectionClass::Left
            }
            Some(number) => number,
            None if self.last_strong == DirectionClass::ArabicLetter => DirectionClass::Right,
            None => self.last_strong,
        }
    }

    fn state(&self) -> State {
        CLASS_TO_STATE[self.last_number.unwrap_or(self.last_strong) as usize]
    }
}

/// Result of resolving one run
#[derive(Clone, Copy, Debug)]
pub(crate) struct WeakOutcome {
    /// Characters resolved from the start of the run
    pub resolved: usize,
    /// Context after the last resolved character
    pub context: WeakContext,
}

/// Resolves the weak and neutral classes of one level run in place
pub(crate) struct WeakTypeResolver<'a> {
    classes: &'a mut [DirectionClass],
    level: u8,
    state: State,
    context: WeakContext,
    /// Resolved class of the last resolved character
    previous: DirectionClass,
    neutral_start: Option<usize>,
    weak_start: Option<usize>,
    /// Terminator that demoted a separator still pending; a later call must see it again
    held: Option<usize>,
    streaming: bool,
    literal_numbers: bool,
}

impl<'a> WeakTypeResolver<'a> {
    /// Prepare to resolve `classes`, one run at `level`, as if preceded by `context`.
    ///
    /// With `streaming` set, characters at the end whose class depends on text past the run are
    /// left unresolved. With `literal_numbers` set, rule W2 is not applied.
    pub fn new(
        classes: &'a mut [DirectionClass],
        level: u8,
        context: WeakContext,
        streaming: bool,
        literal_numbers: bool,
    ) -> Self {
        Self {
            classes,
            level,
            state: context.state(),
            previous: context.resolved_class(),
            context,
            neutral_start: None,
            weak_start: None,
            held: None,
            streaming,
            literal_numbers,
        }
    }

    /// Resolve the run. `eor` bounds trailing neutrals unless streaming.
    pub fn resolve(mut self, eor: DirectionClass) -> WeakOutcome {
        let len = self.classes.len();
        for i in 0..len {
            let mut class = self.classes[i];
            if class as usize >= MACHINE_CLASS_COUNT {
                debug_assert!(false, "unexpected {:?} in weak resolution", class);
                log::warn!("stopping weak resolution at {}: unexpected {:?}", i, class);
                return self.outcome(i);
            }
            // W2
            if class == DirectionClass::EuropeanNumber
                && !self.literal_numbers
                && self.context.last_strong == DirectionClass::ArabicLetter
            {
                class = DirectionClass::ArabicNumber;
            }

            let action = tables::action(self.state, class);
            let mut next = tables::next_state(self.state, class);
            match action {
                Action::Resolve => {
                    self.demote_weak();
                    if !self.resolve_current(i, class, None) {
                        return self.outcome(i);
                    }
                }
                Action::ResolveSeparated => {
                    let Some(start) = self.weak_start.take() else {
                        debug_assert!(false, "no pending separator before {}", i);
                        return self.outcome(i);
                    };
                    if !self.resolve_current(i, class, Some(start)) {
                        return self.outcome(i);
                    }
                }
                Action::Neutral => {
                    self.demote_weak();
                    self.neutral_start.get_or_insert(i);
                }
                Action::Separator => {
                    self.weak_start = Some(i);
                }
                Action::Terminator => {
                    self.demote_weak();
                    self.weak_start = Some(i);
                }
                Action::TerminatorAfterNumber => {
                    // W5 ahead of W4: a separator following this terminator can no longer sit
                    // between two numbers
                    match self.classes[i + 1..]
                        .iter()
                        .position(|&c| c != DirectionClass::BoundaryNeutral)
                    {
                        Some(offset) => {
                            let separator = &mut self.classes[i + 1 + offset];
                            if matches!(
                                *separator,
                                DirectionClass::EuropeanSeparator | DirectionClass::CommonSeparator
                            ) {
                                *separator = DirectionClass::GenericNeutral;
                                if self.streaming {
                                    self.held.get_or_insert(i);
                                }
                            }
                            self.classes[i] = self.previous;
                        }
                        None if self.streaming => {
                            // The next call decides what follows
                            self.weak_start = Some(i);
                            next = State::ET;
                        }
                        None => self.classes[i] = self.previous,
                    }
                }
                Action::Mark => {
                    self.classes[i] = self.previous;
                }
                Action::Extend => {}
            }
            self.state = next;
        }

        if self.streaming {
            return self.outcome(len);
        }
        self.demote_weak();
        if let Some(start) = self.neutral_start.take() {
            resolve_neutral_run(self.classes, start..len, self.previous, eor, self.level);
        }
        self.outcome(len)
    }

    /// Resolve the strong or number character at `i`, first giving `separated` (the pending weak
    /// span) the same class and settling the pending neutrals against it.
    fn resolve_current(
        &mut self,
        i: usize,
        class: DirectionClass,
        separated: Option<usize>,
    ) -> bool {
        let resolved = match class {
            DirectionClass::ArabicLetter => DirectionClass::Right,
            // W7
            DirectionClass::EuropeanNumber if self.context.last_strong == DirectionClass::Left => {
                DirectionClass::Left
            }
            class => class,
        };
        let neutral_end = separated.unwrap_or(i);
        if let Some(start) = separated {
            self.classes[start..i].fill(resolved);
        }
        if let Some(start) = self.neutral_start.take() {
            if !resolve_neutral_run(
                self.classes,
                start..neutral_end,
                self.previous,
                resolved,
                self.level,
            ) {
                self.neutral_start = Some(start);
                return false;
            }
        }
        self.classes[i] = resolved;
        self.previous = resolved;
        self.held = None;
        if class.is_strong() {
            self.context.last_strong = class;
            self.context.last_number = None;
        } else {
            self.context.last_number = Some(class);
        }
        true
    }

    /// The pending weak span will not become a number; it joins the neutrals (W6)
    fn demote_weak(&mut self) {
        if let Some(start) = self.weak_start.take() {
            self.neutral_start.get_or_insert(start);
        }
    }

    fn outcome(&self, stop: usize) -> WeakOutcome {
        let resolved = [self.neutral_start, self.weak_start, self.held]
            .into_iter()
            .flatten()
            .fold(stop, usize::min);
        log::trace!(
            "weak resolution at level {} resolved {} of {}",
            self.level,
            resolved,
            self.classes.len()
        );
        WeakOutcome {
            resolved,
            context: self.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(feature = "std"))]
    use alloc::{vec, vec::Vec};
    use DirectionClass::*;

    fn run(classes: &[DirectionClass], level: u8) -> Vec<DirectionClass> {
        run_with(classes, level, false)
    }

    fn run_with(classes: &[DirectionClass], level: u8, literal: bool) -> Vec<DirectionClass> {
        let mut classes = classes.to_vec();
        let sor = DirectionClass::for_level(level);
        let outcome = WeakTypeResolver::new(
            &mut classes,
            level,
            WeakContext::from_sor(sor),
            false,
            literal,
        )
        .resolve(sor);
        assert_eq!(outcome.resolved, classes.len());
        classes
    }

    #[test]
    fn neutrals() {
        let n = GenericNeutral;
        assert_eq!(run(&[Left, n, n, Right], 0), [Left, Left, Left, Right]);
        assert_eq!(run(&[Left, n, n, Left], 0), [Left, Left, Left, Left]);
        assert_eq!(run(&[Right, n, Right], 0), [Right, Right, Right]);
        // Trailing neutral bounded by eor
        assert_eq!(run(&[Right, n], 0), [Right, Left]);
        assert_eq!(run(&[Right, n], 1), [Right, Right]);
    }

    #[test]
    fn arabic_letter_and_numbers() {
        assert_eq!(run(&[ArabicLetter, EuropeanNumber], 0), [Right, ArabicNumber]);
        assert_eq!(
            run_with(&[ArabicLetter, EuropeanNumber], 0, true),
            [Right, EuropeanNumber]
        );
        // W7
        assert_eq!(run(&[Left, GenericNeutral, EuropeanNumber], 1), [Left, Left, Left]);
        assert_eq!(run(&[EuropeanNumber], 0), [Left]);
        assert_eq!(run(&[EuropeanNumber], 1), [EuropeanNumber]);
    }

    #[test]
    fn marks_follow_previous() {
        assert_eq!(run(&[Right, NonSpacingMark], 0), [Right, Right]);
        assert_eq!(run(&[NonSpacingMark, Left], 1), [Right, Left]);
        assert_eq!(
            run(&[ArabicLetter, NonSpacingMark, EuropeanNumber], 0),
            [Right, Right, ArabicNumber]
        );
    }

    #[test]
    fn separators_between_numbers() {
        let en = EuropeanNumber;
        let an = ArabicNumber;
        assert_eq!(
            run(&[Right, en, CommonSeparator, en], 0),
            [Right, en, en, en]
        );
        assert_eq!(
            run(&[Right, en, EuropeanSeparator, en], 0),
            [Right, en, en, en]
        );
        assert_eq!(run(&[Right, an, CommonSeparator, an], 0), [Right, an, an, an]);
        // ES is not a separator for Arabic numbers
        assert_eq!(
            run(&[Right, an, EuropeanSeparator, an], 0),
            [Right, an, Right, an]
        );
        // Two separators are not a single one
        assert_eq!(
            run(&[Right, en, CommonSeparator, CommonSeparator, en], 0),
            [Right, en, Right, Right, en]
        );
        // Mixed number kinds
        assert_eq!(
            run(&[Right, an, CommonSeparator, en], 0),
            [Right, an, Right, en]
        );
        // Boundary neutrals inside the separator span
        assert_eq!(
            run(&[Right, en, BoundaryNeutral, CommonSeparator, BoundaryNeutral, en], 0),
            [Right, en, en, en, en, en]
        );
    }

    #[test]
    fn terminators() {
        let en = EuropeanNumber;
        let et = EuropeanTerminator;
        assert_eq!(run(&[Right, et, et, en], 0), [Right, en, en, en]);
        assert_eq!(run(&[Right, en, et, et], 0), [Right, en, en, en]);
        assert_eq!(run(&[Right, et, Right], 0), [Right, Right, Right]);
        // After an Arabic letter the number is Arabic and the terminator stays neutral
        assert_eq!(
            run(&[ArabicLetter, et, en], 0),
            [Right, Right, ArabicNumber]
        );
        assert_eq!(run(&[Left, et, en], 1), [Left, Left, Left]);
    }

    #[test]
    fn terminator_blocks_separator() {
        let en = EuropeanNumber;
        // EN ET ES EN: the separator does not join the numbers
        assert_eq!(
            run(&[Right, en, EuropeanTerminator, EuropeanSeparator, en], 0),
            [Right, en, en, Right, en]
        );
        // Separator before the terminator neither
        assert_eq!(
            run(&[Right, en, CommonSeparator, EuropeanTerminator, en], 0),
            [Right, en, Right, en, en]
        );
    }

    #[test]
    fn streaming_leaves_tail() {
        let mut classes = vec![Left, Left, GenericNeutral, GenericNeutral];
        let outcome = WeakTypeResolver::new(
            &mut classes,
            0,
            WeakContext::from_sor(Left),
            true,
            false,
        )
        .resolve(Left);
        assert_eq!(outcome.resolved, 2);
        assert_eq!(outcome.context.last_strong, Left);
        assert_eq!(outcome.context.last_number, None);

        let mut classes = vec![Right, EuropeanNumber, CommonSeparator];
        let outcome = WeakTypeResolver::new(
            &mut classes,
            0,
            WeakContext::from_sor(Left),
            true,
            false,
        )
        .resolve(Left);
        assert_eq!(outcome.resolved, 2);
        assert_eq!(outcome.context.last_number, Some(EuropeanNumber));
    }

    #[test]
    fn streaming_holds_demoted_separator() {
        // The next call must see the terminator again to know the separator is not between
        // numbers
        let mut classes = vec![Right, EuropeanNumber, EuropeanTerminator, EuropeanSeparator];
        let outcome = WeakTypeResolver::new(
            &mut classes,
            0,
            WeakContext::from_sor(Left),
            true,
            false,
        )
        .resolve(Left);
        assert_eq!(outcome.resolved, 2);
        assert_eq!(outcome.context.last_number, Some(EuropeanNumber));

        let mut classes = vec![EuropeanTerminator, EuropeanSeparator, EuropeanNumber];
        let context = WeakContext {
            last_strong: Right,
            last_number: Some(EuropeanNumber),
        };
        let outcome = WeakTypeResolver::new(&mut classes, 0, context, false, false).resolve(Left);
        assert_eq!(outcome.resolved, 3);
        assert_eq!(classes, [EuropeanNumber, Right, EuropeanNumber]);
    }

    #[test]
    fn strong_runs_unchanged() {
        let strong = [Left, Right, Right, Left, Right];
        assert_eq!(run(&strong, 0), strong);
        assert_eq!(run(&strong, 1), strong);
    }

    #[test]
    fn resumed_context() {
        // Continue after "1," with "2"
        let mut classes = vec![CommonSeparator, EuropeanNumber];
        let context = WeakContext {
            last_strong: Right,
            last_number: Some(EuropeanNumber),
        };
        let outcome = WeakTypeResolver::new(&mut classes, 0, context, false, false).resolve(Left);
        assert_eq!(outcome.resolved, 2);
        assert_eq!(classes, [EuropeanNumber, EuropeanNumber]);
    }
}
