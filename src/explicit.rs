// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit levels and directions, rules X1-X10.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::ops::Range;

use crate::class::decode_codepoint;
use crate::implicit::PARAGRAPH_TERMINATOR_LEVEL;
use crate::{AnalysisState, BidiError, DirectionClass, LevelStack, CHAR_HIDDEN};

/// Direction forced by an active override
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OverrideClass {
    Neutral,
    Left,
    Right,
}

/// Embedding status: the level stack, which levels are overrides and the overflow count
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EmbeddingStatus {
    pub stack: LevelStack,
    pub overrides: u64,
    pub overflow: u16,
}

impl EmbeddingStatus {
    pub fn new(base_level: u8) -> Option<Self> {
        Some(Self {
            stack: LevelStack::new(base_level)?,
            overrides: 0,
            overflow: 0,
        })
    }

    pub fn from_state(state: &AnalysisState) -> Result<Self, BidiError> {
        let stack = state.level_stack().ok_or(BidiError::InvalidState)?;
        Ok(Self {
            stack,
            overrides: state.override_levels_bits() & stack.raw_bits(),
            overflow: state.overflow_count(),
        })
    }

    pub fn base_level(&self) -> u8 {
        self.stack.bottom_level()
    }

    pub fn override_class(&self) -> OverrideClass {
        let level = self.stack.current_level();
        if self.overrides & (1 << level) == 0 {
            OverrideClass::Neutral
        } else if level & 1 == 0 {
            OverrideClass::Left
        } else {
            OverrideClass::Right
        }
    }

    /// X2-X5
    fn push(&mut self, to_greater_even: bool, is_override: bool) {
        if self.overflow > 0 || !self.stack.push(to_greater_even) {
            log::debug!(
                "embedding overflow at level {}",
                self.stack.current_level()
            );
            self.overflow = self.overflow.saturating_add(1);
            return;
        }
        let level = self.stack.current_level();
        if is_override {
            self.overrides |= 1 << level;
        } else {
            self.overrides &= !(1 << level);
        }
    }

    /// X7
    fn pop(&mut self) {
        if self.overflow > 0 {
            self.overflow -= 1;
            return;
        }
        let level = self.stack.current_level();
        if self.stack.pop() {
            self.overrides &= !(1 << level);
        }
    }
}

/// A maximal span of characters at one level within one paragraph
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct LevelRun {
    pub range: Range<usize>,
    pub level: u8,
    /// Start-of-run class
    pub sor: DirectionClass,
    /// End-of-run class
    pub eor: DirectionClass,
    /// Index of the paragraph within the call
    pub paragraph: usize,
    /// Every character is a boundary neutral
    pub boundary_only: bool,
}

/// Output of the explicit pass
#[derive(Debug)]
pub(crate) struct ExplicitLevels {
    pub runs: Vec<LevelRun>,
    /// Status after each control or paragraph separator, by position
    pub snapshots: Vec<(usize, EmbeddingStatus)>,
    /// Status at the end of the text
    pub status: EmbeddingStatus,
}

impl ExplicitLevels {
    /// Embedding status in effect just before position `index`
    pub fn status_before(&self, index: usize, initial: EmbeddingStatus) -> EmbeddingStatus {
        self.snapshots
            .iter()
            .rev()
            .find(|(at, _)| *at < index)
            .map_or(initial, |(_, status)| *status)
    }
}

/// Give hidden characters the class of their surroundings.
///
/// A hidden character takes the class of the nearest preceding non-hidden character, explicit
/// controls passing on as boundary neutrals. `preceding` stands in for the text before `text`
/// when it continues a paragraph. Hidden characters at the start of a paragraph take the class
/// of the nearest following one instead.
pub fn inherit_hidden_classes(
    text: &[u16],
    classes: &mut [DirectionClass],
    preceding: Option<DirectionClass>,
) {
    let mut previous = preceding.and_then(inheritable);
    let mut waiting = 0..0;
    for i in 0..text.len() {
        if text[i] == CHAR_HIDDEN {
            match previous {
                Some(class) => classes[i] = class,
                None if waiting.is_empty() => waiting = i..i + 1,
                None => waiting.end = i + 1,
            }
            continue;
        }
        let class = classes[i];
        if !waiting.is_empty() {
            let inherited = inheritable(class).unwrap_or(DirectionClass::OtherNeutral);
            classes[waiting.clone()].fill(inherited);
            waiting = 0..0;
        }
        previous = inheritable(class);
    }
    if !waiting.is_empty() {
        classes[waiting].fill(DirectionClass::OtherNeutral);
    }
}

/// Class a hidden character inherits from a preceding character of class `class`
#[inline]
pub(crate) fn inheritable(class: DirectionClass) -> Option<DirectionClass> {
    match class {
        DirectionClass::ParagraphSeparator => None,
        class if class.is_explicit_control() => Some(DirectionClass::BoundaryNeutral),
        class => Some(class),
    }
}

/// Assign explicit levels and override classes, X1-X9.
///
/// Controls become boundary neutrals at the level around them, neutrals become
/// [`DirectionClass::GenericNeutral`] and paragraph separators get
/// [`PARAGRAPH_TERMINATOR_LEVEL`], resetting the status to `initial`'s base level.
pub(crate) fn resolve_explicit_levels(
    text: &[u16],
    classes: &mut [DirectionClass],
    levels: &mut [u8],
    initial: EmbeddingStatus,
    ignore_controls: bool,
) -> ExplicitLevels {
    let base_level = initial.base_level();
    let mut status = initial;
    let mut snapshots = Vec::new();

    let mut i = 0;
    while i < text.len() {
        let (_, units) = decode_codepoint(text, i);
        let class = classes[i];
        match class {
            DirectionClass::ParagraphSeparator => {
                levels[i] = PARAGRAPH_TERMINATOR_LEVEL;
                if let Some(fresh) = EmbeddingStatus::new(base_level) {
                    status = fresh;
                }
                snapshots.push((i, status));
            }
            class if class.is_explicit_control() => {
                levels[i] = status.stack.current_level();
                classes[i] = DirectionClass::BoundaryNeutral;
                if !ignore_controls {
                    match class {
                        DirectionClass::LeftToRightEmbedding => status.push(true, false),
                        DirectionClass::RightToLeftEmbedding => status.push(false, false),
                        DirectionClass::LeftToRightOverride => status.push(true, true),
                        DirectionClass::RightToLeftOverride => status.push(false, true),
                        _ => {
                            status.pop();
                            levels[i] = status.stack.current_level();
                        }
                    }
                    snapshots.push((i, status));
                }
            }
            _ => {
                let level = status.stack.current_level();
                levels[i] = level;
                let mut class = match class {
                    DirectionClass::SegmentSeparator
                    | DirectionClass::WhiteSpace
                    | DirectionClass::OtherNeutral
                    | DirectionClass::Invalid => {
                        // Keep a preceding control with the content it introduces
                        if i > 0
                            && classes[i - 1] == DirectionClass::BoundaryNeutral
                            && levels[i - 1] < level
                        {
                            levels[i - 1] = level;
                        }
                        DirectionClass::GenericNeutral
                    }
                    class => class,
                };
                if class != DirectionClass::BoundaryNeutral {
                    match status.override_class() {
                        OverrideClass::Left => class = DirectionClass::Left,
                        OverrideClass::Right => class = DirectionClass::Right,
                        OverrideClass::Neutral => {}
                    }
                }
                classes[i] = class;
            }
        }
        if units == 2 {
            classes[i + 1] = classes[i];
            levels[i + 1] = levels[i];
        }
        i += units;
    }

    let runs = level_runs(classes, levels, base_level, initial.stack.current_level());
    log::trace!("explicit pass found {} level runs", runs.len());
    ExplicitLevels {
        runs,
        snapshots,
        status,
    }
}

/// Split the text into level runs (X10) and compute their sor and eor.
///
/// Boundary neutrals are treated as if the controls had been removed: runs made only of them are
/// skipped when looking for the neighbouring level, and when they separate two spans at the same
/// level the spans form one run, the boundary neutrals taking that level. Before the first run
/// of the text the neighbouring level is `leading_level`, the level a continued analysis resumes
/// at.
fn level_runs(
    classes: &[DirectionClass],
    levels: &mut [u8],
    base_level: u8,
    leading_level: u8,
) -> Vec<LevelRun> {
    let mut runs: Vec<LevelRun> = Vec::new();
    let mut paragraph = 0;
    // Level of the last run with content in the current paragraph
    let mut content_level = Some(leading_level);
    let mut i = 0;
    while i < levels.len() {
        let level = levels[i];
        if level == PARAGRAPH_TERMINATOR_LEVEL {
            paragraph += 1;
            content_level = None;
            i += 1;
            continue;
        }
        let start = i;
        while i < levels.len() && levels[i] == level {
            i += 1;
        }
        let boundary_only = classes[start..i]
            .iter()
            .all(|&class| class == DirectionClass::BoundaryNeutral);

        if !boundary_only && content_level == Some(level) {
            let gap = runs
                .iter()
                .rev()
                .take_while(|run| run.paragraph == paragraph && run.boundary_only)
                .count();
            if gap > 0 {
                let first = runs.len() - gap;
                let gap_start = runs[first].range.start;
                runs.truncate(first);
                levels[gap_start..start].fill(level);
                match runs.last_mut() {
                    Some(previous)
                        if previous.paragraph == paragraph && previous.range.end == gap_start =>
                    {
                        previous.range.end = i;
                    }
                    _ => runs.push(LevelRun {
                        range: gap_start..i,
                        level,
                        sor: DirectionClass::Left,
                        eor: DirectionClass::Left,
                        paragraph,
                        boundary_only: false,
                    }),
                }
                continue;
            }
        }
        if !boundary_only {
            content_level = Some(level);
        }
        runs.push(LevelRun {
            range: start..i,
            level,
            sor: DirectionClass::Left,
            eor: DirectionClass::Left,
            paragraph,
            boundary_only,
        });
    }

    for k in 0..runs.len() {
        let run = &runs[k];
        let neighbour = |candidate: &LevelRun| {
            (candidate.paragraph == run.paragraph && !candidate.boundary_only)
                .then_some(candidate.level)
        };
        let previous = runs[..k]
            .iter()
            .rev()
            .take_while(|candidate| candidate.paragraph == run.paragraph)
            .find_map(neighbour)
            .unwrap_or(if run.paragraph == 0 {
                leading_level
            } else {
                base_level
            });
        let next = runs[k + 1..]
            .iter()
            .take_while(|candidate| candidate.paragraph == run.paragraph)
            .find_map(neighbour)
            .unwrap_or(base_level);
        let sor = DirectionClass::for_level(previous.max(run.level));
        let eor = DirectionClass::for_level(next.max(run.level));
        runs[k].sor = sor;
        runs[k].eor = eor;
    }
    runs
}
