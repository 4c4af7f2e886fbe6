// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::class::{classify_text, is_high_surrogate, is_low_surrogate};
use crate::explicit::{
    inherit_hidden_classes, inheritable, resolve_explicit_levels, EmbeddingStatus,
};
use crate::implicit::{
    resolve_implicit_levels, restore_paragraph_levels, PARAGRAPH_TERMINATOR_LEVEL,
};
use crate::weak::{WeakContext, WeakTypeResolver};
use crate::{
    classify, decode_codepoint, resolve_fast_path, AnalysisFlags, AnalysisState, BidiError,
    DirectionClass,
};

/// Characters scanned past the hint looking for a place to stop
pub const MAX_HINT_EXTENSION: usize = 20;

/// Result of [`analyze`]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Analysis {
    /// Embedding level of every code unit
    pub levels: Vec<u8>,
    /// Resolved class of every code unit
    pub classes: Vec<DirectionClass>,
    /// Code units resolved from the start of the text; levels past this are provisional
    pub resolved: usize,
}

/// Paragraph level from the first strong character of the first paragraph (P2, P3)
pub fn first_strong_direction(text: &[u16]) -> Option<u8> {
    let mut i = 0;
    while i < text.len() {
        let (codepoint, units) = decode_codepoint(text, i);
        match classify(codepoint) {
            DirectionClass::Left => return Some(0),
            DirectionClass::Right | DirectionClass::ArabicLetter => return Some(1),
            DirectionClass::ParagraphSeparator => return None,
            _ => {}
        }
        i += units;
    }
    None
}

/// First position at or after `hint` where the text can be cut without changing the levels
/// before it. Runs of one strong class are kept together, and a hint on a weak or neutral
/// character moves past the next strong one.
fn hint_limit(text: &[u16], classes: &[DirectionClass], hint: usize) -> usize {
    let len = classes.len();
    let mut end = hint;
    let class = classes[end];
    if class.is_strong() {
        while end < len && end - hint < MAX_HINT_EXTENSION && classes[end] == class {
            end += 1;
        }
    } else {
        while end < len && end - hint < MAX_HINT_EXTENSION && !classes[end].is_strong() {
            end += 1;
        }
        if end < len && classes[end].is_strong() {
            end += 1;
        }
    }
    if end > 0 && end < len && is_low_surrogate(text[end]) && is_high_surrogate(text[end - 1]) {
        end += 1;
    }
    end
}

/// Resolve the embedding level of every code unit of `text`.
///
/// `state` is read when [`AnalysisFlags::CONTINUE_ANALYSIS`] is set and updated whenever it is
/// given. When the returned [`Analysis::resolved`] is short of the text length, the next call
/// must start at that position with `CONTINUE_ANALYSIS` and the updated state.
///
/// `max_hint` only matters with [`AnalysisFlags::MAXIMUM_HINT`]; analysis may stop soon after
/// it, so a hint short of the text length needs a `state` to continue from.
pub fn analyze(
    text: &[u16],
    max_hint: usize,
    flags: AnalysisFlags,
    state: Option<&mut AnalysisState>,
) -> Result<Analysis, BidiError> {
    let Some(&last) = text.last() else {
        return Err(BidiError::EmptyText);
    };
    let continuing = flags.contains(AnalysisFlags::CONTINUE_ANALYSIS);
    let ends_paragraph = classify(last as u32) == DirectionClass::ParagraphSeparator;
    let truncating = flags.contains(AnalysisFlags::MAXIMUM_HINT) && max_hint < text.len();
    if state.is_none()
        && (continuing
            || truncating
            || (flags.contains(AnalysisFlags::INCOMPLETE_TEXT) && !ends_paragraph))
    {
        return Err(BidiError::MissingState);
    }

    let (initial, seed, preceding) = match state.as_deref() {
        Some(saved) if continuing => {
            if !saved.is_valid() {
                return Err(BidiError::InvalidState);
            }
            let seed = WeakContext {
                last_strong: saved.last_strong_class(),
                last_number: saved.last_number_class(),
            };
            (EmbeddingStatus::from_state(saved)?, seed, saved.hidden_class())
        }
        _ => {
            let base_level = if flags.contains(AnalysisFlags::RIGHT_TO_LEFT) {
                1
            } else if flags.contains(AnalysisFlags::FIRST_STRONG) {
                first_strong_direction(text).unwrap_or(0)
            } else {
                0
            };
            let status = EmbeddingStatus::new(base_level).ok_or(BidiError::InvalidState)?;
            let mut seed = WeakContext::from_sor(DirectionClass::for_level(base_level));
            if flags.contains(AnalysisFlags::PREVIOUS_STRONG_IS_ARABIC) {
                seed.last_strong = DirectionClass::ArabicLetter;
            }
            (status, seed, None)
        }
    };
    let base_level = initial.base_level();

    let mut classes = classify_text(text);
    inherit_hidden_classes(text, &mut classes, preceding);
    let original = classes.clone();
    let mut levels = vec![base_level; text.len()];

    if !continuing
        && classes
            .iter()
            .all(|&class| class == DirectionClass::ParagraphSeparator)
    {
        if let Some(state) = state {
            *state = AnalysisState::new(base_level);
        }
        return Ok(Analysis {
            levels,
            classes,
            resolved: text.len(),
        });
    }

    let incomplete = flags.contains(AnalysisFlags::INCOMPLETE_TEXT) && !ends_paragraph;
    let limit = if truncating {
        hint_limit(text, &classes, max_hint)
    } else {
        text.len()
    };
    if limit < text.len() {
        log::debug!("stopping analysis at {} for hint {}", limit, max_hint);
    }
    let open = incomplete || limit < text.len();

    if !continuing && !open {
        if let Some(last_strong) =
            resolve_fast_path(&mut classes, &mut levels, base_level, seed.last_strong)
        {
            if let Some(state) = state {
                *state = if ends_paragraph {
                    AnalysisState::new(base_level)
                } else {
                    AnalysisState::from_parts(initial.stack, 0, 0, last_strong, None)
                        .with_hidden_class(inheritable(original[text.len() - 1]))
                };
            }
            return Ok(Analysis {
                levels,
                classes,
                resolved: text.len(),
            });
        }
        classes.copy_from_slice(&original);
        levels.fill(base_level);
    }

    let explicit = resolve_explicit_levels(
        &text[..limit],
        &mut classes[..limit],
        &mut levels[..limit],
        initial,
        flags.contains(AnalysisFlags::IGNORE_DIRECTIONAL_CONTROLS),
    );
    let runs = &explicit.runs;

    // The paragraph still open at the end, and the last run in it with content; both only
    // matter when more text may follow
    let paragraph_start = if open {
        levels[..limit]
            .iter()
            .rposition(|&level| level == PARAGRAPH_TERMINATOR_LEVEL)
            .map_or(0, |i| i + 1)
    } else {
        limit
    };
    let open_run = if open {
        runs.iter()
            .rposition(|run| run.range.start >= paragraph_start && !run.boundary_only)
    } else {
        None
    };

    let mut resolved = if open { paragraph_start } else { limit };
    let mut context = if paragraph_start > 0 {
        WeakContext::from_sor(DirectionClass::for_level(base_level))
    } else {
        seed
    };
    let mut stopped = false;
    let literal_numbers = flags.contains(AnalysisFlags::OVERRIDE_EUROPEAN_NUMBER);
    for (k, run) in runs.iter().enumerate() {
        if open
            && run.range.start >= paragraph_start
            && open_run.map_or(true, |last| k > last)
        {
            break;
        }
        let streaming = open_run == Some(k);
        let resumes = k == 0 && run.paragraph == 0 && run.level == initial.stack.current_level();
        let run_seed = if resumes {
            seed
        } else {
            WeakContext::from_sor(run.sor)
        };
        let range = run.range.clone();
        // Trailing boundary neutrals of the open run may still be raised by what follows
        let content_end = classes[range.clone()]
            .iter()
            .rposition(|&class| class != DirectionClass::BoundaryNeutral)
            .map_or(0, |i| i + 1);

        let outcome = WeakTypeResolver::new(
            &mut classes[range.clone()],
            run.level,
            run_seed,
            streaming,
            literal_numbers,
        )
        .resolve(run.eor);
        let done = if streaming {
            outcome.resolved.min(content_end)
        } else {
            outcome.resolved
        };
        resolve_implicit_levels(
            text,
            &classes,
            &original,
            &mut levels,
            range.start..range.start + done,
            base_level,
        );
        if streaming || !open {
            context = outcome.context;
        }
        if streaming {
            resolved = range.start + done;
        } else if done < range.len() {
            log::warn!("analysis stopped inside the run at {:?}", range);
            resolved = range.start + done;
            stopped = true;
            break;
        }
    }
    restore_paragraph_levels(&mut levels[..limit], base_level);

    if let Some(state) = state {
        *state = if resolved == text.len() && ends_paragraph {
            AnalysisState::new(base_level)
        } else {
            let status = if open || stopped {
                explicit.status_before(resolved, initial)
            } else {
                explicit.status
            };
            // A hidden character opening the next call inherits from the last resolved one
            let hidden = match resolved {
                0 => preceding,
                _ => inheritable(original[resolved - 1]),
            };
            AnalysisState::from_parts(
                status.stack,
                status.overrides,
                status.overflow,
                context.last_strong,
                context.last_number,
            )
            .with_hidden_class(hidden)
        };
    }

    Ok(Analysis {
        levels,
        classes,
        resolved,
    })
}

/// [`analyze`] for a string, which is encoded to UTF-16 first
pub fn analyze_str(
    text: &str,
    max_hint: usize,
    flags: AnalysisFlags,
    state: Option<&mut AnalysisState>,
) -> Result<Analysis, BidiError> {
    let text: Vec<u16> = text.encode_utf16().collect();
    analyze(&text, max_hint, flags, state)
}
