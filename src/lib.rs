// SPDX-License-Identifier: MIT OR Apache-2.0

//! # UBA Levels
//!
//! This library resolves the embedding level of every code unit of UTF-16 text following the
//! Unicode Bidirectional Algorithm (UAX #9). Explicit embeddings and overrides, weak types,
//! neutrals and implicit levels are supported. Isolates are treated as other neutrals.
//!
//! Text can be analyzed in pieces: with an [AnalysisState] and
//! [AnalysisFlags::INCOMPLETE_TEXT], [analyze] resolves as much as it can and reports where the
//! next call has to start, so a long paragraph never has to be in memory at once.
//!
//! ```
//! use uba_levels::{analyze_str, AnalysisFlags, AnalysisState};
//!
//! // Resolve a complete paragraph
//! let analysis = analyze_str("abc \u{05D0}\u{05D1}", 0, AnalysisFlags::empty(), None).unwrap();
//! assert_eq!(analysis.levels, [0, 0, 0, 0, 1, 1]);
//!
//! // Resolve the same paragraph in two pieces
//! let mut state = AnalysisState::new(0);
//! let first =
//!     analyze_str("abc ", 0, AnalysisFlags::INCOMPLETE_TEXT, Some(&mut state)).unwrap();
//! // The space depends on what follows
//! assert_eq!(first.resolved, 3);
//!
//! let rest = analyze_str(
//!     " \u{05D0}\u{05D1}",
//!     0,
//!     AnalysisFlags::CONTINUE_ANALYSIS,
//!     Some(&mut state),
//! )
//! .unwrap();
//! assert_eq!(rest.levels, [0, 1, 1]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use self::analyzer::*;
mod analyzer;

pub use self::class::*;
mod class;

pub use self::error::*;
mod error;

pub use self::explicit::*;
mod explicit;

pub use self::fast_path::*;
mod fast_path;

pub use self::implicit::*;
mod implicit;

pub use self::level_stack::*;
mod level_stack;

pub use self::neutral::*;
mod neutral;

pub use self::paragraphs::*;
mod paragraphs;

pub use self::reorder::*;
mod reorder;

pub use self::state::*;
mod state;

mod tables;

mod weak;
