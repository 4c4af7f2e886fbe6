// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Reasons a call to [`analyze`](crate::analyze) is rejected before any processing
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum BidiError {
    #[error("text to analyze is empty")]
    EmptyText,
    #[error("continuing or incomplete analysis requires an analysis state")]
    MissingState,
    #[error("analysis state does not describe a valid embedding")]
    InvalidState,
}
