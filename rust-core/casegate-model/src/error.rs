// SPDX-License-Identifier: PMPL-1.0-or-later
//! Model error types.

use thiserror::Error;

/// Errors raised while parsing model values from their textual form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("unknown security classification: {0}")]
    UnknownClassification(String),
}
