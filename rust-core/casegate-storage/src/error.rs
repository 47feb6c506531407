// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storage error types for casegate collaborators.
//
// Case lookups by reference fail with `CaseNotFound`, which the engine's
// error taxonomy passes straight through to callers.

use casegate_engine::AccessError;
use thiserror::Error;

/// Errors that can occur when talking to a collaborator store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested key was not found.
    #[error("key not found: {0}")]
    NotFound(String),

    /// No case with this reference in the requested jurisdiction.
    #[error("case not found: {0}")]
    CaseNotFound(String),

    /// A case reference that is not a number.
    #[error("invalid case reference: {0}")]
    InvalidReference(String),

    /// Failed to serialize or deserialize a value.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// The store is not available (e.g., connection lost).
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::SerializationError(e.to_string())
    }
}

impl From<StorageError> for AccessError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::CaseNotFound(reference) => AccessError::CaseNotFound(reference),
            StorageError::InvalidReference(reference) => {
                AccessError::InvalidInput(format!("invalid case reference: {reference}"))
            }
            other => AccessError::InvalidInput(other.to_string()),
        }
    }
}
