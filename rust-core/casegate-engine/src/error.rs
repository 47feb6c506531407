// SPDX-License-Identifier: PMPL-1.0-or-later
//! Access decision errors.
//!
//! The three `*NotAuthorised` kinds are terminal for the request; callers
//! turn them into access-denied responses. `CaseNotFound` is raised by the
//! case store and only passed through here.

use thiserror::Error;

/// Errors produced while authorizing a case operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No root/case-type grant for the required operation.
    #[error("case type not found or not authorised: {0}")]
    CaseTypeNotAuthorised(String),

    /// No grant for the specific event.
    #[error("event not found or not authorised: {0}")]
    EventNotAuthorised(String),

    /// At least one field failed the create check.
    #[error("case field not found or not authorised: {0}")]
    FieldNotAuthorised(String),

    #[error("case not found: {0}")]
    CaseNotFound(String),

    /// Rejected before any permission lookup.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AccessError {
    /// True for the three denial kinds.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            AccessError::CaseTypeNotAuthorised(_)
                | AccessError::EventNotAuthorised(_)
                | AccessError::FieldNotAuthorised(_)
        )
    }
}

impl From<regex::Error> for AccessError {
    fn from(e: regex::Error) -> Self {
        AccessError::InvalidConfig(e.to_string())
    }
}
