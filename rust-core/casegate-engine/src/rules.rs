// SPDX-License-Identifier: PMPL-1.0-or-later
//! Path classification and grant matching.
//!
//! Permission paths use the permission store's pointer form:
//!
//! | Kind  | Path                  |
//! |-------|-----------------------|
//! | root  | `""`                  |
//! | field | `"/__field/<fieldId>"`|
//! | event | `"/__event/<eventId>"`|
//! | state | `"/__state/<stateId>"`|
//!
//! Classification is by prefix and the kinds are mutually exclusive. A path
//! that is not exactly the root and has no known prefix (or a known prefix
//! followed by nothing) matches no kind at all.

use std::collections::BTreeSet;

use casegate_model::Operation;

pub const ROOT_PATH: &str = "";
pub const FIELD_PREFIX: &str = "/__field/";
pub const EVENT_PREFIX: &str = "/__event/";
pub const STATE_PREFIX: &str = "/__state/";

/// What a permission path addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind<'a> {
    /// The case type as a whole.
    Root,
    Field(&'a str),
    Event(&'a str),
    State(&'a str),
}

/// Classify a permission path; `None` for malformed paths.
pub fn classify(path: &str) -> Option<PathKind<'_>> {
    if path == ROOT_PATH {
        return Some(PathKind::Root);
    }
    if let Some(id) = strip_id(path, FIELD_PREFIX) {
        return Some(PathKind::Field(id));
    }
    if let Some(id) = strip_id(path, EVENT_PREFIX) {
        return Some(PathKind::Event(id));
    }
    strip_id(path, STATE_PREFIX).map(PathKind::State)
}

fn strip_id<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix).filter(|id| !id.is_empty())
}

/// True iff `op` is in the granted operation set.
pub fn grants(operations: &BTreeSet<Operation>, op: Operation) -> bool {
    operations.contains(&op)
}

pub fn is_root(path: &str) -> bool {
    matches!(classify(path), Some(PathKind::Root))
}

/// The field id a path addresses, if it is a field path.
pub fn field_id(path: &str) -> Option<&str> {
    match classify(path) {
        Some(PathKind::Field(id)) => Some(id),
        _ => None,
    }
}

pub fn matches_event(path: &str, event_id: &str) -> bool {
    matches!(classify(path), Some(PathKind::Event(id)) if id == event_id)
}

pub fn matches_state(path: &str, state_id: &str) -> bool {
    matches!(classify(path), Some(PathKind::State(id)) if id == state_id)
}

pub fn field_path(field_id: &str) -> String {
    format!("{FIELD_PREFIX}{field_id}")
}

pub fn event_path(event_id: &str) -> String {
    format!("{EVENT_PREFIX}{event_id}")
}

pub fn state_path(state_id: &str) -> String {
    format!("{STATE_PREFIX}{state_id}")
}
