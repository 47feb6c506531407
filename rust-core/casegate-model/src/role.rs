// SPDX-License-Identifier: PMPL-1.0-or-later
//! The set of roles a user acts with for one request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A user's active roles.
///
/// Backed by a `BTreeSet` so iteration (and therefore any log line or
/// aggregation built from it) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, role: impl Into<String>) -> bool {
        self.0.insert(role.into())
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Union of user roles and case roles (e.g. `[CREATOR]`) granted on a
    /// specific case.
    pub fn union(&self, other: &RoleSet) -> RoleSet {
        RoleSet(self.0.union(&other.0).cloned().collect())
    }

    /// True if any role in `self` satisfies `predicate`.
    pub fn any(&self, mut predicate: impl FnMut(&str) -> bool) -> bool {
        self.0.iter().any(|role| predicate(role))
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        RoleSet(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}
