// SPDX-License-Identifier: PMPL-1.0-or-later
//! Pointer-addressed permission grants.
//!
//! A [`PermissionGrant`] is one row returned by the permission store for a
//! `(resource, role)` pair: a path expression plus the operations it
//! authorizes. Rows for all of a user's roles are merged into a
//! [`GrantTable`], where operations on the same path accumulate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::Operation;

/// Resource type under which case permissions are stored.
pub const CASE_RESOURCE_TYPE: &str = "CASE";

/// Key identifying the permission resource a grant applies to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Owning service; for cases this is the jurisdiction.
    pub service_name: String,
    pub resource_type: String,
    /// For cases this is the case type id.
    pub resource_name: String,
}

impl ResourceDefinition {
    /// The resource for cases of `case_type_id` in `jurisdiction`.
    pub fn case(jurisdiction: impl Into<String>, case_type_id: impl Into<String>) -> Self {
        Self {
            service_name: jurisdiction.into(),
            resource_type: CASE_RESOURCE_TYPE.to_string(),
            resource_name: case_type_id.into(),
        }
    }
}

impl fmt::Display for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.service_name, self.resource_type, self.resource_name)
    }
}

/// A single path-addressed grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Path expression, e.g. `""`, `"/__field/name"`, `"/__state/Open"`.
    pub path: String,
    pub operations: BTreeSet<Operation>,
}

impl PermissionGrant {
    pub fn new(path: impl Into<String>, operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            path: path.into(),
            operations: operations.into_iter().collect(),
        }
    }

    /// True iff `op` is one of the operations this grant authorizes.
    pub fn grants(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }
}

/// Merged permissions for one resource and one role set.
///
/// Inserting a grant for a path that is already present unions the
/// operation sets; nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantTable(BTreeMap<String, BTreeSet<Operation>>);

impl GrantTable {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Merge one grant row into the table.
    pub fn merge(&mut self, grant: PermissionGrant) {
        self.0.entry(grant.path).or_default().extend(grant.operations);
    }

    /// Union of two tables; neither input is modified.
    pub fn union(&self, other: &GrantTable) -> GrantTable {
        let mut merged = self.clone();
        for (path, ops) in &other.0 {
            merged.0.entry(path.clone()).or_default().extend(ops.iter().copied());
        }
        merged
    }

    /// Operations granted on exactly `path`, if the path has any grant.
    pub fn operations(&self, path: &str) -> Option<&BTreeSet<Operation>> {
        self.0.get(path)
    }

    /// Iterate `(path, operations)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Operation>)> {
        self.0.iter().map(|(path, ops)| (path.as_str(), ops))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PermissionGrant> for GrantTable {
    fn from_iter<I: IntoIterator<Item = PermissionGrant>>(iter: I) -> Self {
        let mut table = GrantTable::new();
        for grant in iter {
            table.merge(grant);
        }
        table
    }
}

impl Extend<PermissionGrant> for GrantTable {
    fn extend<I: IntoIterator<Item = PermissionGrant>>(&mut self, iter: I) {
        for grant in iter {
            self.merge(grant);
        }
    }
}
