// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory policy store: case-type definitions and pointer grant rows.
//
// Built once at startup and read-only afterwards, so it implements the
// engine's synchronous `PolicySource` directly. Share it behind an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info};

use casegate_engine::{apply_acl_inheritance, PolicySource};
use casegate_model::{CaseType, GrantTable, PermissionGrant, ResourceDefinition, RoleSet};

/// Definitions plus per-resource, per-role grant rows.
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    case_types: HashMap<String, Arc<CaseType>>,
    grants: BTreeMap<ResourceDefinition, BTreeMap<String, GrantTable>>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, applying ACL inheritance once. Replaces any
    /// earlier definition with the same id.
    pub fn register_case_type(&mut self, case_type: CaseType) {
        let inherited = apply_acl_inheritance(&case_type);
        info!(
            case_type = %inherited.id,
            fields = inherited.case_fields.len(),
            "Registered case type"
        );
        self.case_types.insert(inherited.id.clone(), Arc::new(inherited));
    }

    /// Add a grant row for `role` on `resource`.
    pub fn add_grant(&mut self, resource: &ResourceDefinition, role: &str, grant: PermissionGrant) {
        self.grants
            .entry(resource.clone())
            .or_default()
            .entry(role.to_string())
            .or_default()
            .merge(grant);
    }

    pub fn add_grants(
        &mut self,
        resource: &ResourceDefinition,
        role: &str,
        grants: impl IntoIterator<Item = PermissionGrant>,
    ) {
        for grant in grants {
            self.add_grant(resource, role, grant);
        }
    }

    pub fn case_type_count(&self) -> usize {
        self.case_types.len()
    }

    /// Number of resources with at least one grant row.
    pub fn resource_count(&self) -> usize {
        self.grants.len()
    }
}

impl PolicySource for PolicyStore {
    fn case_type(&self, case_type_id: &str) -> Option<Arc<CaseType>> {
        self.case_types.get(case_type_id).cloned()
    }

    fn grants(&self, resource: &ResourceDefinition, roles: &RoleSet) -> GrantTable {
        let Some(by_role) = self.grants.get(resource) else {
            debug!(%resource, "No grants stored for resource");
            return GrantTable::new();
        };
        roles
            .iter()
            .filter_map(|role| by_role.get(role))
            .fold(GrantTable::new(), |merged, table| merged.union(table))
    }
}
