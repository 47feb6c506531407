// SPDX-License-Identifier: PMPL-1.0-or-later
//! Pointer-regime evaluation over a merged [`GrantTable`].
//!
//! Create and read are deliberately asymmetric:
//!
//! - create needs CREATE on the root, on the event, and on **every** field
//!   grant in the table, whatever data is actually submitted;
//! - read needs READ on the root and on the case's state, and then shows
//!   **any** field whose grant includes READ.

use std::collections::BTreeSet;

use tracing::debug;

use casegate_model::{Document, GrantTable, Operation};

use crate::config::Regime;
use crate::evaluator::PermissionEvaluator;
use crate::filter::filter_case_data;
use crate::rules::{self, PathKind};
use crate::AccessError;

fn root_grants(grants: &GrantTable, op: Operation) -> bool {
    grants
        .operations(rules::ROOT_PATH)
        .is_some_and(|ops| rules::grants(ops, op))
}

fn any_grants(grants: &GrantTable, op: Operation, matches: impl Fn(&str) -> bool) -> bool {
    grants
        .iter()
        .any(|(path, ops)| matches(path) && rules::grants(ops, op))
}

/// Check the create rule, reporting which level failed.
pub fn can_create(grants: &GrantTable, event_id: &str) -> Result<(), AccessError> {
    if !root_grants(grants, Operation::Create) {
        return Err(AccessError::CaseTypeNotAuthorised(
            "no CREATE on case type".to_string(),
        ));
    }
    if !any_grants(grants, Operation::Create, |path| rules::matches_event(path, event_id)) {
        return Err(AccessError::EventNotAuthorised(event_id.to_string()));
    }
    let denied = grants.iter().find_map(|(path, ops)| match rules::classify(path) {
        Some(PathKind::Field(id)) if !rules::grants(ops, Operation::Create) => Some(id),
        _ => None,
    });
    if let Some(field) = denied {
        return Err(AccessError::FieldNotAuthorised(field.to_string()));
    }
    Ok(())
}

/// ROOT has READ and the state grant has READ.
pub fn can_read(grants: &GrantTable, state_id: &str) -> bool {
    root_grants(grants, Operation::Read) && can_read_state(grants, state_id)
}

fn can_read_state(grants: &GrantTable, state_id: &str) -> bool {
    any_grants(grants, Operation::Read, |path| rules::matches_state(path, state_id))
}

/// Field ids whose grant includes READ.
pub fn authorized_read_fields(grants: &GrantTable) -> BTreeSet<String> {
    grants
        .iter()
        .filter(|(_, ops)| rules::grants(ops, Operation::Read))
        .filter_map(|(path, _)| rules::field_id(path))
        .map(str::to_string)
        .collect()
}

/// Pointer-regime evaluator for one request.
///
/// The readable field set is computed once and reused for both documents.
#[derive(Debug, Clone)]
pub struct PointerEvaluator {
    grants: GrantTable,
    read_fields: BTreeSet<String>,
}

impl PointerEvaluator {
    pub fn new(grants: GrantTable) -> Self {
        let read_fields = authorized_read_fields(&grants);
        Self { grants, read_fields }
    }

    pub fn grants(&self) -> &GrantTable {
        &self.grants
    }

    pub fn read_fields(&self) -> &BTreeSet<String> {
        &self.read_fields
    }
}

impl PermissionEvaluator for PointerEvaluator {
    fn regime(&self) -> Regime {
        Regime::Pointer
    }

    fn can_read_case_type(&self) -> bool {
        root_grants(&self.grants, Operation::Read)
    }

    fn can_read_state(&self, state_id: &str) -> bool {
        can_read_state(&self.grants, state_id)
    }

    fn check_create(&self, event_id: &str, _data: &Document) -> Result<(), AccessError> {
        can_create(&self.grants, event_id).inspect_err(|e| {
            debug!(event = event_id, reason = %e, "Pointer create check failed");
        })
    }

    fn filter_readable(&self, document: &Document) -> Document {
        filter_case_data(Some(document), &self.read_fields)
    }
}
