// SPDX-License-Identifier: PMPL-1.0-or-later
//! Classic access control: per-field ACLs carried by the case-type definition.
//!
//! Every ACL check has the same shape: some entry whose role is in the
//! user's role set grants the operation. Fields are checked recursively
//! through complex and collection types, using each nested field's own ACL.
//! Nested fields that declare no ACL take their parent's once, when the case
//! type is loaded, via [`apply_acl_inheritance`].
//!
//! # Value shapes
//!
//! | Shape | Example |
//! |-------|---------|
//! | complex value | `{"street": "1 High St"}` |
//! | collection item | `{"id": "a1", "value": ...}` |
//! | classification wrapper | `{"classification": "PUBLIC", "value": ...}` |
//!
//! Wrapper keys are kept and the walk continues inside `value`, so a data
//! document and its classification document are filtered identically. An
//! object is only a wrapper if it has no keys beyond the wrapper keys, and
//! `id` only marks a wrapper inside a collection. An object whose keys are
//! all nested field ids is always filtered as a complex value.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use casegate_model::{AccessControlList, CaseField, CaseType, Document, Operation, RoleSet};

use crate::config::Regime;
use crate::evaluator::PermissionEvaluator;
use crate::AccessError;

const VALUE_KEY: &str = "value";
const ID_KEY: &str = "id";
const CLASSIFICATION_KEY: &str = "classification";

// ---------------------------------------------------------------------------
// ACL checks
// ---------------------------------------------------------------------------

fn acl_grants(acls: &[AccessControlList], roles: &RoleSet, op: Operation) -> bool {
    acls.iter().any(|acl| roles.contains(&acl.role) && acl.grants(op))
}

/// True iff the case-type ACL, or the ACL of any top-level field, grants
/// `op` to one of `roles`.
pub fn can_access_case_type(case_type: &CaseType, roles: &RoleSet, op: Operation) -> bool {
    acl_grants(&case_type.access_control_lists, roles, op)
        || case_type
            .case_fields
            .iter()
            .any(|field| acl_grants(&field.access_control_lists, roles, op))
}

/// Unknown states are never accessible.
pub fn can_access_state(state_id: &str, case_type: &CaseType, roles: &RoleSet, op: Operation) -> bool {
    case_type
        .state(state_id)
        .is_some_and(|state| acl_grants(&state.access_control_lists, roles, op))
}

/// Unknown events are never accessible.
pub fn can_access_event(event_id: &str, case_type: &CaseType, roles: &RoleSet, op: Operation) -> bool {
    case_type
        .event(event_id)
        .is_some_and(|event| acl_grants(&event.access_control_lists, roles, op))
}

/// True iff every top-level key of `data` names a field whose ACL grants `op`.
///
/// An empty document passes.
pub fn can_access_fields(data: &Document, case_fields: &[CaseField], roles: &RoleSet, op: Operation) -> bool {
    first_denied_field(data, case_fields, roles, op).is_none()
}

fn first_denied_field<'d>(
    data: &'d Document,
    case_fields: &[CaseField],
    roles: &RoleSet,
    op: Operation,
) -> Option<&'d str> {
    data.keys()
        .find(|key| {
            !case_fields
                .iter()
                .any(|field| field.id == **key && acl_grants(&field.access_control_lists, roles, op))
        })
        .map(String::as_str)
}

// ---------------------------------------------------------------------------
// Recursive filtering
// ---------------------------------------------------------------------------

/// Keep the keys of `document` whose field grants `op` to one of `roles`,
/// recursing into compound fields.
///
/// Keys with no matching field definition are dropped. A compound field with
/// no nested fields is copied whole.
pub fn filter_fields_by_access(
    document: &Document,
    case_fields: &[CaseField],
    roles: &RoleSet,
    op: Operation,
) -> Document {
    let mut filtered = Document::new();
    for (key, value) in document {
        let Some(field) = case_fields.iter().find(|f| f.id == *key) else {
            continue;
        };
        if !acl_grants(&field.access_control_lists, roles, op) {
            continue;
        }
        let value = if field.nested_fields().is_empty() {
            value.clone()
        } else {
            filter_value(value, field, roles, op)
        };
        filtered.insert(key.clone(), value);
    }
    filtered
}

/// Filter a value of the compound `field`.
fn filter_value(value: &Value, field: &CaseField, roles: &RoleSet, op: Operation) -> Value {
    let nested = field.nested_fields();
    match value {
        Value::Object(map) if is_wrapper(map, field) => {
            let mut unwrapped = map.clone();
            if let Some(inner) = map.get(VALUE_KEY) {
                unwrapped.insert(VALUE_KEY.to_string(), filter_value(inner, field, roles, op));
            }
            Value::Object(unwrapped)
        }
        Value::Object(map) => Value::Object(filter_fields_by_access(map, nested, roles, op)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| filter_value(item, field, roles, op))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

/// A collection item (`id` + `value`) or a classification wrapper
/// (`classification` + `value`), carrying nothing else.
fn is_wrapper(map: &Document, field: &CaseField) -> bool {
    let allowed: &[&str] = if field.field_type.is_collection() {
        &[ID_KEY, VALUE_KEY, CLASSIFICATION_KEY]
    } else {
        &[VALUE_KEY, CLASSIFICATION_KEY]
    };
    let marked = map.contains_key(CLASSIFICATION_KEY)
        || (field.field_type.is_collection() && map.contains_key(ID_KEY));
    let nested = field.nested_fields();

    map.contains_key(VALUE_KEY)
        && marked
        && map.keys().all(|key| allowed.contains(&key.as_str()))
        && !map.keys().all(|key| nested.iter().any(|f| f.id == *key))
}

// ---------------------------------------------------------------------------
// ACL inheritance
// ---------------------------------------------------------------------------

/// A copy of `case_type` in which every nested field without an ACL carries
/// its nearest ancestor's effective ACL.
///
/// Top-level fields are left as declared. Applying the transform twice gives
/// the same tree as applying it once.
pub fn apply_acl_inheritance(case_type: &CaseType) -> CaseType {
    let mut inherited = case_type.clone();
    for field in &mut inherited.case_fields {
        let acl = field.access_control_lists.clone();
        inherit_into(&mut field.field_type.complex_fields, &acl);
    }
    inherited
}

fn inherit_into(nested: &mut [CaseField], parent_acl: &[AccessControlList]) {
    for field in nested {
        if field.access_control_lists.is_empty() {
            field.access_control_lists = parent_acl.to_vec();
        }
        if field.field_type.is_compound() {
            let acl = field.access_control_lists.clone();
            inherit_into(&mut field.field_type.complex_fields, &acl);
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Classic-regime evaluator for one request.
#[derive(Debug, Clone)]
pub struct ClassicEvaluator {
    case_type: Arc<CaseType>,
    roles: RoleSet,
}

impl ClassicEvaluator {
    /// `case_type` is expected to have had [`apply_acl_inheritance`] applied.
    pub fn new(case_type: Arc<CaseType>, roles: RoleSet) -> Self {
        Self { case_type, roles }
    }

    pub fn case_type(&self) -> &CaseType {
        &self.case_type
    }
}

impl PermissionEvaluator for ClassicEvaluator {
    fn regime(&self) -> Regime {
        Regime::Classic
    }

    fn can_read_case_type(&self) -> bool {
        can_access_case_type(&self.case_type, &self.roles, Operation::Read)
    }

    fn can_read_state(&self, state_id: &str) -> bool {
        can_access_state(state_id, &self.case_type, &self.roles, Operation::Read)
    }

    fn check_create(&self, event_id: &str, data: &Document) -> Result<(), AccessError> {
        let case_type_id = &self.case_type.id;
        if !can_access_case_type(&self.case_type, &self.roles, Operation::Create) {
            debug!(case_type = %case_type_id, roles = %self.roles, "No case-type CREATE");
            return Err(AccessError::CaseTypeNotAuthorised(case_type_id.clone()));
        }
        if !can_access_event(event_id, &self.case_type, &self.roles, Operation::Create) {
            debug!(case_type = %case_type_id, event = event_id, "No event CREATE");
            return Err(AccessError::EventNotAuthorised(event_id.to_string()));
        }
        if let Some(field) = first_denied_field(data, &self.case_type.case_fields, &self.roles, Operation::Create) {
            debug!(case_type = %case_type_id, field, "No field CREATE");
            return Err(AccessError::FieldNotAuthorised(field.to_string()));
        }
        Ok(())
    }

    fn filter_readable(&self, document: &Document) -> Document {
        filter_fields_by_access(document, &self.case_type.case_fields, &self.roles, Operation::Read)
    }
}
