// SPDX-License-Identifier: PMPL-1.0-or-later
//! Case-type definitions as used by the classic ACL regime.
//!
//! A [`CaseType`] carries access control lists at four levels: the case type
//! itself, each top-level [`CaseField`] (recursively through complex and
//! collection fields), each workflow [`CaseState`] and each [`CaseEvent`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{Operation, SecurityClassification};

/// Field type name for complex (object-valued) fields.
pub const COMPLEX: &str = "Complex";
/// Field type name for collection (array-valued) fields.
pub const COLLECTION: &str = "Collection";

/// One ACL entry: the operations a role may perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
    pub role: String,
    pub operations: BTreeSet<Operation>,
}

impl AccessControlList {
    pub fn new(role: impl Into<String>, operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            role: role.into(),
            operations: operations.into_iter().collect(),
        }
    }

    pub fn grants(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }
}

/// The type of a case field.
///
/// Type names are compared case-insensitively; any name other than
/// `Complex` or `Collection` is a simple type (`Text`, `Date`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    #[serde(rename = "type")]
    pub kind: String,
    /// Nested fields of a complex type, or of a collection's item type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub complex_fields: Vec<CaseField>,
}

impl FieldType {
    pub fn simple(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            complex_fields: Vec::new(),
        }
    }

    pub fn is_complex(&self) -> bool {
        self.kind.eq_ignore_ascii_case(COMPLEX)
    }

    pub fn is_collection(&self) -> bool {
        self.kind.eq_ignore_ascii_case(COLLECTION)
    }

    /// Complex or collection.
    pub fn is_compound(&self) -> bool {
        self.is_complex() || self.is_collection()
    }
}

/// A field of a case type, possibly nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseField {
    pub id: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub access_control_lists: Vec<AccessControlList>,
}

impl CaseField {
    /// A simple field with no ACL.
    pub fn simple(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: FieldType::simple(kind),
            access_control_lists: Vec::new(),
        }
    }

    /// A complex field with the given nested fields.
    pub fn complex(id: impl Into<String>, nested: Vec<CaseField>) -> Self {
        Self {
            id: id.into(),
            field_type: FieldType {
                kind: COMPLEX.to_string(),
                complex_fields: nested,
            },
            access_control_lists: Vec::new(),
        }
    }

    /// A collection field whose items have the given nested fields.
    pub fn collection(id: impl Into<String>, nested: Vec<CaseField>) -> Self {
        Self {
            id: id.into(),
            field_type: FieldType {
                kind: COLLECTION.to_string(),
                complex_fields: nested,
            },
            access_control_lists: Vec::new(),
        }
    }

    /// Builder-style: append an ACL entry.
    pub fn with_acl(mut self, role: impl Into<String>, ops: impl IntoIterator<Item = Operation>) -> Self {
        self.access_control_lists.push(AccessControlList::new(role, ops));
        self
    }

    /// Nested fields; empty for simple types.
    pub fn nested_fields(&self) -> &[CaseField] {
        if self.field_type.is_compound() {
            &self.field_type.complex_fields
        } else {
            &[]
        }
    }
}

/// A workflow state and who may act on cases in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseState {
    pub id: String,
    #[serde(default)]
    pub access_control_lists: Vec<AccessControlList>,
}

/// A case event (trigger) and who may fire it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseEvent {
    pub id: String,
    #[serde(default)]
    pub access_control_lists: Vec<AccessControlList>,
}

/// A case type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseType {
    pub id: String,
    pub jurisdiction_id: String,
    #[serde(default)]
    pub security_classification: SecurityClassification,
    /// Case-type-level ACL.
    #[serde(default)]
    pub access_control_lists: Vec<AccessControlList>,
    #[serde(default)]
    pub case_fields: Vec<CaseField>,
    #[serde(default)]
    pub states: Vec<CaseState>,
    #[serde(default)]
    pub events: Vec<CaseEvent>,
}

impl CaseType {
    pub fn field(&self, id: &str) -> Option<&CaseField> {
        self.case_fields.iter().find(|f| f.id == id)
    }

    pub fn state(&self, id: &str) -> Option<&CaseState> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn event(&self, id: &str) -> Option<&CaseEvent> {
        self.events.iter().find(|e| e.id == id)
    }
}
