// SPDX-License-Identifier: PMPL-1.0-or-later
//! casegate model
//!
//! Plain data shared by the evaluation engine, the collaborator stores and
//! the CLI: operations, role sets, pointer-addressed permission grants,
//! case-type definitions carrying classic access control lists, and the
//! case documents that get filtered.
//!
//! Nothing in this crate performs I/O or makes access decisions.

pub mod case;
pub mod classification;
pub mod definition;
pub mod error;
pub mod grant;
pub mod operation;
pub mod role;

pub use case::{AuditEvent, CaseAccess, CaseDataContent, CaseDetails, Document, Event, StartEventTrigger};
pub use classification::SecurityClassification;
pub use definition::{AccessControlList, CaseEvent, CaseField, CaseState, CaseType, FieldType};
pub use error::ModelError;
pub use grant::{GrantTable, PermissionGrant, ResourceDefinition};
pub use operation::Operation;
pub use role::RoleSet;
