// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// casegate storage collaborators
//
// Concrete stores the access engine consults but never owns: explicit
// per-case user grants, the case directory, and the policy store holding
// case-type definitions and pointer grants.
//
// # Modules
//
// - [`store`] -- The async `CaseUserStore` trait.
// - [`memory`] -- In-memory `CaseUserStore` with a bounded grant audit log.
// - [`directory`] -- `CaseDirectory` lookups by reference and database id.
// - [`operation`] -- `CaseAccessOperation`: grant/revoke/list by reference.
// - [`snapshot`] -- `GrantedCaseSet`, the engine's `GrantedCaseLookup`.
// - [`policy`] -- `PolicyStore`, the engine's `PolicySource`.
// - [`error`] -- The `StorageError` enum.

pub mod directory;
pub mod error;
pub mod memory;
pub mod operation;
pub mod policy;
pub mod snapshot;
pub mod store;

pub use directory::{CaseDirectory, InMemoryCaseDirectory};
pub use error::StorageError;
pub use memory::{GrantAction, GrantAuditEntry, GrantAuditLog, InMemoryCaseUserStore};
pub use operation::CaseAccessOperation;
pub use policy::PolicyStore;
pub use snapshot::GrantedCaseSet;
pub use store::{CaseUserStore, CREATOR_ROLE};
