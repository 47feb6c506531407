// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Explicit per-case user grants.
//
// A grant ties a user to a case by the case's database id, with an optional
// reason and the case roles (e.g. `[CREATOR]`) the user holds on it.

use std::collections::BTreeSet;

use async_trait::async_trait;

use casegate_model::CaseAccess;

use crate::error::StorageError;

/// Default case role recorded when a grant names none.
pub const CREATOR_ROLE: &str = "[CREATOR]";

/// Store of explicit case grants.
///
/// Implementations must be safe to share across threads and tokio tasks.
#[async_trait]
pub trait CaseUserStore: Send + Sync {
    /// Grant `user_id` access to `case_id`, adding `case_role` to the roles
    /// already held. Re-granting replaces the reason.
    async fn grant_access(
        &self,
        case_id: i64,
        user_id: &str,
        reason: Option<&str>,
        case_role: &str,
    ) -> Result<(), StorageError>;

    /// Remove every grant `user_id` holds on `case_id`.
    ///
    /// Returns `Ok(true)` if a grant existed and was removed.
    async fn revoke_access(&self, case_id: i64, user_id: &str) -> Result<bool, StorageError>;

    /// Database ids of the cases `user_id` was granted, ascending.
    async fn find_cases_user_has_access_to(&self, user_id: &str) -> Result<Vec<i64>, StorageError>;

    async fn find_users_on_case(&self, case_id: i64) -> Result<Vec<CaseAccess>, StorageError>;

    /// Case roles `user_id` holds on `case_id`; empty without a grant.
    async fn find_case_roles(&self, case_id: i64, user_id: &str) -> Result<BTreeSet<String>, StorageError>;
}
