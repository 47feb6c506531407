// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Case access operations addressed by public case reference.
//
// Grants are stored against database ids; this layer translates between
// the references callers use and the ids the case user store keys on.

use std::sync::Arc;

use tracing::debug;

use casegate_model::CaseAccess;

use crate::directory::{parse_reference, CaseDirectory};
use crate::error::StorageError;
use crate::store::{CaseUserStore, CREATOR_ROLE};

/// Grant, revoke and list explicit case access by case reference.
#[derive(Debug)]
pub struct CaseAccessOperation<S, D> {
    store: Arc<S>,
    directory: Arc<D>,
}

impl<S, D> Clone for CaseAccessOperation<S, D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<S, D> CaseAccessOperation<S, D>
where
    S: CaseUserStore,
    D: CaseDirectory,
{
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self { store, directory }
    }

    async fn resolve_id(&self, jurisdiction: &str, case_reference: &str) -> Result<i64, StorageError> {
        let reference = parse_reference(case_reference)?;
        self.directory
            .find_by_reference(jurisdiction, reference)
            .await?
            .map(|case| case.id)
            .ok_or_else(|| StorageError::CaseNotFound(case_reference.to_string()))
    }

    pub async fn grant_access(
        &self,
        jurisdiction: &str,
        case_reference: &str,
        access: &CaseAccess,
    ) -> Result<(), StorageError> {
        let case_id = self.resolve_id(jurisdiction, case_reference).await?;
        self.store
            .grant_access(case_id, &access.id, access.reason_for_access.as_deref(), CREATOR_ROLE)
            .await
    }

    /// Returns `Ok(false)` if the user held no grant on the case.
    pub async fn revoke_access(
        &self,
        jurisdiction: &str,
        case_reference: &str,
        user_id: &str,
    ) -> Result<bool, StorageError> {
        let case_id = self.resolve_id(jurisdiction, case_reference).await?;
        self.store.revoke_access(case_id, user_id).await
    }

    /// References of the cases `user_id` was granted in `jurisdiction`.
    ///
    /// Grants whose case no longer resolves are skipped.
    pub async fn find_cases_user_has_access_to(
        &self,
        jurisdiction: &str,
        user_id: &str,
    ) -> Result<Vec<String>, StorageError> {
        let mut references = Vec::new();
        for case_id in self.store.find_cases_user_has_access_to(user_id).await? {
            match self.directory.find_by_id(jurisdiction, case_id).await? {
                Some(case) => references.push(case.reference_as_string()),
                None => debug!(case_id, user = user_id, "Granted case not found; skipped"),
            }
        }
        Ok(references)
    }

    /// Users granted on the case; empty for an unknown reference.
    pub async fn find_users_on_case(
        &self,
        jurisdiction: &str,
        case_reference: &str,
    ) -> Result<Vec<CaseAccess>, StorageError> {
        let reference = parse_reference(case_reference)?;
        match self.directory.find_by_reference(jurisdiction, reference).await? {
            Some(case) => self.store.find_users_on_case(case.id).await,
            None => Ok(Vec::new()),
        }
    }
}
