// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Point-in-time snapshot of explicit case grants.
//
// The engine's visibility gate is synchronous; callers load the grants of
// the requesting user once, then hand the snapshot to the gate.

use std::collections::{BTreeMap, BTreeSet};

use casegate_engine::GrantedCaseLookup;
use futures::future::try_join_all;

use crate::error::StorageError;
use crate::store::CaseUserStore;

/// Granted case ids per user, as loaded from a [`CaseUserStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantedCaseSet {
    by_user: BTreeMap<String, BTreeSet<i64>>,
}

impl GrantedCaseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the grants of each user in `user_ids`.
    pub async fn load<S>(store: &S, user_ids: &[&str]) -> Result<Self, StorageError>
    where
        S: CaseUserStore + ?Sized,
    {
        let lookups = user_ids
            .iter()
            .map(|user_id| store.find_cases_user_has_access_to(user_id));
        let loaded = try_join_all(lookups).await?;

        let by_user = user_ids
            .iter()
            .zip(loaded)
            .map(|(user_id, cases)| (user_id.to_string(), cases.into_iter().collect()))
            .collect();
        Ok(Self { by_user })
    }

    pub fn insert(&mut self, user_id: impl Into<String>, case_id: i64) {
        self.by_user.entry(user_id.into()).or_default().insert(case_id);
    }

    pub fn contains(&self, user_id: &str, case_id: i64) -> bool {
        self.by_user
            .get(user_id)
            .is_some_and(|cases| cases.contains(&case_id))
    }
}

impl GrantedCaseLookup for GrantedCaseSet {
    fn granted_cases(&self, user_id: &str) -> BTreeSet<i64> {
        self.by_user.get(user_id).cloned().unwrap_or_default()
    }
}
