// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Case directory: resolves public case references to stored cases.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use casegate_model::CaseDetails;

use crate::error::StorageError;

/// Lookup of stored cases by reference or database id, scoped to a
/// jurisdiction.
#[async_trait]
pub trait CaseDirectory: Send + Sync {
    async fn find_by_reference(
        &self,
        jurisdiction: &str,
        reference: i64,
    ) -> Result<Option<CaseDetails>, StorageError>;

    async fn find_by_id(&self, jurisdiction: &str, case_id: i64) -> Result<Option<CaseDetails>, StorageError>;
}

/// Parse a public case reference.
pub fn parse_reference(reference: &str) -> Result<i64, StorageError> {
    reference
        .trim()
        .parse()
        .map_err(|_| StorageError::InvalidReference(reference.to_string()))
}

const FIRST_REFERENCE: i64 = 1_000_000_000_000_001;

/// An in-memory [`CaseDirectory`] keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseDirectory {
    cases: Arc<RwLock<BTreeMap<i64, CaseDetails>>>,
    /// Highest `(id, reference)` handed out by `next_identity`.
    issued: Arc<RwLock<(i64, i64)>>,
}

impl InMemoryCaseDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or replace a case under its reference.
    pub async fn insert(&self, case: CaseDetails) {
        self.cases.write().await.insert(case.reference, case);
    }

    /// Reserve the next free `(id, reference)` pair for a new case.
    ///
    /// A reserved pair is never handed out again, even before the case is
    /// inserted.
    pub async fn next_identity(&self) -> (i64, i64) {
        let cases = self.cases.read().await;
        let mut issued = self.issued.write().await;
        let id = cases.values().map(|c| c.id).max().unwrap_or(0).max(issued.0) + 1;
        let reference = cases
            .keys()
            .next_back()
            .copied()
            .unwrap_or(FIRST_REFERENCE - 1)
            .max(issued.1)
            + 1;
        *issued = (id, reference);
        (id, reference)
    }

    pub async fn len(&self) -> usize {
        self.cases.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cases.read().await.is_empty()
    }
}

#[async_trait]
impl CaseDirectory for InMemoryCaseDirectory {
    async fn find_by_reference(
        &self,
        jurisdiction: &str,
        reference: i64,
    ) -> Result<Option<CaseDetails>, StorageError> {
        let cases = self.cases.read().await;
        Ok(cases
            .get(&reference)
            .filter(|case| case.jurisdiction == jurisdiction)
            .cloned())
    }

    async fn find_by_id(&self, jurisdiction: &str, case_id: i64) -> Result<Option<CaseDetails>, StorageError> {
        let cases = self.cases.read().await;
        Ok(cases
            .values()
            .find(|case| case.id == case_id && case.jurisdiction == jurisdiction)
            .cloned())
    }
}
