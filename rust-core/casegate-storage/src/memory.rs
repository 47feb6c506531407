// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory case user store.
//
// Grants live in a `BTreeMap` keyed by `(case_id, user_id)` behind a tokio
// `RwLock`. Every effective grant and revoke is appended to a bounded audit
// log. Intended for tests, the CLI and small ephemeral deployments.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use casegate_model::CaseAccess;

use crate::error::StorageError;
use crate::store::CaseUserStore;

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

/// What happened to a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GrantAction {
    Grant,
    Revoke,
}

impl fmt::Display for GrantAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantAction::Grant => write!(f, "GRANT"),
            GrantAction::Revoke => write!(f, "REVOKE"),
        }
    }
}

/// A single entry in the grant audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantAuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: GrantAction,
    pub case_id: i64,
    pub user_id: String,
}

/// Bounded grant audit log; the oldest entry is dropped when full.
#[derive(Debug, Clone)]
pub struct GrantAuditLog {
    entries: Arc<RwLock<VecDeque<GrantAuditEntry>>>,
    max_entries: usize,
}

impl GrantAuditLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(max_entries.min(4096)))),
            max_entries,
        }
    }

    pub async fn record(&self, action: GrantAction, case_id: i64, user_id: &str) {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(GrantAuditEntry {
            timestamp: Utc::now(),
            action,
            case_id,
            user_id: user_id.to_string(),
        });
    }

    /// Snapshot of all retained entries, oldest first.
    pub async fn entries(&self) -> Vec<GrantAuditEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for GrantAuditLog {
    fn default() -> Self {
        Self::new(10_000)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct CaseUserRow {
    reason: Option<String>,
    case_roles: BTreeSet<String>,
}

/// An in-memory [`CaseUserStore`].
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseUserStore {
    rows: Arc<RwLock<BTreeMap<(i64, String), CaseUserRow>>>,
    audit: GrantAuditLog,
}

impl InMemoryCaseUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audit_capacity(max_entries: usize) -> Self {
        Self {
            rows: Arc::default(),
            audit: GrantAuditLog::new(max_entries),
        }
    }

    pub fn audit_log(&self) -> &GrantAuditLog {
        &self.audit
    }

    /// Number of `(case, user)` grants held.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl CaseUserStore for InMemoryCaseUserStore {
    async fn grant_access(
        &self,
        case_id: i64,
        user_id: &str,
        reason: Option<&str>,
        case_role: &str,
    ) -> Result<(), StorageError> {
        {
            let mut rows = self.rows.write().await;
            let row = rows.entry((case_id, user_id.to_string())).or_default();
            row.reason = reason.map(str::to_string);
            row.case_roles.insert(case_role.to_string());
        }
        self.audit.record(GrantAction::Grant, case_id, user_id).await;
        info!(case_id, user = user_id, case_role, "Case access granted");
        Ok(())
    }

    async fn revoke_access(&self, case_id: i64, user_id: &str) -> Result<bool, StorageError> {
        let removed = self
            .rows
            .write()
            .await
            .remove(&(case_id, user_id.to_string()))
            .is_some();
        if removed {
            self.audit.record(GrantAction::Revoke, case_id, user_id).await;
            info!(case_id, user = user_id, "Case access revoked");
        } else {
            debug!(case_id, user = user_id, "Revoke of absent grant ignored");
        }
        Ok(removed)
    }

    async fn find_cases_user_has_access_to(&self, user_id: &str) -> Result<Vec<i64>, StorageError> {
        let rows = self.rows.read().await;
        let cases: BTreeSet<i64> = rows
            .keys()
            .filter(|(_, user)| user == user_id)
            .map(|(case_id, _)| *case_id)
            .collect();
        Ok(cases.into_iter().collect())
    }

    async fn find_users_on_case(&self, case_id: i64) -> Result<Vec<CaseAccess>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows
            .range((case_id, String::new())..)
            .take_while(|((id, _), _)| *id == case_id)
            .map(|((_, user_id), row)| CaseAccess {
                id: user_id.clone(),
                reason_for_access: row.reason.clone(),
            })
            .collect())
    }

    async fn find_case_roles(&self, case_id: i64, user_id: &str) -> Result<BTreeSet<String>, StorageError> {
        let rows = self.rows.read().await;
        Ok(rows
            .get(&(case_id, user_id.to_string()))
            .map(|row| row.case_roles.clone())
            .unwrap_or_default())
    }
}
