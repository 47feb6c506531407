// SPDX-License-Identifier: PMPL-1.0-or-later
//! JSON fixture describing everything the engine consults.
//!
//! ```json
//! {
//!   "config": { "access_management": { "enabled": true, "authorised_case_types": ["Divorce"] } },
//!   "case_types": [ ... ],
//!   "grants": [ { "jurisdiction": "DIVORCE", "case_type": "Divorce", "role": "caseworker",
//!                 "path": "/__field/name", "operations": ["READ"] } ],
//!   "case_users": [ { "case_id": 42, "user_id": "u1", "case_role": "[CREATOR]" } ],
//!   "cases": [ ... ]
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use casegate_engine::EngineConfig;
use casegate_model::{CaseDetails, CaseType, Operation, PermissionGrant, ResourceDefinition};
use casegate_storage::CREATOR_ROLE;

/// One pointer grant row for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRow {
    pub jurisdiction: String,
    pub case_type: String,
    pub role: String,
    #[serde(default)]
    pub path: String,
    pub operations: BTreeSet<Operation>,
}

impl GrantRow {
    pub fn resource(&self) -> ResourceDefinition {
        ResourceDefinition::case(&self.jurisdiction, &self.case_type)
    }

    pub fn grant(&self) -> PermissionGrant {
        PermissionGrant::new(&self.path, self.operations.iter().copied())
    }
}

fn creator_role() -> String {
    CREATOR_ROLE.to_string()
}

/// One explicit case grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseUserRow {
    pub case_id: i64,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default = "creator_role")]
    pub case_role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    /// Absent: read from `CASEGATE_*` environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
    pub case_types: Vec<CaseType>,
    pub grants: Vec<GrantRow>,
    pub case_users: Vec<CaseUserRow>,
    pub cases: Vec<CaseDetails>,
}

impl Fixture {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing fixture")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("reading fixture {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing fixture {}", path.display()))
    }

    /// The fixture's engine configuration, or the environment's.
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        match &self.config {
            Some(config) => {
                config.validate()?;
                Ok(config.clone())
            }
            None => Ok(EngineConfig::from_env()?),
        }
    }

    /// Record a grant so that a saved fixture keeps it.
    pub fn record_grant(&mut self, case_id: i64, user_id: &str, reason: Option<&str>) {
        self.case_users.retain(|row| !(row.case_id == case_id && row.user_id == user_id));
        self.case_users.push(CaseUserRow {
            case_id,
            user_id: user_id.to_string(),
            reason: reason.map(str::to_string),
            case_role: creator_role(),
        });
    }

    pub fn record_revoke(&mut self, case_id: i64, user_id: &str) {
        self.case_users.retain(|row| !(row.case_id == case_id && row.user_id == user_id));
    }
}
