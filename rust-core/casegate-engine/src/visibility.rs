// SPDX-License-Identifier: PMPL-1.0-or-later
//! Case visibility for restricted users.
//!
//! Users holding any role that matches the restricted-role pattern (by
//! default solicitors, panel members, citizens, letter holders and local
//! authority caseworkers) only see cases they were explicitly granted.
//! Everyone else sees every case their permissions allow.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use casegate_model::{CaseDetails, RoleSet};

use crate::AccessError;

/// Source of explicit per-case grants.
///
/// Only consulted for restricted users.
pub trait GrantedCaseLookup {
    /// Database ids of the cases `user_id` was explicitly granted.
    fn granted_cases(&self, user_id: &str) -> BTreeSet<i64>;
}

impl<F> GrantedCaseLookup for F
where
    F: Fn(&str) -> BTreeSet<i64>,
{
    fn granted_cases(&self, user_id: &str) -> BTreeSet<i64> {
        self(user_id)
    }
}

/// How much of the case population a user may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    All,
    Granted,
}

/// Compiled restricted-role gate.
#[derive(Debug, Clone)]
pub struct CaseVisibilityGate {
    restricted: Regex,
}

impl CaseVisibilityGate {
    /// A role is restricted when the whole role name matches
    /// `restricted_role_pattern`; the pattern is anchored at both ends.
    pub fn new(restricted_role_pattern: &str) -> Result<Self, AccessError> {
        Ok(Self {
            restricted: Regex::new(&format!("^(?:{restricted_role_pattern})$"))?,
        })
    }

    pub fn is_restricted_role(&self, role: &str) -> bool {
        self.restricted.is_match(role)
    }

    pub fn access_level(&self, roles: &RoleSet) -> AccessLevel {
        if roles.any(|role| self.is_restricted_role(role)) {
            AccessLevel::Granted
        } else {
            AccessLevel::All
        }
    }

    /// Whether `user_id` may see `case`.
    pub fn can_access(
        &self,
        case: &CaseDetails,
        user_id: &str,
        roles: &RoleSet,
        lookup: &dyn GrantedCaseLookup,
    ) -> bool {
        match self.access_level(roles) {
            AccessLevel::All => true,
            AccessLevel::Granted => {
                let granted = lookup.granted_cases(user_id).contains(&case.id);
                if !granted {
                    debug!(user = user_id, case = case.id, "Restricted user has no grant for case");
                }
                granted
            }
        }
    }

    /// The case ids a restricted user is confined to; `None` for
    /// unrestricted users.
    pub fn granted_case_ids_for_restricted(
        &self,
        user_id: &str,
        roles: &RoleSet,
        lookup: &dyn GrantedCaseLookup,
    ) -> Option<BTreeSet<i64>> {
        match self.access_level(roles) {
            AccessLevel::All => None,
            AccessLevel::Granted => Some(lookup.granted_cases(user_id)),
        }
    }
}
