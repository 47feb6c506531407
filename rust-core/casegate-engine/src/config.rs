// SPDX-License-Identifier: PMPL-1.0-or-later
//! Engine configuration.
//!
//! Which case types are managed by the pointer regime is decided by three
//! independent allow-lists, one per concern, behind a master switch. A case
//! type may appear in any subset of them.
//!
//! Defaults: access management disabled (everything classic), empty
//! allow-lists, the standard restricted-role pattern.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

use crate::AccessError;

/// Roles that may only see cases they were explicitly granted.
pub const DEFAULT_RESTRICTED_ROLE_PATTERN: &str =
    ".+-solicitor$|.+-panelmember$|^citizen(-.*)?$|^letter-holder$|^caseworker-.+-localAuthority$";

pub const ENV_ACCESS_MANAGEMENT_ENABLED: &str = "CASEGATE_ACCESS_MANAGEMENT_ENABLED";
pub const ENV_AUTHORISED_CASE_TYPES: &str = "CASEGATE_AMS_AUTHORISED_CASE_TYPES";
pub const ENV_CLASSIFIED_CASE_TYPES: &str = "CASEGATE_AMS_CLASSIFIED_CASE_TYPES";
pub const ENV_USER_ACCESS_CASE_TYPES: &str = "CASEGATE_AMS_USER_ACCESS_CASE_TYPES";
pub const ENV_RESTRICTED_ROLE_PATTERN: &str = "CASEGATE_RESTRICTED_ROLE_PATTERN";

/// Which evaluator governs a case type for a given concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Per-field ACLs from the case-type definition.
    Classic,
    /// Path-addressed grants from the permission store.
    Pointer,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Classic => write!(f, "classic"),
            Regime::Pointer => write!(f, "pointer"),
        }
    }
}

/// The three independently configured concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    /// Case-type, state, event and field permissions.
    Authorised,
    /// Security classification filtering.
    Classified,
    /// Explicit per-case user access.
    UserAccess,
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concern::Authorised => write!(f, "authorised"),
            Concern::Classified => write!(f, "classified"),
            Concern::UserAccess => write!(f, "user_access"),
        }
    }
}

/// Regime selection: master switch plus one allow-list per concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    pub enabled: bool,
    pub authorised_case_types: BTreeSet<String>,
    pub classified_case_types: BTreeSet<String>,
    /// Both regimes apply the same restricted-role gate, so this list only
    /// changes the regime reported when a case is withheld.
    pub user_access_case_types: BTreeSet<String>,
}

impl RegimeConfig {
    fn allow_list(&self, concern: Concern) -> &BTreeSet<String> {
        match concern {
            Concern::Authorised => &self.authorised_case_types,
            Concern::Classified => &self.classified_case_types,
            Concern::UserAccess => &self.user_access_case_types,
        }
    }

    /// True iff access management is enabled and `case_type_id` is on the
    /// allow-list for `concern`.
    pub fn is_managed(&self, concern: Concern, case_type_id: &str) -> bool {
        self.enabled && self.allow_list(concern).contains(case_type_id)
    }

    pub fn regime_for(&self, concern: Concern, case_type_id: &str) -> Regime {
        if self.is_managed(concern, case_type_id) {
            Regime::Pointer
        } else {
            Regime::Classic
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub access_management: RegimeConfig,
    /// Matched against whole role names.
    pub restricted_role_pattern: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            access_management: RegimeConfig::default(),
            restricted_role_pattern: DEFAULT_RESTRICTED_ROLE_PATTERN.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from `CASEGATE_*` environment variables; unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, AccessError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AccessError> {
        let mut config = EngineConfig::default();

        if let Some(raw) = lookup(ENV_ACCESS_MANAGEMENT_ENABLED) {
            config.access_management.enabled = parse_bool(ENV_ACCESS_MANAGEMENT_ENABLED, &raw)?;
        }
        if let Some(raw) = lookup(ENV_AUTHORISED_CASE_TYPES) {
            config.access_management.authorised_case_types = parse_list(&raw);
        }
        if let Some(raw) = lookup(ENV_CLASSIFIED_CASE_TYPES) {
            config.access_management.classified_case_types = parse_list(&raw);
        }
        if let Some(raw) = lookup(ENV_USER_ACCESS_CASE_TYPES) {
            config.access_management.user_access_case_types = parse_list(&raw);
        }
        if let Some(raw) = lookup(ENV_RESTRICTED_ROLE_PATTERN) {
            if !raw.trim().is_empty() {
                config.restricted_role_pattern = raw.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the restricted-role pattern compiles.
    pub fn validate(&self) -> Result<(), AccessError> {
        regex::Regex::new(&self.restricted_role_pattern)?;
        let am = &self.access_management;
        let listed = am.authorised_case_types.len()
            + am.classified_case_types.len()
            + am.user_access_case_types.len();
        if !am.enabled && listed > 0 {
            warn!(
                listed,
                "Access management disabled; allow-listed case types fall back to classic"
            );
        }
        Ok(())
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AccessError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(AccessError::InvalidConfig(format!(
            "{key}: expected a boolean, got '{other}'"
        ))),
    }
}

/// Comma-separated list; entries trimmed, empty entries dropped.
fn parse_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(!config.access_management.enabled);
        assert_eq!(config.restricted_role_pattern, DEFAULT_RESTRICTED_ROLE_PATTERN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_managed_requires_master_switch() {
        let mut am = RegimeConfig::default();
        am.authorised_case_types.insert("Divorce".to_string());
        assert!(!am.is_managed(Concern::Authorised, "Divorce"));

        am.enabled = true;
        assert!(am.is_managed(Concern::Authorised, "Divorce"));
        assert_eq!(am.regime_for(Concern::Authorised, "Divorce"), Regime::Pointer);
        assert_eq!(am.regime_for(Concern::Authorised, "Probate"), Regime::Classic);
    }

    #[test]
    fn test_concerns_are_independent() {
        let mut am = RegimeConfig {
            enabled: true,
            ..Default::default()
        };
        am.classified_case_types.insert("Divorce".to_string());

        assert_eq!(am.regime_for(Concern::Classified, "Divorce"), Regime::Pointer);
        assert_eq!(am.regime_for(Concern::Authorised, "Divorce"), Regime::Classic);
        assert_eq!(am.regime_for(Concern::UserAccess, "Divorce"), Regime::Classic);
    }

    #[test]
    fn test_from_lookup_parses_lists_and_flag() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            (ENV_ACCESS_MANAGEMENT_ENABLED, "TRUE"),
            (ENV_AUTHORISED_CASE_TYPES, " Divorce, ,Probate ,"),
            (ENV_USER_ACCESS_CASE_TYPES, "Divorce"),
        ]))
        .unwrap();

        let am = &config.access_management;
        assert!(am.enabled);
        assert_eq!(am.authorised_case_types.len(), 2);
        assert!(am.authorised_case_types.contains("Probate"));
        assert!(am.classified_case_types.is_empty());
        assert!(am.is_managed(Concern::UserAccess, "Divorce"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_bool() {
        let err = EngineConfig::from_lookup(lookup_from(&[(ENV_ACCESS_MANAGEMENT_ENABLED, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidConfig(msg) if msg.contains("maybe")));
    }

    #[test]
    fn test_from_lookup_rejects_bad_pattern() {
        let err = EngineConfig::from_lookup(lookup_from(&[(ENV_RESTRICTED_ROLE_PATTERN, "([a-z")]))
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"access_management": {"enabled": true}}"#).unwrap();
        assert!(config.access_management.enabled);
        assert_eq!(config.restricted_role_pattern, DEFAULT_RESTRICTED_ROLE_PATTERN);
    }
}
