// SPDX-License-Identifier: PMPL-1.0-or-later
//! Case records and the request payloads that carry them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SecurityClassification;

/// A JSON object keyed by case field id.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A stored case.
///
/// `data` and `data_classification` have identical shape: every key in one
/// has a counterpart in the other. Anything that removes keys from one must
/// remove the same keys from the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDetails {
    /// Database id; explicit per-case grants are keyed by it.
    pub id: i64,
    /// Public 16-digit case reference.
    pub reference: i64,
    pub jurisdiction: String,
    pub case_type_id: String,
    pub state: String,
    #[serde(default)]
    pub security_classification: SecurityClassification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: Document,
    #[serde(default)]
    pub data_classification: Document,
}

impl CaseDetails {
    pub fn reference_as_string(&self) -> String {
        self.reference.to_string()
    }
}

/// The event submitted alongside case data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "id")]
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Event {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            summary: None,
            description: None,
        }
    }
}

/// Payload of a create-case request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDataContent {
    #[serde(default)]
    pub event: Option<Event>,
    #[serde(default)]
    pub data: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub ignore_warning: bool,
}

/// Result of starting an event: the case as the event form should show it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartEventTrigger {
    pub case_details: CaseDetails,
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl StartEventTrigger {
    pub fn jurisdiction_id(&self) -> &str {
        &self.case_details.jurisdiction
    }

    pub fn case_type_id(&self) -> &str {
        &self.case_details.case_type_id
    }
}

/// A user explicitly granted access to a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseAccess {
    /// User id.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_access: Option<String>,
}

/// An entry in a case's event history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: i64,
    pub event_id: String,
    pub user_id: String,
    pub state_id: String,
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub security_classification: SecurityClassification,
}
