// SPDX-License-Identifier: PMPL-1.0-or-later
//! Security classification filtering.
//!
//! A user may see a case, a data key or an audit event only if their highest
//! classification is at least the classification of the thing. Data keys are
//! classified through `data_classification`, either directly
//! (`"name": "PUBLIC"`) or through a wrapper
//! (`"address": {"classification": "PRIVATE", "value": ...}`). Keys with no
//! readable classification are removed.

use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use casegate_model::{AuditEvent, CaseDetails, Document, SecurityClassification};

/// The highest of a user's classifications, if any.
pub fn user_classification<I>(classifications: I) -> Option<SecurityClassification>
where
    I: IntoIterator<Item = SecurityClassification>,
{
    classifications.into_iter().max()
}

/// The classification recorded for a data key, if readable.
fn key_classification(value: &Value) -> Option<SecurityClassification> {
    match value {
        Value::String(raw) => SecurityClassification::from_str(raw).ok(),
        Value::Object(wrapper) => wrapper
            .get("classification")
            .and_then(Value::as_str)
            .and_then(|raw| SecurityClassification::from_str(raw).ok()),
        _ => None,
    }
}

/// Classic classification step for one case.
///
/// `None` when the user has no classification or the case is classified
/// above the user. Otherwise a copy with over-classified keys removed from
/// both documents.
pub fn apply_classification(
    details: &CaseDetails,
    user_classification: Option<SecurityClassification>,
) -> Option<CaseDetails> {
    let Some(user) = user_classification else {
        debug!(case = details.reference, "User has no security classification");
        return None;
    };
    if !user.higher_or_equal_to(details.security_classification) {
        debug!(
            case = details.reference,
            case_classification = %details.security_classification,
            user_classification = %user,
            "Case classified above user"
        );
        return None;
    }

    let visible: Vec<&String> = details
        .data_classification
        .iter()
        .filter(|(_, value)| key_classification(value).is_some_and(|cls| user.higher_or_equal_to(cls)))
        .map(|(key, _)| key)
        .collect();

    let keep = |document: &Document| -> Document {
        document
            .iter()
            .filter(|(key, _)| visible.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    };

    let mut classified = details.clone();
    classified.data = keep(&details.data);
    classified.data_classification = keep(&details.data_classification);
    Some(classified)
}

/// Events classified at or below the user; none if the user has no
/// classification.
pub fn classify_audit_events(
    user_classification: Option<SecurityClassification>,
    events: &[AuditEvent],
) -> Vec<AuditEvent> {
    let Some(user) = user_classification else {
        return Vec::new();
    };
    events
        .iter()
        .filter(|event| user.higher_or_equal_to(event.security_classification))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use SecurityClassification::{Private, Public, Restricted};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap_or_default()
    }

    fn case(classification: SecurityClassification) -> CaseDetails {
        CaseDetails {
            id: 42,
            reference: 1_504_259_907_353_529,
            jurisdiction: "DIVORCE".to_string(),
            case_type_id: "Divorce".to_string(),
            state: "Open".to_string(),
            security_classification: classification,
            created_date: None,
            last_modified: None,
            data: doc(json!({"name": "Ann", "income": 100, "address": {"street": "1 High St"}})),
            data_classification: doc(json!({
                "name": "PUBLIC",
                "income": "RESTRICTED",
                "address": {"classification": "PRIVATE", "value": {"street": "PRIVATE"}}
            })),
        }
    }

    fn event(id: i64, classification: SecurityClassification) -> AuditEvent {
        AuditEvent {
            id,
            event_id: "submit".to_string(),
            user_id: "u1".to_string(),
            state_id: "Open".to_string(),
            created_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            security_classification: classification,
        }
    }

    #[test]
    fn test_user_classification_is_max() {
        assert_eq!(user_classification([Public, Restricted, Private]), Some(Restricted));
        assert_eq!(user_classification(Vec::new()), None);
    }

    #[test]
    fn test_no_user_classification_hides_case() {
        assert!(apply_classification(&case(Public), None).is_none());
    }

    #[test]
    fn test_case_above_user_is_hidden() {
        assert!(apply_classification(&case(Restricted), Some(Private)).is_none());
    }

    #[test]
    fn test_keys_above_user_removed_from_both_documents() {
        let classified = apply_classification(&case(Public), Some(Private)).unwrap();
        let data_keys: Vec<_> = classified.data.keys().cloned().collect();
        let cls_keys: Vec<_> = classified.data_classification.keys().cloned().collect();
        assert_eq!(data_keys, vec!["address", "name"]);
        assert_eq!(data_keys, cls_keys);
    }

    #[test]
    fn test_unclassified_keys_removed() {
        let mut details = case(Public);
        details.data.insert("orphan".to_string(), json!(1));
        let classified = apply_classification(&details, Some(Restricted)).unwrap();
        assert!(!classified.data.contains_key("orphan"));
        assert_eq!(classified.data.len(), 3);
    }

    #[test]
    fn test_audit_events_filtered_by_rank() {
        let events = vec![event(1, Public), event(2, Private), event(3, Restricted)];
        let visible = classify_audit_events(Some(Private), &events);
        assert_eq!(visible.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(classify_audit_events(None, &events).is_empty());
    }
}
