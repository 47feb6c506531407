// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for the casegate CLI world
//!
//! A fixture with one pointer-managed case type (Divorce) and one classic
//! case type (Probate), driven through the same calls the binary makes.

use serde_json::json;

use casegate_cli::{Fixture, World};
use casegate_engine::{AccessLevel, RequestContext};
use casegate_model::{CaseAccess, CaseDataContent, Event, SecurityClassification};
use casegate_storage::{CaseUserStore, CREATOR_ROLE};

const DIVORCE_REF: &str = "1504259907353529";
const PROBATE_REF: &str = "1504259907353537";

const FIXTURE: &str = r#"{
  "config": {
    "access_management": {
      "enabled": true,
      "authorised_case_types": ["Divorce"],
      "classified_case_types": ["Divorce"]
    }
  },
  "case_types": [
    {
      "id": "Probate",
      "jurisdiction_id": "PROBATE",
      "access_control_lists": [
        {"role": "caseworker-probate", "operations": ["CREATE", "READ"]},
        {"role": "caseworker-probate-clerk", "operations": ["CREATE"]}
      ],
      "case_fields": [
        {"id": "name", "field_type": {"type": "Text"}, "access_control_lists": [
          {"role": "caseworker-probate", "operations": ["CREATE", "READ"]},
          {"role": "caseworker-probate-clerk", "operations": ["CREATE"]}
        ]},
        {"id": "estate", "field_type": {"type": "Text"}, "access_control_lists": [
          {"role": "caseworker-probate", "operations": ["CREATE"]}
        ]}
      ],
      "states": [
        {"id": "Open", "access_control_lists": [
          {"role": "caseworker-probate", "operations": ["READ"]}
        ]}
      ],
      "events": [
        {"id": "createCase", "access_control_lists": [
          {"role": "caseworker-probate", "operations": ["CREATE"]},
          {"role": "caseworker-probate-clerk", "operations": ["CREATE"]}
        ]}
      ]
    }
  ],
  "grants": [
    {"jurisdiction": "DIVORCE", "case_type": "Divorce", "role": "caseworker-divorce", "operations": ["READ"]},
    {"jurisdiction": "DIVORCE", "case_type": "Divorce", "role": "caseworker-divorce", "path": "/__state/Open", "operations": ["READ"]},
    {"jurisdiction": "DIVORCE", "case_type": "Divorce", "role": "caseworker-divorce", "path": "/__field/name", "operations": ["READ"]},
    {"jurisdiction": "DIVORCE", "case_type": "Divorce", "role": "citizen", "operations": ["READ"]},
    {"jurisdiction": "DIVORCE", "case_type": "Divorce", "role": "citizen", "path": "/__state/Open", "operations": ["READ"]},
    {"jurisdiction": "DIVORCE", "case_type": "Divorce", "role": "citizen", "path": "/__field/name", "operations": ["READ"]},
    {"jurisdiction": "DIVORCE", "case_type": "Divorce", "role": "citizen", "path": "/__field/address", "operations": ["READ"]}
  ],
  "cases": [
    {
      "id": 42,
      "reference": 1504259907353529,
      "jurisdiction": "DIVORCE",
      "case_type_id": "Divorce",
      "state": "Open",
      "data": {"name": "Ann", "address": "1 High St", "income": 100},
      "data_classification": {"name": "PUBLIC", "address": "PRIVATE", "income": "PUBLIC"}
    },
    {
      "id": 43,
      "reference": 1504259907353537,
      "jurisdiction": "PROBATE",
      "case_type_id": "Probate",
      "state": "Open",
      "data": {"name": "Bob", "estate": 5000},
      "data_classification": {"name": "PUBLIC", "estate": "PUBLIC"}
    }
  ]
}"#;

async fn world() -> World {
    let fixture = Fixture::from_json(FIXTURE).unwrap();
    World::from_fixture(&fixture).await.unwrap()
}

fn user(user_id: &str, roles: &[&str]) -> RequestContext {
    RequestContext::new(user_id, roles.iter().copied().collect())
        .with_classifications([SecurityClassification::Public])
}

#[tokio::test]
async fn test_pointer_read_keeps_granted_fields() {
    let world = world().await;

    let case = world
        .get_case(&user("cw1", &["caseworker-divorce"]), "DIVORCE", DIVORCE_REF)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(case.data.keys().collect::<Vec<_>>(), vec!["name"]);
    assert_eq!(case.data_classification.keys().collect::<Vec<_>>(), vec!["name"]);
}

#[tokio::test]
async fn test_pointer_classification_is_not_applied() {
    let world = world().await;
    world
        .grant("DIVORCE", DIVORCE_REF, &CaseAccess { id: "c1".to_string(), reason_for_access: None })
        .await
        .unwrap();

    // PRIVATE address survives for a PUBLIC user: Divorce is classified by grants.
    let case = world
        .get_case(&user("c1", &["citizen"]), "DIVORCE", DIVORCE_REF)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(case.data.keys().collect::<Vec<_>>(), vec!["address", "name"]);
}

#[tokio::test]
async fn test_restricted_user_needs_explicit_grant() {
    let world = world().await;
    let citizen = user("c1", &["citizen"]);

    let report = world.can_access(&citizen, "DIVORCE", DIVORCE_REF).await.unwrap();
    assert_eq!(report.access_level, AccessLevel::Granted);
    assert!(!report.can_access);
    assert!(world.get_case(&citizen, "DIVORCE", DIVORCE_REF).await.unwrap().is_none());

    let users = world
        .grant(
            "DIVORCE",
            DIVORCE_REF,
            &CaseAccess { id: "c1".to_string(), reason_for_access: Some("applicant".to_string()) },
        )
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert!(world.can_access(&citizen, "DIVORCE", DIVORCE_REF).await.unwrap().can_access);
    assert!(world.get_case(&citizen, "DIVORCE", DIVORCE_REF).await.unwrap().is_some());

    assert!(world.revoke("DIVORCE", DIVORCE_REF, "c1").await.unwrap());
    assert!(world.get_case(&citizen, "DIVORCE", DIVORCE_REF).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_reference_is_an_error() {
    let world = world().await;
    let err = world
        .get_case(&user("cw1", &["caseworker-divorce"]), "DIVORCE", "1111222233334444")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("1111222233334444"));
}

#[tokio::test]
async fn test_classic_read_filters_by_field_acl() {
    let world = world().await;

    let case = world
        .get_case(&user("cw2", &["caseworker-probate"]), "PROBATE", PROBATE_REF)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(case.data.keys().collect::<Vec<_>>(), vec!["name"]);

    // No classification carried: classic classification hides the case.
    let unclassified = RequestContext::new("cw2", ["caseworker-probate"].into_iter().collect());
    assert!(world.get_case(&unclassified, "PROBATE", PROBATE_REF).await.unwrap().is_none());
}

#[tokio::test]
async fn test_classic_create_stores_case_and_grants_creator() {
    let world = world().await;
    let ctx = user("cw2", &["caseworker-probate"]);
    let content = CaseDataContent {
        event: Some(Event::new("createCase")),
        data: json!({"name": "Cat", "estate": 10}).as_object().cloned().unwrap(),
        token: None,
        ignore_warning: false,
    };

    let created = world
        .create_case(&ctx, "PROBATE", "Probate", "Open", Some(&content))
        .await
        .unwrap();

    assert_eq!(created.stored.data.len(), 2);
    assert_eq!(created.stored.data_classification["estate"], json!("PUBLIC"));
    let visible = created.visible.unwrap();
    assert_eq!(visible.data.keys().collect::<Vec<_>>(), vec!["name"]);

    let roles = world.users.find_case_roles(created.stored.id, "cw2").await.unwrap();
    assert!(roles.contains(CREATOR_ROLE));

    let reference = created.stored.reference.to_string();
    assert!(world.get_case(&ctx, "PROBATE", &reference).await.unwrap().is_some());
}

#[tokio::test]
async fn test_classic_create_denied_for_unwritable_field() {
    let world = world().await;
    let clerk = user("cl1", &["caseworker-probate-clerk"]);
    let content = CaseDataContent {
        event: Some(Event::new("createCase")),
        data: json!({"name": "Cat", "estate": 10}).as_object().cloned().unwrap(),
        token: None,
        ignore_warning: false,
    };

    assert!(world
        .create_case(&clerk, "PROBATE", "Probate", "Open", Some(&content))
        .await
        .is_err());
    assert_eq!(world.directory.len().await, 2);
}

#[tokio::test]
async fn test_start_event_without_case_type_read_empties_documents() {
    let world = world().await;

    let trigger = world
        .start_event(
            &user("cl1", &["caseworker-probate-clerk"]),
            "PROBATE",
            PROBATE_REF,
            "createCase",
            Some("token".to_string()),
        )
        .await
        .unwrap();
    assert!(trigger.case_details.data.is_empty());
    assert!(trigger.case_details.data_classification.is_empty());
    assert_eq!(trigger.token.as_deref(), Some("token"));

    let trigger = world
        .start_event(&user("cw2", &["caseworker-probate"]), "PROBATE", PROBATE_REF, "createCase", None)
        .await
        .unwrap();
    assert_eq!(trigger.case_details.data.keys().collect::<Vec<_>>(), vec!["name"]);
}
