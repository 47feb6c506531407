// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for filtering, aggregation and ACL inheritance

use proptest::prelude::*;
use serde_json::Value;

use casegate_engine::classic::{apply_acl_inheritance, filter_fields_by_access};
use casegate_engine::pointer::{authorized_read_fields, can_read};
use casegate_engine::rules::{self, PathKind};
use casegate_engine::{filter_case_data, filter_case_details};
use casegate_model::{
    AccessControlList, CaseDetails, CaseField, CaseType, Document, FieldType, GrantTable, Operation,
    PermissionGrant, RoleSet, SecurityClassification,
};

/// Generate arbitrary operation subsets
fn arb_ops() -> impl Strategy<Value = Vec<Operation>> {
    proptest::sample::subsequence(Operation::ALL.to_vec(), 0..=4)
}

/// Generate well-formed and malformed permission paths
fn arb_path() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-e]".prop_map(|id| rules::field_path(&id)),
        "(submit|update)".prop_map(|id| rules::event_path(&id)),
        "(Open|Closed)".prop_map(|id| rules::state_path(&id)),
        "/?[_a-z]{0,8}",
    ]
}

fn arb_grants() -> impl Strategy<Value = GrantTable> {
    proptest::collection::vec((arb_path(), arb_ops()), 0..8).prop_map(|rows| {
        rows.into_iter()
            .map(|(path, ops)| PermissionGrant::new(path, ops))
            .collect()
    })
}

/// Flat documents keyed like field ids
fn arb_document() -> impl Strategy<Value = Document> {
    proptest::collection::btree_map("[a-g]", any::<i64>(), 0..8)
        .prop_map(|entries| entries.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
}

/// Nested JSON values, including collection-item and wrapper shapes
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::btree_map("([a-d]|id|value|classification)", inner.clone(), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            proptest::collection::vec(inner, 0..3).prop_map(Value::Array),
        ]
    })
}

fn arb_nested_document() -> impl Strategy<Value = Document> {
    proptest::collection::btree_map("[a-d]", arb_value(), 0..5)
        .prop_map(|entries| entries.into_iter().collect())
}

fn arb_acl() -> impl Strategy<Value = Vec<AccessControlList>> {
    proptest::collection::vec(
        ("(r1|r2|r3)", arb_ops()).prop_map(|(role, ops)| AccessControlList::new(role, ops)),
        0..3,
    )
}

fn arb_field() -> impl Strategy<Value = CaseField> {
    let leaf = ("[a-d]", arb_acl()).prop_map(|(id, acl)| CaseField {
        id,
        field_type: FieldType::simple("Text"),
        access_control_lists: acl,
    });
    leaf.prop_recursive(3, 16, 4, |inner| {
        ("[a-d]", arb_acl(), any::<bool>(), proptest::collection::vec(inner, 0..4)).prop_map(
            |(id, acl, complex, nested)| {
                let mut field = if complex {
                    CaseField::complex(id, nested)
                } else {
                    CaseField::collection(id, nested)
                };
                field.access_control_lists = acl;
                field
            },
        )
    })
}

fn arb_case_type() -> impl Strategy<Value = CaseType> {
    proptest::collection::vec(arb_field(), 0..4).prop_map(|case_fields| CaseType {
        id: "Divorce".to_string(),
        jurisdiction_id: "DIVORCE".to_string(),
        security_classification: SecurityClassification::Public,
        access_control_lists: vec![],
        case_fields,
        states: vec![],
        events: vec![],
    })
}

fn arb_roles() -> impl Strategy<Value = RoleSet> {
    proptest::collection::btree_set("(r1|r2|r3)", 0..3).prop_map(|roles| roles.into_iter().collect())
}

fn case_with(data: Document, data_classification: Document) -> CaseDetails {
    CaseDetails {
        id: 1,
        reference: 1_504_259_907_353_529,
        jurisdiction: "DIVORCE".to_string(),
        case_type_id: "Divorce".to_string(),
        state: "Open".to_string(),
        security_classification: SecurityClassification::Public,
        created_date: None,
        last_modified: None,
        data,
        data_classification,
    }
}

proptest! {
    #[test]
    fn test_classify_never_panics(path in "\\PC*") {
        let _ = rules::classify(&path);
    }

    #[test]
    fn test_classify_ids_are_never_empty(path in arb_path()) {
        match rules::classify(&path) {
            Some(PathKind::Field(id)) | Some(PathKind::Event(id)) | Some(PathKind::State(id)) => {
                prop_assert!(!id.is_empty());
            }
            Some(PathKind::Root) => {
                prop_assert_eq!(path.as_str(), rules::ROOT_PATH);
            }
            None => {}
        }
    }

    #[test]
    fn test_filter_is_idempotent(
        document in arb_document(),
        keys in proptest::collection::vec("[a-h]", 0..6)
    ) {
        let once = filter_case_data(Some(&document), &keys);
        let twice = filter_case_data(Some(&once), &keys);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_only_keeps_authorized_keys(
        document in arb_document(),
        keys in proptest::collection::vec("[a-h]", 0..6)
    ) {
        let filtered = filter_case_data(Some(&document), &keys);
        for (key, value) in &filtered {
            prop_assert!(keys.contains(key));
            prop_assert_eq!(Some(value), document.get(key));
        }
    }

    #[test]
    fn test_filter_keeps_documents_aligned(
        data in arb_document(),
        keys in proptest::collection::btree_set("[a-h]", 0..6)
    ) {
        let classification: Document = data
            .keys()
            .map(|key| (key.clone(), Value::from("PUBLIC")))
            .collect();
        let filtered = filter_case_details(&case_with(data, classification), &keys);
        let data_keys: Vec<_> = filtered.data.keys().collect();
        let cls_keys: Vec<_> = filtered.data_classification.keys().collect();
        prop_assert_eq!(data_keys, cls_keys);
    }

    #[test]
    fn test_role_aggregation_is_additive(a in arb_grants(), b in arb_grants()) {
        let merged = a.union(&b);
        for (path, ops) in a.iter().chain(b.iter()) {
            let merged_ops = merged.operations(path);
            prop_assert!(merged_ops.is_some_and(|m| ops.is_subset(m)));
        }

        let read_a = authorized_read_fields(&a);
        let read_merged = authorized_read_fields(&merged);
        prop_assert!(read_a.is_subset(&read_merged));

        for state in ["Open", "Closed"] {
            if can_read(&a, state) {
                prop_assert!(can_read(&merged, state));
            }
        }
    }

    #[test]
    fn test_acl_inheritance_is_idempotent(case_type in arb_case_type()) {
        let once = apply_acl_inheritance(&case_type);
        let twice = apply_acl_inheritance(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_classic_filter_is_idempotent(
        case_type in arb_case_type(),
        document in arb_nested_document(),
        roles in arb_roles()
    ) {
        let case_type = apply_acl_inheritance(&case_type);
        let once = filter_fields_by_access(&document, &case_type.case_fields, &roles, Operation::Read);
        let twice = filter_fields_by_access(&once, &case_type.case_fields, &roles, Operation::Read);
        prop_assert_eq!(once, twice);
    }
}
