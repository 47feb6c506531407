// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for case data filtering and classification
// Run with: cargo +nightly fuzz run fuzz_case_filter
//
// Input is a JSON object used as both the data and the classification
// document. Filtering must never panic and must keep the two aligned.

#![no_main]

use std::collections::BTreeSet;

use casegate_engine::{apply_classification, filter_case_details};
use casegate_model::{CaseDetails, SecurityClassification};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }
    let Ok(document) = serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(data) else {
        return;
    };

    let case = CaseDetails {
        id: 1,
        reference: 1_504_259_907_353_529,
        jurisdiction: "FUZZ".to_string(),
        case_type_id: "Fuzz".to_string(),
        state: "Open".to_string(),
        security_classification: SecurityClassification::Public,
        created_date: None,
        last_modified: None,
        data: document.clone(),
        data_classification: document,
    };

    let keys: BTreeSet<String> = case.data.keys().step_by(2).cloned().collect();
    let filtered = filter_case_details(&case, &keys);
    assert!(filtered.data.keys().eq(filtered.data_classification.keys()));

    if let Some(classified) = apply_classification(&case, Some(SecurityClassification::Restricted)) {
        assert!(classified.data.keys().all(|k| classified.data_classification.contains_key(k)));
    }
});
