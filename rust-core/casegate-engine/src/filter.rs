// SPDX-License-Identifier: PMPL-1.0-or-later
//! Top-level key filtering of case documents.
//!
//! One pass, one level: nested structures are only walked by the classic
//! evaluator, which drives its own recursion over the field-type tree.

use std::collections::BTreeSet;

use casegate_model::{CaseDetails, Document};

/// Copy the keys of `document` that appear in `authorized_keys`.
///
/// Order and duplicates in `authorized_keys` do not matter; authorized keys
/// missing from the document are ignored. An absent document yields an empty
/// one.
pub fn filter_case_data<I, S>(document: Option<&Document>, authorized_keys: I) -> Document
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(document) = document else {
        return Document::new();
    };
    let authorized: BTreeSet<String> = authorized_keys
        .into_iter()
        .map(|key| key.as_ref().to_string())
        .collect();

    document
        .iter()
        .filter(|(key, _)| authorized.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Apply the same document transform to `data` and `data_classification`,
/// returning a new case and leaving `details` untouched.
pub fn map_documents(details: &CaseDetails, transform: impl Fn(&Document) -> Document) -> CaseDetails {
    let mut filtered = details.clone();
    filtered.data = transform(&details.data);
    filtered.data_classification = transform(&details.data_classification);
    filtered
}

/// Keep only `authorized_keys` in both documents of a case.
pub fn filter_case_details(details: &CaseDetails, authorized_keys: &BTreeSet<String>) -> CaseDetails {
    map_documents(details, |doc| filter_case_data(Some(doc), authorized_keys))
}

/// The case with both documents emptied (present, not absent).
pub fn empty_documents(details: &CaseDetails) -> CaseDetails {
    map_documents(details, |_| Document::new())
}
