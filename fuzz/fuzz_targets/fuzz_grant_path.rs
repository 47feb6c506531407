// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for grant path classification
// Run with: cargo +nightly fuzz run fuzz_grant_path

#![no_main]

use casegate_engine::rules::{classify, field_path, PathKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(path) = std::str::from_utf8(data) {
        match classify(path) {
            Some(PathKind::Field(id)) => {
                assert!(!id.is_empty());
                assert_eq!(field_path(id), path);
            }
            Some(PathKind::Root) => assert!(path.is_empty()),
            _ => {}
        }
    }
});
