// SPDX-License-Identifier: PMPL-1.0-or-later
//! Performance benchmarks for casegate access evaluation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use tokio::runtime::Runtime;

use casegate_engine::classic::filter_fields_by_access;
use casegate_engine::pointer::authorized_read_fields;
use casegate_engine::{apply_classification, filter_case_data};
use casegate_model::{
    CaseDetails, CaseField, Document, GrantTable, Operation, PermissionGrant, RoleSet, SecurityClassification,
};
use casegate_storage::{CaseUserStore, GrantedCaseSet, InMemoryCaseUserStore, CREATOR_ROLE};

fn document(fields: usize) -> Document {
    (0..fields)
        .map(|i| (format!("field{i}"), json!(format!("value {i}"))))
        .collect()
}

fn classifications(fields: usize) -> Document {
    (0..fields)
        .map(|i| {
            let level = if i % 3 == 0 { "PRIVATE" } else { "PUBLIC" };
            (format!("field{i}"), Value::from(level))
        })
        .collect()
}

/// Read grants on every other field, spread over `roles` roles.
fn grant_table(fields: usize, roles: usize) -> GrantTable {
    let mut table = GrantTable::default();
    for role in 0..roles {
        let rows: GrantTable = (0..fields)
            .filter(|i| i % 2 == 0 && i % roles == role)
            .map(|i| PermissionGrant::new(format!("/__field/field{i}"), [Operation::Read]))
            .chain([PermissionGrant::new("", [Operation::Read])])
            .collect();
        table = table.union(&rows);
    }
    table
}

// ============================================================================
// Pointer Regime Benchmarks
// ============================================================================

fn bench_pointer_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer");

    for size in [10, 100, 1000] {
        let data = document(size);
        let grants = grant_table(size, 4);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("authorized_read_fields", size), &grants, |b, grants| {
            b.iter(|| black_box(authorized_read_fields(grants)))
        });

        let keys = authorized_read_fields(&grants);
        group.bench_with_input(BenchmarkId::new("filter_case_data", size), &data, |b, data| {
            b.iter(|| black_box(filter_case_data(Some(data), &keys)))
        });
    }

    group.finish();
}

fn bench_grant_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer");

    for roles in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::new("merge_roles", roles), &roles, |b, &roles| {
            b.iter(|| black_box(grant_table(200, roles)))
        });
    }

    group.finish();
}

// ============================================================================
// Classic Regime Benchmarks
// ============================================================================

fn bench_classic_filter(c: &mut Criterion) {
    let roles: RoleSet = ["caseworker"].into_iter().collect();
    let nested: Vec<CaseField> = (0..10)
        .map(|i| {
            let field = CaseField::simple(format!("line{i}"), "Text");
            if i % 2 == 0 {
                field.with_acl("caseworker", [Operation::Read])
            } else {
                field
            }
        })
        .collect();
    let fields = vec![
        CaseField::complex("address", nested.clone()).with_acl("caseworker", [Operation::Read]),
        CaseField::collection("history", nested).with_acl("caseworker", [Operation::Read]),
    ];

    let item: Value = (0..10).map(|i| (format!("line{i}"), json!(i))).collect::<Document>().into();
    let history: Vec<Value> = (0..100)
        .map(|i| json!({"id": i.to_string(), "value": item.clone()}))
        .collect();
    let data: Document = json!({"address": item, "history": history})
        .as_object()
        .cloned()
        .unwrap_or_default();

    let mut group = c.benchmark_group("classic");
    group.bench_function("filter_nested_collection", |b| {
        b.iter(|| black_box(filter_fields_by_access(&data, &fields, &roles, Operation::Read)))
    });
    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");

    for size in [10, 100, 1000] {
        let case = CaseDetails {
            id: 1,
            reference: 1_504_259_907_353_529,
            jurisdiction: "DIVORCE".to_string(),
            case_type_id: "Divorce".to_string(),
            state: "Open".to_string(),
            security_classification: SecurityClassification::Public,
            created_date: None,
            last_modified: None,
            data: document(size),
            data_classification: classifications(size),
        };
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("apply_public", size), &case, |b, case| {
            b.iter(|| black_box(apply_classification(case, Some(SecurityClassification::Public))))
        });
    }

    group.finish();
}

// ============================================================================
// Explicit Grant Benchmarks
// ============================================================================

fn bench_granted_snapshot(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = InMemoryCaseUserStore::new();
    rt.block_on(async {
        for case_id in 0..1000 {
            let user_id = format!("user-{}", case_id % 50);
            store.grant_access(case_id, &user_id, None, CREATOR_ROLE).await.unwrap();
        }
    });

    let mut group = c.benchmark_group("storage");
    group.bench_function("load_granted_cases", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(GrantedCaseSet::load(&store, &["user-7"]).await.unwrap())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_pointer_filter,
    bench_grant_aggregation,
    bench_classic_filter,
    bench_classification,
    bench_granted_snapshot,
);
criterion_main!(benches);
