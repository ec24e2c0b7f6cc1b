//! Integration tests for the universal properties documented in SPEC_FULL.md §8.
//!
//! There is no random document generator here (generators are an explicit Non-goal of the
//! core); instead each property is exercised against a small, deterministic, hand-rolled set
//! of representative documents.

use std::collections::BTreeMap;

use jsondiff_schema::diff::{diff, Operation};
use jsondiff_schema::equality::{deep_equal, EqualityCache};
use jsondiff_schema::patch::apply;
use jsondiff_schema::path::Spath;
use jsondiff_schema::schema::{Plan, Planner, PlannerOptions};
use serde_json::{json, Value};

fn path(raw: &str) -> Spath {
    raw.try_into().unwrap()
}

fn sample_documents() -> Vec<(Value, Value)> {
    vec![
        (json!({"a": 1}), json!({"a": 2})),
        (json!({"a": 1, "b": 2}), json!({"b": 2})),
        (
            json!({"services": [
                {"id": "api", "port": 8080},
                {"id": "web", "port": 8081},
            ]}),
            json!({"services": [
                {"id": "web", "port": 9090},
                {"id": "api", "port": 8080},
                {"id": "db", "port": 5432},
            ]}),
        ),
        (json!({"tags": ["a", "b", "c"]}), json!({"tags": ["a", "x"]})),
        (json!(null), json!({"a": 1})),
        (json!([1, 2, 3]), json!([1, 2, 3])),
    ]
}

fn services_plan() -> Plan {
    let schema = json!({
        "type": "object",
        "properties": {
            "services": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "port"],
                    "properties": {
                        "id": { "type": "string" },
                        "port": { "type": "number" }
                    }
                }
            }
        }
    });
    Planner::new(PlannerOptions::default()).build(&schema)
}

#[test]
fn identity_diff_of_a_document_with_itself_is_empty() {
    let plan = services_plan();
    for (old, _) in sample_documents() {
        let ops = diff(&old, &old, &plan, &[]);
        assert!(ops.is_empty(), "expected no delta diffing {old:?} against itself");
    }
}

#[test]
fn apply_soundness_round_trips_every_sample_pair() {
    let plan = services_plan();
    for (old, new) in sample_documents() {
        let ops = diff(&old, &new, &plan, &[]);
        let mut patched = old.clone();
        apply(&mut patched, &ops).unwrap();
        assert!(
            deep_equal(&patched, &new),
            "applying diff(old, new) to old did not reproduce new: {patched:?} != {new:?}"
        );
    }
}

#[test]
fn minimality_unchanged_primary_key_elements_produce_no_delta() {
    let plan = services_plan();
    let old = json!({"services": [{"id": "api", "port": 8080}]});
    let new = json!({"services": [
        {"id": "api", "port": 8080},
        {"id": "web", "port": 8081},
    ]});

    let ops = diff(&old, &new, &plan, &[]);

    // The unchanged "api" element at index 0 must not surface any delta at all.
    assert!(!ops.iter().any(|op| op.path() == &path("/services/0")));
    assert_eq!(ops.len(), 1);
    assert!(matches!(&ops[0], Operation::Add { .. }));
}

#[test]
fn primary_key_ordering_puts_removals_before_additions_and_descending_by_index() {
    let plan = services_plan();
    let old = json!({"services": [
        {"id": "a", "port": 1},
        {"id": "b", "port": 2},
        {"id": "c", "port": 3},
    ]});
    let new = json!({"services": [
        {"id": "a", "port": 1},
        {"id": "d", "port": 4},
    ]});

    let ops = diff(&old, &new, &plan, &[]);

    // Expect: Remove(/services/2) [c], Remove(/services/1) [b], Add(/services/-) [d]
    let kinds: Vec<&str> = ops.iter().map(Operation::op_name).collect();
    assert_eq!(kinds, vec!["remove", "remove", "add"]);

    let remove_indices: Vec<&str> = ops
        .iter()
        .filter(|op| op.op_name() == "remove")
        .map(|op| op.path().last().unwrap())
        .collect();
    assert_eq!(remove_indices, vec!["2", "1"]);
}

#[test]
fn deterministic_output_is_stable_across_repeated_runs() {
    let plan = services_plan();
    let (old, new) = &sample_documents()[2];

    let first = diff(old, new, &plan, &[]);
    let second = diff(old, new, &plan, &[]);

    assert_eq!(first, second);
}

#[test]
fn ignored_path_property_only_surfaces_deltas_under_the_requested_prefix() {
    let plan = services_plan();
    let old = json!({
        "name": "old",
        "services": [{"id": "api", "port": 8080}],
    });
    let new = json!({
        "name": "new",
        "services": [{"id": "api", "port": 9090}],
    });

    let restricted = diff(&old, &new, &plan, &[path("/services")]);
    assert!(restricted
        .iter()
        .all(|op| op.path().starts_with(&path("/services"))));

    let full = diff(&old, &new, &plan, &[]);
    let under_services: Vec<_> = full
        .iter()
        .filter(|op| op.path().starts_with(&path("/services")))
        .collect();
    assert_eq!(restricted.len(), under_services.len());
}

#[test]
fn equality_cache_invariance_memoized_lookups_match_uncached_comparisons() {
    let cache = EqualityCache::new();
    let hash_fields: Vec<String> = Vec::new();

    let pairs = [
        (json!({"id": "a", "v": 1}), json!({"id": "a", "v": 1})),
        (json!({"id": "a", "v": 1}), json!({"id": "a", "v": 2})),
        (json!(1), json!(1)),
        (json!("x"), json!("y")),
    ];

    for (a, b) in &pairs {
        let direct = deep_equal(a, b);
        let first_memo = cache.deep_equal_memo(a, b, &hash_fields);
        let second_memo = cache.deep_equal_memo(a, b, &hash_fields);
        assert_eq!(direct, first_memo);
        assert_eq!(first_memo, second_memo);
    }
}

#[test]
fn planner_primary_key_map_override_wins_over_schema_heuristics() {
    let schema = json!({
        "type": "object",
        "properties": {
            "items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "sku"],
                    "properties": {
                        "id": { "type": "string" },
                        "sku": { "type": "string" }
                    }
                }
            }
        }
    });

    let mut overrides = BTreeMap::new();
    overrides.insert("/items".to_string(), "sku".to_string());
    let options = PlannerOptions {
        primary_key_map: overrides,
        base_path: None,
    };
    let plan = Planner::new(options).build(&schema);

    let old = json!({"items": [{"id": "1", "sku": "x"}]});
    let new = json!({"items": [{"id": "2", "sku": "x"}]});

    let ops = diff(&old, &new, &plan, &[]);
    assert!(ops.is_empty(), "sku override should treat these as the same item");
}
