use serde_json::Value;

use crate::equality::{deep_equal, EqualityCache};
use crate::path::Spath;
use crate::schema::Plan;

use super::array;
use super::operation::Operation;

/// Diffs `doc1` against `doc2` under `plan`. When `partial_keys` is non-empty, only the
/// sub-documents located at those pointers are considered; a key absent from `doc1` is
/// skipped with a warning rather than failing the whole call.
pub fn diff(doc1: &Value, doc2: &Value, plan: &Plan, partial_keys: &[Spath]) -> Vec<Operation> {
    let cache = EqualityCache::new();

    if partial_keys.is_empty() {
        return diff_values(Some(doc1), Some(doc2), &Spath::root(), plan, &cache);
    }

    let mut ops = Vec::new();
    for key in partial_keys {
        let Ok(sub1) = crate::resolve::resolve_ref(doc1, key) else {
            tracing::warn!(path = %key, "partial diff key not found in old document, skipping");
            continue;
        };
        let sub2 = crate::resolve::resolve_ref(doc2, key).ok();
        ops.extend(diff_values(Some(sub1), sub2, key, plan, &cache));
    }
    ops
}

/// The recursive value dispatcher shared by the top-level `diff` entry point and the array
/// strategies (which recurse back into it for common/modified elements).
pub(crate) fn diff_values(
    a: Option<&Value>,
    b: Option<&Value>,
    path: &Spath,
    plan: &Plan,
    cache: &EqualityCache,
) -> Vec<Operation> {
    match (a, b) {
        (Some(a), Some(b)) if std::ptr::eq(a, b) => Vec::new(),
        (None, Some(b)) => vec![Operation::Add {
            path: path.clone(),
            value: b.clone(),
        }],
        (Some(a), None) => vec![Operation::Remove {
            path: path.clone(),
            old_value: a.clone(),
        }],
        (Some(a), Some(b)) => diff_present(a, b, path, plan, cache),
        (None, None) => Vec::new(),
    }
}

fn diff_present(a: &Value, b: &Value, path: &Spath, plan: &Plan, cache: &EqualityCache) -> Vec<Operation> {
    match (a, b) {
        (Value::Array(a_items), Value::Array(b_items)) => {
            array::dispatch(a_items, b_items, path, plan, cache)
        }
        (Value::Object(a_map), Value::Object(b_map)) => diff_object(a_map, b_map, path, plan, cache),
        (Value::Array(_), _) | (_, Value::Array(_)) => replace(path, a, b),
        (Value::Object(_), _) | (_, Value::Object(_)) => replace(path, a, b),
        _ => {
            if deep_equal(a, b) {
                Vec::new()
            } else {
                replace(path, a, b)
            }
        }
    }
}

fn diff_object(
    a: &serde_json::Map<String, Value>,
    b: &serde_json::Map<String, Value>,
    path: &Spath,
    plan: &Plan,
    cache: &EqualityCache,
) -> Vec<Operation> {
    let mut ops = Vec::new();

    // union of keys, old keys first then new-only keys, for deterministic object traversal.
    for key in a.keys() {
        let child_path = path.push(key);
        ops.extend(diff_values(a.get(key), b.get(key), &child_path, plan, cache));
    }

    for key in b.keys() {
        if a.contains_key(key) {
            continue;
        }
        let child_path = path.push(key);
        ops.extend(diff_values(None, b.get(key), &child_path, plan, cache));
    }

    ops
}

fn replace(path: &Spath, a: &Value, b: &Value) -> Vec<Operation> {
    vec![Operation::Replace {
        path: path.clone(),
        value: b.clone(),
        old_value: a.clone(),
    }]
}
