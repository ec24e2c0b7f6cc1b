use std::collections::{BTreeSet, HashSet};

use serde_json::Value;

use crate::path::Spath;

use super::super::operation::Operation;

/// A canonical, totally-ordered stand-in for a scalar `Value`, since `serde_json::Value`
/// isn't `Hash`/`Ord`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum CanonicalScalar {
    Null,
    Bool(bool),
    Number(String),
    String(String),
}

fn canonical(value: &Value) -> CanonicalScalar {
    match value {
        Value::Null => CanonicalScalar::Null,
        Value::Bool(b) => CanonicalScalar::Bool(*b),
        Value::Number(n) => CanonicalScalar::Number(n.to_string()),
        Value::String(s) => CanonicalScalar::String(s.clone()),
        other => CanonicalScalar::String(other.to_string()),
    }
}

/// Reconciles an array of scalar items with no stable positional meaning: elements are
/// identified only by their value.
pub(crate) fn diff(old: &[Value], new: &[Value], path: &Spath) -> Vec<Operation> {
    let s1: BTreeSet<CanonicalScalar> = old.iter().map(canonical).collect();
    let s2: BTreeSet<CanonicalScalar> = new.iter().map(canonical).collect();

    let mut replaced_indices = HashSet::new();
    let mut consumed = HashSet::new();
    let mut ops = Vec::new();

    for i in 0..old.len().min(new.len()) {
        if old[i] != new[i] {
            ops.push(Operation::Replace {
                path: path.push_index(i),
                value: new[i].clone(),
                old_value: old[i].clone(),
            });
            replaced_indices.insert(i);
            consumed.insert(canonical(&new[i]));
        }
    }

    for i in (0..old.len()).rev() {
        let key = canonical(&old[i]);
        if !s2.contains(&key) && !replaced_indices.contains(&i) {
            ops.push(Operation::Remove {
                path: path.push_index(i),
                old_value: old[i].clone(),
            });
        }
    }

    for item in new {
        let key = canonical(item);
        if !s1.contains(&key) && !consumed.contains(&key) {
            ops.push(Operation::Add {
                path: path.push_append(),
                value: item.clone(),
            });
        }
    }

    ops
}
