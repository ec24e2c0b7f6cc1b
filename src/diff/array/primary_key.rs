use std::collections::HashMap;

use serde_json::Value;

use crate::equality::EqualityCache;
use crate::path::Spath;
use crate::schema::{ArrayPlan, Plan};

use super::super::engine::diff_values;
use super::super::operation::Operation;

fn canonical_key(item: &Value, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reconciles an array whose items carry a stable scalar identifier.
///
/// Duplicate keys on the old side: the first occurrence claims the index; any later
/// occurrence with the same key is left unindexed, so it can only ever surface on the new
/// side as an addition.
pub(crate) fn diff(
    old: &[Value],
    new: &[Value],
    path: &Spath,
    key_field: &str,
    array_plan: &ArrayPlan,
    plan: &Plan,
    cache: &EqualityCache,
) -> Vec<Operation> {
    let mut index: HashMap<String, (usize, &Value)> = HashMap::new();
    for (i, item) in old.iter().enumerate() {
        if let Some(key) = canonical_key(item, key_field) {
            index.entry(key).or_insert((i, item));
        }
    }

    let mut modifications = Vec::new();
    let mut additions = Vec::new();

    for new_item in new {
        let Some(key) = canonical_key(new_item, key_field) else {
            additions.push(Operation::Add {
                path: path.push_append(),
                value: new_item.clone(),
            });
            continue;
        };

        match index.remove(&key) {
            Some((old_index, old_item)) => {
                let changed = if !array_plan.hash_fields.is_empty() {
                    let hash_mismatch = array_plan
                        .hash_fields
                        .iter()
                        .any(|field| old_item.get(field) != new_item.get(field));
                    hash_mismatch || !cache.deep_equal_memo(old_item, new_item, &[])
                } else {
                    !cache.deep_equal_memo(old_item, new_item, &[])
                };

                if changed {
                    modifications.extend(diff_values(
                        Some(old_item),
                        Some(new_item),
                        &path.push_index(old_index),
                        plan,
                        cache,
                    ));
                }
            }
            None => additions.push(Operation::Add {
                path: path.push_append(),
                value: new_item.clone(),
            }),
        }
    }

    let mut removals: Vec<(usize, &Value)> = index.into_values().collect();
    removals.sort_by(|a, b| b.0.cmp(&a.0));

    modifications
        .into_iter()
        .chain(
            removals
                .into_iter()
                .map(|(index, item)| Operation::Remove {
                    path: path.push_index(index),
                    old_value: item.clone(),
                }),
        )
        .chain(additions)
        .collect()
}
