//! Deep structural equality over `serde_json::Value`, with a memoized cache keyed on
//! object-identity so the diff engine can re-ask "are these the same?" for the same pair of
//! sub-trees without re-walking them.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::schema::ArrayPlan;

/// Strict structural equality: same JSON type, same shape, pairwise-equal children.
/// Numbers and strings compare by `PartialEq` (no `1` == `1.0` coercion); this is a
/// documented design choice, not an oversight (see the Non-goals on value normalization).
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }

    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| deep_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|v2| deep_equal(v, v2)))
        }
        _ => false,
    }
}

fn identity(v: &Value) -> usize {
    v as *const Value as usize
}

/// Memoizes `deep_equal` comparisons between object pairs, keyed by pointer identity.
/// Primitive comparisons are never cached; they're already O(1).
#[derive(Debug, Default)]
pub struct EqualityCache {
    memo: RefCell<HashMap<usize, HashMap<usize, bool>>>,
}

impl EqualityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.memo.borrow_mut().clear();
    }

    /// Deep-equality with an optional hash-field short circuit: if both sides are objects
    /// and `hash_fields` is non-empty, a mismatch on any hash field returns `false`
    /// immediately without comparing the rest of the object.
    pub fn deep_equal_memo(&self, a: &Value, b: &Value, hash_fields: &[String]) -> bool {
        if std::ptr::eq(a, b) {
            return true;
        }

        let (Value::Object(ao), Value::Object(bo)) = (a, b) else {
            return deep_equal(a, b);
        };

        let (ka, kb) = (identity(a), identity(b));
        if let Some(cached) = self.memo.borrow().get(&ka).and_then(|m| m.get(&kb)) {
            return *cached;
        }

        if !hash_fields.is_empty() {
            for field in hash_fields {
                match (ao.get(field), bo.get(field)) {
                    (Some(av), Some(bv)) if av != bv => return false,
                    (Some(_), None) | (None, Some(_)) => return false,
                    _ => {}
                }
            }
        }

        let result = deep_equal(a, b);
        self.memo
            .borrow_mut()
            .entry(ka)
            .or_default()
            .insert(kb, result);
        result
    }
}

/// FNV-1a 32-bit hash of `s`, rendered as 8 lowercase hex digits.
pub fn fast_hash(s: &str) -> String {
    const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
    const FNV_PRIME: u32 = 0x01000193;

    let mut hash = FNV_OFFSET_BASIS;
    for byte in s.as_bytes() {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    format!("{hash:08x}")
}

/// Extracts the comparison identity of an array item under `plan`'s strategy: the
/// primary-key field's value for `PrimaryKey` (falling back to the whole item if the field
/// is missing, so a malformed element still compares structurally rather than panicking),
/// the item itself for `Unique`, and `None` for `Lcs` (callers fall back to
/// `deep_equal_memo`).
pub fn get_identity(plan: &ArrayPlan, item: &Value) -> Option<Value> {
    use crate::schema::Strategy;

    match plan.strategy {
        Strategy::PrimaryKey => {
            let key = plan.primary_key.as_deref()?;
            Some(item.get(key).cloned().unwrap_or_else(|| item.clone()))
        }
        Strategy::Unique => Some(item.clone()),
        Strategy::Lcs => None,
    }
}
