use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Value;

use crate::path::Spath;

/// The per-array matching algorithm chosen by the Planner.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Lcs,
    PrimaryKey,
    Unique,
}

/// How to reconcile one array found at a given schema path.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPlan {
    pub strategy: Strategy,
    pub primary_key: Option<String>,
    pub hash_fields: Vec<String>,
    pub item_schema: Option<Value>,
    pub required_fields: BTreeSet<String>,
}

impl ArrayPlan {
    pub(crate) fn scalar() -> Self {
        ArrayPlan {
            strategy: Strategy::Unique,
            primary_key: None,
            hash_fields: Vec::new(),
            item_schema: None,
            required_fields: BTreeSet::new(),
        }
    }

    pub(crate) fn lcs(item_schema: Option<Value>, required_fields: BTreeSet<String>) -> Self {
        ArrayPlan {
            strategy: Strategy::Lcs,
            primary_key: None,
            hash_fields: Vec::new(),
            item_schema,
            required_fields,
        }
    }

    pub(crate) fn primary_key(
        key: String,
        hash_fields: Vec<String>,
        item_schema: Option<Value>,
        required_fields: BTreeSet<String>,
    ) -> Self {
        ArrayPlan {
            strategy: Strategy::PrimaryKey,
            primary_key: Some(key),
            hash_fields,
            item_schema,
            required_fields,
        }
    }
}

/// Compiled mapping from a schema-shaped document path to the [`ArrayPlan`] governing the
/// array found there. Immutable once built; shared behind `Arc` by the façade.
#[derive(Debug, Default, Clone)]
pub struct Plan {
    pub(crate) arrays: BTreeMap<String, ArrayPlan>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, path: &Spath, plan: ArrayPlan) {
        self.arrays.insert(path.to_string(), plan);
    }

    /// Three-step plan lookup: exact path, digit-segments stripped, then the stripped
    /// path's parent joined with `/*`.
    pub fn lookup(&self, path: &Spath) -> Option<&ArrayPlan> {
        if let Some(plan) = self.arrays.get(&path.to_string()) {
            return Some(plan);
        }

        let normalized = path.normalized();
        if let Some(plan) = self.arrays.get(&normalized.to_string()) {
            return Some(plan);
        }

        if let Some(parent) = normalized.parent() {
            let wildcard = parent.push_wildcard();
            if let Some(plan) = self.arrays.get(&wildcard.to_string()) {
                return Some(plan);
            }
        }

        None
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    fn path(raw: &str) -> Spath {
        raw.try_into().unwrap()
    }

    #[test]
    fn lookup_falls_back_from_exact_to_normalized_to_wildcard() {
        let mut plan = Plan::new();
        // an array living directly under an `additionalProperties` dynamic key is stored
        // with a literal `*` standing in for that key.
        plan.insert(&path("/envs/*"), ArrayPlan::scalar());

        // the concrete document uses a real env name instead of `*`.
        check!(plan.lookup(&path("/envs/production")).is_some());
    }

    #[test]
    fn lookup_normalizes_numeric_segments_before_falling_back() {
        let mut plan = Plan::new();
        plan.insert(&path("/services"), ArrayPlan::scalar());

        // a nested array's own schema path collapses back to `/services` once the
        // enclosing array's concrete index is stripped.
        check!(plan.lookup(&path("/services/0")).is_some());
        check!(plan.lookup(&path("/other")).is_none());
    }

    #[test]
    fn lookup_prefers_exact_match() {
        let mut plan = Plan::new();
        plan.insert(&path("/items"), ArrayPlan::primary_key("id".into(), vec![], None, Default::default()));
        plan.insert(&path("/items/*"), ArrayPlan::scalar());

        let found = plan.lookup(&path("/items")).unwrap();
        check!(found.strategy == Strategy::PrimaryKey);
    }
}
