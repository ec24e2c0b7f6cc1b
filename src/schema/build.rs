use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::path::Spath;

use super::error::SchemaError;
use super::plan::{ArrayPlan, Plan};

const IDENTIFIER_CANDIDATES: [&str; 3] = ["id", "name", "port"];

/// Overrides and knobs that win over the Planner's own heuristics.
#[derive(Debug, Default, Clone)]
pub struct PlannerOptions {
    /// `docPath -> field`, wins over the schema-derived primary key guess.
    pub primary_key_map: BTreeMap<String, String>,
    /// A prefix stripped from every key before it's inserted into the `Plan`.
    pub base_path: Option<String>,
}

/// Compiles a JSON Schema into a [`Plan`] mapping document paths to [`ArrayPlan`]s.
pub struct Planner {
    options: PlannerOptions,
}

impl Planner {
    pub fn new(options: PlannerOptions) -> Self {
        Planner { options }
    }

    /// Builds a `Plan`, logging and discarding any `$ref` resolution failures.
    pub fn build(&self, root_schema: &Value) -> Plan {
        let (plan, diagnostics) = self.build_with_diagnostics(root_schema);
        for error in diagnostics {
            tracing::warn!(%error, "schema planner skipped a subtree");
        }
        plan
    }

    /// Builds a `Plan`, returning every `$ref` resolution failure encountered along the way
    /// instead of only logging it.
    pub fn build_with_diagnostics(&self, root_schema: &Value) -> (Plan, Vec<SchemaError>) {
        let mut ctx = BuildCtx {
            root: root_schema,
            plan: Plan::new(),
            diagnostics: Vec::new(),
            visited_refs: BTreeSet::new(),
            options: &self.options,
        };

        ctx.walk(root_schema, &Spath::root());

        (ctx.plan, ctx.diagnostics)
    }
}

struct BuildCtx<'a> {
    root: &'a Value,
    plan: Plan,
    diagnostics: Vec<SchemaError>,
    visited_refs: BTreeSet<String>,
    options: &'a PlannerOptions,
}

impl<'a> BuildCtx<'a> {
    fn walk(&mut self, schema: &'a Value, doc_path: &Spath) {
        let Some(schema) = schema.as_object() else {
            return;
        };

        if let Some(Value::String(r)) = schema.get("$ref") {
            let Some(resolved) = self.resolve_ref(r) else {
                return;
            };
            if !self.visited_refs.insert(r.clone()) {
                return;
            }
            self.walk(resolved, doc_path);
            self.visited_refs.remove(r);
            return;
        }

        for keyword in ["anyOf", "oneOf", "allOf"] {
            if let Some(Value::Array(branches)) = schema.get(keyword) {
                for branch in branches {
                    self.walk(branch, doc_path);
                }
            }
        }

        match schema.get("type").and_then(Value::as_str) {
            Some("object") => self.walk_object(schema, doc_path),
            Some("array") => self.walk_array(schema, doc_path),
            _ => {}
        }
    }

    fn walk_object(&mut self, schema: &'a serde_json::Map<String, Value>, doc_path: &Spath) {
        if let Some(Value::Object(properties)) = schema.get("properties") {
            for (key, child_schema) in properties {
                self.walk(child_schema, &doc_path.push(key));
            }
        }

        if let Some(additional) = schema.get("additionalProperties") {
            if additional.is_object() {
                self.walk(additional, &doc_path.push_wildcard());
            }
        }
    }

    fn walk_array(&mut self, schema: &'a serde_json::Map<String, Value>, doc_path: &Spath) {
        let array_plan = self.derive_array_plan(schema, doc_path);
        self.plan.insert(&self.stripped(doc_path), array_plan);

        if let Some(items) = schema.get("items") {
            let resolved = self.resolve_one_ref_hop(items);
            self.walk(resolved, doc_path);
        }
    }

    fn stripped(&self, doc_path: &Spath) -> Spath {
        match &self.options.base_path {
            Some(prefix) => {
                let prefix_path: Spath = prefix.as_str().try_into().unwrap_or_default();
                doc_path.strip_prefix(&prefix_path).unwrap_or_else(|| doc_path.clone())
            }
            None => doc_path.clone(),
        }
    }

    fn derive_array_plan(
        &mut self,
        schema: &'a serde_json::Map<String, Value>,
        doc_path: &Spath,
    ) -> ArrayPlan {
        let items = schema.get("items");
        let item_schema = items.map(|i| self.resolve_one_ref_hop(i)).cloned();

        if is_scalar_schema(item_schema.as_ref()) {
            return ArrayPlan::scalar();
        }

        if let Some(field) = self.options.primary_key_map.get(&doc_path.to_string()) {
            let (hash_fields, required) = hash_fields_and_required(item_schema.as_ref());
            return ArrayPlan::primary_key(field.clone(), hash_fields, item_schema, required);
        }

        let (hash_fields, required) = hash_fields_and_required(item_schema.as_ref());

        let candidate = IDENTIFIER_CANDIDATES.iter().find(|candidate| {
            required.contains(**candidate) && field_is_scalar(item_schema.as_ref(), candidate)
        });

        match candidate {
            Some(field) => {
                ArrayPlan::primary_key((*field).to_string(), hash_fields, item_schema, required)
            }
            None => ArrayPlan::lcs(item_schema, required),
        }
    }

    fn resolve_one_ref_hop(&mut self, schema: &'a Value) -> &'a Value {
        if let Some(Value::String(r)) = schema.get("$ref") {
            if let Some(resolved) = self.resolve_ref(r) {
                return resolved;
            }
        }
        schema
    }

    fn resolve_ref(&mut self, reference: &str) -> Option<&'a Value> {
        let Some(pointer) = reference.strip_prefix("#/") else {
            self.diagnostics
                .push(SchemaError::UnsupportedRef(reference.to_string()));
            return None;
        };

        let resolved = self.root.pointer(&format!("/{pointer}"));

        match resolved {
            Some(value) => Some(value),
            None => {
                self.diagnostics
                    .push(SchemaError::UnresolvableRef(reference.to_string()));
                None
            }
        }
    }
}

fn is_scalar_schema(schema: Option<&Value>) -> bool {
    match schema.and_then(|s| s.get("type")).and_then(Value::as_str) {
        Some("string") | Some("number") | Some("integer") | Some("boolean") => true,
        _ => false,
    }
}

/// Checks the schema's own `properties`, then each branch of `anyOf`/`oneOf`/`allOf` in turn,
/// for a scalar-typed `field`.
fn field_is_scalar(item_schema: Option<&Value>, field: &str) -> bool {
    let Some(schema) = item_schema else {
        return false;
    };

    if let Some(field_schema) = schema.get("properties").and_then(|p| p.get(field)) {
        if is_scalar_schema(Some(field_schema)) {
            return true;
        }
    }

    for keyword in ["anyOf", "oneOf", "allOf"] {
        if let Some(Value::Array(branches)) = schema.get(keyword) {
            if branches.iter().any(|branch| field_is_scalar(Some(branch), field)) {
                return true;
            }
        }
    }

    false
}

/// Unions `required` across the schema's own keyword and every branch of its
/// `anyOf`/`oneOf`/`allOf`, so a field required only within a composition branch still counts.
fn collect_required(schema: &Value, acc: &mut BTreeSet<String>) {
    if let Some(req) = schema.get("required").and_then(Value::as_array) {
        acc.extend(req.iter().filter_map(Value::as_str).map(str::to_string));
    }

    for keyword in ["anyOf", "oneOf", "allOf"] {
        if let Some(Value::Array(branches)) = schema.get(keyword) {
            for branch in branches {
                collect_required(branch, acc);
            }
        }
    }
}

fn hash_fields_and_required(item_schema: Option<&Value>) -> (Vec<String>, BTreeSet<String>) {
    let Some(schema) = item_schema else {
        return (Vec::new(), BTreeSet::new());
    };

    let mut required = BTreeSet::new();
    collect_required(schema, &mut required);

    let hash_fields = required
        .iter()
        .filter(|field| field_is_scalar(Some(schema), field))
        .cloned()
        .collect();

    (hash_fields, required)
}
