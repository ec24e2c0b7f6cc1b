//! Wraps raw diff deltas with source-line coordinates and a human-readable explanation.

use serde::Serialize;

use crate::diff::Operation;
use crate::parser::ParsedDocument;
use crate::path::Spath;
use crate::schema::Plan;

/// Produces free-text descriptions of a delta. Selected by value via [`ExplainerKind`]
/// rather than through trait inheritance, matching the small-enum style used elsewhere in
/// this crate.
pub trait Explainer {
    fn explain(&self, op: &Operation, plan: &Plan) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultExplainer;

impl Explainer for DefaultExplainer {
    fn explain(&self, op: &Operation, _plan: &Plan) -> String {
        match op {
            Operation::Add { path, .. } => format!("Added value at path '{path}'."),
            Operation::Remove { path, .. } => format!("Removed value from path '{path}'."),
            Operation::Replace { path, .. } => format!("Replaced value at path '{path}'."),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExplainer;

impl Explainer for NoopExplainer {
    fn explain(&self, _op: &Operation, _plan: &Plan) -> String {
        String::new()
    }
}

/// Which [`Explainer`] the façade should use. `Custom` is the escape hatch for callers who
/// want their own explanations; no built-in custom explainer ships.
pub enum ExplainerKind {
    Default,
    Noop,
    Custom(Box<dyn Explainer>),
}

impl std::fmt::Debug for ExplainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExplainerKind::Default => write!(f, "ExplainerKind::Default"),
            ExplainerKind::Noop => write!(f, "ExplainerKind::Noop"),
            ExplainerKind::Custom(_) => write!(f, "ExplainerKind::Custom(..)"),
        }
    }
}

impl Default for ExplainerKind {
    fn default() -> Self {
        ExplainerKind::Default
    }
}

impl ExplainerKind {
    fn explain(&self, op: &Operation, plan: &Plan) -> String {
        match self {
            ExplainerKind::Default => DefaultExplainer.explain(op, plan),
            ExplainerKind::Noop => NoopExplainer.explain(op, plan),
            ExplainerKind::Custom(explainer) => explainer.explain(op, plan),
        }
    }
}

/// A raw delta annotated with source coordinates and an explanation — the engine's final,
/// user-visible result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedOperation {
    #[serde(flatten)]
    pub operation: Operation,
    pub explanation: String,
    pub line: Option<usize>,
    pub old_line: Option<usize>,
}

/// Wraps `deltas` into [`FormattedOperation`]s, resolving source lines from `doc1`/`doc2`
/// and, when diffing was partial, rebasing coordinates to be relative to the matched
/// `partial_keys` entry.
pub fn aggregate(
    deltas: Vec<Operation>,
    plan: &Plan,
    doc1: &ParsedDocument,
    doc2: &ParsedDocument,
    partial_keys: &[Spath],
    explainer: &ExplainerKind,
) -> Vec<FormattedOperation> {
    deltas
        .into_iter()
        .map(|op| {
            let mut old_line = (!matches!(op, Operation::Add { .. }))
                .then(|| doc1.locate(op.path()).line)
                .filter(|line| *line != 0);
            let mut line = (!matches!(op, Operation::Remove { .. }))
                .then(|| doc2.locate(op.path()).line)
                .filter(|line| *line != 0);

            if !partial_keys.is_empty() {
                if let Some(base_key) = longest_prefix(partial_keys, op.path()) {
                    let base_old = doc1.locate(base_key).line;
                    let base_new = doc2.locate(base_key).line;

                    if base_old != 0 {
                        old_line = old_line.map(|l| l.saturating_sub(base_old) + 1);
                    }
                    if base_new != 0 {
                        line = line.map(|l| l.saturating_sub(base_new) + 1);
                    }
                }
            }

            let explanation = explainer.explain(&op, plan);

            FormattedOperation {
                operation: op,
                explanation,
                line,
                old_line,
            }
        })
        .collect()
}

fn longest_prefix<'a>(partial_keys: &'a [Spath], path: &Spath) -> Option<&'a Spath> {
    partial_keys
        .iter()
        .filter(|key| path.starts_with(key))
        .max_by_key(|key| key.len())
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;
    use crate::parser::parse;

    fn path(raw: &str) -> Spath {
        raw.try_into().unwrap()
    }

    #[test]
    fn default_explainer_describes_each_op_kind() {
        let plan = Plan::new();
        let add = Operation::Add {
            path: path("/a"),
            value: json!(1),
        };
        let remove = Operation::Remove {
            path: path("/a"),
            old_value: json!(1),
        };
        let replace = Operation::Replace {
            path: path("/a"),
            value: json!(2),
            old_value: json!(1),
        };

        check!(DefaultExplainer.explain(&add, &plan) == "Added value at path '/a'.");
        check!(DefaultExplainer.explain(&remove, &plan) == "Removed value from path '/a'.");
        check!(DefaultExplainer.explain(&replace, &plan) == "Replaced value at path '/a'.");
    }

    #[test]
    fn noop_explainer_returns_empty_string() {
        let plan = Plan::new();
        let add = Operation::Add {
            path: path("/a"),
            value: json!(1),
        };
        check!(NoopExplainer.explain(&add, &plan) == "");
    }

    #[test]
    fn aggregate_resolves_absolute_lines() {
        let old_text = "{\n  \"a\": 1\n}";
        let new_text = "{\n  \"a\": 2\n}";
        let old = parse(old_text).unwrap();
        let new = parse(new_text).unwrap();
        let plan = Plan::new();

        let deltas = vec![Operation::Replace {
            path: path("/a"),
            value: json!(2),
            old_value: json!(1),
        }];

        let formatted = aggregate(deltas, &plan, &old, &new, &[], &ExplainerKind::Default);
        check!(formatted[0].line == Some(2));
        check!(formatted[0].old_line == Some(2));
        check!(formatted[0].explanation == "Replaced value at path '/a'.");
    }

    #[test]
    fn aggregate_rebases_lines_relative_to_the_partial_key() {
        let old_text = "{\n  \"a\": 1,\n  \"b\": {\n    \"c\": 1\n  }\n}";
        let new_text = "{\n  \"a\": 1,\n  \"b\": {\n    \"c\": 2\n  }\n}";
        let old = parse(old_text).unwrap();
        let new = parse(new_text).unwrap();
        let plan = Plan::new();

        let deltas = vec![Operation::Replace {
            path: path("/b/c"),
            value: json!(2),
            old_value: json!(1),
        }];

        let partial_keys = vec![path("/b")];
        let formatted = aggregate(deltas, &plan, &old, &new, &partial_keys, &ExplainerKind::Default);

        // `/b` itself is on line 3, `/b/c` on line 4 -> relative line 2.
        check!(formatted[0].line == Some(2));
    }

    #[test]
    fn aggregate_skips_old_line_for_additions() {
        let old_text = "{}";
        let new_text = "{\n  \"a\": 1\n}";
        let old = parse(old_text).unwrap();
        let new = parse(new_text).unwrap();
        let plan = Plan::new();

        let deltas = vec![Operation::Add {
            path: path("/a"),
            value: json!(1),
        }];

        let formatted = aggregate(deltas, &plan, &old, &new, &[], &ExplainerKind::Default);
        check!(formatted[0].old_line == None);
        check!(formatted[0].line == Some(2));
    }
}
