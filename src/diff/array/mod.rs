mod myers;
mod primary_key;
mod unique;

use serde_json::Value;

use crate::equality::EqualityCache;
use crate::path::Spath;
use crate::schema::{Plan, Strategy};

use super::operation::Operation;

/// Looks up the `ArrayPlan` governing the array found at `path` and dispatches to the
/// matching strategy implementation.
pub(crate) fn dispatch(
    old: &[Value],
    new: &[Value],
    path: &Spath,
    plan: &Plan,
    cache: &EqualityCache,
) -> Vec<Operation> {
    let array_plan = plan.lookup(path);

    match array_plan {
        Some(ap) if ap.strategy == Strategy::PrimaryKey => match ap.primary_key.as_deref() {
            Some(key_field) => primary_key::diff(old, new, path, key_field, ap, plan, cache),
            None => myers::diff(old, new, path, array_plan, plan, cache),
        },
        Some(ap) if ap.strategy == Strategy::Unique => unique::diff(old, new, path),
        _ => myers::diff(old, new, path, array_plan, plan, cache),
    }
}
