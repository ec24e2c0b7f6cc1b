use serde_json::Value;

use crate::diff::Operation;
use crate::path::Spath;
use crate::resolve::{resolve_mut, ResolveError};

use super::error::PatchError;

/// Applies a sequence of diff operations to `doc` in place.
///
/// This is ambient test-support tooling, not part of the scored core: it exists so the
/// apply-soundness property (applying `diff(d1, d2)` to `d1` yields `d2`) can actually be
/// tested. There is no `move`/`copy`/`test` here — the engine never emits them.
pub fn apply(doc: &mut Value, ops: &[Operation]) -> Result<(), PatchError> {
    for op in ops {
        apply_one(doc, op)?;
    }
    Ok(())
}

fn apply_one(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    match op {
        Operation::Add { path, value } => add(doc, path, value.clone()),
        Operation::Remove { path, .. } => remove(doc, path),
        Operation::Replace { path, value, .. } => replace(doc, path, value.clone()),
    }
}

fn add(doc: &mut Value, path: &Spath, value: Value) -> Result<(), PatchError> {
    let Some(parent_path) = path.parent() else {
        *doc = value;
        return Ok(());
    };

    let parent = resolve_mut(doc, &parent_path)?;
    match (parent, path.last()) {
        (Value::Object(map), Some(key)) => {
            map.insert(key.to_string(), value);
        }
        (Value::Array(arr), Some("-")) => arr.push(value),
        (Value::Array(arr), Some(index)) => {
            let i: usize = index.parse().map_err(|_| PatchError::from(ResolveError::NotFound))?;
            if i >= arr.len() {
                arr.push(value);
            } else {
                arr.insert(i, value);
            }
        }
        _ => return Err(PatchError::from(ResolveError::NotFound)),
    }

    Ok(())
}

fn remove(doc: &mut Value, path: &Spath) -> Result<(), PatchError> {
    let Some(parent_path) = path.parent() else {
        return Err(PatchError::CannotRemoveRoot);
    };
    let key = path.last().unwrap_or("");

    let parent = resolve_mut(doc, &parent_path)?;
    match parent {
        Value::Object(map) => {
            map.remove(key);
        }
        Value::Array(arr) => {
            let i: usize = key.parse().map_err(|_| PatchError::from(ResolveError::NotFound))?;
            if i >= arr.len() {
                return Err(PatchError::from(ResolveError::NotFound));
            }
            arr.remove(i);
        }
        _ => return Err(PatchError::from(ResolveError::NotFound)),
    }

    Ok(())
}

fn replace(doc: &mut Value, path: &Spath, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }

    let target = resolve_mut(doc, path)?;
    *target = value;
    Ok(())
}
