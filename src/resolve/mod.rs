use crate::path::{PathError, Spath};
use std::ops::Deref;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid path format")]
    InvalidPath(#[from] PathError),

    #[error("Field or item not found")]
    NotFound,

    #[error("Type mismatch encountered during resolution, expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl ResolveError {
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        ResolveError::TypeMismatch {
            expected: expected.to_string(),
            actual: found.to_string(),
        }
    }
}

pub trait ValueAccess<'a> {
    type Out: Deref<Target = serde_json::Value> + 'a;
    type ArrayIter: Iterator<Item = Self::Out> + 'a;

    fn is_object(&self) -> bool;
    fn is_array(&self) -> bool;

    fn get_key(self, key: &str) -> Option<Self::Out>;
    fn get_index(self, index: usize) -> Option<Self::Out>;

    fn array_iter(self) -> Option<Self::ArrayIter>;
}

impl<'a> ValueAccess<'a> for &'a serde_json::Value {
    type Out = &'a serde_json::Value;
    type ArrayIter = std::slice::Iter<'a, serde_json::Value>;

    fn is_object(&self) -> bool {
        serde_json::Value::is_object(self)
    }
    fn is_array(&self) -> bool {
        serde_json::Value::is_array(self)
    }
    fn get_key(self, key: &str) -> Option<Self::Out> {
        self.get(key)
    }
    fn get_index(self, index: usize) -> Option<Self::Out> {
        self.get(index)
    }
    fn array_iter(self) -> Option<Self::ArrayIter> {
        self.as_array().map(|v| v.iter())
    }
}

impl<'a> ValueAccess<'a> for &'a mut serde_json::Value {
    type Out = &'a mut serde_json::Value;
    type ArrayIter = std::slice::IterMut<'a, serde_json::Value>;

    fn is_object(&self) -> bool {
        serde_json::Value::is_object(self)
    }
    fn is_array(&self) -> bool {
        serde_json::Value::is_array(self)
    }
    fn get_key(self, key: &str) -> Option<Self::Out> {
        self.get_mut(key)
    }
    fn get_index(self, index: usize) -> Option<Self::Out> {
        self.get_mut(index)
    }
    fn array_iter(self) -> Option<Self::ArrayIter> {
        self.as_array_mut().map(|v| v.iter_mut())
    }
}

/// Resolves a [`Spath`] against a document, returning a shared reference to the value at
/// that path.
pub fn resolve_ref<'a>(
    doc: &'a serde_json::Value,
    path: &Spath,
) -> Result<&'a serde_json::Value, ResolveError> {
    resolve_inner(doc, path)
}

/// Resolves a [`Spath`] against a document, returning a mutable reference to the value at
/// that path. Used by the ambient `patch::apply` test helper to mutate documents in place.
pub fn resolve_mut<'a>(
    doc: &'a mut serde_json::Value,
    path: &'a Spath,
) -> Result<&'a mut serde_json::Value, ResolveError> {
    resolve_inner(doc, path)
}

fn resolve_inner<'a, 'b, A>(doc: A, path: &'b Spath) -> Result<A::Out, ResolveError>
where
    A: ValueAccess<'a, Out = A>, // output type is the same as input type
    A: std::ops::Deref<Target = serde_json::Value>,
{
    let mut current: A::Out = doc;
    for segment in path {
        current = resolve_field(current, segment)?;
    }

    Ok(current)
}

fn resolve_field<'a, A>(doc: A, field: &str) -> Result<A::Out, ResolveError>
where
    A: ValueAccess<'a>,
    A: Deref<Target = serde_json::Value>,
{
    let type_name = value_type_desc(&doc);
    if !doc.is_object() && !doc.is_array() {
        return Err(ResolveError::type_mismatch("object or array", &type_name));
    }

    if doc.is_array() {
        // Try to parse field as an index
        if let Ok(index) = field.parse::<usize>() {
            doc.get_index(index).ok_or(ResolveError::NotFound)
        } else {
            Err(ResolveError::type_mismatch(
                "number",
                &format!("string({field:?})"),
            ))
        }
    } else {
        doc.get_key(field).ok_or(ResolveError::NotFound)
    }
}

fn value_type_desc(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => format!("boolean({b})"),
        serde_json::Value::Number(n) => format!("number({n})"),
        serde_json::Value::String(s) => format!("string({s:?})"),
        serde_json::Value::Array(_) => "array".to_string(),
        serde_json::Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;

    fn path(raw: &str) -> Spath {
        raw.try_into().unwrap()
    }

    #[test]
    fn test_resolve_simple_path() {
        let doc = json!({
            "a": {
                "b": {
                    "c": 42
                }
            }
        });
        let result = resolve_inner(&doc, &path("/a/b/c"));
        check!(result.is_ok());
        let result = result.unwrap();
        check!(result == &json!(42));
    }

    #[test]
    fn test_resolve_field_not_found() {
        let doc = json!({
            "a": {
                "b": {
                    "c": 42
                }
            }
        });
        let result = resolve_inner(&doc, &path("/a/x"));
        check!(matches!(result, Err(ResolveError::NotFound)));
    }

    #[test]
    fn test_resolve_type_mismatch() {
        let doc = json!({
            "a": {
                "b": 42
            }
        });
        let result = resolve_inner(&doc, &path("/a/b/c")).unwrap_err();

        check!(result == ResolveError::type_mismatch("object or array", "number(42)"));
    }

    #[test]
    fn test_resolve_with_field_segment_should_return_array_item_by_index() {
        let doc = json!({
            "items": [
                { "id": "foo", "value": 1 },
                { "id": "bar", "value": 2 }
            ]
        });
        let result = resolve_inner(&doc, &path("/items/0/value"));
        check!(result.is_ok());
        let result = result.unwrap();

        check!(result == &json!(1));
    }

    #[test]
    fn test_resolve_with_field_segment_not_matching_type_should_return_a_type_mismatch() {
        let doc = json!({
            "items": [
                { "id": "foo", "value": 1 },
                { "id": "bar", "value": 2 }
            ]
        });
        let result = resolve_inner(&doc, &path("/items/foo/value"));

        check!(result == Err(ResolveError::type_mismatch("number", "string(\"foo\")")));
    }

    #[test]
    fn resolve_field_should_return_mutable_value() {
        let mut doc = json!({
            "items": [
                { "id": "foo", "value": 1 },
                { "id": "bar", "value": 2 }
            ]
        });
        let expected = json!({"id": "foo", "value": 42});
        let p = path("/items/0");
        let result = resolve_inner(&mut doc, &p);
        check!(result.is_ok());
        let result = result.unwrap();
        result["value"] = json!(42);

        check!(result == &expected);
        check!(doc["items"][0] == expected);
    }
}
