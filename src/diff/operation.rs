use serde::ser::SerializeStruct;
use serde_json::Value;

use crate::path::Spath;

/// A single raw add/remove/replace delta, before line/explanation annotation.
///
/// Hand-written `Serialize` rather than `#[serde(tag = "op")]`, since which of `value` /
/// `oldValue` is present differs per variant in a way that's simpler to express directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Add { path: Spath, value: Value },
    Remove { path: Spath, old_value: Value },
    Replace { path: Spath, value: Value, old_value: Value },
}

impl Operation {
    pub fn path(&self) -> &Spath {
        match self {
            Operation::Add { path, .. } => path,
            Operation::Remove { path, .. } => path,
            Operation::Replace { path, .. } => path,
        }
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Remove { .. } => "remove",
            Operation::Replace { .. } => "replace",
        }
    }
}

impl serde::Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Operation::Add { path, value } => {
                let mut s = serializer.serialize_struct("Operation", 3)?;
                s.serialize_field("op", "add")?;
                s.serialize_field("path", &path.to_string())?;
                s.serialize_field("value", value)?;
                s.end()
            }
            Operation::Remove { path, old_value } => {
                let mut s = serializer.serialize_struct("Operation", 3)?;
                s.serialize_field("op", "remove")?;
                s.serialize_field("path", &path.to_string())?;
                s.serialize_field("oldValue", old_value)?;
                s.end()
            }
            Operation::Replace {
                path,
                value,
                old_value,
            } => {
                let mut s = serializer.serialize_struct("Operation", 4)?;
                s.serialize_field("op", "replace")?;
                s.serialize_field("path", &path.to_string())?;
                s.serialize_field("value", value)?;
                s.serialize_field("oldValue", old_value)?;
                s.end()
            }
        }
    }
}
