mod error;
mod parser;

use std::fmt::Display;
use std::fmt::Write as _;

pub use crate::path::error::PathError;

use parser::parse_pointer;

/// A JSON Pointer (RFC 6901) over a document tree.
///
/// Segments are stored already-unescaped; `Display`/`Serialize` re-apply the `~0`/`~1`
/// escaping rules on the way out. The reserved child token `-` (append to array) is just
/// an ordinary segment as far as this type is concerned; only the diff engine gives it
/// meaning.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Spath {
    pub(crate) segments: Vec<String>,
}

impl TryFrom<&str> for Spath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Spath::default());
        }

        match parse_pointer(value) {
            Ok((rest, segments)) if rest.is_empty() => Ok(Spath { segments }),
            Ok((rest, _)) => Err(error::trailing_input_error(value, rest)),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err(error::convert_verbose_error(value, e))
            }
            Err(nom::Err::Incomplete(_)) => Err(PathError::InvalidSyntax {
                position: value.len(),
                message: "unexpected end of input".into(),
            }),
        }
    }
}

impl TryFrom<String> for Spath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Spath::try_from(value.as_str())
    }
}

impl IntoIterator for Spath {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a Spath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl Spath {
    pub fn root() -> Self {
        Spath::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns a new path with `segment` appended.
    pub fn push(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Spath { segments }
    }

    /// Returns a new path with the numeric index appended.
    pub fn push_index(&self, index: usize) -> Self {
        self.push(index.to_string())
    }

    /// Returns a new path with the RFC 6901 array-append sentinel `-` appended.
    pub fn push_append(&self) -> Self {
        self.push("-")
    }

    /// Returns a new path with the `*` wildcard segment appended (used for schema-plan keys
    /// under `additionalProperties` / indexed-array descent).
    pub fn push_wildcard(&self) -> Self {
        self.push("*")
    }

    /// Returns a parent path, or `None` if this is the root.
    pub fn parent(&self) -> Option<Spath> {
        if self.segments.is_empty() {
            None
        } else {
            let segments = self.segments[..self.segments.len() - 1].to_vec();
            Some(Spath { segments })
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// True if `self` is `prefix` itself, or begins with all of `prefix`'s segments.
    pub fn starts_with(&self, prefix: &Spath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// True if `self` is a strict, proper prefix of `other` (i.e. `other` is nested under `self`
    /// but is not `self`).
    pub fn is_parent_of(&self, other: &Spath) -> bool {
        self.segments.len() < other.segments.len() && other.starts_with(self)
    }

    /// Strips `prefix` from the front of `self`, returning the remaining suffix segments.
    /// `None` if `self` does not start with `prefix`.
    pub fn strip_prefix(&self, prefix: &Spath) -> Option<Spath> {
        if self.starts_with(prefix) {
            Some(Spath {
                segments: self.segments[prefix.segments.len()..].to_vec(),
            })
        } else {
            None
        }
    }

    /// Returns a copy of this path with every purely-numeric segment removed. Used by the
    /// schema Plan lookup to collapse concrete array indices back to the schema shape.
    pub fn normalized(&self) -> Spath {
        Spath {
            segments: self
                .segments
                .iter()
                .filter(|s| s.parse::<usize>().is_err())
                .cloned()
                .collect(),
        }
    }
}

impl Display for Spath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            f.write_str("/")?;
            for c in segment.chars() {
                match c {
                    '~' => f.write_str("~0")?,
                    '/' => f.write_str("~1")?,
                    c => f.write_char(c)?,
                }
            }
        }
        Ok(())
    }
}

impl serde::Serialize for Spath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
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
    fn test_spath_try_from_str() {
        let spath = path("/field1/field2/field3");

        let expected_spath = Spath {
            segments: vec![
                "field1".to_string(),
                "field2".to_string(),
                "field3".to_string(),
            ],
        };

        check!(spath == expected_spath);
    }

    #[test]
    fn test_spath_try_from_with_invalid_format_should_fail() {
        check!(Spath::try_from("fooba/rbaz").is_err());
    }

    #[test]
    fn test_spath_display() {
        let spath = Spath {
            segments: vec!["a".to_string(), "b~c".to_string(), "d/e".to_string()],
        };

        check!(spath.to_string() == "/a/b~0c/d~1e");
    }

    #[test]
    fn spath_parent_should_return_parent_path() {
        let spath = path("/a/b/c");
        let parent = spath.parent().unwrap();

        check!(parent == path("/a/b"));
    }

    #[test]
    fn spath_parent_of_root_should_be_none() {
        check!(Spath::root().parent() == None);
    }

    #[test]
    fn spath_push_append_should_add_dash_segment() {
        check!(path("/foo").push_append() == path("/foo/-"));
    }

    #[test]
    fn spath_starts_with_should_match_prefix() {
        check!(path("/a/b/c").starts_with(&path("/a/b")));
        check!(!path("/a/b").starts_with(&path("/a/b/c")));
        check!(path("/a/b").starts_with(&Spath::root()));
    }

    #[test]
    fn spath_is_parent_of_should_require_strict_nesting() {
        check!(path("/a").is_parent_of(&path("/a/b")));
        check!(!path("/a").is_parent_of(&path("/a")));
        check!(!path("/a/b").is_parent_of(&path("/a")));
    }

    #[test]
    fn spath_strip_prefix_should_return_suffix() {
        check!(path("/a/b/c").strip_prefix(&path("/a")) == Some(path("/b/c")));
        check!(path("/a/b/c").strip_prefix(&path("/x")) == None);
    }

    #[test]
    fn spath_normalized_should_drop_numeric_segments() {
        check!(path("/envs/0/services/3/cpu").normalized() == path("/envs/services/cpu"));
    }
}
