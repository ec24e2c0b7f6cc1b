mod error;
mod scanner;

use std::collections::HashMap;

use serde_json::Value;

pub use error::ParseError;

use crate::path::Spath;
use scanner::Scanner;

/// A 1-based source location. `{0, 0, 0}` means "unsupported or not found" rather than an
/// error — see `ParsedDocument::locate`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub position: usize,
}

#[derive(Debug, Default)]
struct PathIndex {
    locations: HashMap<Vec<String>, Location>,
}

impl PathIndex {
    fn locate(&self, path: &Spath) -> Location {
        self.locations
            .get(path.segments())
            .copied()
            .unwrap_or_default()
    }
}

/// A parsed JSON document paired with an index from path to source location, used by the
/// Aggregator to annotate deltas with line/column coordinates.
#[derive(Debug)]
pub struct ParsedDocument {
    pub data: Value,
    locations: PathIndex,
}

impl ParsedDocument {
    /// Returns the source location of `path`, or `{0,0,0}` if it can't be resolved.
    pub fn locate(&self, path: &Spath) -> Location {
        self.locations.locate(path)
    }
}

/// Parses `text` into a tree plus a path-to-source-location index.
pub fn parse(text: &str) -> Result<ParsedDocument, ParseError> {
    let data: Value = serde_json::from_str(text)?;
    let locations = PathIndex {
        locations: Scanner::new(text).build_index()?,
    };

    Ok(ParsedDocument { data, locations })
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    fn path(raw: &str) -> Spath {
        raw.try_into().unwrap()
    }

    #[test]
    fn locate_returns_line_for_nested_field() {
        let text = "{\n  \"a\": {\n    \"b\": 1\n  }\n}";
        let doc = parse(text).unwrap();

        let loc = doc.locate(&path("/a/b"));
        check!(loc.line == 3);
    }

    #[test]
    fn locate_returns_default_for_missing_path() {
        let doc = parse("{\"a\": 1}").unwrap();
        let loc = doc.locate(&path("/missing"));
        check!(loc == Location::default());
    }

    #[test]
    fn locate_root_path_points_at_document_start() {
        let doc = parse("{\"a\": 1}").unwrap();
        let loc = doc.locate(&Spath::root());
        check!(loc.line == 1);
        check!(loc.column == 1);
    }

    #[test]
    fn locate_handles_array_indices() {
        let text = "{\"items\": [1, 2, 3]}";
        let doc = parse(text).unwrap();
        let loc = doc.locate(&path("/items/2"));
        check!(loc.position > 0);
    }

    #[test]
    fn invalid_json_surfaces_a_parse_error() {
        let result = parse("{not json}");
        check!(result.is_err());
    }
}
