use std::collections::HashMap;

use super::error::ParseError;
use super::Location;

/// Walks raw JSON text in lockstep with its structure to build a `path -> Location` index.
/// `serde_json` has already validated the text by the time this runs (see `parse`), so this
/// scanner assumes well-formed input and only returns `Err` for the scanner's own internal
/// bookkeeping failures.
pub(super) struct Scanner {
    chars: Vec<char>,
    idx: usize,
    line: usize,
    column: usize,
}

impl Scanner {
    pub(super) fn new(text: &str) -> Self {
        Scanner {
            chars: text.chars().collect(),
            idx: 0,
            line: 1,
            column: 1,
        }
    }

    pub(super) fn build_index(
        mut self,
    ) -> Result<HashMap<Vec<String>, Location>, ParseError> {
        let mut out = HashMap::new();
        let mut path = Vec::new();
        self.scan_value(&mut path, &mut out)?;
        Ok(out)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn position(&self) -> usize {
        self.idx + 1
    }

    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
            position: self.position(),
        }
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError::Location {
            position: self.position(),
            message: message.into(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn scan_value(
        &mut self,
        path: &mut Vec<String>,
        out: &mut HashMap<Vec<String>, Location>,
    ) -> Result<(), ParseError> {
        self.skip_ws();
        out.insert(path.clone(), self.location());

        match self.peek() {
            Some('{') => self.scan_object(path, out),
            Some('[') => self.scan_array(path, out),
            Some('"') => self.scan_string().map(|_| ()),
            Some(_) => {
                self.scan_scalar();
                Ok(())
            }
            None => Err(self.err("unexpected end of input")),
        }
    }

    fn scan_object(
        &mut self,
        path: &mut Vec<String>,
        out: &mut HashMap<Vec<String>, Location>,
    ) -> Result<(), ParseError> {
        self.advance(); // consume '{'
        self.skip_ws();
        if self.peek() == Some('}') {
            self.advance();
            return Ok(());
        }

        loop {
            self.skip_ws();
            let key = self.scan_string()?;
            self.skip_ws();
            if self.advance() != Some(':') {
                return Err(self.err("expected ':' after object key"));
            }

            path.push(key);
            self.scan_value(path, out)?;
            path.pop();

            self.skip_ws();
            match self.advance() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err(self.err("expected ',' or '}' in object")),
            }
        }

        Ok(())
    }

    fn scan_array(
        &mut self,
        path: &mut Vec<String>,
        out: &mut HashMap<Vec<String>, Location>,
    ) -> Result<(), ParseError> {
        self.advance(); // consume '['
        self.skip_ws();
        if self.peek() == Some(']') {
            self.advance();
            return Ok(());
        }

        let mut index = 0usize;
        loop {
            path.push(index.to_string());
            self.scan_value(path, out)?;
            path.pop();
            index += 1;

            self.skip_ws();
            match self.advance() {
                Some(',') => continue,
                Some(']') => break,
                _ => return Err(self.err("expected ',' or ']' in array")),
            }
        }

        Ok(())
    }

    fn scan_string(&mut self) -> Result<String, ParseError> {
        let start_pos = self.position();
        let start = self.idx;
        self.advance(); // consume opening quote

        loop {
            match self.advance() {
                Some('\\') => {
                    self.advance();
                }
                Some('"') => break,
                Some(_) => {}
                None => return Err(self.err("unterminated string")),
            }
        }

        let raw: String = self.chars[start..self.idx].iter().collect();
        serde_json::from_str(&raw).map_err(|e| ParseError::Location {
            position: start_pos,
            message: e.to_string(),
        })
    }

    fn scan_scalar(&mut self) {
        while let Some(c) = self.peek() {
            if c == ',' || c == '}' || c == ']' || c.is_whitespace() {
                break;
            }
            self.advance();
        }
    }
}
