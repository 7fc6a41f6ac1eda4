//! Parsed contents of a `.env` definitions file.
//!
//! Parsing is delegated to `dotenvy`: one `KEY=VALUE` per line, `#` comments
//! and blank lines ignored, optional `export` prefix, and quoting. Only the
//! braced `${VAR}` form is substituted; a bare `$` is kept as written, so
//! `SECRET_KEY=abc$xyz` stays `abc$xyz`. Malformed lines are skipped and
//! counted. Line contents are never logged since they may hold secrets.

use crate::error::{Error, Result};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Key/value pairs from a definitions file, in first-seen order.
///
/// A key defined more than once keeps its position but takes the value of
/// its last definition.
#[derive(Clone, Default)]
pub struct Definitions {
    entries: Vec<(String, String)>,
    skipped_lines: usize,
}

impl Definitions {
    /// Read and parse the file at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Definitions {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::from_reader(file)
            .map(Some)
            .map_err(|source| Error::Definitions {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Parse definitions from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let text = escape_bare_dollars(&text);

        let mut definitions = Self::default();

        for (index, item) in dotenvy::from_read_iter(text.as_bytes()).enumerate() {
            match item {
                Ok((key, value)) if value.contains('\0') => {
                    tracing::warn!(key = %key, "skipping definition with a NUL byte in its value");
                    definitions.skipped_lines += 1;
                }
                Ok((key, value)) => definitions.insert(key, value),
                Err(dotenvy::Error::LineParse(_, position)) => {
                    tracing::warn!(entry = index, position, "skipping malformed definitions line");
                    definitions.skipped_lines += 1;
                }
                Err(dotenvy::Error::Io(e)) => return Err(e),
                Err(_) => {
                    tracing::warn!(entry = index, "skipping unusable definitions line");
                    definitions.skipped_lines += 1;
                }
            }
        }

        Ok(definitions)
    }

    fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a single definition.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lines that could not be parsed and were ignored.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

/// Escape every `$` that does not open a `${...}` block, outside single
/// quotes and comments, so dotenvy keeps it literally.
fn escape_bare_dollars(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Unquoted,
        Single,
        Double,
        Comment,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Unquoted;
    let mut line_start = true;
    let mut after_space = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Comment => {
                if c == '\n' {
                    state = State::Unquoted;
                    line_start = true;
                }
                out.push(c);
                continue;
            }
            State::Single => {
                if c == '\'' {
                    state = State::Unquoted;
                }
                out.push(c);
                continue;
            }
            State::Unquoted | State::Double => {}
        }

        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
                line_start = false;
                after_space = false;
                continue;
            }
            '$' if chars.peek() != Some(&'{') => out.push_str("\\$"),
            '"' if state == State::Double => {
                state = State::Unquoted;
                out.push(c);
            }
            '"' => {
                state = State::Double;
                out.push(c);
            }
            '\'' if state == State::Unquoted => {
                state = State::Single;
                out.push(c);
            }
            '#' if state == State::Unquoted && (line_start || after_space) => {
                state = State::Comment;
                out.push(c);
            }
            _ => out.push(c),
        }

        if state == State::Unquoted {
            line_start = c == '\n' || (line_start && c.is_whitespace());
        } else {
            line_start = false;
        }
        after_space = c == ' ' || c == '\t';
    }

    out
}

// Values stay out of Debug output.
impl fmt::Debug for Definitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definitions")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("skipped_lines", &self.skipped_lines)
            .finish()
    }
}
