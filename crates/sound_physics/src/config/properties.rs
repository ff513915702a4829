//! Line-oriented `key=value` property files
//!
//! Reads and writes the common `.properties` dialect:
//! - `#` and `!` start comment lines, blank lines are ignored
//! - the key ends at the first unescaped `=`, `:` or blank
//! - a trailing unpaired `\` joins the next line onto the current one
//! - `\t`, `\n`, `\r`, `\f`, `\uXXXX` and backslash-quoted characters are
//!   decoded in keys and values
//!
//! Entries keep the order in which they were first seen. A repeated key
//! overwrites the earlier value in place.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::Path;

use super::ConfigError;

/// Ordered set of string properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
    /// Key -> position in `entries`
    index: HashMap<String, usize>,
}

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse property file contents
    ///
    /// Parsing never fails: anything that isn't a comment or blank line
    /// becomes an entry, possibly with an empty value.
    pub fn parse(contents: &str) -> Self {
        let mut properties = Self::new();

        for line in LogicalLines::new(contents) {
            let (key, value) = split_key_value(&line);
            properties.insert(unescape(key), unescape(value));
        }

        properties
    }

    /// Read and parse a property file
    ///
    /// Bytes that aren't valid UTF-8 decode as U+FFFD instead of failing the
    /// read; only real I/O errors are returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Read a property file, treating a missing file as empty
    pub fn load_or_empty(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(Self::new()),
            result => result,
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    /// Set a value, returning the previous one if the key existed
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        if let Some(&i) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the property file, optionally preceded by a comment header
    pub fn to_string_with_header(&self, header: Option<&str>) -> String {
        let mut out = String::new();

        if let Some(header) = header {
            for line in header.lines() {
                out.push('#');
                out.push_str(line);
                out.push('\n');
            }
        }

        for (key, value) in &self.entries {
            escape_into(&mut out, key, true);
            out.push('=');
            escape_into(&mut out, value, false);
            out.push('\n');
        }

        out
    }

    /// Write the property file, replacing whatever was there
    ///
    /// Parent directories are created as needed.
    pub fn save(&self, path: impl AsRef<Path>, header: Option<&str>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string_with_header(header))?;
        Ok(())
    }
}

/// Whitespace as far as the property format is concerned
const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// Iterator over logical lines: comments and blank lines dropped,
/// continuation lines joined, leading blanks stripped
struct LogicalLines<'a> {
    physical: std::str::Lines<'a>,
}

impl<'a> LogicalLines<'a> {
    fn new(contents: &'a str) -> Self {
        Self { physical: contents.lines() }
    }
}

impl Iterator for LogicalLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut logical = String::new();

        loop {
            let line = self.physical.next()?.trim_start_matches(is_blank);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            if !append_segment(&mut logical, line) {
                return Some(logical);
            }
            break;
        }

        // Continuation lines are never treated as comments
        for line in self.physical.by_ref() {
            if !append_segment(&mut logical, line.trim_start_matches(is_blank)) {
                break;
            }
        }

        Some(logical)
    }
}

/// Append one physical segment, returning whether the logical line continues
fn append_segment(logical: &mut String, segment: &str) -> bool {
    let trailing = segment.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        logical.push_str(&segment[..segment.len() - 1]);
        true
    } else {
        logical.push_str(segment);
        false
    }
}

/// Split a logical line into raw (still escaped) key and value
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut value_start = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                value_start = i + c.len_utf8();
                // Blanks may be followed by an explicit separator
                let rest = &line[value_start..];
                let trimmed = rest.trim_start_matches(is_blank);
                value_start += rest.len() - trimmed.len();
                if trimmed.starts_with('=') || trimmed.starts_with(':') {
                    value_start += 1;
                }
                break;
            }
            _ => {}
        }
    }

    let value = line[value_start..].trim_start_matches(is_blank);
    (&line[..key_end], value)
}

/// Decode escape sequences
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let mut units = Vec::with_capacity(2);
                units.push(read_hex_unit(&mut chars));
                // Astral characters arrive as a surrogate pair of escapes
                if (0xD800..0xDC00).contains(&units[0]) {
                    let mut lookahead = chars.clone();
                    if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
                        let low = read_hex_unit(&mut lookahead);
                        if (0xDC00..0xE000).contains(&low) {
                            units.push(low);
                            chars = lookahead;
                        }
                    }
                }
                out.extend(
                    char::decode_utf16(units.into_iter())
                        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
                );
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

/// Read up to four hex digits of a `\u` escape
///
/// Missing or malformed digits decode as far as they go; the escape never
/// fails the parse.
fn read_hex_unit<I>(chars: &mut std::iter::Peekable<I>) -> u16
where
    I: Iterator<Item = char>,
{
    let mut unit: u16 = 0;
    for _ in 0..4 {
        match chars.peek().and_then(|c| c.to_digit(16)) {
            Some(digit) => {
                // digit < 16, four iterations fit in u16
                unit = (unit << 4) | digit as u16;
                chars.next();
            }
            None => break,
        }
    }
    unit
}

/// Append `text` escaped so that [`Properties::parse`] reads it back verbatim
fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (i, c) in text.chars().enumerate() {
        match c {
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}
