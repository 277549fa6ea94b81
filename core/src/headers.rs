//! Header fields, the case-insensitive header collection, and the parser for
//! raw response heads.
//!
//! # Design
//! `HeaderMap` is an ordered `Vec` of fields. Lookups compare names
//! ASCII-case-insensitively (the canonical name is the lower-cased form) while
//! every field keeps the casing it arrived with, so enumeration and
//! re-serialization reproduce the received head.
//!
//! `HeaderEntity::parse` takes the bytes the transport reported as the header
//! section. When redirects are followed or the server sent an interim
//! `100 Continue`, that section holds several heads back to back; only the
//! last one describes the body that follows.

use std::fmt;

use crate::error::{Error, Result};

/// One `Name: value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: String,
    value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The name as it was given, casing preserved.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Lower-cased name used for lookups.
    pub fn canonical_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Ordered header collection with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: Vec<HeaderField>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.is(name))
    }

    /// First field stored under `name`.
    pub fn get(&self, name: &str) -> Option<&HeaderField> {
        self.fields.iter().find(|f| f.is(name))
    }

    /// Every value stored under `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is(name))
            .map(HeaderField::value)
            .collect()
    }

    /// All values for `name` joined with `", "`, or `None` when absent.
    pub fn line(&self, name: &str) -> Option<String> {
        let values = self.get_all(name);
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// Append a field, keeping any existing fields with the same name.
    pub fn add(&mut self, field: HeaderField) {
        self.fields.push(field);
    }

    /// Replace every field named `name` with a single field.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let field = HeaderField::new(name, value);
        self.remove(field.name());
        self.fields.push(field);
    }

    /// Drop every field named `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| !f.is(name));
        self.fields.len() != before
    }

    /// Remove the fields named `name` and return the first value.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let value = self.get(name).map(|f| f.value().to_string());
        self.remove(name);
        value
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in iter {
            map.add(HeaderField::new(name, value));
        }
        map
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = &'a HeaderField;
    type IntoIter = std::slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A parsed response head: status line plus fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntity {
    protocol: String,
    code: u16,
    message: String,
    fields: HeaderMap,
}

impl HeaderEntity {
    pub fn new(protocol: impl Into<String>, code: u16, message: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            code,
            message: message.into(),
            fields: HeaderMap::new(),
        }
    }

    /// Parse a CRLF-delimited header section.
    ///
    /// Bare `\n` line endings are accepted. Field lines without a colon are
    /// skipped; lines starting with whitespace continue the previous value.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(raw);
        let head = last_head(&text)
            .ok_or_else(|| Error::MalformedHeader("empty header block".to_string()))?;

        let mut lines = head.into_iter();
        let status_line = lines
            .next()
            .ok_or_else(|| Error::MalformedHeader("missing status line".to_string()))?;
        let mut entity = parse_status_line(status_line)?;

        for line in lines {
            if line.starts_with([' ', '\t']) {
                if let Some(last) = entity.fields.fields.last_mut() {
                    last.value.push(' ');
                    last.value.push_str(line.trim());
                }
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) => entity
                    .fields
                    .add(HeaderField::new(name.trim(), value.trim())),
                None => log::debug!("skipping header line without a colon: {line:?}"),
            }
        }
        Ok(entity)
    }

    /// Protocol and version from the status line, e.g. `HTTP/1.1`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Reason text after the status code; may be empty (HTTP/2 has none).
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &HeaderMap {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut HeaderMap {
        &mut self.fields
    }

    pub fn set_protocol(&mut self, protocol: impl Into<String>) {
        self.protocol = protocol.into();
    }

    pub fn set_code(&mut self, code: u16) {
        self.code = code;
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}

impl fmt::Display for HeaderEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.protocol, self.code)?;
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }
        f.write_str("\r\n")?;
        for field in &self.fields {
            write!(f, "{field}\r\n")?;
        }
        f.write_str("\r\n")
    }
}

/// Lines of the last non-empty head in a header section.
fn last_head(text: &str) -> Option<Vec<&str>> {
    let mut heads: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            if !current.is_empty() {
                heads.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        heads.push(current);
    }
    heads.pop()
}

/// `<protocol>/<version> <code> <reason...>`
fn parse_status_line(line: &str) -> Result<HeaderEntity> {
    let malformed = || Error::MalformedHeader(format!("bad status line {line:?}"));

    let line = line.trim();
    let (protocol, rest) = line.split_once(' ').ok_or_else(malformed)?;
    if !protocol.contains('/') {
        return Err(malformed());
    }
    let rest = rest.trim_start();
    let (code, reason) = rest.split_once(' ').unwrap_or((rest, ""));
    let code: u16 = code.parse().map_err(|_| malformed())?;

    Ok(HeaderEntity::new(protocol, code, reason.trim()))
}
