//! Purpose: Parse dotted/indexed property names into ordered path segments.
//! Exports: `PropertyPath`, `Segment`.
//! Role: Grammar boundary shared by the tree builder and the flattener.
//! Invariants: A parsed path always has at least one segment.
//! Invariants: Index segments are plain base-10 with no leading zeros (`"0"` excepted).
//! Notes: A literal `.` inside a field name cannot be escaped; known limitation.

use std::fmt;

use crate::core::error::{Error, ErrorKind};

/// One component of a dotted property name: a field name or an array index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// An ordered, non-empty sequence of segments, e.g. `extVirtualLinks.0.vimId`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyPath {
    segments: Vec<Segment>,
}

impl PropertyPath {
    pub fn parse(input: &str) -> Result<Self, Error> {
        if input.is_empty() {
            return Err(Error::new(ErrorKind::InvalidPath)
                .with_message("property path is empty"));
        }

        let mut segments = Vec::new();
        for part in input.split('.') {
            if part.is_empty() {
                return Err(Error::new(ErrorKind::InvalidPath)
                    .with_message("property path contains an empty segment")
                    .with_path(input)
                    .with_hint("Check for leading, trailing, or doubled dots."));
            }
            segments.push(match parse_index(part) {
                Some(index) => Segment::Index(index),
                None => Segment::Field(part.to_string()),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The leading field name, or `None` when the path starts with an index.
    pub fn leading_field(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Field(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, segment) in self.segments.iter().enumerate() {
            if pos > 0 {
                write!(f, ".")?;
            }
            match segment {
                Segment::Field(name) => write!(f, "{name}")?,
                Segment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

/// A segment is an index iff it parses fully as non-negative base-10 with no
/// leading zeros. `"01"` stays a field name rather than silently becoming 1.
fn parse_index(part: &str) -> Option<usize> {
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse::<usize>().ok()
}
