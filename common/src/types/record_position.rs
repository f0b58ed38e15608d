use std::fmt;

/// Where a record sits in its source file: the element index of a JSON
/// array, or the 1-based line of a JSON-lines file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPosition {
    Index(usize),
    Line(usize),
}

impl fmt::Display for RecordPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "record {index}"),
            Self::Line(line) => write!(f, "line {line}"),
        }
    }
}
