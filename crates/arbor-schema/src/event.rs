use arbor_core::Value;
use std::fmt;

/// Severity of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// An unknown keyword; evaluation continues.
    Warning,
    /// The document violates a rule; evaluation continues.
    Invalid,
    /// The schema itself is malformed; evaluation stops.
    Error,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Warning => "warning",
            EventKind::Invalid => "invalid",
            EventKind::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One notification delivered to the validation callback.
#[derive(Debug)]
pub struct Event<'a> {
    pub kind: EventKind,
    /// The document node under evaluation. `None` while a sub-schema is
    /// shape-checked without a node ("dry" evaluation).
    pub node: Option<&'a Value>,
    /// The keyword whose rule triggered, or `""` when the schema as a whole
    /// is not an object.
    pub keyword: &'a str,
    /// The rule's value inside the schema.
    pub rule: &'a Value,
    /// RFC 6901 pointer from the document root to `node`.
    pub path: String,
}

/// One line of report text per event, for logs and CLI output:
/// `invalid "minimum" at /account/balance`.
impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} {:?} at document root", self.kind, self.keyword)
        } else {
            write!(f, "{} {:?} at {}", self.kind, self.keyword, self.path)
        }
    }
}

/// One step of the document lineage carried down the evaluation.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

pub(crate) fn render(path: &[Segment<'_>]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for segment in path {
        out.push('/');
        match segment {
            Segment::Key(key) => {
                for c in key.chars() {
                    match c {
                        '~' => out.push_str("~0"),
                        '/' => out.push_str("~1"),
                        c => out.push(c),
                    }
                }
            }
            Segment::Index(index) => {
                let _ = write!(out, "{index}");
            }
        }
    }
    out
}
