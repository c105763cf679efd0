use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of the field being decoded, rendered as a JSON pointer (RFC 6901)
///
/// Decode errors name the offending field with this pointer, e.g. `/deadlines/0/name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str) {
        self.segments.push(PathSegment::Key(name.to_string()));
    }

    pub fn push_idx(&mut self, idx: usize) {
        self.segments.push(PathSegment::Index(idx));
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            PathSegment::Key(k) => Some(k.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// pointer of a child field without pushing it
    pub fn child(&self, name: &str) -> String {
        let mut p = self.as_json_pointer();
        p.push('/');
        p.push_str(&escape(name));
        p
    }

    // rfc-6901
    pub fn as_json_pointer(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                PathSegment::Key(k) => format!("/{}", escape(k)),
                PathSegment::Index(i) => format!("/{i}"),
            })
            .collect()
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_json_pointer())
    }
}
