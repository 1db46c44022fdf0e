//! Field paths for attributing validation messages

use std::fmt;

/// One step in a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Named field
    Field(String),
    /// Position within a sequence
    Index(usize),
}

/// Location of a value inside a record graph, e.g. `adf.prospect.vehicle[1].make`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path (document root)
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Path extended by a named field
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Field(name.to_string()));
        Self { segments }
    }

    /// Path extended by a sequence index
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// True for the document root
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments, outermost first
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if idx == 0 => write!(f, "{name}")?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}
