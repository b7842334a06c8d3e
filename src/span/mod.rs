use std::fmt;

/// A position inside a single schema string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub col: usize,
    pub offset: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

/// The schema text an error points into, along with where it came from.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct SchemaSource {
    pub text: String,
    pub origin: Option<String>,
    pub span: Option<Span>,
}

impl SchemaSource {
    pub fn new<S: ToString>(text: S, span: Span) -> SchemaSource {
        SchemaSource {
            text: text.to_string(),
            origin: None,
            span: Some(span),
        }
    }

    pub fn with_origin<S: ToString>(mut self, origin: S) -> SchemaSource {
        self.origin = Some(origin.to_string());
        self
    }
}

impl Span {
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

impl Pos {
    pub fn new() -> Pos {
        Pos { col: 0, offset: 0 }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "col {}", self.col + 1)
    }
}
