use std::fmt;

use crate::syntax::Location;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum ErrorKind {
    LexError,
    SyntaxError,
    SemanticError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LexError => write!(f, "lex error"),
            Self::SyntaxError => write!(f, "syntax error"),
            Self::SemanticError => write!(f, "semantic error"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Diagnostic {
    pub kind: ErrorKind,
    pub loc: Location,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.loc, self.kind, self.message)
    }
}

/// Append-only record of every diagnostic produced during one parse session,
/// in order of detection.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }
}

/// Failure marker: the diagnostic describing it has already been pushed to
/// the session's [`Diagnostics`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct Reported;

pub(crate) type PResult<T> = Result<T, Reported>;

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct CodegenError(pub String);

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "codegen error: {}", self.0)
    }
}

pub(crate) type CResult<T> = Result<T, CodegenError>;
