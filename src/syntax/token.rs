use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Plus,
    Minus,
    Mul,
    Div,

    Lt,
    Gt,
}

/// Binding strength of a binary operator. Anything that is not an operator
/// has precedence `-1` and never binds.
pub(crate) type Precedence = i8;

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '<' => Some(Self::Lt),
            '>' => Some(Self::Gt),
            _ => None,
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            Self::Lt | Self::Gt => 10,
            Self::Plus | Self::Minus => 20,
            Self::Mul | Self::Div => 40,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Lt => '<',
            Self::Gt => '>',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Fun,
    Extern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataType {
    Void,
    Bool,
    Int,
    Float,
}

impl DataType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
        }
    }
}

/// 1-based position of the first character of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TokenKind<'src> {
    Eof,
    Kw(Keyword),
    Type(DataType),
    Id(&'src str),
    Number(f64),
    /// A numeric literal that does not parse, e.g. `1.2.3`.
    Invalid(&'src str),
    /// Any other single character: operators, delimiters, `;` and stray
    /// characters alike.
    Punct(char),
}

impl fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eof => write!(f, "end of input"),
            Self::Kw(Keyword::Fun) => write!(f, "`fun`"),
            Self::Kw(Keyword::Extern) => write!(f, "`extern`"),
            Self::Type(ty) => write!(f, "`{}`", ty.name()),
            Self::Id(id) => write!(f, "`{id}`"),
            Self::Number(v) => write!(f, "`{v}`"),
            Self::Invalid(s) => write!(f, "`{s}`"),
            Self::Punct(c) => write!(f, "`{c}`"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Token<'src> {
    pub kind: TokenKind<'src>,
    pub loc: Location,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind<'src>, loc: Location) -> Self {
        Self { kind, loc }
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Punct(c) => Operator::from_char(c),
            _ => None,
        }
    }

    pub fn precedence(&self) -> Precedence {
        self.operator().map_or(-1, Operator::precedence)
    }
}
