use std::fmt;

use super::{expr::Expression, types::Type};

#[derive(Debug, PartialEq, Clone)]
pub(crate) struct Param<'src> {
    pub id: &'src str,
    pub ty: Type,
}

/// A function signature. Parameter order is the call order.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct Prototype<'src> {
    pub id: &'src str,
    pub params: Vec<Param<'src>>,
    pub ret: Type,
}

impl Prototype<'_> {
    pub fn signature(&self) -> Type {
        Type::function(
            self.params.iter().map(|p| p.ty.clone()).collect(),
            self.ret.clone(),
        )
    }
}

/// A function declaration (`extern`, no body) or definition (with body).
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct FnDecl<'src> {
    pub proto: Prototype<'src>,
    pub body: Option<Box<Expression<'src>>>,
}

impl<'src> FnDecl<'src> {
    pub fn declaration(proto: Prototype<'src>) -> Self {
        Self { proto, body: None }
    }

    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }
}

/// One top-level construct.
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Item<'src> {
    Fn(FnDecl<'src>),
    Expr(Box<Expression<'src>>),
}

impl fmt::Display for Prototype<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.id)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", param.id, param.ty)?;
        }
        write!(f, ") {}", self.ret)
    }
}

impl fmt::Display for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fn(FnDecl { proto, body: None }) => write!(f, "extern {proto}"),
            Self::Fn(FnDecl {
                proto,
                body: Some(body),
            }) => write!(f, "fun {proto} {{ {body} }}"),
            Self::Expr(expr) => write!(f, "{expr}"),
        }
    }
}
