use std::fmt;

use super::{token::Operator, types::Type};

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Expression<'src> {
    Number(f64),
    /// `ty` is the type the name resolved to when it was parsed, if it was
    /// visible at that point.
    Var {
        id: &'src str,
        ty: Option<Type>,
    },
    Binary {
        lhs: Box<Expression<'src>>,
        op: Operator,
        rhs: Box<Expression<'src>>,
    },
    Call {
        id: &'src str,
        ty: Option<Type>,
        params: Vec<Expression<'src>>,
    },
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Var { id, .. } => write!(f, "{id}"),
            Self::Binary { lhs, op, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Self::Call { id, params, .. } => {
                write!(f, "{id}(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
        }
    }
}
