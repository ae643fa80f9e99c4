use std::fmt;

use super::token::DataType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Type {
    Void,
    Bool,
    Int,
    Float,
    Function { params: Vec<Type>, ret: Box<Type> },
}

impl Type {
    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Self::Function {
            params,
            ret: Box::new(ret),
        }
    }
}

impl From<DataType> for Type {
    fn from(ty: DataType) -> Self {
        match ty {
            DataType::Void => Self::Void,
            DataType::Bool => Self::Bool,
            DataType::Int => Self::Int,
            DataType::Float => Self::Float,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Function { params, ret } => {
                write!(f, "fun(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") {ret}")
            }
        }
    }
}
