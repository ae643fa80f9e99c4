mod decl;
mod expr;
mod expr_parser;
mod lexer;
mod parser;
mod scope;
mod token;
mod types;

pub(crate) use decl::{FnDecl, Item};
pub(crate) use expr::Expression;
pub(crate) use parser::Parser;
pub(crate) use token::{Location, Operator, Precedence};
pub(crate) use types::Type;

use crate::error::PResult;

pub(crate) trait ExprParser<'src> {
    fn parse_expr(&mut self) -> PResult<Box<Expression<'src>>>;
    fn parse_bin_op_rhs(
        &mut self,
        min_prec: Precedence,
        lhs: Box<Expression<'src>>,
    ) -> PResult<Box<Expression<'src>>>;
    fn parse_primary(&mut self) -> PResult<Box<Expression<'src>>>;
    fn parse_paren_expr(&mut self) -> PResult<Box<Expression<'src>>>;
    fn parse_id_expr(&mut self, id: &'src str) -> PResult<Box<Expression<'src>>>;
    fn parse_call_args(&mut self) -> PResult<Vec<Expression<'src>>>;
}
