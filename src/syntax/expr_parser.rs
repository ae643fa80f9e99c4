use crate::error::{ErrorKind, PResult};

use super::{
    token::{Precedence, TokenKind},
    ExprParser, Expression, Parser,
};

impl<'src> ExprParser<'src> for Parser<'src> {
    fn parse_expr(&mut self) -> PResult<Box<Expression<'src>>> {
        let lhs = self.parse_primary()?;
        self.parse_bin_op_rhs(0, lhs)
    }

    /// Precedence climbing. An operator only captures the primary after it
    /// when the operator following that primary binds strictly tighter.
    fn parse_bin_op_rhs(
        &mut self,
        min_prec: Precedence,
        mut lhs: Box<Expression<'src>>,
    ) -> PResult<Box<Expression<'src>>> {
        while let Some(op) = self.token.operator() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.bump();

            let mut rhs = self.parse_primary()?;
            if self.token.precedence() > prec {
                rhs = self.parse_bin_op_rhs(prec + 1, rhs)?;
            }

            lhs = Box::new(Expression::Binary { lhs, op, rhs });
        }

        Ok(lhs)
    }

    fn parse_primary(&mut self) -> PResult<Box<Expression<'src>>> {
        match self.token.kind {
            TokenKind::Id(id) => {
                self.bump();
                self.parse_id_expr(id)
            }
            TokenKind::Number(v) => {
                self.bump();
                Ok(Box::new(Expression::Number(v)))
            }
            TokenKind::Punct('(') => self.parse_paren_expr(),
            TokenKind::Invalid(s) => Err(self.error(
                ErrorKind::LexError,
                format!("malformed numeric literal `{s}`"),
            )),
            other => Err(self.error(
                ErrorKind::SyntaxError,
                format!("unexpected token {other} in expression position"),
            )),
        }
    }

    fn parse_paren_expr(&mut self) -> PResult<Box<Expression<'src>>> {
        self.bump();
        let expr = self.parse_expr()?;
        self.expect_punct(')', "to close parenthesised expression")?;
        Ok(expr)
    }

    fn parse_id_expr(&mut self, id: &'src str) -> PResult<Box<Expression<'src>>> {
        let ty = self.symbols.lookup(id).map(|attr| attr.ty.clone());
        if ty.is_none() {
            log::debug!("`{id}` is not declared in any visible scope");
        }

        if !self.token.is_punct('(') {
            return Ok(Box::new(Expression::Var { id, ty }));
        }
        self.bump();

        let params = self.parse_call_args()?;
        Ok(Box::new(Expression::Call { id, ty, params }))
    }

    fn parse_call_args(&mut self) -> PResult<Vec<Expression<'src>>> {
        let mut args = vec![];

        if !self.token.is_punct(')') {
            loop {
                args.push(*self.parse_expr()?);

                if self.token.is_punct(')') {
                    break;
                }
                if !self.token.is_punct(',') {
                    let found = self.token.kind;
                    return Err(self.error(
                        ErrorKind::SyntaxError,
                        format!("expected `)` or `,` in argument list, found {found}"),
                    ));
                }
                self.bump();
            }
        }
        self.bump();

        Ok(args)
    }
}

#[cfg(test)]
mod test {
    use super::Parser;
    use crate::{
        error::ErrorKind,
        syntax::{token::Operator, ExprParser, Expression},
    };

    fn parse_str(s: &str) -> String {
        let mut parser = Parser::new(s);
        let expr = parser.parse_expr().unwrap();
        expr.to_string()
    }

    #[test]
    fn parse_binary_expr() {
        use Expression::*;
        use Operator::*;

        let mut parser = Parser::new("1 + 2 * 3");
        let expr = parser.parse_expr().unwrap();
        let expected = Box::new(Binary {
            lhs: Box::new(Number(1.0)),
            op: Plus,
            rhs: Box::new(Binary {
                lhs: Box::new(Number(2.0)),
                op: Mul,
                rhs: Box::new(Number(3.0)),
            }),
        });

        assert_eq!(expr, expected);
    }

    #[test]
    fn parse_binary_expr_2() {
        use Expression::*;
        use Operator::*;

        let mut parser = Parser::new("(1 + 2) * 3");
        let expr = parser.parse_expr().unwrap();
        let expected = Box::new(Binary {
            lhs: Box::new(Binary {
                lhs: Box::new(Number(1.0)),
                op: Plus,
                rhs: Box::new(Number(2.0)),
            }),
            op: Mul,
            rhs: Box::new(Number(3.0)),
        });

        assert_eq!(expr, expected);
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(parse_str("1*2+3*4"), "((1 * 2) + (3 * 4))");
        assert_eq!(parse_str("1-2-3"), "((1 - 2) - 3)");
        assert_eq!(parse_str("1*2+3"), "((1 * 2) + 3)");
        assert_eq!(parse_str("1+2*3-4"), "((1 + (2 * 3)) - 4)");
        assert_eq!(parse_str("a < b + c * d"), "(a < (b + (c * d)))");
        assert_eq!(parse_str("8/4/2"), "((8 / 4) / 2)");
        assert_eq!(parse_str("1 + 2 > 3 - 4"), "((1 + 2) > (3 - 4))");
    }

    #[test]
    fn parse_call_expr() {
        use Expression::*;

        let mut parser = Parser::new("f(1, 2+3)");
        let expr = parser.parse_expr().unwrap();
        let expected = Box::new(Call {
            id: "f",
            ty: None,
            params: vec![
                Number(1.0),
                Binary {
                    lhs: Box::new(Number(2.0)),
                    op: Operator::Plus,
                    rhs: Box::new(Number(3.0)),
                },
            ],
        });

        assert_eq!(expr, expected);
        assert_eq!(parse_str("g() * h(x, (y))"), "(g() * h(x, y))");
    }

    #[test]
    fn operator_stops_at_non_operator() {
        let mut parser = Parser::new("1 + 2 ) 3");
        assert_eq!(parser.parse_expr().unwrap().to_string(), "(1 + 2)");
        assert!(parser.token.is_punct(')'));
    }

    #[test]
    fn unexpected_token() {
        let mut parser = Parser::new("1 + )");
        assert!(parser.parse_expr().is_err());

        let diagnostics: Vec<_> = parser.diagnostics().iter().collect();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ErrorKind::SyntaxError);
        assert_eq!(diagnostics[0].loc.column, 5);
        assert!(parser.token.is_punct(')'));
    }

    #[test]
    fn unclosed_paren() {
        let mut parser = Parser::new("(1 + 2");
        assert!(parser.parse_expr().is_err());
        assert_eq!(parser.diagnostics().len(), 1);
    }

    #[test]
    fn bad_argument_separator() {
        let mut parser = Parser::new("f(1 2)");
        assert!(parser.parse_expr().is_err());

        let diagnostics: Vec<_> = parser.diagnostics().iter().collect();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("argument list"));
    }

    #[test]
    fn malformed_number_is_lex_error() {
        let mut parser = Parser::new("1.2.3 * 2");
        assert!(parser.parse_expr().is_err());

        let diagnostics: Vec<_> = parser.diagnostics().iter().collect();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, ErrorKind::LexError);
    }
}
