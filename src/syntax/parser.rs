use crate::error::{Diagnostic, Diagnostics, ErrorKind, PResult, Reported};

use super::{
    decl::{FnDecl, Item, Param, Prototype},
    lexer::Lexer,
    scope::{Attribute, ScopeKind, SymbolKind, SymbolTable},
    token::{DataType, Keyword, Token, TokenKind},
    types::Type,
    ExprParser,
};

/// One parse session: owns the lexer, the current token, the symbol table
/// and the diagnostic sink. Never shared between independent parses.
pub(crate) struct Parser<'src> {
    lexer: Lexer<'src>,
    pub(super) token: Token<'src>,
    pub(super) symbols: SymbolTable<'src>,
    diagnostics: Diagnostics,
}

impl<'src> Parser<'src> {
    pub fn new(src: &'src str) -> Self {
        let mut lexer = Lexer::new(src);
        let token = lexer.next_token();
        Self {
            lexer,
            token,
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn symbols(&self) -> &SymbolTable<'src> {
        &self.symbols
    }

    /// Parses every top-level construct and returns the ones that succeeded.
    pub fn parse_program(&mut self) -> Vec<Item<'src>> {
        std::iter::from_fn(|| self.next_item())
            .filter_map(Result::ok)
            .collect()
    }

    /// Parses the next top-level construct, or returns `None` at end of
    /// input. Top-level `;` are skipped. A failed construct costs one extra
    /// token so that the next call makes progress.
    pub fn next_item(&mut self) -> Option<PResult<Item<'src>>> {
        loop {
            let (what, result) = match self.token.kind {
                TokenKind::Eof => return None,
                TokenKind::Punct(';') => {
                    self.bump();
                    continue;
                }
                TokenKind::Kw(Keyword::Fun) => ("function definition", self.parse_fn()),
                TokenKind::Kw(Keyword::Extern) => ("extern", self.parse_extern()),
                _ => (
                    "top-level expression",
                    self.parse_expr().map(Item::Expr),
                ),
            };

            match &result {
                Ok(_) => log::info!("parsed a {what}"),
                Err(_) => {
                    log::info!("error parsing a {what}, skipping {}", self.token.kind);
                    self.bump();
                }
            }
            return Some(result);
        }
    }

    /// `fun` prototype `{` expression `}`
    fn parse_fn(&mut self) -> PResult<Item<'src>> {
        self.bump();

        let mut decl = self.parse_declare_fn()?;
        self.expect_punct('{', "to open function body")?;

        self.symbols.enter_scope();
        for param in &decl.proto.params {
            let attr = Attribute::new(
                param.id,
                ScopeKind::Param,
                SymbolKind::Parameter,
                param.ty.clone(),
            );
            self.symbols.insert(param.id, attr);
        }
        let body = self.parse_expr();
        self.symbols.exit_scope();

        let body = body?;
        self.expect_punct('}', "to close function body")?;

        decl.body = Some(body);
        Ok(Item::Fn(decl))
    }

    /// `extern` [`fun`] prototype
    fn parse_extern(&mut self) -> PResult<Item<'src>> {
        self.bump();
        if self.token.kind == TokenKind::Kw(Keyword::Fun) {
            self.bump();
        }

        Ok(Item::Fn(self.parse_declare_fn()?))
    }

    /// Parses a prototype and declares it in the global scope.
    fn parse_declare_fn(&mut self) -> PResult<FnDecl<'src>> {
        let proto = self.parse_prototype()?;

        if self.symbols.lookup_current(proto.id).is_some() {
            return Err(self.error(
                ErrorKind::SemanticError,
                format!("function `{}` already declared", proto.id),
            ));
        }

        let attr = Attribute::new(
            proto.id,
            ScopeKind::Global,
            SymbolKind::Function,
            proto.signature(),
        );
        self.symbols.insert(proto.id, attr);

        Ok(FnDecl::declaration(proto))
    }

    /// id `(` (id type `,`?)* `)` type?
    fn parse_prototype(&mut self) -> PResult<Prototype<'src>> {
        let id = match self.token.kind {
            TokenKind::Id(id) => id,
            other => {
                return Err(self.error(
                    ErrorKind::SyntaxError,
                    format!("expected function name in prototype, found {other}"),
                ))
            }
        };
        self.bump();

        self.expect_punct('(', "in prototype")?;
        let params = self.parse_params()?;

        let ret = match self.token.kind {
            TokenKind::Type(ty) => {
                self.bump();
                ty
            }
            _ => DataType::Void,
        };

        Ok(Prototype {
            id,
            params,
            ret: Type::from(ret),
        })
    }

    // The comma between parameters is optional and duplicate names are not
    // rejected; both are accepted as-is.
    fn parse_params(&mut self) -> PResult<Vec<Param<'src>>> {
        let mut params = vec![];

        while !self.token.is_punct(')') {
            if self.token.kind == TokenKind::Eof {
                return Err(self.error(
                    ErrorKind::SyntaxError,
                    "expected `)` in prototype, found end of input",
                ));
            }
            params.push(self.parse_param()?);
        }
        self.bump();

        Ok(params)
    }

    fn parse_param(&mut self) -> PResult<Param<'src>> {
        let id = match self.token.kind {
            TokenKind::Id(id) => id,
            other => {
                return Err(self.error(
                    ErrorKind::SyntaxError,
                    format!("expected argument name or `)` in prototype, found {other}"),
                ))
            }
        };
        self.bump();

        let ty = match self.token.kind {
            TokenKind::Type(ty) => ty,
            other => {
                return Err(self.error(
                    ErrorKind::SyntaxError,
                    format!("expected data type for argument `{id}`, found {other}"),
                ))
            }
        };
        self.bump();

        if self.token.is_punct(',') {
            self.bump();
        }

        Ok(Param {
            id,
            ty: Type::from(ty),
        })
    }

    #[inline(always)]
    pub(super) fn bump(&mut self) {
        self.token = self.lexer.next_token();
    }

    /// Records a diagnostic at the current token.
    pub(super) fn error(&mut self, kind: ErrorKind, message: impl Into<String>) -> Reported {
        let diagnostic = Diagnostic {
            kind,
            loc: self.token.loc,
            message: message.into(),
        };
        log::debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
        Reported
    }

    pub(super) fn expect_punct(&mut self, expected: char, context: &str) -> PResult<()> {
        if self.token.is_punct(expected) {
            self.bump();
            return Ok(());
        }
        let found = self.token.kind;
        Err(self.error(
            ErrorKind::SyntaxError,
            format!("expected `{expected}` {context}, found {found}"),
        ))
    }
}
