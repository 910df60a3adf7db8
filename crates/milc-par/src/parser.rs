//! Recursive-descent parser with one-token pushback and precedence
//! climbing (spec.md §4.3), ported from `original_source/parser/*.go`.

use crate::ast::*;
use crate::error::ParseError;
use milc_lex::{Token, TokenKind};
use milc_util::Pos;

/// Index-based cursor over an already-lexed token slice. Functionally
/// equivalent to the single-pushback `TokenStream` in
/// `original_source/parser/stream.go`: `unread` only ever needs to step
/// back one token because every lookahead here peeks before consuming.
struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        TokenStream { tokens, pos: 0 }
    }

    fn peek(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)].clone()
    }

    fn read(&mut self) -> Token {
        let t = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn unread(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
        }
    }

    fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek().kind == kind {
            Some(self.read())
        } else {
            None
        }
    }
}

pub struct Parser<'a> {
    ts: TokenStream<'a>,
}

/// Parses a complete file from an already-lexed token slice (spec.md §6
/// names `milc_drv::compile_file` as the sole pipeline entry point; this is
/// the parser's contribution to it).
pub fn parse(tokens: &[Token]) -> Result<File, ParseError> {
    log::debug!("parsing {} tokens", tokens.len());
    let mut p = Parser { ts: TokenStream::new(tokens) };
    let file = p.parse_file()?;
    log::debug!("parsed package {:?}, {} funcs", file.pkg.name, file.funcs.len());
    Ok(file)
}

impl<'a> Parser<'a> {
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let tok = self.ts.peek();
        if tok.kind == kind {
            Ok(self.ts.read())
        } else {
            Err(ParseError::UnexpectedToken { expected: kind, found: tok.kind, pos: tok.pos })
        }
    }

    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        let tok = self.ts.peek();
        if tok.kind != TokenKind::Ident {
            return Err(ParseError::ExpectedIdent { found: tok.kind, pos: tok.pos });
        }
        self.ts.read();
        Ok(Ident { name_pos: tok.pos, name: tok.literal, ty: None })
    }

    /// Consumes a trailing statement semicolon if one is there. Automatic
    /// semicolon insertion only fires after `RParen`/`Ident`/`Int`/`Float`/
    /// `Return` (milc-lex's `ASI_KINDS`), so statements ending in a keyword
    /// (`break`, `continue`, `goto`, `defer`) or a string literal (`import`)
    /// never get one inserted — the terminator has to be optional here
    /// rather than required, or those statements could never be followed
    /// directly by a closing brace.
    fn accept_terminator(&mut self) {
        self.ts.accept(TokenKind::Semicolon);
    }

    // -- file structure ---------------------------------------------------

    fn parse_file(&mut self) -> Result<File, ParseError> {
        let pkg = self.parse_package()?;

        let mut imports = Vec::new();
        while self.ts.peek().kind == TokenKind::Import {
            imports.push(self.parse_import()?);
        }

        let mut globals = Vec::new();
        let mut funcs = Vec::new();
        while self.ts.peek().kind != TokenKind::Eof {
            match self.ts.peek().kind {
                TokenKind::Var => globals.push(self.parse_stmt_var()?),
                TokenKind::Func => funcs.push(self.parse_func()?),
                other => {
                    return Err(ParseError::ExpectedStmt { found: other, pos: self.ts.peek().pos })
                }
            }
        }
        Ok(File { pkg, imports, globals, funcs })
    }

    fn parse_package(&mut self) -> Result<PackageSpec, ParseError> {
        let pkg_tok = self.expect(TokenKind::Package)?;
        let name_tok = self.expect(TokenKind::Ident)?;
        self.accept_terminator();
        Ok(PackageSpec { pkg_pos: pkg_tok.pos, name_pos: name_tok.pos, name: name_tok.literal })
    }

    fn parse_import(&mut self) -> Result<ImportSpec, ParseError> {
        let import_tok = self.expect(TokenKind::Import)?;
        let name = if self.ts.peek().kind == TokenKind::Ident {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let path_tok = self.expect(TokenKind::String)?;
        self.accept_terminator();
        Ok(ImportSpec { import_pos: import_tok.pos, name, path: path_tok.literal })
    }

    fn parse_field_list(&mut self) -> Result<FieldList, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut list = Vec::new();
        while self.ts.peek().kind != TokenKind::RParen {
            let name = self.expect_ident()?;
            let ty = self.expect_ident()?;
            list.push(Field { name, ty });
            if self.ts.accept(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(FieldList { list })
    }

    fn parse_func(&mut self) -> Result<FuncDecl, ParseError> {
        let func_tok = self.expect(TokenKind::Func)?;
        let name_tok = self.expect(TokenKind::Ident)?;
        let params = self.parse_field_list()?;
        let result = if self.ts.peek().kind == TokenKind::Ident {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let ty = FuncType { func: func_tok.pos, params, result };

        // A function with no body is a forward declaration, used for
        // imported packages (spec.md §4.5 "forward func decls").
        let body = if self.ts.peek().kind == TokenKind::LBrace {
            Some(self.parse_stmt_block()?)
        } else {
            self.accept_terminator();
            None
        };
        Ok(FuncDecl { func_pos: func_tok.pos, name_pos: name_tok.pos, name: name_tok.literal, ty, body })
    }

    // -- statements --------------------------------------------------------

    fn parse_stmt_block(&mut self) -> Result<BlockStmt, ParseError> {
        let lbrace = self.expect(TokenKind::LBrace)?.pos;
        let mut list = Vec::new();
        while self.ts.peek().kind != TokenKind::RBrace {
            list.push(self.parse_stmt()?);
        }
        let rbrace = self.expect(TokenKind::RBrace)?.pos;
        Ok(BlockStmt { lbrace, list, rbrace })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.ts.peek().kind {
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_stmt_block()?)),
            TokenKind::Var => Ok(Stmt::Var(self.parse_stmt_var()?)),
            TokenKind::If => Ok(Stmt::If(self.parse_stmt_if()?)),
            TokenKind::For => self.parse_stmt_for(),
            TokenKind::Return => Ok(Stmt::Return(self.parse_stmt_return()?)),
            TokenKind::Break => Ok(Stmt::Branch(self.parse_stmt_break()?)),
            TokenKind::Continue => Ok(Stmt::Branch(self.parse_stmt_continue()?)),
            TokenKind::Goto => Ok(Stmt::Branch(self.parse_stmt_goto()?)),
            TokenKind::Defer => Ok(Stmt::Defer(self.parse_stmt_defer()?)),
            TokenKind::Ident => self.parse_stmt_ident_led(),
            other => Err(ParseError::ExpectedStmt { found: other, pos: self.ts.peek().pos }),
        }
    }

    /// Disambiguates `label:` from an expression/assignment statement by
    /// reading the leading identifier and peeking one token further.
    fn parse_stmt_ident_led(&mut self) -> Result<Stmt, ParseError> {
        let tok = self.ts.read();
        if self.ts.peek().kind == TokenKind::Colon {
            let colon = self.ts.read().pos;
            let label = Ident { name_pos: tok.pos, name: tok.literal, ty: None };
            let stmt = if self.ts.peek().kind == TokenKind::RBrace {
                None
            } else {
                Some(Box::new(self.parse_stmt()?))
            };
            return Ok(Stmt::Labeled(LabeledStmt { label, colon, stmt }));
        }
        self.ts.unread();
        self.parse_stmt_expr_or_assign()
    }

    fn parse_stmt_expr_or_assign(&mut self) -> Result<Stmt, ParseError> {
        let stmt = self.parse_simple_stmt()?;
        self.accept_terminator();
        Ok(stmt)
    }

    /// An assignment or bare expression statement, without its trailing
    /// semicolon. Shared between ordinary statements and the `for`
    /// init/post clauses, which supply their own delimiters.
    fn parse_simple_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expr()?;
        let peek = self.ts.peek();
        if peek.kind == TokenKind::Assign || peek.kind == TokenKind::Define {
            let op_tok = self.ts.read();
            let target = self.expr_to_ident(expr)?;
            let value = self.parse_expr()?;
            Ok(Stmt::Assign(AssignStmt {
                target: vec![target],
                op_pos: op_tok.pos,
                op: op_tok.kind,
                value: vec![value],
            }))
        } else {
            Ok(Stmt::Expr(ExprStmt { x: expr }))
        }
    }

    fn expr_to_ident(&self, e: Expr) -> Result<Ident, ParseError> {
        match e {
            Expr::Ident(i) => Ok(i),
            other => Err(ParseError::ExpectedIdent { found: TokenKind::Error, pos: other.pos() }),
        }
    }

    fn stmt_to_expr(&self, s: Stmt) -> Result<Expr, ParseError> {
        match s {
            Stmt::Expr(e) => Ok(e.x),
            _ => Err(ParseError::ExpectedExpr { found: TokenKind::Error, pos: Pos::NONE }),
        }
    }

    fn parse_stmt_var(&mut self) -> Result<VarSpec, ParseError> {
        let var_tok = self.expect(TokenKind::Var)?;
        let name = self.expect_ident()?;
        let ty = if self.ts.peek().kind == TokenKind::Ident {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let value = if self.ts.accept(TokenKind::Assign).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.accept_terminator();
        Ok(VarSpec { var_pos: var_tok.pos, name, ty, value })
    }

    fn parse_stmt_if(&mut self) -> Result<IfStmt, ParseError> {
        let if_pos = self.expect(TokenKind::If)?.pos;
        let cond = self.parse_expr()?;
        let body = self.parse_stmt_block()?;
        let else_ = if self.ts.accept(TokenKind::Else).is_some() {
            if self.ts.peek().kind == TokenKind::If {
                Some(Box::new(Stmt::If(self.parse_stmt_if()?)))
            } else {
                Some(Box::new(Stmt::Block(self.parse_stmt_block()?)))
            }
        } else {
            None
        };
        Ok(IfStmt { if_pos, init: None, cond, body, else_ })
    }

    /// Ports all four shapes of `original_source/parser/parse_stmt_for.go`:
    /// bare `for {}`, while-style `for cond {}`, and full
    /// `for init; cond; post {}` (post may be omitted).
    fn parse_stmt_for(&mut self) -> Result<Stmt, ParseError> {
        let for_pos = self.expect(TokenKind::For)?.pos;

        if self.ts.peek().kind == TokenKind::LBrace {
            let body = self.parse_stmt_block()?;
            return Ok(Stmt::For(ForStmt { for_pos, init: None, cond: None, post: None, body }));
        }

        let first = self.parse_simple_stmt()?;

        if self.ts.peek().kind == TokenKind::LBrace {
            let cond = self.stmt_to_expr(first)?;
            let body = self.parse_stmt_block()?;
            return Ok(Stmt::For(ForStmt { for_pos, init: None, cond: Some(cond), post: None, body }));
        }

        self.expect(TokenKind::Semicolon)?;
        let cond = if self.ts.peek().kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let post = if self.ts.peek().kind == TokenKind::LBrace {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()?))
        };
        let body = self.parse_stmt_block()?;
        Ok(Stmt::For(ForStmt { for_pos, init: Some(Box::new(first)), cond, post, body }))
    }

    fn parse_stmt_return(&mut self) -> Result<ReturnStmt, ParseError> {
        let return_tok = self.expect(TokenKind::Return)?;
        let result = if self.ts.peek().kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.accept_terminator();
        Ok(ReturnStmt { return_pos: return_tok.pos, result })
    }

    fn parse_optional_label(&mut self) -> Result<Option<Ident>, ParseError> {
        if self.ts.peek().kind == TokenKind::Ident {
            Ok(Some(self.expect_ident()?))
        } else {
            Ok(None)
        }
    }

    fn parse_stmt_break(&mut self) -> Result<BranchStmt, ParseError> {
        let tok = self.expect(TokenKind::Break)?;
        let label = self.parse_optional_label()?;
        self.accept_terminator();
        Ok(BranchStmt { tok_pos: tok.pos, tok_kind: tok.kind, label })
    }

    fn parse_stmt_continue(&mut self) -> Result<BranchStmt, ParseError> {
        let tok = self.expect(TokenKind::Continue)?;
        let label = self.parse_optional_label()?;
        self.accept_terminator();
        Ok(BranchStmt { tok_pos: tok.pos, tok_kind: tok.kind, label })
    }

    /// `goto` is parsed but never emitted (spec.md §9 open question,
    /// supplemented from `original_source/ast/ast.go`'s `GotoStmt`).
    fn parse_stmt_goto(&mut self) -> Result<BranchStmt, ParseError> {
        let tok = self.expect(TokenKind::Goto)?;
        let label = Some(self.expect_ident()?);
        self.accept_terminator();
        Ok(BranchStmt { tok_pos: tok.pos, tok_kind: tok.kind, label })
    }

    /// Parsed but never emitted (spec.md §1 Non-goals list `defer`).
    fn parse_stmt_defer(&mut self) -> Result<DeferStmt, ParseError> {
        let defer_tok = self.expect(TokenKind::Defer)?;
        let expr = self.parse_expr()?;
        self.accept_terminator();
        match expr {
            Expr::Call(call) => Ok(DeferStmt { defer_pos: defer_tok.pos, call: *call }),
            other => Err(ParseError::ExpectedExpr { found: TokenKind::Error, pos: other.pos() }),
        }
    }

    // -- expressions ---------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_binary(1)
    }

    fn parse_expr_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut x = self.parse_expr_unary()?;
        loop {
            let op_tok = self.ts.peek();
            let op_prec = op_tok.kind.precedence();
            if op_prec == 0 || op_prec < min_prec {
                break;
            }
            self.ts.read();
            let y = self.parse_expr_binary(op_prec + 1)?;
            x = Expr::Binary(Box::new(BinaryExpr { op_pos: op_tok.pos, op: op_tok.kind, x, y }));
        }
        Ok(x)
    }

    /// Unary `!`, `-`, `+`. Leading `+` is parsed but is transparent at
    /// emission time (supplemented from `original_source/parser/parse_expr.go`).
    fn parse_expr_unary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.ts.peek();
        match tok.kind {
            TokenKind::Not | TokenKind::Sub | TokenKind::Add => {
                self.ts.read();
                let x = self.parse_expr_unary()?;
                Ok(Expr::Unary(Box::new(UnaryExpr { op_pos: tok.pos, op: tok.kind, x })))
            }
            _ => self.parse_expr_primary(),
        }
    }

    fn parse_expr_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.ts.read();
        match tok.kind {
            TokenKind::Int => {
                let value = tok.literal.parse::<i64>().map_err(|_| ParseError::ExpectedExpr {
                    found: tok.kind,
                    pos: tok.pos,
                })?;
                let value_end = Pos::new(tok.pos.0 + tok.literal.len() as u32);
                Ok(Expr::Int(IntLit { value_pos: tok.pos, value_end, value }))
            }
            TokenKind::Float => {
                let value = tok.literal.parse::<f64>().map_err(|_| ParseError::ExpectedExpr {
                    found: tok.kind,
                    pos: tok.pos,
                })?;
                let value_end = Pos::new(tok.pos.0 + tok.literal.len() as u32);
                Ok(Expr::Float(FloatLit { value_pos: tok.pos, value_end, value }))
            }
            TokenKind::Char => {
                let value = parse_char_literal(&tok.literal);
                let value_end = Pos::new(tok.pos.0 + tok.literal.len() as u32);
                Ok(Expr::Char(CharLit { value_pos: tok.pos, value_end, value }))
            }
            TokenKind::Ident => self.parse_expr_ident_or_call(tok),
            TokenKind::LParen => {
                let x = self.parse_expr()?;
                let rparen = self.expect(TokenKind::RParen)?.pos;
                Ok(Expr::Paren(Box::new(ParenExpr { lparen: tok.pos, x, rparen })))
            }
            other => Err(ParseError::ExpectedExpr { found: other, pos: tok.pos }),
        }
    }

    fn parse_expr_ident_or_call(&mut self, tok: Token) -> Result<Expr, ParseError> {
        let ident = Ident { name_pos: tok.pos, name: tok.literal, ty: None };

        if self.ts.peek().kind == TokenKind::LParen {
            return self.parse_expr_call(None, ident);
        }

        if self.ts.peek().kind == TokenKind::Period {
            self.ts.read();
            let sel_tok = self.expect(TokenKind::Ident)?;
            if self.ts.peek().kind == TokenKind::LParen {
                let func_name = Ident { name_pos: sel_tok.pos, name: sel_tok.literal, ty: None };
                return self.parse_expr_call(Some(ident), func_name);
            }
            // `sel.name` is copied from the receiver's own literal rather
            // than the selector token's. This looks wrong but faithfully
            // reproduces the observed behavior of
            // `original_source/parser/parse_expr.go`'s `parseExprSelector`
            // (spec.md §9 open question, preserved rather than silently
            // fixed).
            let sel = Ident { name_pos: sel_tok.pos, name: ident.name.clone(), ty: None };
            return Ok(Expr::Selector(Box::new(SelectorExpr { x: Expr::Ident(ident), sel })));
        }

        Ok(Expr::Ident(ident))
    }

    /// Parses a call's argument list. `original_source/parser/parse_expr.go`
    /// parses at most a single argument expression before `)`; preserved
    /// faithfully rather than generalized to comma-separated arguments
    /// (spec.md §9 open question).
    fn parse_expr_call(&mut self, pkg: Option<Ident>, func_name: Ident) -> Result<Expr, ParseError> {
        let lparen = self.expect(TokenKind::LParen)?.pos;
        let args = if self.ts.peek().kind == TokenKind::RParen {
            Vec::new()
        } else {
            vec![self.parse_expr()?]
        };
        let rparen = self.expect(TokenKind::RParen)?.pos;
        Ok(Expr::Call(Box::new(CallExpr { pkg, func_name, lparen, args, rparen })))
    }
}

/// A plain char literal (`'A'`, quotes included, 3 bytes total) evaluates
/// to the ASCII value of its one character. An escaped literal (`'\n'`,
/// `'\t'`, ...) is 4+ bytes and is *not* decoded: only the character right
/// after the opening quote (the backslash itself) is fed to an integer
/// parse, which always fails and yields 0 regardless of which letter
/// follows. Faithful to `original_source/parser/parse_expr.go`'s
/// `strconv.Atoi(tokChar.Literal[1:2])` (spec.md §4.3), not a bug to fix.
fn parse_char_literal(lit: &str) -> i64 {
    let bytes = lit.as_bytes();
    if bytes.len() == 3 {
        bytes[1] as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milc_lex::lex;

    fn parse_src(src: &str) -> Result<File, ParseError> {
        let (tokens, _, lex_err) = lex(src);
        assert!(lex_err.is_none(), "unexpected lex error: {:?}", lex_err);
        parse(&tokens)
    }

    #[test]
    fn parses_minimal_package() {
        let file = parse_src("package main\n").unwrap();
        assert_eq!(file.pkg.name, "main");
        assert!(file.funcs.is_empty());
    }

    #[test]
    fn parses_func_with_return() {
        let file = parse_src("package main\nfunc main() i32 {\n return 0\n}\n").unwrap();
        assert_eq!(file.funcs.len(), 1);
        let f = &file.funcs[0];
        assert_eq!(f.name, "main");
        assert!(f.ty.result.is_some());
        assert!(f.body.is_some());
    }

    #[test]
    fn parses_binary_precedence() {
        let file = parse_src("package main\nfunc f() i32 {\n return 1 + 2 * 3\n}\n").unwrap();
        let body = file.funcs[0].body.as_ref().unwrap();
        match &body.list[0] {
            Stmt::Return(r) => match r.result.as_ref().unwrap() {
                Expr::Binary(b) => {
                    assert_eq!(b.op, TokenKind::Add);
                    assert!(matches!(b.y, Expr::Binary(_)));
                }
                other => panic!("expected binary expr, got {:?}", other),
            },
            other => panic!("expected return stmt, got {:?}", other),
        }
    }

    #[test]
    fn parses_for_with_three_clauses() {
        let src = "package main\nfunc f() {\n for i := 0; i < 10; i = i + 1 {\n }\n}\n";
        let file = parse_src(src).unwrap();
        let body = file.funcs[0].body.as_ref().unwrap();
        match &body.list[0] {
            Stmt::For(f) => {
                assert!(f.init.is_some());
                assert!(f.cond.is_some());
                assert!(f.post.is_some());
            }
            other => panic!("expected for stmt, got {:?}", other),
        }
    }

    #[test]
    fn unexpected_token_reports_its_position() {
        let (tokens, _, _) = lex("package main\nfunc f() {\n 1 +\n}\n");
        let err = parse(&tokens).unwrap_err();
        assert!(err.pos().0 > 0);
    }

    #[test]
    fn single_argument_call_parses() {
        let file = parse_src("package main\nfunc f() {\n println(1)\n}\n").unwrap();
        let body = file.funcs[0].body.as_ref().unwrap();
        match &body.list[0] {
            Stmt::Expr(e) => match &e.x {
                Expr::Call(c) => assert_eq!(c.args.len(), 1),
                other => panic!("expected call expr, got {:?}", other),
            },
            other => panic!("expected expr stmt, got {:?}", other),
        }
    }
}
