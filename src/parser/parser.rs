use crate::lexer::{Token, TokenKind};

use super::{
    BinOp, CmpOp, Condition, Expr, Function, Identifier, ParserError, Program, Span, Stmt,
};

#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            depth: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Program, ParserError> {
        self.parse_program()
    }

    fn is_eof(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.index).map(|t| &t.kind)
    }

    fn current_span(&self) -> Span {
        match self.tokens.get(self.index) {
            Some(t) => t.span,
            None => self
                .tokens
                .last()
                .map(|t| Span::new(t.span.end, t.span.end))
                .unwrap_or_default(),
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek() != Some(kind) {
            return false;
        }
        self.index += 1;
        true
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParserError {
        let expected = expected.into();
        let span = self.current_span().into();
        match self.peek() {
            Some(got) => ParserError::Expected {
                expected,
                got: got.clone(),
                span,
            },
            None => ParserError::UnexpectedEof { expected, span },
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParserError> {
        if self.consume(kind) {
            return Ok(());
        }
        Err(self.unexpected(kind.to_string()))
    }

    fn expect_ident(&mut self) -> Result<Identifier, ParserError> {
        if let Some(Token {
            kind: TokenKind::Ident(name),
            span,
        }) = self.tokens.get(self.index)
        {
            let ident = Identifier::with_span(name.clone(), *span);
            self.index += 1;
            return Ok(ident);
        }
        Err(self.unexpected("identifier"))
    }

    /// program = stmt*
    fn parse_program(&mut self) -> Result<Program, ParserError> {
        let mut statements = vec![];

        while !self.is_eof() {
            statements.push(self.parse_stmt()?);
        }

        Ok(Program { statements })
    }

    /// block = "{" stmt* "}"
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParserError> {
        self.expect(&TokenKind::OpenCurlyBrace)?;
        self.depth += 1;
        let mut stmts = vec![];
        while !self.consume(&TokenKind::CloseCurlyBrace) {
            stmts.push(self.parse_stmt()?);
        }
        self.depth -= 1;
        Ok(stmts)
    }

    /// stmt = func
    ///      | "let"? ident "=" expr ";"
    ///      | "print" "(" expr ")" ";"
    ///      | "if" "(" condition ")" block ("else" block)?
    ///      | "while" "(" condition ")" block
    fn parse_stmt(&mut self) -> Result<Stmt, ParserError> {
        match self.peek() {
            Some(TokenKind::Fn) => {
                if self.depth > 0 {
                    return Err(ParserError::NestedFunction {
                        span: self.current_span().into(),
                    });
                }
                self.index += 1;
                Ok(Stmt::Function(self.parse_func()?))
            }
            Some(TokenKind::Return) => Err(ParserError::ReturnOutsideFunction {
                span: self.current_span().into(),
            }),
            Some(TokenKind::Print) => {
                self.index += 1;
                self.expect(&TokenKind::OpenParen)?;
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::CloseParen)?;
                self.expect(&TokenKind::SemiColon)?;
                Ok(Stmt::Print(expr))
            }
            Some(TokenKind::If) => {
                self.index += 1;
                let cond = self.parse_paren_condition()?;
                let then_block = self.parse_block()?;
                let else_block = if self.consume(&TokenKind::Else) {
                    Some(self.parse_block()?)
                } else {
                    None
                };
                Ok(Stmt::If {
                    cond,
                    then_block,
                    else_block,
                })
            }
            Some(TokenKind::While) => {
                self.index += 1;
                let cond = self.parse_paren_condition()?;
                let body = self.parse_block()?;
                Ok(Stmt::While { cond, body })
            }
            _ => {
                self.consume(&TokenKind::Let);
                let target = self.expect_ident()?;
                self.expect(&TokenKind::Equal)?;
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::SemiColon)?;
                Ok(Stmt::Assign { target, expr })
            }
        }
    }

    /// func = "fn" ident "(" params? ")" ("->" "int")? "{" stmt* ("return" expr ";")? "}"
    fn parse_func(&mut self) -> Result<Function, ParserError> {
        let name = self.expect_ident()?;
        let params = self.parse_params()?;
        if self.consume(&TokenKind::Arrow) {
            self.expect(&TokenKind::Int)?;
        }

        self.expect(&TokenKind::OpenCurlyBrace)?;
        self.depth += 1;
        let mut body = vec![];
        let mut ret = None;
        while !self.consume(&TokenKind::CloseCurlyBrace) {
            if self.consume(&TokenKind::Return) {
                ret = Some(self.parse_expr()?);
                self.expect(&TokenKind::SemiColon)?;
                self.expect(&TokenKind::CloseCurlyBrace)?;
                break;
            }
            body.push(self.parse_stmt()?);
        }
        self.depth -= 1;

        Ok(Function {
            name,
            params,
            body,
            ret,
        })
    }

    /// params = "(" (param ("," param)*)? ")"
    /// param  = ident (":" "int")?
    fn parse_params(&mut self) -> Result<Vec<Identifier>, ParserError> {
        let mut params = vec![];
        self.expect(&TokenKind::OpenParen)?;

        if self.consume(&TokenKind::CloseParen) {
            return Ok(params);
        }
        loop {
            params.push(self.expect_ident()?);
            if self.consume(&TokenKind::Colon) {
                self.expect(&TokenKind::Int)?;
            }
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::CloseParen)?;

        Ok(params)
    }

    fn parse_paren_condition(&mut self) -> Result<Condition, ParserError> {
        self.expect(&TokenKind::OpenParen)?;
        let cond = self.parse_condition()?;
        self.expect(&TokenKind::CloseParen)?;
        Ok(cond)
    }

    /// condition = expr ("<" | "<=" | ">" | ">=" | "==" | "!=") expr
    fn parse_condition(&mut self) -> Result<Condition, ParserError> {
        let left = self.parse_expr()?;
        let op = match self.peek() {
            Some(TokenKind::LessThan) => CmpOp::LessThan,
            Some(TokenKind::LessEqual) => CmpOp::LessEqual,
            Some(TokenKind::GreaterThan) => CmpOp::GreaterThan,
            Some(TokenKind::GreaterEqual) => CmpOp::GreaterEqual,
            Some(TokenKind::DoubleEqual) => CmpOp::Equal,
            Some(TokenKind::NotEqual) => CmpOp::NotEqual,
            _ => return Err(self.unexpected("comparison operator")),
        };
        self.index += 1;
        let right = self.parse_expr()?;
        Ok(Condition::new(left, op, right))
    }

    /// expr = term ("+" term | "-" term)*
    fn parse_expr(&mut self) -> Result<Expr, ParserError> {
        let mut node = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => return Ok(node),
            };
            self.index += 1;
            node = Expr::binary(op, node, self.parse_term()?);
        }
    }

    /// term = factor ("*" factor | "/" factor | "%" factor)*
    fn parse_term(&mut self) -> Result<Expr, ParserError> {
        let mut node = self.parse_factor()?;

        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                Some(TokenKind::Percent) => BinOp::Mod,
                _ => return Ok(node),
            };
            self.index += 1;
            node = Expr::binary(op, node, self.parse_factor()?);
        }
    }

    /// factor = num | string | ident ("(" args? ")")? | "(" expr ")"
    fn parse_factor(&mut self) -> Result<Expr, ParserError> {
        match self.peek().cloned() {
            Some(TokenKind::Num(value)) => {
                self.index += 1;
                Ok(Expr::Num(value))
            }
            Some(TokenKind::Str(value)) => {
                self.index += 1;
                Ok(Expr::Str(value))
            }
            Some(TokenKind::Ident(_)) => {
                let ident = self.expect_ident()?;
                if self.consume(&TokenKind::OpenParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::Call(ident, args))
                } else {
                    Ok(Expr::Ident(ident))
                }
            }
            Some(TokenKind::OpenParen) => {
                self.index += 1;
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::CloseParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// args = (expr ("," expr)*)? ")"
    fn parse_args(&mut self) -> Result<Vec<Expr>, ParserError> {
        let mut args = vec![];
        if self.consume(&TokenKind::CloseParen) {
            return Ok(args);
        }
        args.push(self.parse_expr()?);
        while self.consume(&TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        self.expect(&TokenKind::CloseParen)?;
        Ok(args)
    }
}
