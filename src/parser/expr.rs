use std::fmt::Display;

use super::Identifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        };
        write!(f, "{op}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            CmpOp::LessThan => "<",
            CmpOp::LessEqual => "<=",
            CmpOp::GreaterThan => ">",
            CmpOp::GreaterEqual => ">=",
            CmpOp::Equal => "==",
            CmpOp::NotEqual => "!=",
        };
        write!(f, "{op}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Num(i64),
    Str(String),
    Ident(Identifier),
    Call(Identifier, Vec<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(Identifier::new(name))
    }
}

/// A comparison. Only appears as the guard of `if` and `while`.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub left: Expr,
    pub op: CmpOp,
    pub right: Expr,
}

impl Condition {
    pub fn new(left: Expr, op: CmpOp, right: Expr) -> Self {
        Self { left, op, right }
    }
}
