use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::parser::{Condition, Expr, Function, Identifier, Program, Stmt};

use super::{SemaError, SymbolTable, Type};

/// Walks a program once and collects every semantic defect it finds.
///
/// An analyzer is consumed by [`SemanticAnalyzer::analyze`], so each run
/// starts from an empty symbol table.
#[derive(Debug, Default)]
pub struct SemanticAnalyzer {
    symbol_table: SymbolTable,
    functions: HashMap<String, usize>,
    defined: HashSet<String>,
    in_function: bool,
    errors: Vec<SemaError>,
}

const ENTRY_POINT: &str = "main";

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            symbol_table: SymbolTable::new(),
            functions: HashMap::new(),
            defined: HashSet::new(),
            in_function: false,
            errors: vec![],
        }
    }

    /// Returns the diagnostics in detection order. Empty means accepted.
    pub fn analyze(mut self, program: &Program) -> Vec<SemaError> {
        self.collect_functions(program);
        self.visit_block(&program.statements);
        self.errors
    }

    fn report(&mut self, error: SemaError) {
        debug!(%error, "semantic error");
        self.errors.push(error);
    }

    // Signatures only, so calls may precede definitions. Problems with the
    // definitions themselves are reported by `visit_function` in source order.
    fn collect_functions(&mut self, program: &Program) {
        for func in program.functions() {
            if func.name.name == ENTRY_POINT {
                continue;
            }
            self.functions
                .entry(func.name.name.clone())
                .or_insert(func.params.len());
        }
    }

    fn visit_block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.visit_stmt(stmt);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Function(func) => self.visit_function(func),
            Stmt::Assign { target, expr } => self.visit_assign(target, expr),
            Stmt::Print(expr) => self.visit_print(expr),
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                self.visit_condition(cond);
                self.visit_block(then_block);
                if let Some(else_block) = else_block {
                    self.visit_block(else_block);
                }
            }
            Stmt::While { cond, body } => {
                self.visit_condition(cond);
                self.visit_block(body);
            }
        }
    }

    fn visit_function(&mut self, func: &Function) {
        let name = &func.name;
        if name.name == ENTRY_POINT {
            self.report(SemaError::ReservedFunctionName {
                name: name.name.clone(),
                span: name.span.into(),
            });
        } else if !self.defined.insert(name.name.clone()) {
            self.report(SemaError::DuplicateFunction {
                name: name.name.clone(),
                span: name.span.into(),
            });
        }

        let outer = self
            .symbol_table
            .enter_function(func.params.iter().map(|p| p.name.as_str()));
        let was_in_function = std::mem::replace(&mut self.in_function, true);

        self.visit_block(&func.body);
        if let Some(ret) = &func.ret {
            let found = self.infer_type(ret);
            if !found.is_sentinel() && found != Type::Int {
                self.report(SemaError::ReturnTypeMismatch {
                    name: name.name.clone(),
                    found,
                    span: name.span.into(),
                });
            }
        }

        self.in_function = was_in_function;
        self.symbol_table.leave_function(outer);
    }

    fn visit_assign(&mut self, target: &Identifier, expr: &Expr) {
        let found = self.infer_type(expr);

        match self.symbol_table.get(&target.name) {
            // implicit declaration
            None => {
                if !self.in_function && self.functions.contains_key(&target.name) {
                    self.report(SemaError::NameCollision {
                        name: target.name.clone(),
                        span: target.span.into(),
                    });
                }
                self.symbol_table.declare(&target.name, found);
            }
            Some(expected) if expected.is_sentinel() => {
                if !found.is_sentinel() {
                    self.symbol_table.declare(&target.name, found);
                }
            }
            Some(expected) if !found.is_sentinel() && expected != found => {
                self.report(SemaError::TypeMismatch {
                    name: target.name.clone(),
                    expected,
                    found,
                    span: target.span.into(),
                });
            }
            Some(_) => (),
        }
    }

    // Only a bare identifier argument is checked here; literals and compound
    // expressions pass through unvalidated.
    fn visit_print(&mut self, expr: &Expr) {
        if let Expr::Ident(ident) = expr {
            if !self.symbol_table.contains(&ident.name) {
                self.report(SemaError::UndefinedVariableInPrint {
                    name: ident.name.clone(),
                    span: ident.span.into(),
                });
            }
        }
    }

    fn visit_condition(&mut self, cond: &Condition) {
        let left = self.infer_type(&cond.left);
        let right = self.infer_type(&cond.right);
        self.check_operands(&cond.op.to_string(), left, right);
    }

    /// Arithmetic and comparisons are only defined on `int`. Returns the
    /// result type of the operation, `Error` if it is ill-typed.
    fn check_operands(&mut self, op: &str, left: Type, right: Type) -> Type {
        match (left, right) {
            (l, r) if l.is_sentinel() || r.is_sentinel() => Type::Error,
            (l, r) if l != r => {
                self.report(SemaError::OperandMismatch { left: l, right: r });
                Type::Error
            }
            (Type::Int, _) => Type::Int,
            (ty, _) => {
                self.report(SemaError::InvalidOperand {
                    op: op.to_string(),
                    ty,
                });
                Type::Error
            }
        }
    }

    fn infer_type(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Num(_) => Type::Int,
            Expr::Str(_) => Type::Str,
            Expr::Ident(ident) => match self.symbol_table.get(&ident.name) {
                Some(ty) => ty,
                None => {
                    self.report(SemaError::UndefinedVariable {
                        name: ident.name.clone(),
                        span: ident.span.into(),
                    });
                    Type::Unknown
                }
            },
            Expr::Binary(op, left, right) => {
                let left = self.infer_type(left);
                let right = self.infer_type(right);
                self.check_operands(&op.to_string(), left, right)
            }
            Expr::Call(name, args) => {
                // every parameter is an int
                for (index, arg) in args.iter().enumerate() {
                    let found = self.infer_type(arg);
                    if !found.is_sentinel() && found != Type::Int {
                        self.report(SemaError::ArgumentTypeMismatch {
                            name: name.name.clone(),
                            position: index + 1,
                            found,
                            span: name.span.into(),
                        });
                    }
                }
                let arity = self.functions.get(&name.name).copied();
                match arity {
                    None => self.report(SemaError::UndefinedFunction {
                        name: name.name.clone(),
                        span: name.span.into(),
                    }),
                    Some(expected) if expected != args.len() => {
                        self.report(SemaError::ArityMismatch {
                            name: name.name.clone(),
                            expected,
                            found: args.len(),
                            span: name.span.into(),
                        })
                    }
                    Some(_) => (),
                }
                Type::Int
            }
        }
    }
}
