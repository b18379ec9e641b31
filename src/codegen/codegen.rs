use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    analyzer::{SymbolTable, Type},
    parser::{Condition, Expr, Function, Identifier, Program, Stmt},
};

use super::{CodegenError, Emitter};

/// Lowers an accepted [`Program`] to a C translation unit.
///
/// Owns its own symbol table, independent of the analyzer's, to decide
/// between declaring and assigning a variable. `generate` consumes the
/// generator so label numbering always starts at `label_1`.
#[derive(Debug, Default)]
pub struct Codegen {
    label_index: usize,
    symbol_table: SymbolTable,
    functions: HashSet<String>,
    out: Emitter,
}

fn signature(func: &Function) -> String {
    let params = func
        .params
        .iter()
        .map(|p| format!("int {}", p.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("int {}({})", func.name.name, params)
}

fn c_string_literal(s: &str) -> String {
    let mut lit = String::with_capacity(s.len() + 2);
    lit.push('"');
    for c in s.chars() {
        match c {
            '"' => lit.push_str("\\\""),
            '\\' => lit.push_str("\\\\"),
            '\n' => lit.push_str("\\n"),
            '\t' => lit.push_str("\\t"),
            c => lit.push(c),
        }
    }
    lit.push('"');
    lit
}

impl Codegen {
    pub fn new() -> Self {
        Self {
            label_index: 0,
            symbol_table: SymbolTable::new(),
            functions: HashSet::new(),
            out: Emitter::new(),
        }
    }

    pub fn generate(mut self, program: &Program) -> Result<String, CodegenError> {
        debug!(statements = program.statements.len(), "generating C");
        self.gen_program(program)?;
        debug!(lines = self.out.len(), labels = self.label_index, "generated C");
        Ok(self.out.finish())
    }

    fn new_label(&mut self) -> String {
        self.label_index += 1;
        format!("label_{}", self.label_index)
    }

    fn gen_program(&mut self, program: &Program) -> Result<(), CodegenError> {
        self.out.line("#include <stdio.h>");
        self.out.line("#include <stdlib.h>");
        self.out.blank();

        // forward declarations
        let functions: Vec<&Function> = program.functions().collect();
        for func in &functions {
            self.functions.insert(func.name.name.clone());
            self.out.line(format!("{};", signature(func)));
        }
        if !functions.is_empty() {
            self.out.blank();
        }

        self.out.line("// Main Program");
        self.out.line("int main() {");
        self.out.indent();
        for stmt in &program.statements {
            if !matches!(stmt, Stmt::Function(_)) {
                self.gen_stmt(stmt)?;
            }
        }
        self.out.line("return 0;");
        self.out.dedent();
        self.out.line("}");

        for func in functions {
            self.out.blank();
            self.gen_function(func)?;
        }
        Ok(())
    }

    fn gen_function(&mut self, func: &Function) -> Result<(), CodegenError> {
        let outer = self
            .symbol_table
            .enter_function(func.params.iter().map(|p| p.name.as_str()));

        self.out.line(format!("{} {{", signature(func)));
        self.out.indent();
        self.gen_block(&func.body)?;
        match &func.ret {
            Some(expr) => {
                let value = self.gen_expr(expr)?;
                self.out.line(format!("return {value};"));
            }
            None => self.out.line("return 0;"),
        }
        self.out.dedent();
        self.out.line("}");

        self.symbol_table.leave_function(outer);
        Ok(())
    }

    fn gen_block(&mut self, stmts: &[Stmt]) -> Result<(), CodegenError> {
        for stmt in stmts {
            self.gen_stmt(stmt)?;
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Function(func) => Err(CodegenError::NestedFunction {
                name: func.name.name.clone(),
            }),
            Stmt::Assign { target, expr } => self.gen_assign(target, expr),
            Stmt::Print(expr) => {
                let format = self.expr_type(expr).printf_format();
                let value = self.gen_expr(expr)?;
                self.out
                    .line(format!("printf(\"{format}\\n\", {value});"));
                Ok(())
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => self.gen_if(cond, then_block, else_block.as_deref()),
            Stmt::While { cond, body } => self.gen_while(cond, body),
        }
    }

    fn gen_assign(&mut self, target: &Identifier, expr: &Expr) -> Result<(), CodegenError> {
        let value = self.gen_expr(expr)?;

        if self.symbol_table.contains(&target.name) {
            self.out.line(format!("{} = {};", target.name, value));
        } else {
            let ty = self.expr_type(expr);
            self.symbol_table.declare(&target.name, ty);
            self.out
                .line(format!("{} = {};", ty.c_declaration(&target.name), value));
        }
        Ok(())
    }

    fn gen_if(
        &mut self,
        cond: &Condition,
        then_block: &[Stmt],
        else_block: Option<&[Stmt]>,
    ) -> Result<(), CodegenError> {
        let cond = self.gen_condition(cond)?;
        self.out.line(format!("if ({cond}) {{"));
        self.out.indent();
        self.gen_block(then_block)?;
        self.out.dedent();

        if let Some(else_block) = else_block {
            self.out.line("} else {");
            self.out.indent();
            self.gen_block(else_block)?;
            self.out.dedent();
        }
        self.out.line("}");
        Ok(())
    }

    /// `while (c) { body }` becomes
    ///
    /// ```text
    /// label_n:
    /// if (!(c)) goto label_m;
    ///     body
    ///     goto label_n;
    /// label_m:
    /// ```
    fn gen_while(&mut self, cond: &Condition, body: &[Stmt]) -> Result<(), CodegenError> {
        let cond = self.gen_condition(cond)?;
        let begin_label = self.new_label();
        let end_label = self.new_label();
        trace!(%begin_label, %end_label, depth = self.out.depth(), "lowering while loop");

        self.out.line(format!("{begin_label}:"));
        self.out.line(format!("if (!({cond})) goto {end_label};"));
        self.out.indent();
        self.gen_block(body)?;
        self.out.line(format!("goto {begin_label};"));
        self.out.dedent();
        self.out.line(format!("{end_label}:"));
        Ok(())
    }

    fn gen_condition(&mut self, cond: &Condition) -> Result<String, CodegenError> {
        let left = self.gen_expr(&cond.left)?;
        let right = self.gen_expr(&cond.right)?;
        Ok(format!("({} {} {})", left, cond.op, right))
    }

    fn gen_expr(&mut self, expr: &Expr) -> Result<String, CodegenError> {
        match expr {
            Expr::Binary(op, left, right) => {
                let left = self.gen_expr(left)?;
                let right = self.gen_expr(right)?;
                Ok(format!("({left} {op} {right})"))
            }
            Expr::Num(value) => Ok(value.to_string()),
            Expr::Str(s) => Ok(c_string_literal(s)),
            Expr::Ident(ident) => {
                if !self.symbol_table.contains(&ident.name) {
                    return Err(CodegenError::UndefinedVariable {
                        name: ident.name.clone(),
                    });
                }
                Ok(ident.name.clone())
            }
            Expr::Call(name, args) => {
                if !self.functions.contains(&name.name) {
                    return Err(CodegenError::UndefinedFunction {
                        name: name.name.clone(),
                    });
                }
                let args = args
                    .iter()
                    .map(|a| self.gen_expr(a))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}({})", name.name, args.join(", ")))
            }
        }
    }

    // Only strings change the C type of a declaration; everything else is int.
    fn expr_type(&self, expr: &Expr) -> Type {
        match expr {
            Expr::Str(_) => Type::Str,
            Expr::Ident(ident) => self.symbol_table.get(&ident.name).unwrap_or(Type::Int),
            Expr::Binary(_, _, _) | Expr::Num(_) | Expr::Call(_, _) => Type::Int,
        }
    }
}
