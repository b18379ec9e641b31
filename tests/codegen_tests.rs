use kjplc::codegen::{Codegen, CodegenError, Emitter};
use kjplc::parser::{BinOp, CmpOp, Condition, Expr, Function, Identifier, Program, Stmt};

fn generate(source: &str) -> String {
    let program = kjplc::parse(source).unwrap();
    Codegen::new().generate(&program).unwrap()
}

/// Lines between `int main() {` and the closing `return 0;`, unindented by one level.
fn main_body(c_code: &str) -> Vec<String> {
    c_code
        .lines()
        .skip_while(|l| *l != "int main() {")
        .skip(1)
        .take_while(|l| *l != "    return 0;")
        .map(|l| l.strip_prefix("    ").unwrap_or(l).to_string())
        .collect()
}

fn assign(name: &str, expr: Expr) -> Stmt {
    Stmt::Assign {
        target: Identifier::new(name),
        expr,
    }
}

#[test]
fn while_loop_lowering_shape() {
    let program = Program {
        statements: vec![
            assign("x", Expr::Num(0)),
            Stmt::While {
                cond: Condition::new(Expr::ident("x"), CmpOp::LessThan, Expr::Num(10)),
                body: vec![assign(
                    "x",
                    Expr::binary(BinOp::Add, Expr::ident("x"), Expr::Num(1)),
                )],
            },
        ],
    };
    let c_code = Codegen::new().generate(&program).unwrap();
    assert_eq!(
        main_body(&c_code),
        [
            "int x = 0;",
            "label_1:",
            "if (!((x < 10))) goto label_2;",
            "    x = (x + 1);",
            "    goto label_1;",
            "label_2:",
        ]
    );

    // start label: one definition plus two references; end label: one of each
    assert_eq!(c_code.matches("label_1").count(), 2);
    assert_eq!(c_code.matches("label_1:").count(), 1);
    assert_eq!(c_code.matches("goto label_1;").count(), 1);
    assert_eq!(c_code.matches("label_2").count(), 2);
}

#[test]
fn nested_loops_use_fresh_labels() {
    let source = "
i = 0;
while (i < 2) {
    j = 0;
    while (j < 2) {
        j = j + 1;
    }
    i = i + 1;
}
k = 0;
while (k < 1) { k = k + 1; }
";
    assert_eq!(
        main_body(&generate(source)),
        [
            "int i = 0;",
            "label_1:",
            "if (!((i < 2))) goto label_2;",
            "    int j = 0;",
            "    label_3:",
            "    if (!((j < 2))) goto label_4;",
            "        j = (j + 1);",
            "        goto label_3;",
            "    label_4:",
            "    i = (i + 1);",
            "    goto label_1;",
            "label_2:",
            "int k = 0;",
            "label_5:",
            "if (!((k < 1))) goto label_6;",
            "    k = (k + 1);",
            "    goto label_5;",
            "label_6:",
        ]
    );
}

#[test]
fn declares_each_variable_once() {
    let c_code = generate("x = 1; y = x; x = 2; if (x > 1) { x = 3; y = 4; } x = y;");
    assert_eq!(c_code.matches("int x = ").count(), 1);
    assert_eq!(c_code.matches("int y = ").count(), 1);
    assert_eq!(
        main_body(&c_code),
        [
            "int x = 1;",
            "int y = x;",
            "x = 2;",
            "if ((x > 1)) {",
            "    x = 3;",
            "    y = 4;",
            "}",
            "x = y;",
        ]
    );
}

#[test]
fn parenthesizes_every_operation() {
    assert_eq!(
        main_body(&generate("x = 1 + 2 * 3 - 4 % 2;")),
        ["int x = ((1 + (2 * 3)) - (4 % 2));"]
    );
}

#[test]
fn if_without_else() {
    assert_eq!(
        main_body(&generate("a = 1; if (a != 2) { print(a); }")),
        ["int a = 1;", "if ((a != 2)) {", "    printf(\"%d\\n\", a);", "}"]
    );
}

#[test]
fn strings_are_declared_and_printed_as_strings() {
    assert_eq!(
        main_body(&generate(r#"s = "say \"hi\""; t = s; print(t); print("x");"#)),
        [
            r#"const char *s = "say \"hi\"";"#,
            "const char *t = s;",
            r#"printf("%s\n", t);"#,
            r#"printf("%s\n", "x");"#,
        ]
    );
}

#[test]
fn functions_are_forward_declared_and_emitted_after_main() {
    let source = "
fn twice(n) { m = n * 2; return m; }
fn zero() { }
print(twice(4));
";
    let expected = r#"#include <stdio.h>
#include <stdlib.h>

int twice(int n);
int zero();

// Main Program
int main() {
    printf("%d\n", twice(4));
    return 0;
}

int twice(int n) {
    int m = (n * 2);
    return m;
}

int zero() {
    return 0;
}"#;
    assert_eq!(generate(source), expected);
}

#[test]
fn function_locals_are_declared_inside_the_function() {
    let c_code = generate("x = 1; fn f() { x = 2; return x; }");
    assert_eq!(c_code.matches("int x = ").count(), 2);
}

#[test]
fn generation_is_deterministic() {
    let source = "a = 0; while (a < 3) { a = a + 1; } while (a > 0) { a = a - 1; }";
    let program = kjplc::parse(source).unwrap();
    let first = Codegen::new().generate(&program).unwrap();
    let second = Codegen::new().generate(&program).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("label_1:"));
    assert!(!first.contains("label_0"));
}

#[test]
fn undefined_variable_is_a_contract_violation() {
    let program = Program {
        statements: vec![Stmt::Print(Expr::ident("ghost"))],
    };
    assert_eq!(
        Codegen::new().generate(&program),
        Err(CodegenError::UndefinedVariable {
            name: "ghost".to_string()
        })
    );
}

#[test]
fn use_before_assignment_is_a_contract_violation() {
    let program = kjplc::parse("x = x + 1;").unwrap();
    assert!(matches!(
        Codegen::new().generate(&program),
        Err(CodegenError::UndefinedVariable { name }) if name == "x"
    ));
}

#[test]
fn undefined_function_is_a_contract_violation() {
    let program = kjplc::parse("x = nope(1);").unwrap();
    assert!(matches!(
        Codegen::new().generate(&program),
        Err(CodegenError::UndefinedFunction { name }) if name == "nope"
    ));
}

#[test]
fn nested_function_is_rejected() {
    let program = Program {
        statements: vec![Stmt::While {
            cond: Condition::new(Expr::Num(0), CmpOp::Equal, Expr::Num(1)),
            body: vec![Stmt::Function(Function {
                name: Identifier::new("inner"),
                params: vec![],
                body: vec![],
                ret: None,
            })],
        }],
    };
    assert!(matches!(
        Codegen::new().generate(&program),
        Err(CodegenError::NestedFunction { name }) if name == "inner"
    ));
}

#[test]
fn emitter_indents_at_append_time() {
    let mut out = Emitter::new();
    out.line("a {");
    out.indent();
    out.line("b;");
    out.indent();
    out.line("c;");
    out.dedent();
    out.blank();
    out.dedent();
    out.dedent();
    out.line("}");
    assert_eq!(out.depth(), 0);
    assert_eq!(out.finish(), "a {\n    b;\n        c;\n\n}");
}
