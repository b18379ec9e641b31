use kjplc::analyzer::SemaError;
use kjplc::codegen::CodegenError;
use kjplc::{analyze_source, compile, CompileError};

#[test]
fn compiles_assignment_and_print() {
    let c_code = compile("let x = 5 + 3; print(x);").unwrap();
    let expected = r#"#include <stdio.h>
#include <stdlib.h>

// Main Program
int main() {
    int x = (5 + 3);
    printf("%d\n", x);
    return 0;
}"#;
    assert_eq!(c_code, expected);
}

#[test]
fn undefined_print_stops_before_codegen() {
    let err = compile("print(y);").unwrap_err();
    let CompileError::Semantic(errors) = err else {
        panic!("expected semantic errors, got {err:?}");
    };
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], SemaError::UndefinedVariableInPrint { name, .. } if name == "y"));
    assert_eq!(
        errors[0].to_string(),
        "Undefined variable 'y' in print statement."
    );
}

#[test]
fn compiles_functions_and_calls() {
    let source = "
fn add(a: int, b: int) -> int {
    return a + b;
}
let x = 10;
print(add(x, 5));
";
    let expected = r#"#include <stdio.h>
#include <stdlib.h>

int add(int a, int b);

// Main Program
int main() {
    int x = 10;
    printf("%d\n", add(x, 5));
    return 0;
}

int add(int a, int b) {
    return (a + b);
}"#;
    assert_eq!(compile(source).unwrap(), expected);
}

#[test]
fn compiles_loop_with_conditional() {
    let source = "
i = 0;
while (i < 3) {
    if (i == 1) {
        print(100);
    } else {
        print(i);
    }
    i = i + 1;
}
";
    let expected = r#"#include <stdio.h>
#include <stdlib.h>

// Main Program
int main() {
    int i = 0;
    label_1:
    if (!((i < 3))) goto label_2;
        if ((i == 1)) {
            printf("%d\n", 100);
        } else {
            printf("%d\n", i);
        }
        i = (i + 1);
        goto label_1;
    label_2:
    return 0;
}"#;
    assert_eq!(compile(source).unwrap(), expected);
}

#[test]
fn collects_every_semantic_error() {
    let source = r#"
print(y);
x = 1;
x = "one";
"#;
    let messages: Vec<String> = analyze_source(source)
        .unwrap()
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(
        messages,
        [
            "Undefined variable 'y' in print statement.",
            "Type mismatch: 'x' is int, but assigned str.",
        ]
    );
}

#[test]
fn unchecked_print_argument_reaches_codegen() {
    // compound print arguments are not validated by the analyzer
    assert!(analyze_source("print(y + 1);").unwrap().is_empty());

    let err = compile("print(y + 1);").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Codegen(CodegenError::UndefinedVariable { ref name }) if name == "y"
    ));
}

#[test]
fn reports_front_end_errors() {
    assert!(matches!(
        compile("x = 1 @ 2;"),
        Err(CompileError::Lexer(_))
    ));
    assert!(matches!(compile("x = ;"), Err(CompileError::Parser(_))));
}

#[test]
fn compile_is_deterministic() {
    let source = "
n = 0;
while (n < 2) { n = n + 1; }
while (n > 0) { n = n - 1; }
";
    assert_eq!(compile(source).unwrap(), compile(source).unwrap());
}

#[test]
fn rejects_programs_that_would_not_be_valid_c() {
    for source in [
        r#"s = "a" * "b"; print(s);"#,
        r#"fn f(a) { return a * 2; } s = "x"; y = f(s);"#,
        r#"s = "a"; if (s < "b") { print(s); }"#,
        "fn main() { } print(1);",
        "fn add(a, b) { return a + b; } add = 1;",
    ] {
        assert!(
            matches!(compile(source), Err(CompileError::Semantic(_))),
            "accepted {source}"
        );
    }
}
