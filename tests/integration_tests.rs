//! Integration tests for the whole front end.
//!
//! These tests run source text through tokenization, parsing, import
//! resolution and type checking, and inspect the checked module.

use std::{collections::HashMap, rc::Rc};

use snc::{
    ast::{ast::Module, expressions::ExprKind, statements::Stmt, types::FunctionModifier},
    format_error,
    lexer::lexer::tokenize,
    parser::{imports::resolve_imports, parser::parse},
    symbol_table::ThreadState,
    type_checker::{type_check, CheckerConfig, TypeChecker},
};

fn compile(source: &str, modules: &[(&str, &str)]) -> (Module, TypeChecker, bool) {
    let tokens = tokenize(source.to_string(), Some("main.sn".to_string())).unwrap();
    let (_, ast) = parse(tokens, Rc::new("main.sn".to_string()));
    let mut module = ast.unwrap();

    let sources: HashMap<&str, &str> = modules.iter().copied().collect();
    let mut reader = |name: &str| sources.get(name).map(|text| text.to_string());
    let statements = std::mem::take(&mut module.statements);
    module.statements = resolve_imports(statements, &mut reader).unwrap();

    let (checker, success) = type_check(&mut module, CheckerConfig::default());
    (module, checker, success)
}

fn error_names(checker: &TypeChecker) -> Vec<&str> {
    checker
        .get_errors()
        .iter()
        .map(|error| error.get_error_name())
        .collect()
}

#[test]
fn test_check_simple_program() {
    let (_, checker, success) = compile("var x = 42; print(x);", &[]);
    assert!(success, "unexpected errors: {:?}", error_names(&checker));
}

#[test]
fn test_check_worker_pool() {
    let source = "
        fn sum(xs: int[]): int {
            var total = 0;
            for x in xs {
                total = total + x;
            }
            return total;
        }

        fn label(n: int): str {
            return \"total: \" + n;
        }

        var left: int[] = {1, 2, 3};
        var right: int[] = {4, 5, 6};
        var a = &sum(left);
        var b = &sum(right);
        [a, b]!;

        left.push(4);
        print(label(a + b));
    ";

    let (module, checker, success) = compile(source, &[]);
    assert!(success, "unexpected errors: {:?}", error_names(&checker));

    assert_eq!(checker.table.thread_state("a"), ThreadState::Synchronized);
    assert!(!checker.table.is_frozen("left"));

    let Stmt::Function(label) = &module.statements[1] else {
        panic!("expected function");
    };
    assert_eq!(label.effective_modifier, Some(FunctionModifier::Shared));
}

#[test]
fn test_check_reports_every_error() {
    let source = "
        fn sum(xs: int[]): int { return 0; }
        var data: int[] = {1, 2};
        var h = &sum(data);
        data.push(3);
        var copy = h;
        var s: str as ref = \"x\";
        private {
            data = {4};
        }
    ";

    let (_, checker, success) = compile(source, &[]);
    assert!(!success);
    assert_eq!(
        error_names(&checker),
        vec![
            "FrozenMethodCall",
            "PendingHandleUse",
            "AsRefOnNonPrimitive",
            "FrozenMutation",
        ]
    );
}

#[test]
fn test_check_with_modules() {
    let modules = [
        ("strings", "fn shout(s: str): str { return s.toUpper() + \"!\"; }"),
        ("math", "import \"strings\"; fn square(x: int): int { return x * x; }"),
    ];
    let source = "
        import \"math\";
        import \"strings\" as text;
        var n = square(3);
        var loud = text.shout(\"hi\");
        var h = &text.shout(\"hey\");
        var result = h!;
    ";

    let (module, checker, success) = compile(source, &modules);
    assert!(success, "unexpected errors: {:?}", error_names(&checker));

    let spawn = module.statements.iter().find_map(|stmt| match stmt {
        Stmt::VarDecl(decl) if decl.name == "h" => decl.initializer.as_ref(),
        _ => None,
    });
    let Some(ExprKind::ThreadSpawn(spawn)) = spawn.map(|expr| &expr.kind) else {
        panic!("expected spawn");
    };
    assert_eq!(spawn.mode, Some(FunctionModifier::Default));
}

#[test]
fn test_lambda_program() {
    let source = "
        fn apply(f: fn(int): int, x: int): int {
            return f(x);
        }

        fn main(): int {
            var offset = 3;
            var shift: fn(int): int = fn (n) => n + offset;
            return apply(shift, 1) + apply(fn (n) => n * 2, 2);
        }
    ";

    let (_, checker, success) = compile(source, &[]);
    assert!(success, "unexpected errors: {:?}", error_names(&checker));
}

#[test]
fn test_diagnostic_rendering() {
    let source = "var count = 1;\nvar y = coutn + 1;\n";
    let (_, checker, _) = compile(source, &[]);

    let rendered = format_error(&checker.get_errors()[0], source);
    assert!(rendered.contains("Error: UndefinedVariable (Undefined variable 'coutn')"));
    assert!(rendered.contains("Tip: Did you mean 'count'?"));
    assert!(rendered.contains("-> main.sn"));
    assert!(rendered.contains("2 | var y = coutn + 1;"));
}

#[test]
fn test_symbol_dump_lists_declarations() {
    let (_, checker, _) = compile("var answer = 42; fn f(): int { return answer; }", &[]);

    let dump = checker.table.dump();
    assert!(dump.contains("answer"));
    assert!(dump.contains("print"));
}
