//! Spongelang interpreter: evaluates AST nodes with a tree-walking interpreter.
//!
//! Programs run against an [`Env`] supplied by the caller, which acts as the
//! global scope. Functions are values that capture the scope they were
//! declared in, so they can be returned, passed around and called after that
//! scope's block has finished.

pub mod config;
pub mod env;
pub mod error;
pub(crate) mod flow;
pub mod interpreter;
pub mod value;

pub use config::EvalConfig;
pub use env::{Env, NameError};
pub use error::RuntimeError;
pub use interpreter::{evaluate, EvalStats, Interpreter};
pub use value::{Closure, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sponge_lexer::tokenize;
    use sponge_parser::parse;
    use sponge_syntax::ast::Program;

    fn parse_program(input: &str) -> Program {
        let tokens = tokenize(input).expect("Lexing should succeed");
        parse(tokens).expect("Parsing should succeed")
    }

    fn run_in(input: &str, env: &Env, config: EvalConfig) -> Result<Value, RuntimeError> {
        Interpreter::with_config(config).evaluate(&parse_program(input), env)
    }

    fn run_program(input: &str) -> Result<Value, RuntimeError> {
        run_in(input, &Env::new_root(), EvalConfig::default())
    }

    fn expect_value(input: &str, expected: Value) {
        match run_program(input) {
            Ok(actual) => assert_eq!(actual, expected, "Program: {}", input),
            Err(e) => panic!("Program failed: {}\nInput: {}", e, input),
        }
    }

    fn expect_error(input: &str, expected: RuntimeError) {
        match run_program(input) {
            Ok(v) => panic!("Expected error but program produced {}: {}", v, input),
            Err(e) => assert_eq!(e, expected, "Program: {}", input),
        }
    }

    #[test]
    fn test_arithmetic_operations() {
        expect_value("1 + 2;", Value::Int(3));
        expect_value("5 - 3;", Value::Int(2));
        expect_value("4 * 6;", Value::Int(24));
        expect_value("8 / 2;", Value::Int(4));
        expect_value("7 / 2;", Value::Int(3));
        expect_value("-7 / 2;", Value::Int(-3));
        expect_value("2+3*4;", Value::Int(14));
        expect_value("(2+3)*4;", Value::Int(20));
        expect_value("10 - 4 - 3;", Value::Int(3));
        expect_value("-(2 + 3);", Value::Int(-5));
    }

    #[test]
    fn test_division_by_zero() {
        expect_error("1/0;", RuntimeError::DivisionByZero);
        expect_error("let z = 0; 5 / (z * 3);", RuntimeError::DivisionByZero);
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        expect_error(
            "9223372036854775807 + 1;",
            RuntimeError::IntegerOverflow { operation: "+" },
        );
        expect_error(
            "let min = -9223372036854775807 - 1; min / -1;",
            RuntimeError::IntegerOverflow { operation: "/" },
        );
        expect_error(
            "let min = -9223372036854775807 - 1; -min;",
            RuntimeError::IntegerOverflow { operation: "negation" },
        );
    }

    #[test]
    fn test_program_value_is_last_statement() {
        expect_value("", Value::Unit);
        expect_value("1; 2; 3;", Value::Int(3));
        expect_value("let x = 4;", Value::Unit);
        expect_value("fn f() { }", Value::Unit);
        expect_value("{ 1; 9; }", Value::Int(9));
    }

    #[test]
    fn test_variables() {
        expect_value("let x = 42; x;", Value::Int(42));
        expect_value("let x = 10; let y = 20; x + y;", Value::Int(30));
        expect_value("let x = 1; let x = x + 1; x;", Value::Int(2));
    }

    #[test]
    fn test_undefined_variable() {
        expect_error(
            "y;",
            RuntimeError::UndefinedVariable {
                name: "y".to_string(),
            },
        );
        expect_error(
            "nope(1);",
            RuntimeError::UndefinedVariable {
                name: "nope".to_string(),
            },
        );
    }

    #[test]
    fn test_block_shadowing_does_not_leak() {
        let env = Env::new_root();
        run_in("let x = 1; { let x = 2; }", &env, EvalConfig::default()).unwrap();
        assert_eq!(env.resolve("x"), Ok(Value::Int(1)));
    }

    #[test]
    fn test_block_bindings_are_scoped() {
        expect_error(
            "{ let inner = 1; } inner;",
            RuntimeError::UndefinedVariable {
                name: "inner".to_string(),
            },
        );
        expect_value("let x = 1; { let y = x + 1; y; }", Value::Int(2));
    }

    #[test]
    fn test_functions() {
        expect_value("fn add(a,b) { return a+b; } add(2,3);", Value::Int(5));
        expect_value("fn seven() { return 7; } seven() * 2;", Value::Int(14));
        expect_value("fn nothing() { 5; } nothing();", Value::Unit);
        expect_value("fn bare() { return; } bare();", Value::Unit);
    }

    #[test]
    fn test_arity_mismatch() {
        expect_error(
            "fn add(a,b) { return a+b; } add(1);",
            RuntimeError::ArityMismatch {
                name: "add".to_string(),
                expected: 2,
                got: 1,
            },
        );
    }

    #[test]
    fn test_calling_a_non_function() {
        expect_error(
            "let x = 3; x(1);",
            RuntimeError::TypeMismatch { expected: "function", found: "int" },
        );
    }

    #[test]
    fn test_if_else() {
        expect_value(
            "fn pick() { if (0) { return 1; } else { return 2; } } pick();",
            Value::Int(2),
        );
        expect_value(
            "fn pick(c) { if (c) { return 1; } else { return 2; } } pick(-3);",
            Value::Int(1),
        );
        expect_value("if (0) { 1; }", Value::Unit);
        expect_value("if (1) { 10; } else { 20; }", Value::Int(10));
    }

    #[test]
    fn test_if_condition_must_be_int() {
        expect_error(
            "fn f() { } if (f) { 1; }",
            RuntimeError::TypeMismatch { expected: "int", found: "function" },
        );
        expect_error(
            "fn f() { } if (f()) { 1; }",
            RuntimeError::TypeMismatch { expected: "int", found: "unit" },
        );
    }

    #[test]
    fn test_arithmetic_on_non_int() {
        expect_error(
            "fn f() { } f() + 1;",
            RuntimeError::TypeMismatch { expected: "int", found: "unit" },
        );
        expect_error(
            "fn f() { } 1 * f;",
            RuntimeError::TypeMismatch { expected: "int", found: "function" },
        );
        expect_error(
            "fn f() { } -f;",
            RuntimeError::TypeMismatch { expected: "int", found: "function" },
        );
    }

    #[test]
    fn test_return_stops_enclosing_blocks() {
        let src = r#"
            fn first_positive(a, b) {
                {
                    if (a) { return a; }
                    { return b; }
                }
                return 0 - 1;
            }
            first_positive(0, 7);
        "#;
        expect_value(src, Value::Int(7));
    }

    #[test]
    fn test_return_outside_function() {
        expect_error("return 1;", RuntimeError::ReturnOutsideFunction);
        expect_error("{ if (1) { return; } }", RuntimeError::ReturnOutsideFunction);
    }

    #[test]
    fn test_recursion() {
        let fact = "fn fact(n) { if (n) { return n * fact(n - 1); } return 1; } fact(10);";
        expect_value(fact, Value::Int(3_628_800));

        let fib = r#"
            fn fib(n) {
                if (n) {
                    if (n - 1) { return fib(n - 1) + fib(n - 2); }
                    return 1;
                }
                return 0;
            }
            fib(15);
        "#;
        expect_value(fib, Value::Int(610));
    }

    #[test]
    fn test_closures_capture_definition_scope() {
        let src = r#"
            fn make_adder(n) {
                fn add(x) { return x + n; }
                return add;
            }
            let add5 = make_adder(5);
            let add10 = make_adder(10);
            add5(1) + add10(1);
        "#;
        expect_value(src, Value::Int(17));
    }

    #[test]
    fn test_closure_outlives_block() {
        let src = r#"
            let f = 0;
            {
                let secret = 41;
                fn reveal() { return secret + 1; }
                let f = reveal;
                fn keep() { return f; }
                keep;
            }
        "#;
        let env = Env::new_root();
        let keep = run_in(src, &env, EvalConfig::default()).unwrap();
        assert_eq!(keep.type_name(), "function");
        env.define("keep", keep);
        assert_eq!(run_in("let g = keep(); g();", &env, EvalConfig::default()), Ok(Value::Int(42)));
        assert_eq!(env.resolve("f"), Ok(Value::Int(0)));
    }

    #[test]
    fn test_lexical_not_dynamic_scope() {
        let src = r#"
            let x = 1;
            fn get() { return x; }
            fn shadow() { let x = 2; return get(); }
            shadow();
        "#;
        expect_value(src, Value::Int(1));
    }

    #[test]
    fn test_arguments_evaluate_in_caller_scope() {
        let src = r#"
            let n = 3;
            fn twice(n) { return n * 2; }
            fn outer(m) { let n = 10; return twice(n + m); }
            outer(1);
        "#;
        expect_value(src, Value::Int(22));
    }

    #[test]
    fn test_functions_are_values() {
        expect_value(
            "fn one() { return 1; } let alias = one; alias() + one();",
            Value::Int(2),
        );
    }

    #[test]
    fn test_host_bindings() {
        let env = Env::new_root();
        env.define("limit", Value::Int(99));
        assert_eq!(run_in("limit + 1;", &env, EvalConfig::default()), Ok(Value::Int(100)));
    }

    #[test]
    fn test_globals_persist_between_runs() {
        let env = Env::new_root();
        let mut interp = Interpreter::new();
        interp
            .evaluate(&parse_program("fn sq(x) { return x * x; } let base = 3;"), &env)
            .unwrap();
        assert_eq!(interp.evaluate(&parse_program("sq(base);"), &env), Ok(Value::Int(9)));
        let names: Vec<String> = env.bindings_snapshot().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["base".to_string(), "sq".to_string()]);
    }

    #[test]
    fn test_unbounded_recursion_is_stack_overflow() {
        expect_error(
            "fn f(n) { return f(n + 1); } f(0);",
            RuntimeError::StackOverflow { depth: EvalConfig::DEFAULT_MAX_CALL_DEPTH },
        );
        let shallow = EvalConfig::default().with_max_call_depth(3);
        assert_eq!(
            run_in("fn f(n) { return f(n + 1); } f(0);", &Env::new_root(), shallow),
            Err(RuntimeError::StackOverflow { depth: 3 })
        );
    }

    #[test]
    fn test_deep_recursion_within_limit() {
        let src = "fn down(n) { if (n) { return down(n - 1); } return 0; } down(5000);";
        let config = EvalConfig::default().with_max_call_depth(6000);
        let mut interp = Interpreter::with_config(config);
        assert_eq!(interp.evaluate(&parse_program(src), &Env::new_root()), Ok(Value::Int(0)));
        assert_eq!(interp.stats().max_depth, 5001);
        assert_eq!(interp.stats().calls, 5001);
    }

    #[test]
    fn test_step_limit() {
        let src = "fn f(n) { if (n) { return f(n - 1); } return 0; } f(100);";
        let tight = EvalConfig::default().with_step_limit(Some(50));
        assert_eq!(
            run_in(src, &Env::new_root(), tight),
            Err(RuntimeError::StepLimitExceeded { limit: 50 })
        );
        let roomy = EvalConfig::default().with_step_limit(Some(100_000));
        assert_eq!(run_in(src, &Env::new_root(), roomy), Ok(Value::Int(0)));
    }

    #[test]
    fn test_stats_reset_per_evaluation() {
        let env = Env::new_root();
        let mut interp = Interpreter::new();
        interp.evaluate(&parse_program("fn f() { return 1; } f(); f();"), &env).unwrap();
        assert_eq!(interp.stats().calls, 2);
        interp.evaluate(&parse_program("1;"), &env).unwrap();
        assert_eq!(interp.stats().calls, 0);
        assert_eq!(interp.stats().steps, 2);
    }

    #[test]
    fn test_left_operand_error_wins() {
        expect_error("(1 / 0) + missing;", RuntimeError::DivisionByZero);
        expect_error(
            "missing + (1 / 0);",
            RuntimeError::UndefinedVariable {
                name: "missing".to_string(),
            },
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(run_program("fn add(a, b) { } add;").unwrap().to_string(), "<fn add>");
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Unit.to_string(), "<unit>");
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Unit.as_int(), None);
    }

    #[test]
    fn test_clearing_globals_releases_closures() {
        let env = Env::new_root();
        let f = run_in("fn f() { return 1; } f;", &env, EvalConfig::default()).unwrap();
        let closure = match f {
            Value::Function(c) => c,
            other => panic!("Expected function, got {:?}", other),
        };
        let weak = std::rc::Rc::downgrade(&closure);
        drop(closure);
        assert!(weak.upgrade().is_some());
        env.clear();
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_clearing_globals_releases_inner_functions() {
        let env = Env::new_root();
        let src = "fn outer() { fn inner() { return 1; } return inner; } outer();";
        let closure = match run_in(src, &env, EvalConfig::default()).unwrap() {
            Value::Function(c) => c,
            other => panic!("Expected function, got {:?}", other),
        };
        let weak = std::rc::Rc::downgrade(&closure);
        drop(closure);
        assert!(weak.upgrade().is_some());
        env.clear();
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_clearing_globals_releases_block_functions() {
        let env = Env::new_root();
        let src = "let keep = 0; { fn local() { return 2; } let keep = local; } keep;";
        assert_eq!(run_in(src, &env, EvalConfig::default()), Ok(Value::Int(0)));
        let mut interp = Interpreter::new();
        let f = interp
            .evaluate(&parse_program("fn g() { { fn h() { return 3; } return h; } } g();"), &env)
            .unwrap();
        let weak = match f {
            Value::Function(c) => std::rc::Rc::downgrade(&c),
            other => panic!("Expected function, got {:?}", other),
        };
        assert!(weak.upgrade().is_some());
        env.clear();
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_config_accessor() {
        let config = EvalConfig::default()
            .with_max_call_depth(7)
            .with_step_limit(Some(9));
        let interp = Interpreter::with_config(config);
        assert_eq!(interp.config(), &config);
        assert_eq!(
            Interpreter::new().config().max_call_depth,
            EvalConfig::DEFAULT_MAX_CALL_DEPTH
        );
    }
}
