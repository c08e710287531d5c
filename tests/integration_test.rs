// ABOUTME: Black-box integration tests driving the public embedding surface end to end.

use lisprt::{Atom, Config, ErrorKind, Interpreter};

fn fresh() -> Interpreter {
    let mut interp = Interpreter::new(Config::default());
    interp.install_builtins();
    interp
}

/// Evaluates every top-level form in `src` in order, returning the value
/// of the last one. Mirrors a REPL's contract: feed `parse_expr` in a
/// loop until the rest is empty.
fn run(interp: &mut Interpreter, src: &str) -> Atom {
    let mut input = src.to_string();
    let mut last = Atom::Nil;
    loop {
        match interp.parse_expr(&input).expect("parse error") {
            None => break,
            Some((atom, rest)) => {
                let root = interp.root_env();
                last = interp.eval_expr(atom, root).expect("eval error");
                input = rest.to_string();
            }
        }
    }
    last
}

fn run_all(interp: &mut Interpreter, src: &str) -> Vec<String> {
    let mut input = src.to_string();
    let mut out = Vec::new();
    loop {
        match interp.parse_expr(&input).expect("parse error") {
            None => break,
            Some((atom, rest)) => {
                let root = interp.root_env();
                let value = interp.eval_expr(atom, root).expect("eval error");
                out.push(interp.expr_str(value));
                input = rest.to_string();
            }
        }
    }
    out
}

// ---- End-to-end scenarios ----

#[test]
fn scenario_1_arithmetic() {
    let mut interp = fresh();
    assert_eq!(run(&mut interp, "(+ 1 2 3)"), Atom::Integer(6));
}

#[test]
fn scenario_2_recursive_factorial() {
    let mut interp = fresh();
    let results = run_all(
        &mut interp,
        "(define (fact n) (if (= n 0) 1 (* n (fact (- n 1))))) (fact 6)",
    );
    assert_eq!(results, vec!["FACT", "720"]);
}

#[test]
fn scenario_3_deep_recursion_does_not_blow_native_stack() {
    let mut interp = fresh();
    let results = run_all(
        &mut interp,
        "(define (sum-to n) (if (= n 0) 0 (+ n (sum-to (- n 1))))) (sum-to 10000)",
    );
    assert_eq!(results, vec!["SUM-TO", "50005000"]);
}

#[test]
fn scenario_4_macro_defers_argument_evaluation() {
    let mut interp = fresh();
    // `list`/`begin` aren't in the core builtin library, so this builds
    // the expansion with `cons`/`quote` directly instead.
    run(
        &mut interp,
        "(defmacro (when c body) (cons (quote if) (cons c (cons body (cons nil nil)))))",
    );
    assert_eq!(run(&mut interp, "(when #t (+ 1 2))"), Atom::Integer(3));
}

#[test]
fn scenario_5_closure_captures_mutable_frame() {
    let mut interp = fresh();
    run(&mut interp, "(define x 10)");
    run(&mut interp, "(define f (lambda () x))");
    run(&mut interp, "(define x 20)");
    assert_eq!(run(&mut interp, "(f)"), Atom::Integer(20));
}

#[test]
fn scenario_6_cons_printing_proper_and_dotted() {
    let mut interp = fresh();
    let proper = run(&mut interp, "(cons 1 (cons 2 (cons 3 nil)))");
    assert_eq!(interp.expr_str(proper), "(1 2 3)");
    let dotted = run(&mut interp, "(cons 1 2)");
    assert_eq!(interp.expr_str(dotted), "(1 . 2)");
}

// ---- Universal properties ----

#[test]
fn symbol_uniqueness_under_case_folding() {
    let mut interp = fresh();
    assert_eq!(run(&mut interp, "(eq? (quote foo) (quote FOO))"), Atom::Boolean(true));
}

#[test]
fn arithmetic_associativity_and_float_promotion() {
    let mut interp = fresh();
    assert_eq!(run(&mut interp, "(+ 1 2 3)"), run(&mut interp, "(+ (+ 1 2) 3)"));
    assert_eq!(run(&mut interp, "(+ 1 2.5)"), Atom::Float(3.5));
}

#[test]
fn gc_safety_across_forced_collections() {
    let mut interp = fresh();
    run(&mut interp, "(define x 42)");
    interp.collect_garbage(&[]);
    interp.collect_garbage(&[]);
    assert_eq!(run(&mut interp, "x"), Atom::Integer(42));
}

#[test]
fn truthiness_only_hash_f_is_false() {
    let mut interp = fresh();
    assert_eq!(run(&mut interp, "(if #f 1 2)"), Atom::Integer(2));
    assert_eq!(run(&mut interp, "(if nil 1 2)"), Atom::Integer(1));
    assert_eq!(run(&mut interp, "(if 0 1 2)"), Atom::Integer(1));
    assert_eq!(run(&mut interp, "(if \"\" 1 2)"), Atom::Integer(1));
}

#[test]
fn parse_print_round_trip_for_proper_lists() {
    let mut interp = fresh();
    let atom = interp.parse_expr("(1 2 3)").unwrap().unwrap().0;
    let printed = interp.expr_str(atom);
    assert_eq!(printed, "(1 2 3)");
    let reparsed = interp.parse_expr(&printed).unwrap().unwrap().0;
    assert_eq!(interp.expr_str(reparsed), printed);
}

// ---- Variadic parameters and APPLY ----

#[test]
fn variadic_rest_parameter_collects_tail_args() {
    let mut interp = fresh();
    run(&mut interp, "(define (first-of . rest) (car rest))");
    assert_eq!(run(&mut interp, "(first-of 1 2 3)"), Atom::Integer(1));
}

#[test]
fn apply_special_form_splices_argument_list() {
    let mut interp = fresh();
    assert_eq!(run(&mut interp, "(apply + (quote (1 2 3)))"), Atom::Integer(6));
}

// ---- Error taxonomy ----

#[test]
fn unbound_symbol_is_a_distinct_error_kind() {
    let mut interp = fresh();
    let atom = interp.parse_expr("undefined-name").unwrap().unwrap().0;
    let root = interp.root_env();
    assert!(matches!(interp.eval_expr(atom, root), Err(ErrorKind::Unbound(_))));
}

#[test]
fn wrong_arity_to_a_closure_is_an_arguments_error() {
    let mut interp = fresh();
    run(&mut interp, "(define (one x) x)");
    let atom = interp.parse_expr("(one 1 2)").unwrap().unwrap().0;
    let root = interp.root_env();
    assert!(matches!(interp.eval_expr(atom, root), Err(ErrorKind::Arguments { .. })));
}

#[test]
fn quoting_a_list_with_shorthand_is_a_syntax_error() {
    let mut interp = fresh();
    assert!(matches!(interp.parse_expr("'(1 2)"), Err(ErrorKind::Syntax(_))));
}

// ---- Diagnostics rendering ----

#[test]
fn closures_and_macros_render_with_their_label() {
    let mut interp = fresh();
    let closure = run(&mut interp, "(lambda (x) x)");
    assert!(interp.expr_str(closure).starts_with("#<FUNCTION:"));
    run(&mut interp, "(defmacro (ignore-me x) nil)");
    let bound = run(&mut interp, "ignore-me");
    assert!(interp.expr_str(bound).starts_with("#<MACRO:"));
}

// ---- Teardown ----

#[test]
fn destroy_consumes_the_interpreter() {
    let interp = fresh();
    interp.destroy();
}
