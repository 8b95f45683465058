//! Procedures, lexical scope and the global frame.

mod common;

use common::{run, run_session, run_str};
use pr7rs::{Engine, ExecError, Symbol, Value};

#[test]
fn immediate_application() {
    assert_eq!(run("((lambda (x) (+ x 1)) 4)").unwrap(), Value::Number(5));
    assert_eq!(run("((lambda () 7))").unwrap(), Value::Number(7));
    assert_eq!(run("((lambda (a b) (- a b)) 10 3)").unwrap(), Value::Number(7));
}

#[test]
fn closures_escape_their_defining_call() {
    let code = "(((lambda (n) (lambda (x) (+ x n))) 10) 5)";
    assert_eq!(run(code).unwrap(), Value::Number(15));
}

#[test]
fn returned_closure_outlives_the_call_that_made_it() {
    let mut engine = Engine::default();
    let adder = engine
        .execute("((lambda (n) (lambda (x) (+ x n))) 10)")
        .unwrap();
    engine.env().bind(Symbol::new("add10"), adder).unwrap();
    assert_eq!(engine.execute("(add10 32)").unwrap(), Value::Number(42));
}

#[test]
fn scope_is_lexical_not_dynamic() {
    // `n` inside the closure refers to the 1 it captured, not the caller's 100.
    let code = "((lambda (f) ((lambda (n) (f 0)) 100)) ((lambda (n) (lambda (x) (+ x n))) 1))";
    assert_eq!(run(code).unwrap(), Value::Number(1));
}

#[test]
fn parameters_shadow_globals() {
    assert_eq!(run("((lambda (car) car) 3)").unwrap(), Value::Number(3));
}

#[test]
fn arguments_are_evaluated_in_the_callers_scope() {
    let code = "((lambda (x) ((lambda (y) (+ x y)) (* x 2))) 5)";
    assert_eq!(run(code).unwrap(), Value::Number(15));
}

#[test]
fn procedures_are_first_class() {
    assert_eq!(run_str("((lambda (f) (f '(1 2))) car)"), "1");
    assert_eq!(run_str("((lambda (f x) (f (f x))) (lambda (y) (* y y)) 3)"), "81");
}

#[test]
fn recursion_through_self_application() {
    let fact = "((lambda (fact) (fact fact 10)) \
                 (lambda (self n) (if (= n 0) 1 (* n (self self (- n 1))))))";
    assert_eq!(run(fact).unwrap(), Value::Number(3628800));
}

#[test]
fn define_persists_across_executions() {
    assert_eq!(run_session(&["(define x 5)", "x"]).unwrap(), Value::Number(5));
    assert_eq!(
        run_session(&["(define x 5)", "(define x 6)"]).unwrap_err().to_string(),
        "evaluation error: `x` is already defined in this scope",
    );
}

#[test]
fn defined_procedures_can_recurse() {
    let result = run_session(&[
        "(define len (lambda (xs) (if (null? xs) 0 (+ 1 (len (cdr xs))))))",
        "(len '(a b c d))",
    ]);
    assert_eq!(result.unwrap(), Value::Number(4));
}

#[test]
fn define_inside_a_call_binds_in_that_frame() {
    let mut engine = Engine::default();
    let code = "((lambda (x) (if (define y (+ x 1)) y 0)) 1)";
    assert_eq!(engine.execute(code).unwrap(), Value::Number(2));
    assert!(engine.env().lookup(Symbol::new("y")).is_none());
}

#[test]
fn define_may_shadow_a_primitive_only_in_an_inner_frame() {
    assert_eq!(run("((lambda (x) (if (define car 1) car 0)) 0)").unwrap(), Value::Number(1));
    let err = run("(define car 1)").unwrap_err();
    assert!(matches!(err, pr7rs::EngineError::Exec(ExecError::Redefinition(ref name)) if name == "car"));
}
