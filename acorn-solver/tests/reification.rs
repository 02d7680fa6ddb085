//! Reification round trips through the public engine API: binding the boolean
//! posts the constraint, falsifying it posts the opposite, and a determined
//! constraint binds the boolean on its own.

use acorn_solver::arcs::boolean::Tribool;
use acorn_solver::constraints::BoolConstraint;
use acorn_solver::constraints::BoolExpr;
use acorn_solver::constraints::NumExpr;
use acorn_solver::constraints::SetConstraint;
use acorn_solver::constraints::SetExpr;
use acorn_solver::ConstraintOperationError;
use acorn_solver::PropagationEngine;

#[test]
fn binding_the_boolean_enforces_the_sum() {
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let x = engine.new_named_variable("x", 0, 10);
    let y = engine.new_named_variable("y", 5, 5);
    let b = engine
        .reify(
            "b",
            Box::new(NumExpr::var(x).add(NumExpr::var(y)).eq(NumExpr::constant(11))),
        )
        .expect("reifiable");

    engine.bind_bool(b, true).expect("consistent");
    engine.propagate().expect("satisfiable");

    assert_eq!(engine.min(x), 6);
    assert_eq!(engine.max(x), 6);
}

#[test]
fn falsifying_the_boolean_enforces_the_opposite() {
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let x = engine.new_named_variable("x", 0, 10);
    let b = engine
        .reify("b", Box::new(NumExpr::var(x).lt(NumExpr::constant(4))))
        .expect("reifiable");

    engine.bind_bool(b, false).expect("consistent");
    engine.propagate().expect("satisfiable");

    // not (x < 4) is x >= 4
    assert_eq!(engine.min(x), 4);
}

#[test]
fn a_determined_constraint_binds_the_boolean() {
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let x = engine.new_named_variable("x", 0, 3);
    let b = engine
        .reify("b", Box::new(NumExpr::var(x).leq(NumExpr::constant(5))))
        .expect("reifiable");

    engine.propagate().expect("satisfiable");

    assert_eq!(engine.tribool(b), Tribool::True);
}

#[test]
fn reified_boolean_expressions_use_free_negation() {
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let p = engine.new_bool_variable("p");
    let q = engine.new_bool_variable("q");
    let b = engine
        .reify(
            "b",
            Box::new(BoolConstraint::new(BoolExpr::var(p).and(BoolExpr::var(q)))),
        )
        .expect("reifiable");

    // not (p and q) with p true forces q false.
    engine.bind_bool(b, false).expect("consistent");
    engine.bind_bool(p, true).expect("consistent");
    engine.propagate().expect("satisfiable");

    assert_eq!(engine.tribool(q), Tribool::False);
}

#[test]
fn set_membership_is_reifiable_but_containment_is_not() {
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let x = engine.new_named_variable("x", 0, 9);
    let s = engine.new_set_variable("s", vec![1, 3, 5]);
    let t = engine.new_set_variable("t", vec![1, 2, 3]);

    let b = engine
        .reify("b", Box::new(SetConstraint::Member(x, SetExpr::var(s))))
        .expect("membership has an opposite");
    engine.bind_bool(b, true).expect("consistent");
    engine.propagate().expect("satisfiable");
    assert_eq!(engine.min(x), 1);
    assert_eq!(engine.max(x), 5);

    let result = engine.reify(
        "c",
        Box::new(SetConstraint::Subset(SetExpr::var(s), SetExpr::var(t))),
    );
    assert!(matches!(
        result,
        Err(ConstraintOperationError::NotReifiable(_))
    ));
}

#[test]
fn infeasible_posted_half_fails_propagation() {
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let x = engine.new_named_variable("x", 0, 3);
    let b = engine
        .reify("b", Box::new(NumExpr::var(x).geq(NumExpr::constant(7))))
        .expect("reifiable");

    // The constraint is already falsified over [0, 3], so the boolean is
    // bound false and forcing it true must fail.
    engine.propagate().expect("nothing infeasible yet");
    assert_eq!(engine.tribool(b), Tribool::False);

    let result = engine.bind_bool(b, true);
    assert!(result.is_err());
}
