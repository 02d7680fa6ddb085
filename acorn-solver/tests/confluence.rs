//! Fixpoint properties of the engine: the final bounds do not depend on the
//! order constraints are posted in or on the algorithm driving propagation,
//! and re-propagating a fixpoint changes nothing.

use acorn_solver::algorithms::AlgorithmStrength;
use acorn_solver::arcs::ArcOperator;
use acorn_solver::constraints::Constraint;
use acorn_solver::constraints::NumExpr;
use acorn_solver::nodes::NodeId;
use acorn_solver::AlgorithmChoice;
use acorn_solver::EngineOptions;
use acorn_solver::PropagationEngine;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn options(algorithm: AlgorithmChoice) -> EngineOptions {
    EngineOptions {
        algorithm,
        strength: AlgorithmStrength::ArcConsistency,
        auto_propagate: false,
    }
}

fn new_engine(algorithm: AlgorithmChoice) -> (PropagationEngine<i32>, Vec<NodeId>) {
    let mut engine = PropagationEngine::with_options(0, options(algorithm));
    let variables = vec![
        engine.new_named_variable("a", 0, 50),
        engine.new_named_variable("b", 0, 50),
        engine.new_named_variable("c", 0, 50),
        engine.new_named_variable("d", -20, 20),
        engine.new_named_variable("e", 0, 50),
    ];
    (engine, variables)
}

fn model(variables: &[NodeId]) -> Vec<Box<dyn Constraint<i32>>> {
    let var = |index: usize| NumExpr::var(variables[index]);
    vec![
        // a + b = c
        Box::new(var(0).add(var(1)).eq(var(2))),
        // c <= 30
        Box::new(var(2).leq(NumExpr::constant(30))),
        // b - a > d
        Box::new(var(1).sub(var(0)).gt(var(3))),
        // 2a <= e
        Box::new(var(0).mul(NumExpr::constant(2)).leq(var(4))),
        // e < 25
        Box::new(var(4).lt(NumExpr::constant(25))),
        // d >= 3
        Box::new(NumExpr::constant(3).leq(var(3))),
    ]
}

fn bounds_after(
    algorithm: AlgorithmChoice,
    order: &[usize],
) -> Vec<(i32, i32)> {
    let (mut engine, variables) = new_engine(algorithm);
    let mut constraints = model(&variables);
    for &index in order {
        let constraint = std::mem::replace(
            &mut constraints[index],
            Box::new(NumExpr::constant(0).eq(NumExpr::constant(0))),
        );
        engine.add_boxed_constraint(constraint).expect("compiles");
    }
    engine.propagate().expect("the model is satisfiable");
    variables
        .iter()
        .map(|&node| (engine.min(node), engine.max(node)))
        .collect()
}

#[test]
fn final_bounds_are_confluent_across_orders_and_algorithms() {
    init_logging();
    let constraint_count = {
        let (_, variables) = new_engine(AlgorithmChoice::Worklist);
        model(&variables).len()
    };
    let baseline_order: Vec<usize> = (0..constraint_count).collect();
    let baseline = bounds_after(AlgorithmChoice::Worklist, &baseline_order);

    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..10 {
        let mut order = baseline_order.clone();
        order.shuffle(&mut rng);
        for algorithm in [AlgorithmChoice::Worklist, AlgorithmChoice::Exhaustive] {
            assert_eq!(
                bounds_after(algorithm, &order),
                baseline,
                "{algorithm:?} with order {order:?} reached a different fixpoint"
            );
        }
    }
}

#[test]
fn propagation_is_idempotent() {
    let (mut engine, variables) = new_engine(AlgorithmChoice::Worklist);
    for constraint in model(&variables) {
        engine.add_boxed_constraint(constraint).expect("compiles");
    }
    engine.propagate().expect("satisfiable");
    let first: Vec<(i32, i32)> = variables
        .iter()
        .map(|&node| (engine.min(node), engine.max(node)))
        .collect();

    engine.propagate().expect("still satisfiable");
    let second: Vec<(i32, i32)> = variables
        .iter()
        .map(|&node| (engine.min(node), engine.max(node)))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn external_tightenings_only_ever_shrink_domains() {
    let (mut engine, variables) = new_engine(AlgorithmChoice::Worklist);
    for constraint in model(&variables) {
        engine.add_boxed_constraint(constraint).expect("compiles");
    }
    engine.propagate().expect("satisfiable");
    let before: Vec<(i32, i32)> = variables
        .iter()
        .map(|&node| (engine.min(node), engine.max(node)))
        .collect();

    engine.set_min(variables[0], 2).expect("consistent");
    engine.propagate().expect("still satisfiable");

    for (&node, &(min, max)) in variables.iter().zip(before.iter()) {
        assert!(engine.min(node) >= min, "{node:?} lower bound widened");
        assert!(engine.max(node) <= max, "{node:?} upper bound widened");
    }
}

#[test]
fn pairwise_disequality_prunes_assigned_values() {
    let mut engine = PropagationEngine::with_options(0, options(AlgorithmChoice::Worklist));
    let x = engine.new_enumerated_variable("x", vec![1, 2, 3]);
    let y = engine.new_enumerated_variable("y", vec![1, 2, 3]);
    let z = engine.new_enumerated_variable("z", vec![1, 2, 3]);
    for (a, b) in [(x, y), (x, z), (y, z)] {
        engine
            .add_constraint(NumExpr::var(a).neq(NumExpr::var(b)))
            .expect("compiles");
    }

    engine.assign(x, 1).expect("consistent");
    engine.propagate().expect("satisfiable");

    assert!(!engine.contains(y, 1));
    assert!(!engine.contains(z, 1));
    assert!(engine.contains(y, 2) && engine.contains(y, 3));
}

#[test]
fn the_relation_of_a_generic_element_matches_its_scalar_form() {
    use acorn_solver::constraints::element;
    use acorn_solver::nodes::GenericIndex;

    let mut engine = PropagationEngine::with_options(0, options(AlgorithmChoice::Worklist));
    let a = engine
        .new_generic_variable("a", vec![GenericIndex::new("i", 2)], 0, 9)
        .expect("valid shape");
    let b = engine
        .new_generic_variable("b", vec![GenericIndex::new("i", 2)], 3, 5)
        .expect("valid shape");

    let constraint = element(
        engine.generic_node(a),
        ArcOperator::Lt,
        engine.generic_node(b),
    )
    .expect("same shape");
    engine.add_constraint(constraint).expect("compiles");
    engine.propagate().expect("satisfiable");

    for flat in 0..2 {
        let member = engine.generic_node(a).nodes()[flat];
        assert_eq!(engine.max(member), 4);
    }
}
