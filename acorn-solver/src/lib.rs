//! # Acorn
//! Acorn is an arc-consistency propagation engine for constraint satisfaction
//! problems. Given a set of variables with finite interval or enumerated
//! domains and a set of constraints relating them, it repeatedly tightens
//! ("propagates") the domains until either a contradiction is detected or no
//! domain can shrink further.
//!
//! The engine is the domain-reduction kernel of a solver: search, local
//! search, and solution storage are external consumers which interact with it
//! through [`PropagationEngine`].
//!
//! # Using Acorn
//! The first step is creating an engine and **adding variables**:
//! ```rust
//! # use acorn_solver::PropagationEngine;
//! let mut engine: PropagationEngine<i32> = PropagationEngine::default();
//!
//! let x = engine.new_variable(0, 10);
//! let y = engine.new_variable(0, 10);
//! let z = engine.new_variable(0, 100);
//! ```
//!
//! Then constraints are built with the expression API and **posted**:
//! ```rust
//! # use acorn_solver::PropagationEngine;
//! # use acorn_solver::constraints::NumExpr;
//! # let mut engine: PropagationEngine<i32> = PropagationEngine::default();
//! # let x = engine.new_variable(0, 10);
//! # let y = engine.new_variable(0, 10);
//! # let z = engine.new_variable(0, 100);
//! // x + y = z
//! let constraint = NumExpr::var(x).add(NumExpr::var(y)).eq(NumExpr::var(z));
//! engine.add_constraint(constraint).expect("consistent at post");
//! ```
//!
//! **Propagating to a fixpoint** either succeeds, leaving every domain as
//! tight as the posted arcs allow, or fails with
//! [`PropagationFailure`] when some domain becomes empty:
//! ```rust
//! # use acorn_solver::PropagationEngine;
//! # use acorn_solver::constraints::NumExpr;
//! # let mut engine: PropagationEngine<i32> = PropagationEngine::default();
//! # let x = engine.new_variable(0, 10);
//! # let y = engine.new_variable(0, 10);
//! # let z = engine.new_variable(0, 100);
//! # engine
//! #     .add_constraint(NumExpr::var(x).add(NumExpr::var(y)).eq(NumExpr::var(z)))
//! #     .expect("consistent at post");
//! engine.propagate().expect("no empty domains");
//! assert_eq!(engine.max(z), 20);
//! ```
//!
//! Failure is a hard signal that the current bounds are jointly infeasible;
//! recovering from it (backtracking, relaxation, reporting) is the caller's
//! responsibility. Domains are left partially tightened on failure, so callers
//! that need rollback must snapshot beforehand.

pub mod algorithms;
pub mod arcs;
pub mod basic_types;
pub mod constraints;
pub mod containers;
pub mod domains;
pub mod engine;
pub mod graph;
pub mod nodes;

pub(crate) mod acorn_asserts;
#[cfg(test)]
pub(crate) mod test_engine;

pub use basic_types::ConstraintOperationError;
pub use basic_types::PropagationFailure;
pub use basic_types::PropagationStatus;
pub use engine::AlgorithmChoice;
pub use engine::EngineOptions;
pub use engine::PropagationEngine;

// Re-exported so the assert macros can refer to the levels through a stable
// path from expansion sites in downstream code.
pub use acorn_asserts::ACORN_ASSERT_LEVEL_DEFINITION;
pub use acorn_asserts::ACORN_ASSERT_MODERATE;
pub use acorn_asserts::ACORN_ASSERT_SIMPLE;
