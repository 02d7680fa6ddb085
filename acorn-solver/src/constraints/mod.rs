//! Declarative constraints and the compiler that lowers them onto the graph.
//!
//! A [`Constraint`] is a tree-shaped description of a relation between
//! variables. Posting it compiles the tree into arcs, introducing anonymous
//! intermediate nodes for inner expressions. Reifying it attaches the
//! constraint to a boolean node instead, so that the constraint holds exactly
//! when the boolean is true.

mod boolean;
mod generic;
mod numeric;
mod set;

pub use boolean::BoolConstraint;
pub use boolean::BoolExpr;
pub use generic::element;
pub use generic::weighted_sum;
pub use generic::ElementwiseConstraint;
pub use generic::WeightedSumConstraint;
pub use numeric::NumExpr;
pub use numeric::RelationConstraint;
pub use set::SetConstraint;
pub use set::SetExpr;

use std::fmt::Debug;

use crate::arcs::boolean::Tribool;
use crate::arcs::ArcBuilder;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::ConstraintOperationError;
use crate::domains::DomainValue;

/// A relation that can be compiled into arcs of the propagation graph.
pub trait Constraint<T: DomainValue>: Debug {
    /// Evaluates the constraint against the current domains without changing
    /// them. [`Tribool::Undetermined`] means the domains admit both outcomes.
    fn truth(&self, domains: &dyn ReadDomains<T>) -> Tribool;

    /// The watches under which the truth of the constraint can change.
    fn variables(&self) -> Vec<Watch>;

    /// Compiles the constraint into arcs, posting them through `builder`.
    fn compile(&self, builder: &mut dyn ArcBuilder<T>) -> Result<(), ConstraintOperationError>;

    /// The negation of the constraint, if it can be expressed as a postable
    /// constraint. The opposite is what gets posted when a reification
    /// boolean turns out false.
    fn opposite(&self) -> Option<Box<dyn Constraint<T>>>;

    /// Checks the constraint for structural mistakes, such as mismatched
    /// index sets, before any arc is built.
    fn validate(&self) -> Result<(), ConstraintOperationError> {
        Ok(())
    }
}
