//! The constraint-as-edge abstraction. Each concrete arc encodes one
//! relational or arithmetic operator's bound-tightening rule between the nodes
//! it watches. Calling [`Arc::propagate`] only ever shrinks domains; an arc
//! signals [`PropagationFailure`] instead of leaving an empty domain behind.
//!
//! [`PropagationFailure`]: crate::basic_types::PropagationFailure

pub mod boolean;
pub mod numeric;
pub mod set;

mod propagation_context;

use std::fmt::Debug;

use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

pub use propagation_context::ArcBuilder;
pub use propagation_context::PropagationContext;
pub use propagation_context::ReadDomains;
pub(crate) use propagation_context::anonymous_name;
pub(crate) use propagation_context::tribool_of;

use crate::basic_types::PropagationStatus;
use crate::containers::StorageKey;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::domains::SetDomainEvents;
use crate::nodes::NodeId;
use crate::nodes::SetNodeId;

/// The identifier of an arc in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArcId {
    pub id: u32,
}

impl StorageKey for ArcId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ArcId { id: index as u32 }
    }
}

/// The relational operator tag carried by numeric arcs: for an arc over an
/// expression `e` and a target `z`, the maintained relation is `e op z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArcOperator {
    Eq,
    Lt,
    Leq,
    Gt,
    Geq,
    Neq,
}

impl ArcOperator {
    /// The logical negation: the returned operator holds exactly when `self`
    /// does not.
    pub fn negate(self) -> ArcOperator {
        match self {
            ArcOperator::Eq => ArcOperator::Neq,
            ArcOperator::Neq => ArcOperator::Eq,
            ArcOperator::Lt => ArcOperator::Geq,
            ArcOperator::Geq => ArcOperator::Lt,
            ArcOperator::Leq => ArcOperator::Gt,
            ArcOperator::Gt => ArcOperator::Leq,
        }
    }

    /// The mirrored operator: `a op b` holds exactly when `b op.flip() a`.
    pub fn flip(self) -> ArcOperator {
        match self {
            ArcOperator::Eq => ArcOperator::Eq,
            ArcOperator::Neq => ArcOperator::Neq,
            ArcOperator::Lt => ArcOperator::Gt,
            ArcOperator::Gt => ArcOperator::Lt,
            ArcOperator::Leq => ArcOperator::Geq,
            ArcOperator::Geq => ArcOperator::Leq,
        }
    }

    /// Evaluates `a op b` under the tolerance.
    pub fn evaluate<T: DomainValue>(self, a: T, b: T, tolerance: T) -> bool {
        match self {
            ArcOperator::Eq => a.eq_within(b, tolerance),
            ArcOperator::Neq => !a.eq_within(b, tolerance),
            ArcOperator::Lt => a.lt_within(b, tolerance),
            ArcOperator::Leq => a.leq_within(b, tolerance),
            ArcOperator::Gt => b.lt_within(a, tolerance),
            ArcOperator::Geq => b.leq_within(a, tolerance),
        }
    }
}

/// A node an arc depends on, together with the events that should cause the
/// arc to be re-propagated.
#[derive(Clone, Copy, Debug)]
pub enum Watch {
    Scalar(NodeId, DomainEvents),
    Set(SetNodeId, SetDomainEvents),
}

/// A directed hyperedge implementing one constraint's tightening rule.
///
/// An arc stays registered for the graph's lifetime and may be revisited
/// indefinitely as its watched nodes change; there is no terminal state other
/// than the failure that unwinds out of the propagation algorithm.
pub trait Arc<T: DomainValue>: Downcast + Debug {
    /// The name of the arc, used for logging.
    fn name(&self) -> &str;

    /// The nodes this arc must be re-propagated for, with their event masks.
    fn watches(&self) -> Vec<Watch>;

    /// Tightens the domains of the watched nodes to the bounds entailed by
    /// the arc's operator. Must never remove a value that still has a
    /// supporting assignment, and must report failure instead of leaving an
    /// empty domain.
    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus;
}

impl_downcast!(Arc<T> where T: DomainValue);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_is_an_involution() {
        let operators = [
            ArcOperator::Eq,
            ArcOperator::Neq,
            ArcOperator::Lt,
            ArcOperator::Leq,
            ArcOperator::Gt,
            ArcOperator::Geq,
        ];
        for op in operators {
            assert_eq!(op.negate().negate(), op);
            assert_eq!(op.flip().flip(), op);
            // The negation holds exactly when the operator does not.
            for (a, b) in [(1, 2), (2, 1), (2, 2)] {
                assert_ne!(op.evaluate(a, b, 0), op.negate().evaluate(a, b, 0));
                assert_eq!(op.evaluate(a, b, 0), op.flip().evaluate(b, a, 0));
            }
        }
    }
}
