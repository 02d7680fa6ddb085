//! The fixpoint drivers. Both algorithms implement the same contract:
//! propagate until no arc can tighten any domain, or fail on the first empty
//! domain. For a fixed arc order the outcome is deterministic, and across
//! orders the final bounds are confluent.

mod exhaustive;
mod worklist;

pub use exhaustive::ExhaustivePropagator;
pub use worklist::WorklistPropagator;

use crate::basic_types::PropagationStatus;
use crate::domains::DomainValue;
use crate::graph::NodeArcGraph;

/// The consistency level arcs aim for. Bounds consistency looks at `min`/`max`
/// only; arc consistency additionally prunes individual values of enumerated
/// domains.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlgorithmStrength {
    BoundsConsistency,
    #[default]
    ArcConsistency,
}

/// A fixpoint driver over a [`NodeArcGraph`].
pub trait PropagationAlgorithm<T: DomainValue> {
    /// Runs the graph to a fixpoint. On failure the domains are left
    /// partially tightened; rollback is the caller's concern.
    fn propagate(&mut self, graph: &mut NodeArcGraph<T>) -> PropagationStatus;
}
