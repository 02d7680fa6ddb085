use super::AlgorithmStrength;
use super::PropagationAlgorithm;
use crate::arcs::ArcId;
use crate::basic_types::PropagationStatus;
use crate::containers::StorageKey;
use crate::domains::DomainValue;
use crate::graph::NodeArcGraph;

/// The oracle fixpoint driver (AC-1): full passes over every arc with an
/// explicit changed flag, repeated until a pass leaves all domains untouched.
///
/// Quadratic in the worst case and only meant as the differential-testing
/// reference for [`WorklistPropagator`]. Arcs posted mid-pass are installed
/// between evaluations and picked up by the growing pass bound.
///
/// [`WorklistPropagator`]: super::WorklistPropagator
#[derive(Debug, Default)]
pub struct ExhaustivePropagator {
    strength: AlgorithmStrength,
}

impl ExhaustivePropagator {
    pub fn new(strength: AlgorithmStrength) -> Self {
        ExhaustivePropagator { strength }
    }
}

impl<T: DomainValue> PropagationAlgorithm<T> for ExhaustivePropagator {
    fn propagate(&mut self, graph: &mut NodeArcGraph<T>) -> PropagationStatus {
        let _ = graph.drain_fresh();
        let _ = graph.install_pending();
        // Deltas accumulated before the run are superseded by the full pass;
        // drain them so listeners still hear about the user mutations.
        let _ = graph.drain_changes();
        let mut passes = 0u32;

        loop {
            let mut changed = false;
            let mut index = 0;
            while index < graph.num_arcs() {
                let arc = ArcId::create_from_index(index);
                graph.propagate_arc(arc, self.strength)?;
                let _ = graph.install_pending();
                if !graph.drain_changes().is_empty() {
                    changed = true;
                }
                index += 1;
            }
            passes += 1;
            if !changed {
                break;
            }
        }
        log::debug!("exhaustive fixpoint after {passes} passes");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcs::numeric::NumOperand;
    use crate::arcs::numeric::SumArc;
    use crate::arcs::ArcOperator;
    use crate::arcs::ReadDomains;
    use crate::domains::Domain;

    #[test]
    fn repeated_passes_settle_a_chain() {
        let mut graph: NodeArcGraph<i32> = NodeArcGraph::default();
        let x = graph.new_node("x", Domain::interval(0, 100, 0));
        let y = graph.new_node("y", Domain::interval(0, 100, 0));
        let z = graph.new_node("z", Domain::interval(0, 100, 0));
        let _ = graph.add_arc(Box::new(SumArc::new(
            NumOperand::Node(x),
            NumOperand::Node(y),
            ArcOperator::Eq,
            NumOperand::Const(10),
        )));
        let _ = graph.add_arc(Box::new(SumArc::new(
            NumOperand::Node(y),
            NumOperand::Node(z),
            ArcOperator::Eq,
            NumOperand::Const(10),
        )));
        graph.assign(x, 3).expect("consistent");

        let mut algorithm = ExhaustivePropagator::new(AlgorithmStrength::ArcConsistency);
        algorithm.propagate(&mut graph).expect("no empty domains");

        assert_eq!(graph.min(y), 7);
        assert_eq!(graph.max(y), 7);
        assert_eq!(graph.min(z), 3);
        assert_eq!(graph.max(z), 3);
    }

    #[test]
    fn infeasible_bounds_fail() {
        let mut graph: NodeArcGraph<i32> = NodeArcGraph::default();
        let x = graph.new_node("x", Domain::interval(6, 8, 0));
        let y = graph.new_node("y", Domain::interval(6, 8, 0));
        let _ = graph.add_arc(Box::new(SumArc::new(
            NumOperand::Node(x),
            NumOperand::Node(y),
            ArcOperator::Eq,
            NumOperand::Const(5),
        )));

        let mut algorithm = ExhaustivePropagator::new(AlgorithmStrength::ArcConsistency);
        assert!(<ExhaustivePropagator as PropagationAlgorithm<i32>>::propagate(
            &mut algorithm,
            &mut graph
        )
        .is_err());
    }
}
