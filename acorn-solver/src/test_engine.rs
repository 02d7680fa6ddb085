//! A thin graph-plus-worklist harness for unit tests. Unlike
//! [`PropagationEngine`](crate::engine::PropagationEngine) it posts nothing
//! automatically, so tests control exactly when propagation runs.

use crate::algorithms::AlgorithmStrength;
use crate::algorithms::PropagationAlgorithm;
use crate::algorithms::WorklistPropagator;
use crate::arcs::boolean::Tribool;
use crate::arcs::Arc;
use crate::arcs::ArcId;
use crate::arcs::ReadDomains;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationStatus;
use crate::constraints::Constraint;
use crate::domains::Domain;
use crate::domains::DomainValue;
use crate::domains::SetDomain;
use crate::graph::NodeArcGraph;
use crate::nodes::BoolNode;
use crate::nodes::GenericIndex;
use crate::nodes::GenericNode;
use crate::nodes::NodeId;
use crate::nodes::SetNodeId;

pub(crate) struct TestEngine<T: DomainValue = i32> {
    graph: NodeArcGraph<T>,
    algorithm: WorklistPropagator,
}

impl<T: DomainValue> TestEngine<T> {
    pub(crate) fn new() -> Self {
        TestEngine {
            graph: NodeArcGraph::default(),
            algorithm: WorklistPropagator::new(AlgorithmStrength::ArcConsistency),
        }
    }

    pub(crate) fn new_variable(&mut self, min: T, max: T) -> NodeId {
        let name = format!("x{}", self.graph.num_nodes());
        let tolerance = self.graph.graph_tolerance();
        self.graph.new_node(&name, Domain::interval(min, max, tolerance))
    }

    pub(crate) fn new_enumerated(&mut self, values: Vec<T>) -> NodeId {
        let name = format!("x{}", self.graph.num_nodes());
        let tolerance = self.graph.graph_tolerance();
        self.graph
            .new_node(&name, Domain::enumerated(values, tolerance))
    }

    pub(crate) fn new_bool(&mut self) -> BoolNode {
        let name = format!("b{}", self.graph.num_nodes());
        self.graph.new_bool_node(&name)
    }

    pub(crate) fn new_set(&mut self, possible: Vec<T>) -> SetNodeId {
        let name = format!("s{}", self.graph.num_set_nodes());
        let tolerance = self.graph.graph_tolerance();
        self.graph
            .new_set_node(&name, SetDomain::new(possible, tolerance))
    }

    pub(crate) fn new_generic(
        &mut self,
        name: &str,
        indices: Vec<GenericIndex>,
        min: T,
        max: T,
    ) -> GenericNode {
        let count: usize = indices.iter().map(GenericIndex::cardinality).product();
        let nodes = (0..count)
            .map(|flat| {
                let member = format!("{name}[{flat}]");
                let tolerance = self.graph.graph_tolerance();
                self.graph
                    .new_node(&member, Domain::interval(min, max, tolerance))
            })
            .collect();
        GenericNode::new(name.into(), indices, nodes).unwrap()
    }

    pub(crate) fn add_arc(&mut self, arc: impl Arc<T> + 'static) -> ArcId {
        self.graph.add_arc(Box::new(arc))
    }

    pub(crate) fn post(
        &mut self,
        constraint: &dyn Constraint<T>,
    ) -> Result<(), ConstraintOperationError> {
        constraint.validate()?;
        constraint.compile(&mut self.graph)
    }

    pub(crate) fn post_boxed(
        &mut self,
        constraint: Box<dyn Constraint<T>>,
    ) -> Result<(), ConstraintOperationError> {
        self.post(constraint.as_ref())
    }

    pub(crate) fn propagate(&mut self) -> PropagationStatus {
        self.algorithm.propagate(&mut self.graph)
    }

    pub(crate) fn truth(&self, constraint: &dyn Constraint<T>) -> Tribool {
        constraint.truth(&self.graph)
    }

    pub(crate) fn lower_bound(&self, node: NodeId) -> T {
        self.graph.min(node)
    }

    pub(crate) fn upper_bound(&self, node: NodeId) -> T {
        self.graph.max(node)
    }

    pub(crate) fn enumerated_values(&self, node: NodeId) -> Option<Vec<T>> {
        self.graph.enumerated_values(node)
    }

    pub(crate) fn tribool(&self, node: BoolNode) -> Tribool {
        self.graph.tribool(node)
    }

    pub(crate) fn is_possible(&self, set: SetNodeId, value: T) -> bool {
        self.graph.is_possible(set, value)
    }

    pub(crate) fn is_required(&self, set: SetNodeId, value: T) -> bool {
        self.graph.is_required(set, value)
    }

    pub(crate) fn set_max(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.graph.set_max(node, value)
    }

    pub(crate) fn bind_bool(&mut self, node: BoolNode, value: bool) -> PropagationStatus {
        self.graph.bind_bool(node, value)
    }

    pub(crate) fn require(&mut self, set: SetNodeId, value: T) -> PropagationStatus {
        self.graph.require(set, value)
    }

    pub(crate) fn exclude(&mut self, set: SetNodeId, value: T) -> PropagationStatus {
        self.graph.exclude(set, value)
    }
}
