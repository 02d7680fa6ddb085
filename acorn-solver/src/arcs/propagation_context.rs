use enumset::EnumSet;

use super::boolean::Tribool;
use super::Arc;
use crate::algorithms::AlgorithmStrength;
use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::domains::Domain;
use crate::domains::DomainEvent;
use crate::domains::DomainValue;
use crate::domains::SetDomain;
use crate::domains::SetDomainEvent;
use crate::nodes::BoolNode;
use crate::nodes::Node;
use crate::nodes::NodeId;
use crate::nodes::SetNode;
use crate::nodes::SetNodeId;

/// Read access to the current domain state, shared by arcs (through the
/// [`PropagationContext`]) and constraints (through the graph) so that
/// `is_true`/`is_false` queries and propagation see the same bounds.
pub trait ReadDomains<T: DomainValue> {
    fn min(&self, node: NodeId) -> T;

    fn max(&self, node: NodeId) -> T;

    fn is_bound(&self, node: NodeId) -> bool;

    fn contains(&self, node: NodeId, value: T) -> bool;

    /// The explicit remaining values of an enumerated domain, `None` for
    /// interval domains.
    fn enumerated_values(&self, node: NodeId) -> Option<Vec<T>>;

    /// The three-valued state of a boolean view.
    fn tribool(&self, node: BoolNode) -> Tribool;

    fn is_possible(&self, set: SetNodeId, value: T) -> bool;

    fn is_required(&self, set: SetNodeId, value: T) -> bool;

    fn possible_values(&self, set: SetNodeId) -> Vec<T>;

    fn required_values(&self, set: SetNodeId) -> Vec<T>;

    fn set_is_bound(&self, set: SetNodeId) -> bool;

    /// The graph-wide equality tolerance.
    fn tolerance(&self) -> T;
}

/// Creation of nodes and arcs during constraint compilation. Implemented by
/// the graph (for ordinary posting) and by the [`PropagationContext`] (for
/// arcs posted *during* propagation, e.g. by reification); in the latter case
/// new arcs land in a pending queue that the running algorithm drains between
/// arc evaluations, never in the collection being iterated.
pub trait ArcBuilder<T: DomainValue>: ReadDomains<T> {
    fn build_node(&mut self, domain: Domain<T>) -> NodeId;

    fn build_bool(&mut self) -> BoolNode;

    fn build_set_node(&mut self, domain: SetDomain<T>) -> SetNodeId;

    fn post_arc(&mut self, arc: Box<dyn Arc<T>>);
}

/// The mutable view of the graph handed to an arc's `propagate` call.
///
/// All mutators are monotonic and record the change delta on the touched
/// node; the delta is drained once per arc evaluation by the propagation
/// algorithm, which uses it to enqueue dependent arcs and to notify external
/// listeners.
#[derive(Debug)]
pub struct PropagationContext<'a, T: DomainValue> {
    pub(crate) nodes: &'a mut KeyedVec<NodeId, Node<T>>,
    pub(crate) set_nodes: &'a mut KeyedVec<SetNodeId, SetNode<T>>,
    pub(crate) pending_arcs: &'a mut Vec<Box<dyn Arc<T>>>,
    pub(crate) touched: &'a mut Vec<NodeId>,
    pub(crate) touched_sets: &'a mut Vec<SetNodeId>,
    pub(crate) next_anonymous: &'a mut u32,
    pub(crate) strength: AlgorithmStrength,
    pub(crate) graph_tolerance: T,
}

impl<T: DomainValue> PropagationContext<'_, T> {
    /// The consistency strength of the running algorithm; arcs consult it to
    /// decide between bounds-only and value-level pruning.
    pub fn strength(&self) -> AlgorithmStrength {
        self.strength
    }

    pub fn set_min(&mut self, node: NodeId, value: T) -> PropagationStatus {
        let result = self.nodes[node].domain.set_min(value);
        self.apply_scalar(node, result)
    }

    pub fn set_max(&mut self, node: NodeId, value: T) -> PropagationStatus {
        let result = self.nodes[node].domain.set_max(value);
        self.apply_scalar(node, result)
    }

    pub fn assign(&mut self, node: NodeId, value: T) -> PropagationStatus {
        let result = self.nodes[node].domain.assign(value);
        self.apply_scalar(node, result)
    }

    pub fn remove_value(&mut self, node: NodeId, value: T) -> PropagationStatus {
        let result = self.nodes[node].domain.remove_value(value);
        self.apply_scalar(node, result)
    }

    /// Binds a boolean view to a truth value, honouring its polarity.
    pub fn bind_bool(&mut self, node: BoolNode, value: bool) -> PropagationStatus {
        let actual = value != node.is_negated();
        let encoded = if actual { T::one() } else { T::zero() };
        self.assign(node.node(), encoded)
    }

    pub fn require(&mut self, set: SetNodeId, value: T) -> PropagationStatus {
        let result = self.set_nodes[set].domain.require(value);
        self.apply_set(set, result)
    }

    pub fn exclude(&mut self, set: SetNodeId, value: T) -> PropagationStatus {
        let result = self.set_nodes[set].domain.exclude(value);
        self.apply_set(set, result)
    }

    fn apply_scalar(
        &mut self,
        node: NodeId,
        result: Result<EnumSet<DomainEvent>, EmptyDomain>,
    ) -> PropagationStatus {
        match result {
            Ok(events) => {
                if !events.is_empty() {
                    let entry = &mut self.nodes[node];
                    if entry.pending.is_empty() {
                        self.touched.push(node);
                    }
                    entry.pending |= events;
                }
                Ok(())
            }
            Err(EmptyDomain) => Err(PropagationFailure::for_variable(self.nodes[node].name())),
        }
    }

    fn apply_set(
        &mut self,
        set: SetNodeId,
        result: Result<EnumSet<SetDomainEvent>, EmptyDomain>,
    ) -> PropagationStatus {
        match result {
            Ok(events) => {
                if !events.is_empty() {
                    let entry = &mut self.set_nodes[set];
                    if entry.pending.is_empty() {
                        self.touched_sets.push(set);
                    }
                    entry.pending |= events;
                }
                Ok(())
            }
            Err(EmptyDomain) => {
                Err(PropagationFailure::for_variable(self.set_nodes[set].name()))
            }
        }
    }
}

impl<T: DomainValue> ReadDomains<T> for PropagationContext<'_, T> {
    fn min(&self, node: NodeId) -> T {
        self.nodes[node].domain.min()
    }

    fn max(&self, node: NodeId) -> T {
        self.nodes[node].domain.max()
    }

    fn is_bound(&self, node: NodeId) -> bool {
        self.nodes[node].domain.is_bound()
    }

    fn contains(&self, node: NodeId, value: T) -> bool {
        self.nodes[node].domain.contains(value)
    }

    fn enumerated_values(&self, node: NodeId) -> Option<Vec<T>> {
        self.nodes[node].domain.values().map(<[T]>::to_vec)
    }

    fn tribool(&self, node: BoolNode) -> Tribool {
        tribool_of(self.nodes, node)
    }

    fn is_possible(&self, set: SetNodeId, value: T) -> bool {
        self.set_nodes[set].domain.is_possible(value)
    }

    fn is_required(&self, set: SetNodeId, value: T) -> bool {
        self.set_nodes[set].domain.is_required(value)
    }

    fn possible_values(&self, set: SetNodeId) -> Vec<T> {
        self.set_nodes[set].domain.possible_values().to_vec()
    }

    fn required_values(&self, set: SetNodeId) -> Vec<T> {
        self.set_nodes[set].domain.required_values().to_vec()
    }

    fn set_is_bound(&self, set: SetNodeId) -> bool {
        self.set_nodes[set].domain.is_bound()
    }

    fn tolerance(&self) -> T {
        self.graph_tolerance
    }
}

impl<T: DomainValue> ArcBuilder<T> for PropagationContext<'_, T> {
    fn build_node(&mut self, domain: Domain<T>) -> NodeId {
        let name = anonymous_name(self.next_anonymous, "_n");
        self.nodes.push(Node::new(name, domain))
    }

    fn build_bool(&mut self) -> BoolNode {
        let name = anonymous_name(self.next_anonymous, "_b");
        let domain = Domain::enumerated(vec![T::zero(), T::one()], self.graph_tolerance);
        BoolNode::new(self.nodes.push(Node::new(name, domain)))
    }

    fn build_set_node(&mut self, domain: SetDomain<T>) -> SetNodeId {
        let name = anonymous_name(self.next_anonymous, "_s");
        self.set_nodes.push(SetNode::new(name, domain))
    }

    fn post_arc(&mut self, arc: Box<dyn Arc<T>>) {
        self.pending_arcs.push(arc);
    }
}

/// Reads the three-valued state of a boolean view from the node store.
pub(crate) fn tribool_of<T: DomainValue>(
    nodes: &KeyedVec<NodeId, Node<T>>,
    node: BoolNode,
) -> Tribool {
    let domain = &nodes[node.node()].domain;
    if !domain.is_bound() {
        return Tribool::Undetermined;
    }
    let is_one = domain.min().eq_within(T::one(), domain.tolerance());
    Tribool::from_bool(is_one != node.is_negated())
}

/// Produces a fresh unique name for an anonymous node. The counter is owned
/// by the graph, so independent engine instances never collide.
pub(crate) fn anonymous_name(counter: &mut u32, prefix: &str) -> Box<str> {
    let name = format!("{prefix}{counter}");
    *counter += 1;
    name.into_boxed_str()
}
