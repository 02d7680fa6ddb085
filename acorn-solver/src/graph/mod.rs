//! The propagation graph: variables as vertices, constraints as arcs, and the
//! watch lists routing domain changes to the arcs that depend on them.

use enumset::EnumSet;

use crate::algorithms::AlgorithmStrength;
use crate::arcs::anonymous_name;
use crate::arcs::boolean::Tribool;
use crate::arcs::tribool_of;
use crate::arcs::Arc;
use crate::arcs::ArcBuilder;
use crate::arcs::ArcId;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::domains::Domain;
use crate::domains::DomainEvent;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::domains::SetDomain;
use crate::domains::SetDomainEvent;
use crate::domains::SetDomainEvents;
use crate::nodes::BoolNode;
use crate::nodes::Node;
use crate::nodes::NodeId;
use crate::nodes::SetNode;
use crate::nodes::SetNodeId;

/// An external observer of domain changes, notified once per drained
/// mutation batch with the coalesced events. Registration is independent of
/// arc wiring.
pub trait VariableChangeListener<T: DomainValue> {
    fn scalar_changed(&mut self, node: NodeId, name: &str, events: EnumSet<DomainEvent>);

    fn set_changed(&mut self, set: SetNodeId, name: &str, events: EnumSet<SetDomainEvent>) {
        let _ = (set, name, events);
    }
}

/// The coalesced changes drained from one mutation batch.
#[derive(Debug, Default)]
pub struct ChangeBatch {
    pub scalars: Vec<(NodeId, EnumSet<DomainEvent>)>,
    pub sets: Vec<(SetNodeId, EnumSet<SetDomainEvent>)>,
}

impl ChangeBatch {
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.sets.is_empty()
    }
}

/// The node/arc store of one engine instance.
///
/// Arcs posted while no propagation runs are installed immediately; arcs
/// posted from inside an arc's `propagate` (reification) land in a pending
/// queue that the running algorithm installs between arc evaluations, so the
/// arc collection is never mutated while it is being traversed.
pub struct NodeArcGraph<T: DomainValue> {
    nodes: KeyedVec<NodeId, Node<T>>,
    set_nodes: KeyedVec<SetNodeId, SetNode<T>>,
    arcs: KeyedVec<ArcId, Box<dyn Arc<T>>>,
    watchers: KeyedVec<NodeId, Vec<(ArcId, DomainEvents)>>,
    set_watchers: KeyedVec<SetNodeId, Vec<(ArcId, SetDomainEvents)>>,
    pending_arcs: Vec<Box<dyn Arc<T>>>,
    fresh: Vec<ArcId>,
    touched: Vec<NodeId>,
    touched_sets: Vec<SetNodeId>,
    listeners: Vec<Box<dyn VariableChangeListener<T>>>,
    next_anonymous: u32,
    tolerance: T,
}

impl<T: DomainValue> Default for NodeArcGraph<T> {
    fn default() -> Self {
        NodeArcGraph::new(T::default_tolerance())
    }
}

impl<T: DomainValue> std::fmt::Debug for NodeArcGraph<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeArcGraph")
            .field("nodes", &self.nodes.len())
            .field("set_nodes", &self.set_nodes.len())
            .field("arcs", &self.arcs.len())
            .finish()
    }
}

impl<T: DomainValue> NodeArcGraph<T> {
    pub fn new(tolerance: T) -> Self {
        NodeArcGraph {
            nodes: KeyedVec::default(),
            set_nodes: KeyedVec::default(),
            arcs: KeyedVec::default(),
            watchers: KeyedVec::default(),
            set_watchers: KeyedVec::default(),
            pending_arcs: Vec::default(),
            fresh: Vec::default(),
            touched: Vec::default(),
            touched_sets: Vec::default(),
            listeners: Vec::default(),
            next_anonymous: 0,
            tolerance: T::default_tolerance().max_by_order(tolerance),
        }
    }

    pub fn graph_tolerance(&self) -> T {
        self.tolerance
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_set_nodes(&self) -> usize {
        self.set_nodes.len()
    }

    pub fn node_name(&self, node: NodeId) -> &str {
        self.nodes[node].name()
    }

    pub fn set_node_name(&self, set: SetNodeId) -> &str {
        self.set_nodes[set].name()
    }

    pub fn new_node(&mut self, name: &str, domain: Domain<T>) -> NodeId {
        let node = self.nodes.push(Node::new(name.into(), domain));
        let _ = self.watchers.push(Vec::new());
        node
    }

    pub fn new_anonymous_node(&mut self, domain: Domain<T>) -> NodeId {
        let name = anonymous_name(&mut self.next_anonymous, "_n");
        let node = self.nodes.push(Node::new(name, domain));
        let _ = self.watchers.push(Vec::new());
        node
    }

    pub fn new_bool_node(&mut self, name: &str) -> BoolNode {
        let domain = Domain::enumerated(vec![T::zero(), T::one()], self.tolerance);
        BoolNode::new(self.new_node(name, domain))
    }

    pub fn new_set_node(&mut self, name: &str, domain: SetDomain<T>) -> SetNodeId {
        let set = self.set_nodes.push(SetNode::new(name.into(), domain));
        let _ = self.set_watchers.push(Vec::new());
        set
    }

    /// Registers an arc and wires its watches. The arc is recorded as fresh
    /// so the next propagation seeds it into the work queue.
    pub fn add_arc(&mut self, arc: Box<dyn Arc<T>>) -> ArcId {
        let watches = arc.watches();
        let id = self.arcs.push(arc);
        for watch in watches {
            match watch {
                Watch::Scalar(node, events) => self.watchers[node].push((id, events)),
                Watch::Set(set, events) => self.set_watchers[set].push((id, events)),
            }
        }
        self.fresh.push(id);
        log::trace!("added arc {:?} ({})", id, self.arcs[id].name());
        id
    }

    /// Installs arcs queued during propagation. Returns the ids so the
    /// running algorithm can enqueue them.
    pub fn install_pending(&mut self) -> Vec<ArcId> {
        // Nodes built through the context while an arc ran need their watch
        // list slots before any new arc can be wired to them.
        while self.watchers.len() < self.nodes.len() {
            let _ = self.watchers.push(Vec::new());
        }
        while self.set_watchers.len() < self.set_nodes.len() {
            let _ = self.set_watchers.push(Vec::new());
        }
        let pending = std::mem::take(&mut self.pending_arcs);
        pending.into_iter().map(|arc| self.add_arc(arc)).collect()
    }

    /// The arcs never propagated since they were added.
    pub fn drain_fresh(&mut self) -> Vec<ArcId> {
        std::mem::take(&mut self.fresh)
    }

    pub fn scalar_watchers(&self, node: NodeId) -> &[(ArcId, DomainEvents)] {
        &self.watchers[node]
    }

    pub fn set_watchers(&self, set: SetNodeId) -> &[(ArcId, SetDomainEvents)] {
        &self.set_watchers[set]
    }

    pub fn add_listener(&mut self, listener: Box<dyn VariableChangeListener<T>>) {
        self.listeners.push(listener);
    }

    /// Propagates one arc against the current domains.
    pub fn propagate_arc(&mut self, id: ArcId, strength: AlgorithmStrength) -> PropagationStatus {
        let NodeArcGraph {
            nodes,
            set_nodes,
            arcs,
            pending_arcs,
            touched,
            touched_sets,
            next_anonymous,
            tolerance,
            ..
        } = self;
        let mut context = PropagationContext {
            nodes,
            set_nodes,
            pending_arcs,
            touched,
            touched_sets,
            next_anonymous,
            strength,
            graph_tolerance: *tolerance,
        };
        let arc = &mut arcs[id];
        log::trace!("propagating {:?} ({})", id, arc.name());
        arc.propagate(&mut context)
    }

    /// Drains the accumulated change delta, notifying listeners once per
    /// changed node with the coalesced events.
    pub fn drain_changes(&mut self) -> ChangeBatch {
        let mut batch = ChangeBatch::default();
        for node in std::mem::take(&mut self.touched) {
            let events = std::mem::replace(&mut self.nodes[node].pending, EnumSet::empty());
            if !events.is_empty() {
                batch.scalars.push((node, events));
            }
        }
        for set in std::mem::take(&mut self.touched_sets) {
            let events = std::mem::replace(&mut self.set_nodes[set].pending, EnumSet::empty());
            if !events.is_empty() {
                batch.sets.push((set, events));
            }
        }
        for &(node, events) in &batch.scalars {
            let name = self.nodes[node].name();
            for listener in &mut self.listeners {
                listener.scalar_changed(node, name, events);
            }
        }
        for &(set, events) in &batch.sets {
            let name = self.set_nodes[set].name();
            for listener in &mut self.listeners {
                listener.set_changed(set, name, events);
            }
        }
        batch
    }

    /// Whether unseen changes or uninstalled arcs exist.
    pub fn is_dirty(&self) -> bool {
        !self.touched.is_empty()
            || !self.touched_sets.is_empty()
            || !self.fresh.is_empty()
            || !self.pending_arcs.is_empty()
    }

    /// Applies a user-level tightening outside of any running propagation.
    /// The recorded delta wakes the dependent arcs on the next propagation.
    pub fn set_min(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.with_context(|context| context.set_min(node, value))
    }

    pub fn set_max(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.with_context(|context| context.set_max(node, value))
    }

    pub fn assign(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.with_context(|context| context.assign(node, value))
    }

    pub fn remove_value(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.with_context(|context| context.remove_value(node, value))
    }

    pub fn bind_bool(&mut self, node: BoolNode, value: bool) -> PropagationStatus {
        self.with_context(|context| context.bind_bool(node, value))
    }

    pub fn require(&mut self, set: SetNodeId, value: T) -> PropagationStatus {
        self.with_context(|context| context.require(set, value))
    }

    pub fn exclude(&mut self, set: SetNodeId, value: T) -> PropagationStatus {
        self.with_context(|context| context.exclude(set, value))
    }

    fn with_context<R>(
        &mut self,
        action: impl FnOnce(&mut PropagationContext<'_, T>) -> R,
    ) -> R {
        let NodeArcGraph {
            nodes,
            set_nodes,
            pending_arcs,
            touched,
            touched_sets,
            next_anonymous,
            tolerance,
            ..
        } = self;
        let mut context = PropagationContext {
            nodes,
            set_nodes,
            pending_arcs,
            touched,
            touched_sets,
            next_anonymous,
            strength: AlgorithmStrength::ArcConsistency,
            graph_tolerance: *tolerance,
        };
        action(&mut context)
    }
}

impl<T: DomainValue> ReadDomains<T> for NodeArcGraph<T> {
    fn min(&self, node: NodeId) -> T {
        self.nodes[node].domain().min()
    }

    fn max(&self, node: NodeId) -> T {
        self.nodes[node].domain().max()
    }

    fn is_bound(&self, node: NodeId) -> bool {
        self.nodes[node].domain().is_bound()
    }

    fn contains(&self, node: NodeId, value: T) -> bool {
        self.nodes[node].domain().contains(value)
    }

    fn enumerated_values(&self, node: NodeId) -> Option<Vec<T>> {
        self.nodes[node].domain().values().map(<[T]>::to_vec)
    }

    fn tribool(&self, node: BoolNode) -> Tribool {
        tribool_of(&self.nodes, node)
    }

    fn is_possible(&self, set: SetNodeId, value: T) -> bool {
        self.set_nodes[set].domain().is_possible(value)
    }

    fn is_required(&self, set: SetNodeId, value: T) -> bool {
        self.set_nodes[set].domain().is_required(value)
    }

    fn possible_values(&self, set: SetNodeId) -> Vec<T> {
        self.set_nodes[set].domain().possible_values().to_vec()
    }

    fn required_values(&self, set: SetNodeId) -> Vec<T> {
        self.set_nodes[set].domain().required_values().to_vec()
    }

    fn set_is_bound(&self, set: SetNodeId) -> bool {
        self.set_nodes[set].domain().is_bound()
    }

    fn tolerance(&self) -> T {
        self.tolerance
    }
}

impl<T: DomainValue> ArcBuilder<T> for NodeArcGraph<T> {
    fn build_node(&mut self, domain: Domain<T>) -> NodeId {
        self.new_anonymous_node(domain)
    }

    fn build_bool(&mut self) -> BoolNode {
        let name = anonymous_name(&mut self.next_anonymous, "_b");
        let domain = Domain::enumerated(vec![T::zero(), T::one()], self.tolerance);
        let node = self.nodes.push(Node::new(name, domain));
        let _ = self.watchers.push(Vec::new());
        BoolNode::new(node)
    }

    fn build_set_node(&mut self, domain: SetDomain<T>) -> SetNodeId {
        let name = anonymous_name(&mut self.next_anonymous, "_s");
        let set = self.set_nodes.push(SetNode::new(name, domain));
        let _ = self.set_watchers.push(Vec::new());
        set
    }

    fn post_arc(&mut self, arc: Box<dyn Arc<T>>) {
        let _ = self.add_arc(arc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::DomainEvents;

    struct Recorder {
        seen: std::rc::Rc<std::cell::RefCell<Vec<(NodeId, EnumSet<DomainEvent>)>>>,
    }

    impl VariableChangeListener<i32> for Recorder {
        fn scalar_changed(&mut self, node: NodeId, _name: &str, events: EnumSet<DomainEvent>) {
            self.seen.borrow_mut().push((node, events));
        }
    }

    #[test]
    fn deltas_are_coalesced_per_batch() {
        let mut graph: NodeArcGraph<i32> = NodeArcGraph::default();
        let x = graph.new_node("x", Domain::interval(0, 10, 0));
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        graph.add_listener(Box::new(Recorder { seen: seen.clone() }));

        graph.set_min(x, 3).expect("consistent");
        graph.set_min(x, 5).expect("consistent");
        graph.set_max(x, 7).expect("consistent");
        let batch = graph.drain_changes();

        assert_eq!(batch.scalars.len(), 1);
        let (node, events) = batch.scalars[0];
        assert_eq!(node, x);
        assert!(events.contains(DomainEvent::LowerBound));
        assert!(events.contains(DomainEvent::UpperBound));
        assert_eq!(seen.borrow().len(), 1);

        // A fresh batch starts empty.
        assert!(graph.drain_changes().is_empty());
    }

    #[test]
    fn watch_lists_route_by_node() {
        #[derive(Debug)]
        struct Inert(NodeId);
        impl Arc<i32> for Inert {
            fn name(&self) -> &str {
                "Inert"
            }
            fn watches(&self) -> Vec<Watch> {
                vec![Watch::Scalar(self.0, DomainEvents::BOUNDS)]
            }
            fn propagate(
                &mut self,
                _context: &mut PropagationContext<'_, i32>,
            ) -> PropagationStatus {
                Ok(())
            }
        }

        let mut graph: NodeArcGraph<i32> = NodeArcGraph::default();
        let x = graph.new_node("x", Domain::interval(0, 10, 0));
        let y = graph.new_node("y", Domain::interval(0, 10, 0));
        let id = graph.add_arc(Box::new(Inert(x)));

        assert_eq!(graph.scalar_watchers(x).len(), 1);
        assert_eq!(graph.scalar_watchers(x)[0].0, id);
        assert!(graph.scalar_watchers(y).is_empty());
        assert_eq!(graph.drain_fresh(), vec![id]);
        assert!(graph.drain_fresh().is_empty());
    }
}
