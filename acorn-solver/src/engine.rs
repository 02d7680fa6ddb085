//! The user-facing engine: variable creation, constraint posting, and
//! propagation to a fixpoint, wrapped around the graph and a pluggable
//! algorithm.

use fnv::FnvHashMap;

use crate::algorithms::AlgorithmStrength;
use crate::algorithms::ExhaustivePropagator;
use crate::algorithms::PropagationAlgorithm;
use crate::algorithms::WorklistPropagator;
use crate::arcs::boolean::ReificationArc;
use crate::arcs::boolean::Tribool;
use crate::arcs::ReadDomains;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationStatus;
use crate::constraints::Constraint;
use crate::containers::KeyedVec;
use crate::domains::Domain;
use crate::domains::DomainValue;
use crate::domains::SetDomain;
use crate::graph::NodeArcGraph;
use crate::graph::VariableChangeListener;
use crate::nodes::BoolNode;
use crate::nodes::GenericIndex;
use crate::nodes::GenericNode;
use crate::nodes::GenericNodeId;
use crate::nodes::NodeId;
use crate::nodes::SetNodeId;

/// Which propagation algorithm drives the engine.
///
/// The worklist algorithm only revisits arcs whose watched nodes changed; the
/// exhaustive algorithm revisits every arc each pass until a full pass changes
/// nothing. Both reach the same fixpoint, so the exhaustive one mainly serves
/// as a cross-check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlgorithmChoice {
    #[default]
    Worklist,
    Exhaustive,
}

/// Configuration of a [`PropagationEngine`].
#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    pub algorithm: AlgorithmChoice,
    pub strength: AlgorithmStrength,
    /// Whether posting a constraint immediately propagates to a fixpoint. An
    /// infeasibility detected this way surfaces as
    /// [`ConstraintOperationError::Infeasible`] from the post itself.
    pub auto_propagate: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            algorithm: AlgorithmChoice::default(),
            strength: AlgorithmStrength::default(),
            auto_propagate: true,
        }
    }
}

/// The propagation engine: a [`NodeArcGraph`] plus the algorithm that drives
/// it to a fixpoint and a registry of named and generic variables.
pub struct PropagationEngine<T: DomainValue> {
    graph: NodeArcGraph<T>,
    algorithm: Box<dyn PropagationAlgorithm<T>>,
    options: EngineOptions,
    names: FnvHashMap<Box<str>, NodeId>,
    generics: KeyedVec<GenericNodeId, GenericNode>,
}

impl<T: DomainValue> Default for PropagationEngine<T> {
    fn default() -> Self {
        PropagationEngine::with_options(T::default_tolerance(), EngineOptions::default())
    }
}

impl<T: DomainValue> std::fmt::Debug for PropagationEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropagationEngine")
            .field("graph", &self.graph)
            .field("options", &self.options)
            .finish()
    }
}

fn build_algorithm<T: DomainValue>(options: EngineOptions) -> Box<dyn PropagationAlgorithm<T>> {
    match options.algorithm {
        AlgorithmChoice::Worklist => Box::new(WorklistPropagator::new(options.strength)),
        AlgorithmChoice::Exhaustive => Box::new(ExhaustivePropagator::new(options.strength)),
    }
}

impl<T: DomainValue> PropagationEngine<T> {
    pub fn with_options(tolerance: T, options: EngineOptions) -> Self {
        PropagationEngine {
            graph: NodeArcGraph::new(tolerance),
            algorithm: build_algorithm(options),
            options,
            names: FnvHashMap::default(),
            generics: KeyedVec::default(),
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// A new variable with an interval domain `[min, max]` and a generated
    /// name.
    pub fn new_variable(&mut self, min: T, max: T) -> NodeId {
        let name = format!("v{}", self.names.len());
        self.new_named_variable(&name, min, max)
    }

    pub fn new_named_variable(&mut self, name: &str, min: T, max: T) -> NodeId {
        let domain = Domain::interval(min, max, self.graph.graph_tolerance());
        let node = self.graph.new_node(name, domain);
        let _ = self.names.insert(name.into(), node);
        node
    }

    /// A new variable restricted to an explicit set of values.
    pub fn new_enumerated_variable(&mut self, name: &str, values: Vec<T>) -> NodeId {
        let domain = Domain::enumerated(values, self.graph.graph_tolerance());
        let node = self.graph.new_node(name, domain);
        let _ = self.names.insert(name.into(), node);
        node
    }

    pub fn new_bool_variable(&mut self, name: &str) -> BoolNode {
        let node = self.graph.new_bool_node(name);
        let _ = self.names.insert(name.into(), node.node());
        node
    }

    /// A new set variable whose possible values are `possible` and whose
    /// required set starts empty.
    pub fn new_set_variable(&mut self, name: &str, possible: Vec<T>) -> SetNodeId {
        let domain = SetDomain::new(possible, self.graph.graph_tolerance());
        self.graph.new_set_node(name, domain)
    }

    /// A new generic (indexed) variable: one scalar member per point of the
    /// index space, each with the interval domain `[min, max]`.
    pub fn new_generic_variable(
        &mut self,
        name: &str,
        indices: Vec<GenericIndex>,
        min: T,
        max: T,
    ) -> Result<GenericNodeId, ConstraintOperationError> {
        let count: usize = indices.iter().map(GenericIndex::cardinality).product();
        let nodes = (0..count)
            .map(|flat| {
                let member = format!("{name}[{flat}]");
                self.new_named_variable(&member, min, max)
            })
            .collect();
        let generic = GenericNode::new(name.into(), indices, nodes)?;
        Ok(self.generics.push(generic))
    }

    pub fn generic_node(&self, id: GenericNodeId) -> &GenericNode {
        &self.generics[id]
    }

    /// The node registered under `name`, if any.
    pub fn variable(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Validates and compiles a constraint onto the graph. With
    /// `auto_propagate` the new arcs are immediately driven to a fixpoint.
    pub fn add_constraint(
        &mut self,
        constraint: impl Constraint<T> + 'static,
    ) -> Result<(), ConstraintOperationError> {
        self.add_boxed_constraint(Box::new(constraint))
    }

    pub fn add_boxed_constraint(
        &mut self,
        constraint: Box<dyn Constraint<T>>,
    ) -> Result<(), ConstraintOperationError> {
        constraint.validate()?;
        constraint.compile(&mut self.graph)?;
        if self.options.auto_propagate {
            self.propagate()?;
        }
        Ok(())
    }

    /// Attaches a constraint to a fresh boolean variable instead of posting
    /// it: the boolean becomes true exactly when the constraint holds.
    ///
    /// Fails with [`ConstraintOperationError::NotReifiable`] if the constraint
    /// has no postable opposite.
    pub fn reify(
        &mut self,
        name: &str,
        constraint: Box<dyn Constraint<T>>,
    ) -> Result<BoolNode, ConstraintOperationError> {
        let bool_node = self.new_bool_variable(name);
        let arc = ReificationArc::new(bool_node, constraint)?;
        let _ = self.graph.add_arc(Box::new(arc));
        if self.options.auto_propagate {
            self.propagate()?;
        }
        Ok(bool_node)
    }

    /// Propagates to a fixpoint. On failure the domains are left partially
    /// tightened; callers needing rollback must snapshot beforehand.
    pub fn propagate(&mut self) -> PropagationStatus {
        self.algorithm.propagate(&mut self.graph)
    }

    /// Evaluates a constraint's truth against the current domains without
    /// posting it.
    pub fn truth(&self, constraint: &dyn Constraint<T>) -> Tribool {
        constraint.truth(&self.graph)
    }

    pub fn add_listener(&mut self, listener: Box<dyn VariableChangeListener<T>>) {
        self.graph.add_listener(listener);
    }

    // Domain queries.

    pub fn min(&self, node: NodeId) -> T {
        self.graph.min(node)
    }

    pub fn max(&self, node: NodeId) -> T {
        self.graph.max(node)
    }

    pub fn is_bound(&self, node: NodeId) -> bool {
        self.graph.is_bound(node)
    }

    pub fn contains(&self, node: NodeId, value: T) -> bool {
        self.graph.contains(node, value)
    }

    pub fn tribool(&self, node: BoolNode) -> Tribool {
        self.graph.tribool(node)
    }

    pub fn is_possible(&self, set: SetNodeId, value: T) -> bool {
        self.graph.is_possible(set, value)
    }

    pub fn is_required(&self, set: SetNodeId, value: T) -> bool {
        self.graph.is_required(set, value)
    }

    // User-level domain tightenings. These record a change delta like any
    // arc-made change, so the next propagation wakes the dependent arcs.

    pub fn set_min(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.graph.set_min(node, value)
    }

    pub fn set_max(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.graph.set_max(node, value)
    }

    pub fn assign(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.graph.assign(node, value)
    }

    pub fn remove_value(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.graph.remove_value(node, value)
    }

    pub fn bind_bool(&mut self, node: BoolNode, value: bool) -> PropagationStatus {
        self.graph.bind_bool(node, value)
    }

    pub fn require(&mut self, set: SetNodeId, value: T) -> PropagationStatus {
        self.graph.require(set, value)
    }

    pub fn exclude(&mut self, set: SetNodeId, value: T) -> PropagationStatus {
        self.graph.exclude(set, value)
    }
}
