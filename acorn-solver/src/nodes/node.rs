use std::ops::Not;

use enumset::EnumSet;

use crate::containers::StorageKey;
use crate::domains::Domain;
use crate::domains::DomainEvent;
use crate::domains::SetDomain;
use crate::domains::SetDomainEvent;

/// The identifier of a scalar node in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub id: u32,
}

impl StorageKey for NodeId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        NodeId { id: index as u32 }
    }
}

/// The identifier of a set node in the graph. Set nodes live in their own
/// store, so their ids must not be mixed with scalar [`NodeId`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SetNodeId {
    pub id: u32,
}

impl StorageKey for SetNodeId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        SetNodeId { id: index as u32 }
    }
}

/// A scalar graph vertex: one domain plus the change events accumulated since
/// the delta was last drained. The delta is collected once per mutation batch,
/// not once per scalar change, so dependent arcs can coalesce their reactions.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(crate) name: Box<str>,
    pub(crate) domain: Domain<T>,
    pub(crate) pending: EnumSet<DomainEvent>,
}

impl<T> Node<T> {
    pub(crate) fn new(name: Box<str>, domain: Domain<T>) -> Self {
        Node {
            name,
            domain,
            pending: EnumSet::empty(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain<T> {
        &self.domain
    }
}

/// A set-valued graph vertex.
#[derive(Debug, Clone)]
pub struct SetNode<T> {
    pub(crate) name: Box<str>,
    pub(crate) domain: SetDomain<T>,
    pub(crate) pending: EnumSet<SetDomainEvent>,
}

impl<T> SetNode<T> {
    pub(crate) fn new(name: Box<str>, domain: SetDomain<T>) -> Self {
        SetNode {
            name,
            domain,
            pending: EnumSet::empty(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &SetDomain<T> {
        &self.domain
    }
}

/// A boolean view of a scalar node with domain `{0, 1}`. The view carries a
/// polarity, so the negation of a boolean variable is free and does not
/// require an arc.
///
/// A boolean node is in one of three states: true, false, or undetermined
/// (its underlying domain is not yet bound).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoolNode {
    node: NodeId,
    negated: bool,
}

impl BoolNode {
    pub(crate) fn new(node: NodeId) -> Self {
        BoolNode {
            node,
            negated: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn is_negated(&self) -> bool {
        self.negated
    }
}

impl Not for BoolNode {
    type Output = BoolNode;

    fn not(self) -> Self::Output {
        BoolNode {
            node: self.node,
            negated: !self.negated,
        }
    }
}
