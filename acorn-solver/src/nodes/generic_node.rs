use crate::acorn_assert_simple;
use crate::basic_types::ConstraintOperationError;
use crate::containers::StorageKey;
use crate::nodes::NodeId;

/// One dimension of a generic node: a named index with a fixed cardinality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericIndex {
    name: Box<str>,
    cardinality: usize,
}

impl GenericIndex {
    pub fn new(name: impl Into<Box<str>>, cardinality: usize) -> Self {
        acorn_assert_simple!(cardinality > 0, "generic index with zero cardinality");
        GenericIndex {
            name: name.into(),
            cardinality,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }
}

/// The identifier of a generic node in the graph's generic registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GenericNodeId {
    pub id: u32,
}

impl StorageKey for GenericNodeId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        GenericNodeId { id: index as u32 }
    }
}

/// A logical array of nodes indexed by one or more generic indices. This is an
/// aggregate view, not a new storage kind: the member nodes are ordinary
/// scalar nodes, stored densely keyed by the flattened (row-major)
/// multi-index, and operations over the generic node fan out to them.
#[derive(Debug, Clone)]
pub struct GenericNode {
    name: Box<str>,
    indices: Vec<GenericIndex>,
    nodes: Vec<NodeId>,
}

impl GenericNode {
    pub(crate) fn new(
        name: Box<str>,
        indices: Vec<GenericIndex>,
        nodes: Vec<NodeId>,
    ) -> Result<Self, ConstraintOperationError> {
        let expected: usize = indices.iter().map(GenericIndex::cardinality).product();
        if nodes.len() != expected {
            return Err(ConstraintOperationError::IndexMismatch {
                expected,
                found: nodes.len(),
            });
        }
        Ok(GenericNode {
            name,
            indices,
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn indices(&self) -> &[GenericIndex] {
        &self.indices
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether another generic node ranges over the same index shape, which is
    /// the precondition for element-wise constraints between the two.
    pub fn same_shape(&self, other: &GenericNode) -> bool {
        self.indices.len() == other.indices.len()
            && self
                .indices
                .iter()
                .zip(other.indices.iter())
                .all(|(a, b)| a.cardinality() == b.cardinality())
    }

    /// The member node at the given multi-index coordinates.
    pub fn node_at(&self, coordinates: &[usize]) -> Result<NodeId, ConstraintOperationError> {
        if coordinates.len() != self.indices.len() {
            return Err(ConstraintOperationError::IndexMismatch {
                expected: self.indices.len(),
                found: coordinates.len(),
            });
        }

        let mut flat = 0;
        for (coordinate, index) in coordinates.iter().zip(self.indices.iter()) {
            if *coordinate >= index.cardinality() {
                return Err(ConstraintOperationError::IndexMismatch {
                    expected: index.cardinality(),
                    found: *coordinate,
                });
            }
            flat = flat * index.cardinality() + *coordinate;
        }
        Ok(self.nodes[flat])
    }
}
