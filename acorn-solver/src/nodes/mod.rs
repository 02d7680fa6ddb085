//! Graph vertices: a node wraps exactly one domain and accumulates the change
//! delta the graph routes to dependent arcs and external listeners.

mod generic_node;
mod node;

pub use generic_node::GenericIndex;
pub use generic_node::GenericNode;
pub use generic_node::GenericNodeId;
pub use node::BoolNode;
pub use node::Node;
pub use node::NodeId;
pub use node::SetNode;
pub use node::SetNodeId;
