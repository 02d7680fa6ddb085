//! Boolean arcs: three-valued logic propagation over boolean-valued nodes and
//! reification of arbitrary constraints into boolean variables.

mod bool_arc;
mod reification;
mod tribool;

pub use bool_arc::BoolArc;
pub use bool_arc::BoolOperand;
pub use reification::ReificationArc;
pub use tribool::infer_left;
pub use tribool::infer_right;
pub use tribool::result_of;
pub use tribool::BoolOperator;
pub use tribool::Tribool;
