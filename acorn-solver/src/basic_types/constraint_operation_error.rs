use thiserror::Error;

use super::PropagationFailure;

/// Errors related to posting constraints to the graph. These are configuration
/// errors detected at constraint- or arc-construction time, as opposed to
/// [`PropagationFailure`] which is the runtime signal of an empty domain.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConstraintOperationError {
    /// A generic (indexed) constraint referenced two index sets with different
    /// shapes.
    #[error("index mismatch: expected {expected} elements, found {found}")]
    IndexMismatch { expected: usize, found: usize },

    /// The operation is not defined for the value type of the graph, e.g. a
    /// trigonometric arc over an integer variable.
    #[error("operation `{0}` is not supported for this value type")]
    UnsupportedOperation(&'static str),

    /// The constraint has no postable opposite and therefore cannot be
    /// reified.
    #[error("constraint `{0}` has no postable opposite and cannot be reified")]
    NotReifiable(&'static str),

    /// Posting the constraint made a domain empty during the immediate
    /// propagation that follows it.
    #[error(transparent)]
    Infeasible(#[from] PropagationFailure),
}
