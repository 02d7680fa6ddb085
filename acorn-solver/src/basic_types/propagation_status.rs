use thiserror::Error;

/// The result of invoking an arc or a propagation algorithm. Propagation
/// either succeeds or detects that a domain would become empty, in which case
/// the distinguished failure is reported to the caller rather than leaving an
/// empty domain behind silently.
pub type PropagationStatus = Result<(), PropagationFailure>;

/// The signal that a domain has become empty, i.e. the constraints are jointly
/// unsatisfiable under the current bounds.
///
/// This is not recoverable within the propagation kernel; it unwinds to the
/// caller of `propagate`/`add_constraint`, and resolving it (backtracking,
/// relaxing, reporting) is entirely the search layer's responsibility.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("empty domain for variable `{variable}`")]
pub struct PropagationFailure {
    /// The name of the variable whose domain became empty.
    pub variable: String,
}

impl PropagationFailure {
    pub(crate) fn for_variable(name: &str) -> Self {
        PropagationFailure {
            variable: name.to_owned(),
        }
    }
}

/// Marker raised by domain mutators when a tightening would leave no values.
///
/// Domains do not know the name of the variable they belong to; the
/// propagation context converts this marker into a [`PropagationFailure`]
/// carrying the variable name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;
