//! Numeric arcs. Each arc maintains `f(operands) op target` for one
//! arithmetic shape `f` and one [`ArcOperator`], tightening bounds in every
//! direction the operator pins down. Saturating interval arithmetic keeps the
//! endpoint algebra total; outward rounding keeps quotients sound.

mod abs;
mod binary_relation;
mod diff;
mod linear;
mod power;
mod product;
mod quotient;
mod sum;
mod trig;

pub use abs::AbsArc;
pub use abs::NegArc;
pub use binary_relation::BinaryRelationArc;
pub use diff::DiffArc;
pub use linear::LinearArc;
pub use power::PowerArc;
pub use product::ProductArc;
pub use quotient::QuotientArc;
pub use sum::SumArc;
pub use trig::TrigArc;
pub use trig::TrigFunction;
pub(crate) use trig::trig_image;

use super::ArcOperator;
use super::PropagationContext;
use super::ReadDomains;
use super::Watch;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::nodes::NodeId;

/// An operand of a numeric arc: either a scalar node or a constant folded in
/// at compile time.
#[derive(Clone, Copy, Debug)]
pub enum NumOperand<T> {
    Node(NodeId),
    Const(T),
}

impl<T: DomainValue> NumOperand<T> {
    pub(crate) fn min<D: ReadDomains<T> + ?Sized>(&self, domains: &D) -> T {
        match *self {
            NumOperand::Node(node) => domains.min(node),
            NumOperand::Const(value) => value,
        }
    }

    pub(crate) fn max<D: ReadDomains<T> + ?Sized>(&self, domains: &D) -> T {
        match *self {
            NumOperand::Node(node) => domains.max(node),
            NumOperand::Const(value) => value,
        }
    }

    pub(crate) fn is_bound<D: ReadDomains<T> + ?Sized>(&self, domains: &D) -> bool {
        match *self {
            NumOperand::Node(node) => domains.is_bound(node),
            NumOperand::Const(_) => true,
        }
    }

    pub(crate) fn contains<D: ReadDomains<T> + ?Sized>(&self, domains: &D, value: T) -> bool {
        match *self {
            NumOperand::Node(node) => domains.contains(node, value),
            NumOperand::Const(constant) => constant.eq_within(value, domains.tolerance()),
        }
    }

    pub(crate) fn enumerated_values<D: ReadDomains<T> + ?Sized>(
        &self,
        domains: &D,
    ) -> Option<Vec<T>> {
        match *self {
            NumOperand::Node(node) => domains.enumerated_values(node),
            NumOperand::Const(value) => Some(vec![value]),
        }
    }

    /// Raises the operand's lower bound. A constant below `value` is a
    /// conflict reported against `arc`.
    pub(crate) fn set_min(
        &self,
        context: &mut PropagationContext<'_, T>,
        value: T,
        arc: &str,
    ) -> PropagationStatus {
        match *self {
            NumOperand::Node(node) => context.set_min(node, value),
            NumOperand::Const(constant) => {
                if value.leq_within(constant, context.tolerance()) {
                    Ok(())
                } else {
                    Err(PropagationFailure::for_variable(arc))
                }
            }
        }
    }

    /// Lowers the operand's upper bound.
    pub(crate) fn set_max(
        &self,
        context: &mut PropagationContext<'_, T>,
        value: T,
        arc: &str,
    ) -> PropagationStatus {
        match *self {
            NumOperand::Node(node) => context.set_max(node, value),
            NumOperand::Const(constant) => {
                if constant.leq_within(value, context.tolerance()) {
                    Ok(())
                } else {
                    Err(PropagationFailure::for_variable(arc))
                }
            }
        }
    }

    pub(crate) fn remove_value(
        &self,
        context: &mut PropagationContext<'_, T>,
        value: T,
        arc: &str,
    ) -> PropagationStatus {
        match *self {
            NumOperand::Node(node) => context.remove_value(node, value),
            NumOperand::Const(constant) => {
                if constant.eq_within(value, context.tolerance()) {
                    Err(PropagationFailure::for_variable(arc))
                } else {
                    Ok(())
                }
            }
        }
    }

    pub(crate) fn watch(&self, events: DomainEvents) -> Option<Watch> {
        match *self {
            NumOperand::Node(node) => Some(Watch::Scalar(node, events)),
            NumOperand::Const(_) => None,
        }
    }
}

/// The bounds entailed for the left side of `left op right` by the right
/// side's current range. `None` means the operator leaves that side open.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EntailedRange<T> {
    pub(crate) lower: Option<T>,
    pub(crate) upper: Option<T>,
}

pub(crate) fn entailed_range<T: DomainValue>(
    op: ArcOperator,
    right_min: T,
    right_max: T,
    tolerance: T,
) -> EntailedRange<T> {
    let (lower, upper) = match op {
        ArcOperator::Eq => (Some(right_min), Some(right_max)),
        ArcOperator::Lt => (None, Some(right_max.pred(tolerance))),
        ArcOperator::Leq => (None, Some(right_max)),
        ArcOperator::Gt => (Some(right_min.succ(tolerance)), None),
        ArcOperator::Geq => (Some(right_min), None),
        ArcOperator::Neq => (None, None),
    };
    EntailedRange { lower, upper }
}

/// Tightens `target` so that `lo..=hi op target` can still hold, where
/// `(lo, hi)` is the computed range of the arc's expression. For `Neq` the
/// only inference is removing a pinned expression value from the target.
pub(crate) fn tighten_target<T: DomainValue>(
    context: &mut PropagationContext<'_, T>,
    target: NumOperand<T>,
    op: ArcOperator,
    lo: T,
    hi: T,
    arc: &str,
) -> PropagationStatus {
    if op == ArcOperator::Neq {
        if lo.eq_within(hi, context.tolerance()) {
            target.remove_value(context, lo, arc)?;
        }
        return Ok(());
    }
    let range = entailed_range(op.flip(), lo, hi, context.tolerance());
    if let Some(lower) = range.lower {
        target.set_min(context, lower, arc)?;
    }
    if let Some(upper) = range.upper {
        target.set_max(context, upper, arc)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entailed_range_matches_the_operator() {
        // left < right with right in [3, 7] entails left <= 6.
        let range = entailed_range(ArcOperator::Lt, 3, 7, 0);
        assert_eq!(range.lower, None);
        assert_eq!(range.upper, Some(6));

        // left > right entails left >= 4.
        let range = entailed_range(ArcOperator::Gt, 3, 7, 0);
        assert_eq!(range.lower, Some(4));
        assert_eq!(range.upper, None);

        let range = entailed_range(ArcOperator::Eq, 3, 7, 0);
        assert_eq!(range.lower, Some(3));
        assert_eq!(range.upper, Some(7));
    }
}
