use super::entailed_range;
use super::tighten_target;
use super::NumOperand;
use crate::arcs::Arc;
use crate::arcs::ArcOperator;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;

/// An arc maintaining `-x op z`.
#[derive(Debug)]
pub struct NegArc<T> {
    x: NumOperand<T>,
    op: ArcOperator,
    z: NumOperand<T>,
}

impl<T: DomainValue> NegArc<T> {
    pub fn new(x: NumOperand<T>, op: ArcOperator, z: NumOperand<T>) -> Self {
        NegArc { x, op, z }
    }
}

impl<T: DomainValue> Arc<T> for NegArc<T> {
    fn name(&self) -> &str {
        "Neg"
    }

    fn watches(&self) -> Vec<Watch> {
        [
            self.x.watch(DomainEvents::BOUNDS),
            self.z.watch(DomainEvents::BOUNDS),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        let name = Arc::<T>::name(self);
        let (x_min, x_max) = (self.x.min(context), self.x.max(context));

        tighten_target(context, self.z, self.op, x_max.neg_sat(), x_min.neg_sat(), name)?;

        let range = entailed_range(
            self.op,
            self.z.min(context),
            self.z.max(context),
            context.tolerance(),
        );
        // -x >= lower mirrors to x <= -lower, and vice versa.
        if let Some(lower) = range.lower {
            self.x.set_max(context, lower.neg_sat(), name)?;
        }
        if let Some(upper) = range.upper {
            self.x.set_min(context, upper.neg_sat(), name)?;
        }
        Ok(())
    }
}

/// An arc maintaining `|x| op z`.
///
/// The target is always non-negative. A lower bound on `|x|` only transfers
/// back to `x` when the sign of `x` is already determined; otherwise the
/// excluded band sits strictly inside the interval and bounds cannot express
/// it.
#[derive(Debug)]
pub struct AbsArc<T> {
    x: NumOperand<T>,
    op: ArcOperator,
    z: NumOperand<T>,
}

impl<T: DomainValue> AbsArc<T> {
    pub fn new(x: NumOperand<T>, op: ArcOperator, z: NumOperand<T>) -> Self {
        AbsArc { x, op, z }
    }
}

impl<T: DomainValue> Arc<T> for AbsArc<T> {
    fn name(&self) -> &str {
        "Abs"
    }

    fn watches(&self) -> Vec<Watch> {
        [
            self.x.watch(DomainEvents::BOUNDS),
            self.z.watch(DomainEvents::BOUNDS),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        let name = Arc::<T>::name(self);
        let zero = T::zero();
        let tolerance = context.tolerance();
        let (x_min, x_max) = (self.x.min(context), self.x.max(context));

        let (lo, hi) = if zero.leq_within(x_min, tolerance) {
            (x_min, x_max)
        } else if x_max.leq_within(zero, tolerance) {
            (x_max.neg_sat(), x_min.neg_sat())
        } else {
            (zero, x_min.neg_sat().max_by_order(x_max))
        };
        tighten_target(context, self.z, self.op, lo, hi, name)?;

        let range = entailed_range(
            self.op,
            self.z.min(context),
            self.z.max(context),
            tolerance,
        );
        if let Some(upper) = range.upper {
            self.x.set_min(context, upper.neg_sat(), name)?;
            self.x.set_max(context, upper, name)?;
        }
        if let Some(lower) = range.lower {
            if zero.lt_within(lower, tolerance) {
                if zero.leq_within(x_min, tolerance) {
                    self.x.set_min(context, lower, name)?;
                } else if x_max.leq_within(zero, tolerance) {
                    self.x.set_max(context, lower.neg_sat(), name)?;
                }
            }
        }
        Ok(())
    }
}
