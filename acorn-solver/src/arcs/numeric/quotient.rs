use super::entailed_range;
use super::tighten_target;
use super::NumOperand;
use crate::algorithms::AlgorithmStrength;
use crate::arcs::Arc;
use crate::arcs::ArcOperator;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::interval_ops;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;

/// An arc maintaining `x / y op z` under rational division semantics with
/// outward-rounded integer bounds.
///
/// A divisor interval containing zero yields no inference, unless zero is
/// excludable as a discrete value of an enumerated divisor domain. The
/// divisor itself can never be zero; at arc-consistency strength the value is
/// pruned outright.
#[derive(Debug)]
pub struct QuotientArc<T> {
    x: NumOperand<T>,
    y: NumOperand<T>,
    op: ArcOperator,
    z: NumOperand<T>,
}

impl<T: DomainValue> QuotientArc<T> {
    pub fn new(x: NumOperand<T>, y: NumOperand<T>, op: ArcOperator, z: NumOperand<T>) -> Self {
        QuotientArc { x, y, op, z }
    }
}

impl<T: DomainValue> Arc<T> for QuotientArc<T> {
    fn name(&self) -> &str {
        "Quotient"
    }

    fn watches(&self) -> Vec<Watch> {
        [
            self.x.watch(DomainEvents::BOUNDS),
            self.y.watch(DomainEvents::ANY),
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

        if context.strength() == AlgorithmStrength::ArcConsistency {
            self.y.remove_value(context, zero, name)?;
        }

        let (x_min, x_max) = (self.x.min(context), self.x.max(context));
        let (y_min, y_max) = (self.y.min(context), self.y.max(context));
        let divisor_zero_excluded = !self.y.contains(context, zero);

        let quotient = interval_ops::div_bounds(
            x_min,
            x_max,
            y_min,
            y_max,
            divisor_zero_excluded,
            tolerance,
        );
        if let Some((lo, hi)) = quotient {
            tighten_target(context, self.z, self.op, lo, hi, name)?;
        }

        let range = entailed_range(
            self.op,
            self.z.min(context),
            self.z.max(context),
            tolerance,
        );
        if let (Some(z_min), Some(z_max)) = (range.lower, range.upper) {
            // x = z * y.
            let (lo, hi) = interval_ops::mul_bounds(z_min, z_max, y_min, y_max);
            self.x.set_min(context, lo, name)?;
            self.x.set_max(context, hi, name)?;

            // y = x / z, when the quotient range is sign-determined.
            let target_zero_excluded = !self.z.contains(context, zero);
            let bounds = interval_ops::div_bounds(
                x_min,
                x_max,
                z_min,
                z_max,
                target_zero_excluded,
                tolerance,
            );
            if let Some((lo, hi)) = bounds {
                self.y.set_min(context, lo, name)?;
                self.y.set_max(context, hi, name)?;
            }
        }
        Ok(())
    }
}
