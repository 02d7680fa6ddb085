use super::entailed_range;
use super::tighten_target;
use super::NumOperand;
use crate::arcs::Arc;
use crate::arcs::ArcOperator;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::interval_ops;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;

/// An arc maintaining `x + y op z`.
#[derive(Debug)]
pub struct SumArc<T> {
    x: NumOperand<T>,
    y: NumOperand<T>,
    op: ArcOperator,
    z: NumOperand<T>,
}

impl<T: DomainValue> SumArc<T> {
    pub fn new(x: NumOperand<T>, y: NumOperand<T>, op: ArcOperator, z: NumOperand<T>) -> Self {
        SumArc { x, y, op, z }
    }
}

impl<T: DomainValue> Arc<T> for SumArc<T> {
    fn name(&self) -> &str {
        "Sum"
    }

    fn watches(&self) -> Vec<Watch> {
        [
            self.x.watch(DomainEvents::BOUNDS),
            self.y.watch(DomainEvents::BOUNDS),
            self.z.watch(DomainEvents::BOUNDS),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        let name = Arc::<T>::name(self);
        let (x_min, x_max) = (self.x.min(context), self.x.max(context));
        let (y_min, y_max) = (self.y.min(context), self.y.max(context));

        let (lo, hi) = interval_ops::add_bounds(x_min, x_max, y_min, y_max);
        tighten_target(context, self.z, self.op, lo, hi, name)?;

        // The range the relation imposes on x + y, from z's side.
        let range = entailed_range(
            self.op,
            self.z.min(context),
            self.z.max(context),
            context.tolerance(),
        );
        if let Some(lower) = range.lower {
            // x >= lower - y_max, y >= lower - x_max.
            self.x.set_min(context, lower.sub_sat(y_max), name)?;
            self.y.set_min(context, lower.sub_sat(x_max), name)?;
        }
        if let Some(upper) = range.upper {
            self.x.set_max(context, upper.sub_sat(y_min), name)?;
            self.y.set_max(context, upper.sub_sat(x_min), name)?;
        }
        Ok(())
    }
}
