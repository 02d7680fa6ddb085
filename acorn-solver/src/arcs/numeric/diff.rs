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

/// An arc maintaining `x - y op z`.
#[derive(Debug)]
pub struct DiffArc<T> {
    x: NumOperand<T>,
    y: NumOperand<T>,
    op: ArcOperator,
    z: NumOperand<T>,
}

impl<T: DomainValue> DiffArc<T> {
    pub fn new(x: NumOperand<T>, y: NumOperand<T>, op: ArcOperator, z: NumOperand<T>) -> Self {
        DiffArc { x, y, op, z }
    }
}

impl<T: DomainValue> Arc<T> for DiffArc<T> {
    fn name(&self) -> &str {
        "Diff"
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

        let (lo, hi) = interval_ops::sub_bounds(x_min, x_max, y_min, y_max);
        tighten_target(context, self.z, self.op, lo, hi, name)?;

        let range = entailed_range(
            self.op,
            self.z.min(context),
            self.z.max(context),
            context.tolerance(),
        );
        if let Some(lower) = range.lower {
            // x - y >= lower: x >= lower + y_min, y <= x_max - lower.
            self.x.set_min(context, lower.add_sat(y_min), name)?;
            self.y.set_max(context, x_max.sub_sat(lower), name)?;
        }
        if let Some(upper) = range.upper {
            // x - y <= upper: x <= upper + y_max, y >= x_min - upper.
            self.x.set_max(context, upper.add_sat(y_max), name)?;
            self.y.set_min(context, x_min.sub_sat(upper), name)?;
        }
        Ok(())
    }
}
