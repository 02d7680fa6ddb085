use super::entailed_range;
use super::NumOperand;
use crate::algorithms::AlgorithmStrength;
use crate::arcs::Arc;
use crate::arcs::ArcOperator;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;

/// An arc maintaining `x op y` directly between two operands.
///
/// Bounds are tightened for every operator; at
/// [`AlgorithmStrength::ArcConsistency`] enumerated operands of an `Eq`
/// relation are additionally pruned value by value, so each remaining value
/// keeps a support on the other side.
#[derive(Debug)]
pub struct BinaryRelationArc<T> {
    x: NumOperand<T>,
    op: ArcOperator,
    y: NumOperand<T>,
}

impl<T: DomainValue> BinaryRelationArc<T> {
    pub fn new(x: NumOperand<T>, op: ArcOperator, y: NumOperand<T>) -> Self {
        BinaryRelationArc { x, op, y }
    }

    fn apply_bounds(
        &self,
        context: &mut PropagationContext<'_, T>,
        operand: NumOperand<T>,
        op: ArcOperator,
        other_min: T,
        other_max: T,
    ) -> PropagationStatus {
        let name = Arc::<T>::name(self);
        let range = entailed_range(op, other_min, other_max, context.tolerance());
        if let Some(lower) = range.lower {
            operand.set_min(context, lower, name)?;
        }
        if let Some(upper) = range.upper {
            operand.set_max(context, upper, name)?;
        }
        Ok(())
    }

    fn prune_values(&self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        let name = Arc::<T>::name(self);
        for (operand, other) in [(self.x, self.y), (self.y, self.x)] {
            let Some(values) = operand.enumerated_values(context) else {
                continue;
            };
            for value in values {
                if !other.contains(context, value) {
                    operand.remove_value(context, value, name)?;
                }
            }
        }
        Ok(())
    }
}

impl<T: DomainValue> Arc<T> for BinaryRelationArc<T> {
    fn name(&self) -> &str {
        match self.op {
            ArcOperator::Eq => "RelationEq",
            ArcOperator::Lt => "RelationLt",
            ArcOperator::Leq => "RelationLeq",
            ArcOperator::Gt => "RelationGt",
            ArcOperator::Geq => "RelationGeq",
            ArcOperator::Neq => "RelationNeq",
        }
    }

    fn watches(&self) -> Vec<Watch> {
        let events = match self.op {
            ArcOperator::Eq | ArcOperator::Neq => DomainEvents::ANY,
            _ => DomainEvents::BOUNDS,
        };
        [self.x.watch(events), self.y.watch(events)]
            .into_iter()
            .flatten()
            .collect()
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        let (x_min, x_max) = (self.x.min(context), self.x.max(context));
        let (y_min, y_max) = (self.y.min(context), self.y.max(context));

        self.apply_bounds(context, self.x, self.op, y_min, y_max)?;
        self.apply_bounds(context, self.y, self.op.flip(), x_min, x_max)?;

        if self.op == ArcOperator::Neq {
            let name = Arc::<T>::name(self);
            if self.y.is_bound(context) {
                self.x.remove_value(context, self.y.min(context), name)?;
            }
            if self.x.is_bound(context) {
                self.y.remove_value(context, self.x.min(context), name)?;
            }
        }

        if self.op == ArcOperator::Eq
            && context.strength() == AlgorithmStrength::ArcConsistency
        {
            self.prune_values(context)?;
        }

        Ok(())
    }
}
