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

/// An arc maintaining `x * y op z`.
///
/// The forward direction uses the four-endpoint sign algebra. The backward
/// direction divides the target range by the co-factor; a co-factor interval
/// spanning zero admits every value for the other factor, so no bound is
/// inferred in that case.
#[derive(Debug)]
pub struct ProductArc<T> {
    x: NumOperand<T>,
    y: NumOperand<T>,
    op: ArcOperator,
    z: NumOperand<T>,
}

impl<T: DomainValue> ProductArc<T> {
    pub fn new(x: NumOperand<T>, y: NumOperand<T>, op: ArcOperator, z: NumOperand<T>) -> Self {
        ProductArc { x, y, op, z }
    }

    /// Tightens `factor` towards `target_range / co_factor`, when the
    /// division admits an inference.
    fn tighten_factor(
        &self,
        context: &mut PropagationContext<'_, T>,
        factor: NumOperand<T>,
        co_factor: NumOperand<T>,
        z_min: T,
        z_max: T,
    ) -> PropagationStatus {
        let tolerance = context.tolerance();
        let zero_excluded = !co_factor.contains(context, T::zero());
        let bounds = interval_ops::div_bounds(
            z_min,
            z_max,
            co_factor.min(context),
            co_factor.max(context),
            zero_excluded,
            tolerance,
        );
        if let Some((lo, hi)) = bounds {
            let name = Arc::<T>::name(self);
            factor.set_min(context, lo, name)?;
            factor.set_max(context, hi, name)?;
        }
        Ok(())
    }
}

impl<T: DomainValue> Arc<T> for ProductArc<T> {
    fn name(&self) -> &str {
        "Product"
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

        let (lo, hi) = interval_ops::mul_bounds(x_min, x_max, y_min, y_max);
        tighten_target(context, self.z, self.op, lo, hi, name)?;

        // Backward inference needs the full target range; one-sided relations
        // leave the factors untouched.
        let range = entailed_range(
            self.op,
            self.z.min(context),
            self.z.max(context),
            context.tolerance(),
        );
        if let (Some(z_min), Some(z_max)) = (range.lower, range.upper) {
            self.tighten_factor(context, self.x, self.y, z_min, z_max)?;
            self.tighten_factor(context, self.y, self.x, z_min, z_max)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_engine::TestEngine;

    #[test]
    fn forward_bounds_use_the_sign_algebra() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(-3, 2);
        let y = engine.new_variable(-4, 5);
        let z = engine.new_variable(-1000, 1000);
        let _ = engine.add_arc(ProductArc::new(
            NumOperand::Node(x),
            NumOperand::Node(y),
            ArcOperator::Eq,
            NumOperand::Node(z),
        ));

        engine.propagate().expect("no empty domains");

        // Products of the endpoints: 12, -15, -8, 10.
        assert_eq!(engine.lower_bound(z), -15);
        assert_eq!(engine.upper_bound(z), 12);
    }

    #[test]
    fn backward_division_tightens_a_sign_fixed_factor() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(-100, 100);
        let y = engine.new_variable(2, 4);
        let _ = engine.add_arc(ProductArc::new(
            NumOperand::Node(x),
            NumOperand::Node(y),
            ArcOperator::Eq,
            NumOperand::Const(12),
        ));

        engine.propagate().expect("no empty domains");

        // x = 12 / y with y in [2, 4]: x in [3, 6].
        assert_eq!(engine.lower_bound(x), 3);
        assert_eq!(engine.upper_bound(x), 6);
    }

    #[test]
    fn zero_crossing_factor_yields_no_inference() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_variable(-6, 2);
        let b = engine.new_variable(-100, 100);
        let c = engine.new_variable(12, 18);
        let _ = engine.add_arc(ProductArc::new(
            NumOperand::Node(a),
            NumOperand::Node(b),
            ArcOperator::Leq,
            NumOperand::Node(c),
        ));

        engine.propagate().expect("no empty domains");

        // a spans zero, so no bound on b can be justified.
        assert_eq!(engine.lower_bound(b), -100);
        assert_eq!(engine.upper_bound(b), 100);
    }
}
