use super::entailed_range;
use crate::arcs::Arc;
use crate::arcs::ArcOperator;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::nodes::NodeId;

/// An n-ary arc maintaining `Σ aᵢ·xᵢ op c`.
///
/// Each term is tightened against the slack left by the extreme contributions
/// of all other terms. Zero coefficients are inert.
#[derive(Debug)]
pub struct LinearArc<T> {
    terms: Box<[(T, NodeId)]>,
    op: ArcOperator,
    rhs: T,
}

impl<T: DomainValue> LinearArc<T> {
    pub fn new(terms: impl Into<Box<[(T, NodeId)]>>, op: ArcOperator, rhs: T) -> Self {
        LinearArc {
            terms: terms.into(),
            op,
            rhs,
        }
    }

    /// The contribution range of one term, `a * x` over the current domain of
    /// `x`.
    fn contribution(
        &self,
        context: &PropagationContext<'_, T>,
        coefficient: T,
        node: NodeId,
    ) -> (T, T) {
        let lo = coefficient.mul_sat(context.min(node));
        let hi = coefficient.mul_sat(context.max(node));
        (lo.min_by_order(hi), lo.max_by_order(hi))
    }

    /// Tightens `a * x <= bound` back onto `x`.
    fn limit_above(
        &self,
        context: &mut PropagationContext<'_, T>,
        coefficient: T,
        node: NodeId,
        bound: T,
    ) -> PropagationStatus {
        let zero = T::zero();
        if zero.lt_within(coefficient, context.tolerance()) {
            context.set_max(node, bound.div_down(coefficient))
        } else {
            context.set_min(node, bound.div_up(coefficient))
        }
    }

    /// Tightens `a * x >= bound` back onto `x`.
    fn limit_below(
        &self,
        context: &mut PropagationContext<'_, T>,
        coefficient: T,
        node: NodeId,
        bound: T,
    ) -> PropagationStatus {
        let zero = T::zero();
        if zero.lt_within(coefficient, context.tolerance()) {
            context.set_min(node, bound.div_up(coefficient))
        } else {
            context.set_max(node, bound.div_down(coefficient))
        }
    }
}

impl<T: DomainValue> Arc<T> for LinearArc<T> {
    fn name(&self) -> &str {
        "Linear"
    }

    fn watches(&self) -> Vec<Watch> {
        self.terms
            .iter()
            .map(|&(_, node)| Watch::Scalar(node, DomainEvents::BOUNDS))
            .collect()
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        let name = Arc::<T>::name(self);
        let zero = T::zero();
        let tolerance = context.tolerance();

        let mut sum_min = zero;
        let mut sum_max = zero;
        for &(coefficient, node) in self.terms.iter() {
            let (lo, hi) = self.contribution(context, coefficient, node);
            sum_min = sum_min.add_sat(lo);
            sum_max = sum_max.add_sat(hi);
        }

        if self.op == ArcOperator::Neq {
            if sum_min.eq_within(sum_max, tolerance) && sum_min.eq_within(self.rhs, tolerance) {
                return Err(PropagationFailure::for_variable(name));
            }
            return Ok(());
        }

        let range = entailed_range(self.op, self.rhs, self.rhs, tolerance);
        for &(coefficient, node) in self.terms.iter() {
            if coefficient.eq_within(zero, tolerance) {
                continue;
            }
            let (lo, hi) = self.contribution(context, coefficient, node);
            if let Some(upper) = range.upper {
                // The slack the other terms leave at their minima.
                let bound = upper.sub_sat(sum_min.sub_sat(lo));
                self.limit_above(context, coefficient, node, bound)?;
            }
            if let Some(lower) = range.lower {
                let bound = lower.sub_sat(sum_max.sub_sat(hi));
                self.limit_below(context, coefficient, node, bound)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_engine::TestEngine;

    #[test]
    fn slack_limits_each_term() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(0, 10);
        let y = engine.new_variable(0, 10);
        // 2x + 3y <= 12
        let _ = engine.add_arc(LinearArc::new(vec![(2, x), (3, y)], ArcOperator::Leq, 12));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.upper_bound(x), 6);
        assert_eq!(engine.upper_bound(y), 4);
    }

    #[test]
    fn equality_tightens_both_directions() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(0, 100);
        let y = engine.new_variable(1, 3);
        // x + 2y = 10
        let _ = engine.add_arc(LinearArc::new(vec![(1, x), (2, y)], ArcOperator::Eq, 10));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.lower_bound(x), 4);
        assert_eq!(engine.upper_bound(x), 8);
    }

    #[test]
    fn negative_coefficients_flip_the_bound() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(-10, 10);
        // -2x <= 6, so x >= -3.
        let _ = engine.add_arc(LinearArc::new(vec![(-2, x)], ArcOperator::Leq, 6));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.lower_bound(x), -3);
    }

    #[test]
    fn fixed_sum_equal_to_the_forbidden_value_fails() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(2, 2);
        let y = engine.new_variable(3, 3);
        let _ = engine.add_arc(LinearArc::new(vec![(1, x), (1, y)], ArcOperator::Neq, 5));

        assert!(engine.propagate().is_err());
    }
}
