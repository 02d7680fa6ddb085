use super::entailed_range;
use super::tighten_target;
use super::NumOperand;
use crate::acorn_assert_simple;
use crate::arcs::Arc;
use crate::arcs::ArcOperator;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;

/// An arc maintaining `x^n op z` for a constant integer exponent `n >= 1`.
///
/// Even exponents behave like a composed square: the target is non-negative
/// and the inverse is only transferred when the sign of the base is
/// determined. Odd exponents are monotone and invert directly through the
/// sign-aware root.
#[derive(Debug)]
pub struct PowerArc<T> {
    x: NumOperand<T>,
    exponent: u32,
    op: ArcOperator,
    z: NumOperand<T>,
}

impl<T: DomainValue> PowerArc<T> {
    pub fn new(x: NumOperand<T>, exponent: u32, op: ArcOperator, z: NumOperand<T>) -> Self {
        acorn_assert_simple!(exponent >= 1, "power arcs require a positive exponent");
        PowerArc {
            x,
            exponent,
            op,
            z,
        }
    }

    fn pow(&self, base: T) -> T {
        let mut result = T::one();
        for _ in 0..self.exponent {
            result = result.mul_sat(base);
        }
        result
    }

    fn root_down(&self, value: T) -> T {
        T::from_f64_down(nth_root(value.to_f64(), self.exponent))
    }

    fn root_up(&self, value: T) -> T {
        T::from_f64_up(nth_root(value.to_f64(), self.exponent))
    }
}

/// Sign-aware n-th root. Exact roots are snapped to the nearest integer so
/// that `powf` noise does not widen integer bounds by one.
fn nth_root(value: f64, n: u32) -> f64 {
    let mut magnitude = value.abs().powf(1.0 / f64::from(n));
    let snapped = magnitude.round();
    if (snapped.powi(n as i32) - value.abs()).abs() < 1e-6 {
        magnitude = snapped;
    }
    if value < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

impl<T: DomainValue> Arc<T> for PowerArc<T> {
    fn name(&self) -> &str {
        "Power"
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
        let even = self.exponent % 2 == 0;
        let (x_min, x_max) = (self.x.min(context), self.x.max(context));

        let (lo, hi) = if !even {
            (self.pow(x_min), self.pow(x_max))
        } else if zero.leq_within(x_min, tolerance) {
            (self.pow(x_min), self.pow(x_max))
        } else if x_max.leq_within(zero, tolerance) {
            (self.pow(x_max), self.pow(x_min))
        } else {
            (zero, self.pow(x_min.neg_sat().max_by_order(x_max)))
        };
        tighten_target(context, self.z, self.op, lo, hi, name)?;

        let range = entailed_range(
            self.op,
            self.z.min(context),
            self.z.max(context),
            tolerance,
        );
        if !even {
            if let Some(lower) = range.lower {
                self.x.set_min(context, self.root_down(lower), name)?;
            }
            if let Some(upper) = range.upper {
                self.x.set_max(context, self.root_up(upper), name)?;
            }
            return Ok(());
        }

        if let Some(upper) = range.upper {
            let radius = self.root_up(upper.max_by_order(zero));
            self.x.set_min(context, radius.neg_sat(), name)?;
            self.x.set_max(context, radius, name)?;
        }
        if let Some(lower) = range.lower {
            if zero.lt_within(lower, tolerance) {
                let radius = self.root_down(lower);
                if zero.leq_within(x_min, tolerance) {
                    self.x.set_min(context, radius, name)?;
                } else if x_max.leq_within(zero, tolerance) {
                    self.x.set_max(context, radius.neg_sat(), name)?;
                }
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
    fn even_powers_fold_the_sign() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(-3, 2);
        let z = engine.new_variable(-100, 100);
        let _ = engine.add_arc(PowerArc::new(
            NumOperand::Node(x),
            2,
            ArcOperator::Eq,
            NumOperand::Node(z),
        ));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.lower_bound(z), 0);
        assert_eq!(engine.upper_bound(z), 9);
    }

    #[test]
    fn odd_powers_stay_monotone() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(-2, 3);
        let z = engine.new_variable(-1000, 1000);
        let _ = engine.add_arc(PowerArc::new(
            NumOperand::Node(x),
            3,
            ArcOperator::Eq,
            NumOperand::Node(z),
        ));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.lower_bound(z), -8);
        assert_eq!(engine.upper_bound(z), 27);
    }

    #[test]
    fn odd_inverse_goes_through_the_signed_root() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(-10, 10);
        let _ = engine.add_arc(PowerArc::new(
            NumOperand::Node(x),
            3,
            ArcOperator::Eq,
            NumOperand::Const(-27),
        ));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.lower_bound(x), -3);
        assert_eq!(engine.upper_bound(x), -3);
    }

    #[test]
    fn even_inverse_bounds_the_magnitude() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_variable(-10, 10);
        let _ = engine.add_arc(PowerArc::new(
            NumOperand::Node(x),
            2,
            ArcOperator::Leq,
            NumOperand::Const(16),
        ));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.lower_bound(x), -4);
        assert_eq!(engine.upper_bound(x), 4);
    }
}
