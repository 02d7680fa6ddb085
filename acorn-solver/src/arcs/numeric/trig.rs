use std::f64::consts::FRAC_PI_2;
use std::f64::consts::PI;
use std::f64::consts::TAU;

use super::entailed_range;
use super::tighten_target;
use super::NumOperand;
use crate::arcs::Arc;
use crate::arcs::ArcOperator;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;

/// Slack for segment-membership tests on the argument, in radians.
const SEGMENT_SLACK: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFunction {
    Sin,
    Cos,
    Tan,
}

/// An arc maintaining `f(x) op z` for a trigonometric `f`, evaluated through
/// `f64`.
///
/// Argument ranges spanning a full period collapse the image to the
/// function's full range. The inverse direction is restricted to the
/// principal branch and only applies when the whole argument range lies
/// within one monotonic segment.
#[derive(Debug)]
pub struct TrigArc<T> {
    function: TrigFunction,
    x: NumOperand<T>,
    op: ArcOperator,
    z: NumOperand<T>,
}

impl<T: DomainValue> TrigArc<T> {
    /// Only fractional value types can carry trigonometric images.
    pub fn new(
        function: TrigFunction,
        x: NumOperand<T>,
        op: ArcOperator,
        z: NumOperand<T>,
    ) -> Result<Self, ConstraintOperationError> {
        if T::INTEGRAL {
            return Err(ConstraintOperationError::UnsupportedOperation(
                "trigonometric arcs require a fractional value type",
            ));
        }
        Ok(TrigArc { function, x, op, z })
    }

    /// The image of `[a, b]` under the function, `None` when an asymptote of
    /// `tan` lies inside the range.
    fn image(&self, a: f64, b: f64) -> Option<(f64, f64)> {
        trig_image(self.function, a, b)
    }

    /// The preimage of `[lo, hi]` (already clamped to the function's range)
    /// when `[a, b]` sits inside one monotonic segment, `None` when the
    /// branch cannot be restricted.
    fn preimage(&self, a: f64, b: f64, lo: f64, hi: f64) -> Option<(f64, f64)> {
        match self.function {
            TrigFunction::Sin => {
                let k = ((a + FRAC_PI_2) / PI).floor();
                if b > FRAC_PI_2 + k * PI + SEGMENT_SLACK {
                    return None;
                }
                let shift = k * PI;
                if (k as i64) % 2 == 0 {
                    Some((shift + lo.asin(), shift + hi.asin()))
                } else {
                    Some((shift - hi.asin(), shift - lo.asin()))
                }
            }
            TrigFunction::Cos => {
                let k = (a / PI).floor();
                if b > (k + 1.0) * PI + SEGMENT_SLACK {
                    return None;
                }
                let shift = k * PI;
                if (k as i64) % 2 == 0 {
                    Some((shift + hi.acos(), shift + lo.acos()))
                } else {
                    Some((shift + (-lo).acos(), shift + (-hi).acos()))
                }
            }
            TrigFunction::Tan => {
                let k = ((a + FRAC_PI_2) / PI).floor();
                if b > FRAC_PI_2 + k * PI - SEGMENT_SLACK {
                    return None;
                }
                let shift = k * PI;
                Some((shift + lo.atan(), shift + hi.atan()))
            }
        }
    }
}

/// The image of `[a, b]` under a trigonometric function, `None` when an
/// asymptote of `tan` lies inside the range.
pub(crate) fn trig_image(function: TrigFunction, a: f64, b: f64) -> Option<(f64, f64)> {
    match function {
        TrigFunction::Sin => {
            if b - a >= TAU {
                return Some((-1.0, 1.0));
            }
            let lo = if crosses(a, b, -FRAC_PI_2, TAU) {
                -1.0
            } else {
                a.sin().min(b.sin())
            };
            let hi = if crosses(a, b, FRAC_PI_2, TAU) {
                1.0
            } else {
                a.sin().max(b.sin())
            };
            Some((lo, hi))
        }
        TrigFunction::Cos => {
            if b - a >= TAU {
                return Some((-1.0, 1.0));
            }
            let lo = if crosses(a, b, PI, TAU) {
                -1.0
            } else {
                a.cos().min(b.cos())
            };
            let hi = if crosses(a, b, 0.0, TAU) {
                1.0
            } else {
                a.cos().max(b.cos())
            };
            Some((lo, hi))
        }
        TrigFunction::Tan => {
            if crosses(a, b, FRAC_PI_2, PI) {
                None
            } else {
                Some((a.tan(), b.tan()))
            }
        }
    }
}

/// Whether some `offset + k * period` lies within `[a, b]`.
fn crosses(a: f64, b: f64, offset: f64, period: f64) -> bool {
    let k = ((a - offset) / period).ceil();
    offset + k * period <= b
}

impl<T: DomainValue> Arc<T> for TrigArc<T> {
    fn name(&self) -> &str {
        match self.function {
            TrigFunction::Sin => "Sin",
            TrigFunction::Cos => "Cos",
            TrigFunction::Tan => "Tan",
        }
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
        let a = self.x.min(context).to_f64();
        let b = self.x.max(context).to_f64();

        if let Some((lo, hi)) = self.image(a, b) {
            tighten_target(
                context,
                self.z,
                self.op,
                T::from_f64_down(lo),
                T::from_f64_up(hi),
                name,
            )?;
        }

        let range = entailed_range(
            self.op,
            self.z.min(context),
            self.z.max(context),
            context.tolerance(),
        );
        if let (Some(lower), Some(upper)) = (range.lower, range.upper) {
            let mut lo = lower.to_f64();
            let mut hi = upper.to_f64();
            if self.function != TrigFunction::Tan {
                if lo > 1.0 || hi < -1.0 {
                    return Err(PropagationFailure::for_variable(name));
                }
                lo = lo.max(-1.0);
                hi = hi.min(1.0);
            }
            if let Some((lo, hi)) = self.preimage(a, b, lo, hi) {
                self.x.set_min(context, T::from_f64_down(lo), name)?;
                self.x.set_max(context, T::from_f64_up(hi), name)?;
            }
        }
        Ok(())
    }
}
