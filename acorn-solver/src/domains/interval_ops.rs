//! Interval arithmetic over possibly-mixed-sign ranges. These helpers are the
//! delicate core of the numeric arcs: product and quotient bounds are computed
//! by evaluating the operator at all sign combinations of the endpoints,
//! except when a zero-crossing interval makes any bound unsound, in which case
//! no inference is reported at all.

use itertools::Itertools;
use itertools::MinMaxResult;

use super::DomainValue;

pub(crate) fn add_bounds<T: DomainValue>(x_min: T, x_max: T, y_min: T, y_max: T) -> (T, T) {
    (x_min.add_sat(y_min), x_max.add_sat(y_max))
}

pub(crate) fn sub_bounds<T: DomainValue>(x_min: T, x_max: T, y_min: T, y_max: T) -> (T, T) {
    (x_min.sub_sat(y_max), x_max.sub_sat(y_min))
}

/// Bounds of `x * y` over the interval endpoints.
pub(crate) fn mul_bounds<T: DomainValue>(x_min: T, x_max: T, y_min: T, y_max: T) -> (T, T) {
    let products = [
        x_min.mul_sat(y_min),
        x_min.mul_sat(y_max),
        x_max.mul_sat(y_min),
        x_max.mul_sat(y_max),
    ];
    minmax(products)
}

/// Bounds of `n / d` for `n ∈ [n_min, n_max]` and `d ∈ [d_min, d_max]`.
///
/// Returns `None` when no bound can be inferred: a divisor interval containing
/// zero admits arbitrarily large quotients. When `zero_excluded` states that
/// zero itself is not in the divisor domain (e.g. it was removed from an
/// enumerated domain), the interval is split into its sign segments and the
/// endpoint quotients of both segments are combined.
pub(crate) fn div_bounds<T: DomainValue>(
    n_min: T,
    n_max: T,
    d_min: T,
    d_max: T,
    zero_excluded: bool,
    tolerance: T,
) -> Option<(T, T)> {
    let zero = T::zero();
    let contains_zero =
        d_min.leq_within(zero, tolerance) && zero.leq_within(d_max, tolerance);

    if !contains_zero {
        let quotients = [
            (n_min, d_min),
            (n_min, d_max),
            (n_max, d_min),
            (n_max, d_max),
        ];
        let lower = quotients
            .iter()
            .map(|&(n, d)| n.div_down(d))
            .fold(T::max_value(), T::min_by_order);
        let upper = quotients
            .iter()
            .map(|&(n, d)| n.div_up(d))
            .fold(T::min_value(), T::max_by_order);
        return Some((lower, upper));
    }

    if !zero_excluded {
        return None;
    }

    // Zero is a hole in the divisor domain: divide per sign segment. The unit
    // is the closest-to-zero value the divisor can still take.
    let unit = zero.succ(tolerance);
    let mut lower = None;
    let mut upper = None;
    let mut divide_segment = |segment_min: T, segment_max: T| {
        for d in [segment_min, segment_max] {
            for n in [n_min, n_max] {
                let low = n.div_down(d);
                let high = n.div_up(d);
                lower = Some(lower.map_or(low, |l: T| l.min_by_order(low)));
                upper = Some(upper.map_or(high, |u: T| u.max_by_order(high)));
            }
        }
    };

    if d_min.lt_within(zero, tolerance) {
        divide_segment(d_min, d_max.min_by_order(unit.neg_sat()));
    }
    if zero.lt_within(d_max, tolerance) {
        divide_segment(d_min.max_by_order(unit), d_max);
    }

    match (lower, upper) {
        (Some(lower), Some(upper)) => Some((lower, upper)),
        _ => None,
    }
}

pub(crate) fn minmax<T: DomainValue>(values: impl IntoIterator<Item = T>) -> (T, T) {
    match values
        .into_iter()
        .minmax_by(|a, b| a.total_cmp(*b))
    {
        MinMaxResult::MinMax(lower, upper) => (lower, upper),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::NoElements => {
            unreachable!("interval bound computation over no candidates")
        }
    }
}
