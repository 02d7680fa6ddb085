use std::cmp::Ordering;

use enumset::EnumSet;

use super::DomainEvent;
use super::DomainValue;
use crate::acorn_assert_simple;
use crate::basic_types::EmptyDomain;

/// An interval domain: the set of values between `min` and `max` inclusive.
///
/// The invariant `min <= max` holds at all times; a mutation that would break
/// it reports [`EmptyDomain`] and leaves the previous bounds in place, so a
/// failing arc never leaves a corrupted domain behind.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalDomain<T> {
    min: T,
    max: T,
    tolerance: T,
}

impl<T: DomainValue> IntervalDomain<T> {
    pub fn new(min: T, max: T, tolerance: T) -> Self {
        acorn_assert_simple!(
            min.leq_within(max, tolerance),
            "interval domain constructed with min above max"
        );
        IntervalDomain { min, max, tolerance }
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    pub fn is_bound(&self) -> bool {
        self.min.eq_within(self.max, self.tolerance)
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.leq_within(value, self.tolerance) && value.leq_within(self.max, self.tolerance)
    }

    /// The number of values for integral types; `None` for fractional types.
    pub fn size_hint(&self) -> Option<u64> {
        if T::INTEGRAL {
            Some((self.max.to_f64() - self.min.to_f64()) as u64 + 1)
        } else {
            None
        }
    }

    pub fn set_min(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        if value.leq_within(self.min, self.tolerance) {
            return Ok(EnumSet::empty());
        }
        if self.max.lt_within(value, self.tolerance) {
            return Err(EmptyDomain);
        }

        // Within tolerance of max the bound is clamped so that min <= max
        // stays true in the total order as well.
        self.min = if self.max.total_cmp(value) == Ordering::Less {
            self.max
        } else {
            value
        };

        let mut events = EnumSet::only(DomainEvent::LowerBound);
        if self.is_bound() {
            events |= DomainEvent::Assign;
        }
        Ok(events)
    }

    pub fn set_max(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        if self.max.leq_within(value, self.tolerance) {
            return Ok(EnumSet::empty());
        }
        if value.lt_within(self.min, self.tolerance) {
            return Err(EmptyDomain);
        }

        self.max = if value.total_cmp(self.min) == Ordering::Less {
            self.min
        } else {
            value
        };

        let mut events = EnumSet::only(DomainEvent::UpperBound);
        if self.is_bound() {
            events |= DomainEvent::Assign;
        }
        Ok(events)
    }

    pub fn assign(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        if !self.contains(value) {
            return Err(EmptyDomain);
        }
        let mut events = self.set_min(value)?;
        events |= self.set_max(value)?;
        if !events.is_empty() {
            events |= DomainEvent::Assign;
        }
        Ok(events)
    }

    /// Removing a value from an interval is only effective at an endpoint;
    /// interior removals cannot be represented and are ignored.
    pub fn remove_value(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        if !self.contains(value) {
            return Ok(EnumSet::empty());
        }
        if self.is_bound() {
            return Err(EmptyDomain);
        }
        if value.eq_within(self.min, self.tolerance) {
            let events = self.set_min(self.min.succ(self.tolerance))?;
            return Ok(events | DomainEvent::Removal);
        }
        if value.eq_within(self.max, self.tolerance) {
            let events = self.set_max(self.max.pred(self.tolerance))?;
            return Ok(events | DomainEvent::Removal);
        }
        Ok(EnumSet::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_tighten_monotonically() {
        let mut domain = IntervalDomain::new(0, 10, 0);

        let events = domain.set_min(3).expect("non-empty");
        assert_eq!(events, EnumSet::only(DomainEvent::LowerBound));
        assert_eq!(domain.min(), 3);

        // A weaker bound is a no-op.
        let events = domain.set_min(1).expect("non-empty");
        assert!(events.is_empty());
        assert_eq!(domain.min(), 3);

        let events = domain.set_max(3).expect("non-empty");
        assert!(events.contains(DomainEvent::UpperBound));
        assert!(events.contains(DomainEvent::Assign));
        assert!(domain.is_bound());
    }

    #[test]
    fn crossing_bounds_is_infeasible() {
        let mut domain = IntervalDomain::new(0, 10, 0);
        assert_eq!(domain.set_min(11), Err(EmptyDomain));
        // Bounds untouched after the failed mutation.
        assert_eq!(domain.min(), 0);
        assert_eq!(domain.max(), 10);
    }

    #[test]
    fn endpoint_removal_shrinks_interior_removal_is_ignored() {
        let mut domain = IntervalDomain::new(0, 10, 0);

        let events = domain.remove_value(0).expect("non-empty");
        assert!(events.contains(DomainEvent::Removal));
        assert!(events.contains(DomainEvent::LowerBound));
        assert_eq!(domain.min(), 1);

        let events = domain.remove_value(5).expect("non-empty");
        assert!(events.is_empty());
        assert!(domain.contains(5));
    }

    #[test]
    fn removing_the_only_value_fails() {
        let mut domain = IntervalDomain::new(4, 4, 0);
        assert_eq!(domain.remove_value(4), Err(EmptyDomain));
    }

    #[test]
    fn fractional_bounds_respect_tolerance() {
        let mut domain = IntervalDomain::new(0.0_f64, 1.0, 1e-9);
        // A tightening below the tolerance is treated as a no-op.
        let events = domain.set_min(1e-12).expect("non-empty");
        assert!(events.is_empty());

        let events = domain.set_min(0.5).expect("non-empty");
        assert!(events.contains(DomainEvent::LowerBound));
        assert!(domain.contains(0.5 - 1e-12));
    }

    #[test]
    fn size_hint_counts_integral_values() {
        assert_eq!(IntervalDomain::new(-2, 2, 0).size_hint(), Some(5));
        assert_eq!(IntervalDomain::new(0.0_f64, 1.0, 1e-9).size_hint(), None);
    }
}
