use enumset::EnumSet;

use super::DomainEvent;
use super::DomainValue;
use super::EnumeratedDomain;
use super::IntervalDomain;
use crate::basic_types::EmptyDomain;

/// A scalar domain: either an interval or an enumerated set of values. Arcs
/// are written against this shared API; only value-level (arc-consistency
/// strength) pruning inspects the representation through [`Domain::values`].
#[derive(Debug, Clone, PartialEq)]
pub enum Domain<T> {
    Interval(IntervalDomain<T>),
    Enumerated(EnumeratedDomain<T>),
}

impl<T: DomainValue> Domain<T> {
    pub fn interval(min: T, max: T, tolerance: T) -> Self {
        Domain::Interval(IntervalDomain::new(min, max, tolerance))
    }

    pub fn enumerated(values: Vec<T>, tolerance: T) -> Self {
        Domain::Enumerated(EnumeratedDomain::new(values, tolerance))
    }

    pub fn min(&self) -> T {
        match self {
            Domain::Interval(domain) => domain.min(),
            Domain::Enumerated(domain) => domain.min(),
        }
    }

    pub fn max(&self) -> T {
        match self {
            Domain::Interval(domain) => domain.max(),
            Domain::Enumerated(domain) => domain.max(),
        }
    }

    pub fn tolerance(&self) -> T {
        match self {
            Domain::Interval(domain) => domain.tolerance(),
            Domain::Enumerated(domain) => domain.tolerance(),
        }
    }

    pub fn is_bound(&self) -> bool {
        match self {
            Domain::Interval(domain) => domain.is_bound(),
            Domain::Enumerated(domain) => domain.is_bound(),
        }
    }

    pub fn contains(&self, value: T) -> bool {
        match self {
            Domain::Interval(domain) => domain.contains(value),
            Domain::Enumerated(domain) => domain.contains(value),
        }
    }

    /// The number of remaining values, when countable.
    pub fn size_hint(&self) -> Option<u64> {
        match self {
            Domain::Interval(domain) => domain.size_hint(),
            Domain::Enumerated(domain) => Some(domain.size() as u64),
        }
    }

    /// The explicit value set, for enumerated domains only.
    pub fn values(&self) -> Option<&[T]> {
        match self {
            Domain::Interval(_) => None,
            Domain::Enumerated(domain) => Some(domain.values()),
        }
    }

    pub fn set_min(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        match self {
            Domain::Interval(domain) => domain.set_min(value),
            Domain::Enumerated(domain) => domain.set_min(value),
        }
    }

    pub fn set_max(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        match self {
            Domain::Interval(domain) => domain.set_max(value),
            Domain::Enumerated(domain) => domain.set_max(value),
        }
    }

    pub fn assign(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        match self {
            Domain::Interval(domain) => domain.assign(value),
            Domain::Enumerated(domain) => domain.assign(value),
        }
    }

    pub fn remove_value(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        match self {
            Domain::Interval(domain) => domain.remove_value(value),
            Domain::Enumerated(domain) => domain.remove_value(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_representations_share_the_contract() {
        let mut interval: Domain<i32> = Domain::interval(0, 5, 0);
        let mut enumerated: Domain<i32> = Domain::enumerated((0..=5).collect(), 0);

        for domain in [&mut interval, &mut enumerated] {
            let _ = domain.set_min(2).expect("non-empty");
            let _ = domain.set_max(4).expect("non-empty");
            assert_eq!(domain.min(), 2);
            assert_eq!(domain.max(), 4);
            assert_eq!(domain.size_hint(), Some(3));
        }

        assert!(interval.values().is_none());
        assert_eq!(enumerated.values(), Some([2, 3, 4].as_slice()));
    }
}
