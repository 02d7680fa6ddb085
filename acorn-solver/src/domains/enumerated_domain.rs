use enumset::EnumSet;

use super::sorted_values;
use super::DomainEvent;
use super::DomainValue;
use crate::acorn_assert_simple;
use crate::basic_types::EmptyDomain;

/// An enumerated (sparse) domain: an explicit ordered set of remaining
/// values. Used for small discrete domains where interior value removal must
/// be representable.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumeratedDomain<T> {
    values: Vec<T>,
    tolerance: T,
}

impl<T: DomainValue> EnumeratedDomain<T> {
    pub fn new(values: Vec<T>, tolerance: T) -> Self {
        let values = sorted_values::normalise(values, tolerance);
        acorn_assert_simple!(
            !values.is_empty(),
            "enumerated domain constructed without values"
        );
        EnumeratedDomain { values, tolerance }
    }

    pub fn min(&self) -> T {
        self.values[0]
    }

    pub fn max(&self) -> T {
        self.values[self.values.len() - 1]
    }

    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    pub fn is_bound(&self) -> bool {
        self.values.len() == 1
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn contains(&self, value: T) -> bool {
        sorted_values::contains(&self.values, value, self.tolerance)
    }

    pub fn set_min(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let keep_from = self
            .values
            .iter()
            .position(|&v| !v.lt_within(value, self.tolerance));
        let Some(keep_from) = keep_from else {
            return Err(EmptyDomain);
        };
        if keep_from == 0 {
            return Ok(EnumSet::empty());
        }

        let _ = self.values.drain(..keep_from);
        let mut events = EnumSet::only(DomainEvent::LowerBound) | DomainEvent::Removal;
        if self.is_bound() {
            events |= DomainEvent::Assign;
        }
        Ok(events)
    }

    pub fn set_max(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let keep_until = self
            .values
            .iter()
            .rposition(|&v| !value.lt_within(v, self.tolerance));
        let Some(keep_until) = keep_until else {
            return Err(EmptyDomain);
        };
        if keep_until == self.values.len() - 1 {
            return Ok(EnumSet::empty());
        }

        self.values.truncate(keep_until + 1);
        let mut events = EnumSet::only(DomainEvent::UpperBound) | DomainEvent::Removal;
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

    pub fn remove_value(&mut self, value: T) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let Ok(index) = sorted_values::search(&self.values, value, self.tolerance) else {
            return Ok(EnumSet::empty());
        };
        if self.values.len() == 1 {
            return Err(EmptyDomain);
        }

        let _ = self.values.remove(index);
        let mut events = EnumSet::only(DomainEvent::Removal);
        if index == 0 {
            events |= DomainEvent::LowerBound;
        }
        if index == self.values.len() {
            events |= DomainEvent::UpperBound;
        }
        if self.is_bound() {
            events |= DomainEvent::Assign;
        }
        Ok(events)
    }
}
