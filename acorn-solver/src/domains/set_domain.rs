use enumset::EnumSet;

use super::sorted_values;
use super::DomainValue;
use super::SetDomainEvent;
use crate::acorn_assert_moderate;
use crate::basic_types::EmptyDomain;

/// A set domain: a pair of bounds on a set-valued variable. The `required`
/// set holds values that must be in the set, the `possible` set holds values
/// that may still be in it. The invariant `required ⊆ possible` holds at all
/// times; requiring a non-possible value or excluding a required value is the
/// set-world empty-domain signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SetDomain<T> {
    required: Vec<T>,
    possible: Vec<T>,
    tolerance: T,
}

impl<T: DomainValue> SetDomain<T> {
    pub fn new(possible: Vec<T>, tolerance: T) -> Self {
        SetDomain {
            required: Vec::new(),
            possible: sorted_values::normalise(possible, tolerance),
            tolerance,
        }
    }

    pub fn is_possible(&self, value: T) -> bool {
        sorted_values::contains(&self.possible, value, self.tolerance)
    }

    pub fn is_required(&self, value: T) -> bool {
        sorted_values::contains(&self.required, value, self.tolerance)
    }

    pub fn possible_values(&self) -> &[T] {
        &self.possible
    }

    pub fn required_values(&self) -> &[T] {
        &self.required
    }

    pub fn possible_size(&self) -> usize {
        self.possible.len()
    }

    pub fn required_size(&self) -> usize {
        self.required.len()
    }

    /// The set variable is determined once every possible value is required.
    pub fn is_bound(&self) -> bool {
        self.required.len() == self.possible.len()
    }

    fn required_within_possible(&self) -> bool {
        self.required
            .iter()
            .all(|&value| sorted_values::contains(&self.possible, value, self.tolerance))
    }

    pub fn require(&mut self, value: T) -> Result<EnumSet<SetDomainEvent>, EmptyDomain> {
        if !self.is_possible(value) {
            return Err(EmptyDomain);
        }
        if !sorted_values::insert(&mut self.required, value, self.tolerance) {
            return Ok(EnumSet::empty());
        }

        acorn_assert_moderate!(
            self.required_within_possible(),
            "required values escaped the possible set"
        );

        let mut events = EnumSet::only(SetDomainEvent::Required);
        if self.is_bound() {
            events |= SetDomainEvent::Assign;
        }
        Ok(events)
    }

    pub fn exclude(&mut self, value: T) -> Result<EnumSet<SetDomainEvent>, EmptyDomain> {
        if self.is_required(value) {
            return Err(EmptyDomain);
        }
        if !sorted_values::remove(&mut self.possible, value, self.tolerance) {
            return Ok(EnumSet::empty());
        }

        acorn_assert_moderate!(
            self.required_within_possible(),
            "required values escaped the possible set"
        );

        let mut events = EnumSet::only(SetDomainEvent::Excluded);
        if self.is_bound() {
            events |= SetDomainEvent::Assign;
        }
        Ok(events)
    }
}
