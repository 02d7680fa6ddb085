use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// A change that happened to a scalar domain since it was last drained.
///
/// The accumulated event set is the delta arcs use to decide whether they need
/// to re-propagate.
#[derive(Debug, EnumSetType)]
pub enum DomainEvent {
    /// The minimum increased.
    LowerBound,
    /// The maximum decreased.
    UpperBound,
    /// A value was removed from the domain.
    Removal,
    /// The domain became bound to a single value.
    Assign,
}

/// A subscription mask over [`DomainEvent`]s.
#[derive(Debug, Clone, Copy)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Lower and upper bound tightening, value removal, and assignment.
    pub const ANY: DomainEvents = DomainEvents::from_set(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Removal | DomainEvent::Assign
    ));
    /// Lower and upper bound tightening only.
    pub const BOUNDS: DomainEvents =
        DomainEvents::from_set(enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound));
    /// Lower bound tightening only.
    pub const LOWER_BOUND: DomainEvents = DomainEvents::from_set(enum_set!(DomainEvent::LowerBound));
    /// Upper bound tightening only.
    pub const UPPER_BOUND: DomainEvents = DomainEvents::from_set(enum_set!(DomainEvent::UpperBound));
    /// Assignment to a single value only.
    pub const ASSIGN: DomainEvents = DomainEvents::from_set(enum_set!(DomainEvent::Assign));

    pub(crate) const fn from_set(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub(crate) fn intersects(self, events: EnumSet<DomainEvent>) -> bool {
        !(self.events & events).is_empty()
    }
}

/// A change that happened to a set domain since it was last drained.
#[derive(Debug, EnumSetType)]
pub enum SetDomainEvent {
    /// A value moved into the required set.
    Required,
    /// A value was removed from the possible set.
    Excluded,
    /// The required and possible sets became equal.
    Assign,
}

/// A subscription mask over [`SetDomainEvent`]s.
#[derive(Debug, Clone, Copy)]
pub struct SetDomainEvents {
    events: EnumSet<SetDomainEvent>,
}

impl SetDomainEvents {
    pub const ANY: SetDomainEvents = SetDomainEvents::from_set(enum_set!(
        SetDomainEvent::Required | SetDomainEvent::Excluded | SetDomainEvent::Assign
    ));

    pub(crate) const fn from_set(events: EnumSet<SetDomainEvent>) -> SetDomainEvents {
        SetDomainEvents { events }
    }

    pub(crate) fn intersects(self, events: EnumSet<SetDomainEvent>) -> bool {
        !(self.events & events).is_empty()
    }
}
