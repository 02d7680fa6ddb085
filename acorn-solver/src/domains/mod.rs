//! The value containers of the engine: interval and enumerated scalar domains,
//! set domains, and the change events they emit. All mutators are monotonic
//! (domains only ever shrink) and report an [`EmptyDomain`] marker instead of
//! silently clamping when a tightening would leave no values.
//!
//! [`EmptyDomain`]: crate::basic_types::EmptyDomain

mod enumerated_domain;
mod events;
mod interval_domain;
mod scalar_domain;
mod set_domain;
mod value;

pub(crate) mod interval_ops;
pub(crate) mod sorted_values;

pub use enumerated_domain::EnumeratedDomain;
pub use events::DomainEvent;
pub use events::DomainEvents;
pub use events::SetDomainEvent;
pub use events::SetDomainEvents;
pub use interval_domain::IntervalDomain;
pub use scalar_domain::Domain;
pub use set_domain::SetDomain;
pub use value::DomainValue;
