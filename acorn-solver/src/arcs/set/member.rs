use crate::algorithms::AlgorithmStrength;
use crate::arcs::Arc;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::domains::interval_ops;
use crate::domains::DomainEvents;
use crate::domains::DomainValue;
use crate::domains::SetDomainEvents;
use crate::nodes::NodeId;
use crate::nodes::SetNodeId;

/// An arc maintaining `x ∈ s`, bridging the scalar and the set world.
#[derive(Debug)]
pub struct MemberArc {
    x: NodeId,
    s: SetNodeId,
}

impl MemberArc {
    pub fn new(x: NodeId, s: SetNodeId) -> Self {
        MemberArc { x, s }
    }
}

impl<T: DomainValue> Arc<T> for MemberArc {
    fn name(&self) -> &str {
        "Member"
    }

    fn watches(&self) -> Vec<Watch> {
        vec![
            Watch::Scalar(self.x, DomainEvents::ANY),
            Watch::Set(self.s, SetDomainEvents::ANY),
        ]
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        let possible = context.possible_values(self.s);
        if possible.is_empty() {
            return Err(PropagationFailure::for_variable(Arc::<T>::name(self)));
        }
        let (lo, hi) = interval_ops::minmax(possible.iter().copied());
        context.set_min(self.x, lo)?;
        context.set_max(self.x, hi)?;

        if context.strength() == AlgorithmStrength::ArcConsistency {
            if let Some(values) = context.enumerated_values(self.x) {
                for value in values {
                    if !context.is_possible(self.s, value) {
                        context.remove_value(self.x, value)?;
                    }
                }
            }
        }

        if context.is_bound(self.x) {
            context.require(self.s, context.min(self.x))?;
        }
        Ok(())
    }
}

/// An arc maintaining `x ∉ s`.
#[derive(Debug)]
pub struct NotMemberArc {
    x: NodeId,
    s: SetNodeId,
}

impl NotMemberArc {
    pub fn new(x: NodeId, s: SetNodeId) -> Self {
        NotMemberArc { x, s }
    }
}

impl<T: DomainValue> Arc<T> for NotMemberArc {
    fn name(&self) -> &str {
        "NotMember"
    }

    fn watches(&self) -> Vec<Watch> {
        vec![
            Watch::Scalar(self.x, DomainEvents::ANY),
            Watch::Set(self.s, SetDomainEvents::ANY),
        ]
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        for value in context.required_values(self.s) {
            context.remove_value(self.x, value)?;
        }
        if context.is_bound(self.x) {
            context.exclude(self.s, context.min(self.x))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_engine::TestEngine;

    #[test]
    fn membership_prunes_the_scalar_to_the_possible_values() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_enumerated(vec![1, 3, 5, 9]);
        let s = engine.new_set(vec![2, 3, 5, 6]);
        let _ = engine.add_arc(MemberArc::new(x, s));

        engine.propagate().expect("no empty domains");

        assert_eq!(engine.enumerated_values(x), Some(vec![3, 5]));
    }

    #[test]
    fn a_bound_member_becomes_required() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_enumerated(vec![4]);
        let s = engine.new_set(vec![2, 4, 6]);
        let _ = engine.add_arc(MemberArc::new(x, s));

        engine.propagate().expect("no empty domains");

        assert!(engine.is_required(s, 4));
    }

    #[test]
    fn a_bound_non_member_is_excluded() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_enumerated(vec![4]);
        let s = engine.new_set(vec![2, 4, 6]);
        let _ = engine.add_arc(NotMemberArc::new(x, s));

        engine.propagate().expect("no empty domains");

        assert!(!engine.is_possible(s, 4));
    }

    #[test]
    fn required_set_members_leave_the_excluded_scalar() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let x = engine.new_enumerated(vec![2, 4]);
        let s = engine.new_set(vec![2, 4, 6]);
        let _ = engine.add_arc(NotMemberArc::new(x, s));

        engine.require(s, 2).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert_eq!(engine.enumerated_values(x), Some(vec![4]));
    }
}
