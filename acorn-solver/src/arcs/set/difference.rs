use super::candidate_values;
use crate::arcs::Arc;
use crate::arcs::PropagationContext;
use crate::arcs::ReadDomains;
use crate::arcs::Watch;
use crate::basic_types::PropagationStatus;
use crate::domains::DomainValue;
use crate::domains::SetDomainEvents;
use crate::nodes::SetNodeId;

/// An arc maintaining `a \ b = c`.
#[derive(Debug)]
pub struct SetDifferenceArc {
    a: SetNodeId,
    b: SetNodeId,
    c: SetNodeId,
}

impl SetDifferenceArc {
    pub fn new(a: SetNodeId, b: SetNodeId, c: SetNodeId) -> Self {
        SetDifferenceArc { a, b, c }
    }
}

impl<T: DomainValue> Arc<T> for SetDifferenceArc {
    fn name(&self) -> &str {
        "SetDifference"
    }

    fn watches(&self) -> Vec<Watch> {
        vec![
            Watch::Set(self.a, SetDomainEvents::ANY),
            Watch::Set(self.b, SetDomainEvents::ANY),
            Watch::Set(self.c, SetDomainEvents::ANY),
        ]
    }

    fn propagate(&mut self, context: &mut PropagationContext<'_, T>) -> PropagationStatus {
        for value in candidate_values(context, &[self.a, self.b, self.c]) {
            if context.is_required(self.a, value) && !context.is_possible(self.b, value) {
                context.require(self.c, value)?;
            }
            if !context.is_possible(self.a, value) || context.is_required(self.b, value) {
                context.exclude(self.c, value)?;
            }
            if context.is_required(self.c, value) {
                context.require(self.a, value)?;
                context.exclude(self.b, value)?;
            }
            if !context.is_possible(self.c, value) && context.is_required(self.a, value) {
                // A member of `a` that is not in the difference must be
                // cancelled by `b`.
                context.require(self.b, value)?;
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
    fn uncancelled_members_reach_the_difference() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_set(vec![1, 2, 3]);
        let b = engine.new_set(vec![2]);
        let c = engine.new_set(vec![1, 2, 3]);
        let _ = engine.add_arc(SetDifferenceArc::new(a, b, c));

        engine.require(a, 1).expect("consistent");
        engine.require(b, 2).expect("consistent");
        engine.propagate().expect("no empty domains");

        // 1 is in a and cannot be in b.
        assert!(engine.is_required(c, 1));
        // 2 is cancelled by b.
        assert!(!engine.is_possible(c, 2));
    }

    #[test]
    fn required_difference_members_split_the_operands() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_set(vec![1, 2]);
        let b = engine.new_set(vec![1, 2]);
        let c = engine.new_set(vec![1, 2]);
        let _ = engine.add_arc(SetDifferenceArc::new(a, b, c));

        engine.require(c, 1).expect("consistent");
        engine.propagate().expect("no empty domains");

        assert!(engine.is_required(a, 1));
        assert!(!engine.is_possible(b, 1));
    }

    #[test]
    fn missing_difference_member_forces_the_subtrahend() {
        let mut engine: TestEngine<i32> = TestEngine::new();
        let a = engine.new_set(vec![1, 2]);
        let b = engine.new_set(vec![1, 2]);
        let c = engine.new_set(vec![2]);
        let _ = engine.add_arc(SetDifferenceArc::new(a, b, c));

        engine.require(a, 1).expect("consistent");
        engine.propagate().expect("no empty domains");

        // 1 is in a but cannot be in the difference.
        assert!(engine.is_required(b, 1));
    }
}
